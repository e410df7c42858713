//! TX/RX buffer engine.
//!
//! Each socket owns a TX and an RX ring in chip memory. The driver reads and
//! advances the 16-bit ring pointers; the chip masks them to the buffer size,
//! so wraparound needs no handling here beyond `wrapping_add`.
//!
//! Waiting for buffer space or data is a blocking poll with a fixed 1 ms
//! step. A poll gives up early only when the socket leaves a sendable state,
//! or after [`W5500Config::poll_limit`](super::config::W5500Config::poll_limit)
//! empty polls when one is configured.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::config::Protocol;
use super::device::W5500;
use super::error::{IoError, Result, SocketError};
use super::interrupt::SocketInterrupts;
use super::socket::{SocketAddress, SocketCommand, socket_block};
use crate::internal::constants::{POLL_INTERVAL_MS, UDP_HEADER_LEN};
use crate::internal::register::Block;
use crate::internal::register::socket::{DIPR, DPORT, RX_RD, RX_RSR, TX_FSR, TX_WR};

impl<SPI, D, RST, INT> W5500<SPI, D, RST, INT>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    // =========================================================================
    // Stream Transfer
    // =========================================================================

    /// Send all of `data` on socket `id`
    ///
    /// Data is written in chunks as TX space frees up, one SEND command per
    /// chunk. Blocks until everything is queued.
    ///
    /// # Errors
    /// - `SocketError::NotConnected` - socket is not ESTABLISHED, UDP or MACRAW
    /// - `IoError::ConnectionReset` - socket left a sendable state while waiting
    pub fn send(&mut self, id: u8, data: &[u8]) -> Result<usize, SPI::Error> {
        let block = socket_block(id)?;
        if data.is_empty() {
            return Ok(0);
        }
        self.require_sendable(id)?;

        let mut sent = 0;
        while sent < data.len() {
            let free = self.wait_for(id, TX_FSR, 1)?;
            let chunk = (data.len() - sent).min(usize::from(free));

            let wr = self.bus.read_u16_stable(block, TX_WR)?;
            self.bus.write(Block::TxBuffer(id), wr, &data[sent..sent + chunk])?;
            self.bus.write_u16(block, TX_WR, wr.wrapping_add(chunk as u16))?;
            self.command(id, SocketCommand::Send)?;

            sent += chunk;
        }

        Ok(sent)
    }

    /// Receive into `buf` from socket `id`
    ///
    /// Blocks until at least one byte is buffered, then copies as much as
    /// is available and fits. Returns the number of bytes copied.
    ///
    /// # Errors
    /// - `SocketError::NotConnected` - socket is not ESTABLISHED, UDP or MACRAW
    /// - `IoError::ConnectionReset` - socket left a sendable state while waiting
    pub fn recv(&mut self, id: u8, buf: &mut [u8]) -> Result<usize, SPI::Error> {
        let block = socket_block(id)?;
        if buf.is_empty() {
            return Ok(0);
        }
        self.require_sendable(id)?;

        let available = self.wait_for(id, RX_RSR, 1)?;
        let len = buf.len().min(usize::from(available));

        let rd = self.bus.read_u16_stable(block, RX_RD)?;
        self.bus.read(Block::RxBuffer(id), rd, &mut buf[..len])?;
        self.bus.write_u16(block, RX_RD, rd.wrapping_add(len as u16))?;
        self.command(id, SocketCommand::Recv)?;
        self.clear_socket_interrupts(id, SocketInterrupts::RECV)?;

        Ok(len)
    }

    // =========================================================================
    // Datagram Transfer
    // =========================================================================

    /// Send `data` as one UDP datagram from socket `id` to `to`
    ///
    /// The destination is programmed first, then the call waits until the
    /// whole datagram fits and issues a single SEND.
    ///
    /// # Errors
    /// - `SocketError::WrongProtocol` - socket was not opened as UDP
    /// - `SocketError::NotConnected` - socket is not in the UDP state
    /// - `SocketError::InvalidArgument` - datagram larger than the TX buffer
    /// - `IoError::ConnectionReset` - socket closed while waiting
    pub fn sendto(
        &mut self,
        id: u8,
        data: &[u8],
        to: &SocketAddress,
    ) -> Result<usize, SPI::Error> {
        let block = socket_block(id)?;
        if data.is_empty() {
            return Ok(0);
        }
        let record = self.sockets[usize::from(id)];
        if record.protocol != Some(Protocol::Udp) {
            return Err(SocketError::WrongProtocol.into());
        }
        if data.len() > record.tx_buffer.bytes() {
            return Err(SocketError::InvalidArgument.into());
        }
        self.require_sendable(id)?;

        self.bus.write(block, DIPR, &to.ip)?;
        self.bus.write(block, DPORT, &to.port)?;

        self.wait_for(id, TX_FSR, data.len() as u16)?;

        let wr = self.bus.read_u16_stable(block, TX_WR)?;
        self.bus.write(Block::TxBuffer(id), wr, data)?;
        self.bus.write_u16(block, TX_WR, wr.wrapping_add(data.len() as u16))?;
        self.command(id, SocketCommand::Send)?;

        Ok(data.len())
    }

    /// Take the next UDP datagram from socket `id`, if one is buffered
    ///
    /// Never blocks: returns `None` when no complete datagram header is
    /// buffered. A datagram longer than `buf` is truncated; the rest of it is
    /// discarded. Returns the number of bytes copied and the sender.
    ///
    /// # Errors
    /// - `SocketError::WrongProtocol` - socket was not opened as UDP
    /// - `SocketError::NotConnected` - socket is not in the UDP state
    pub fn recvfrom(
        &mut self,
        id: u8,
        buf: &mut [u8],
    ) -> Result<Option<(usize, SocketAddress)>, SPI::Error> {
        let block = socket_block(id)?;
        if self.sockets[usize::from(id)].protocol != Some(Protocol::Udp) {
            return Err(SocketError::WrongProtocol.into());
        }
        self.require_sendable(id)?;

        let available = self.bus.read_u16_stable(block, RX_RSR)?;
        if usize::from(available) < UDP_HEADER_LEN {
            return Ok(None);
        }

        let rd = self.bus.read_u16_stable(block, RX_RD)?;
        let mut header = [0u8; UDP_HEADER_LEN];
        self.bus.read(Block::RxBuffer(id), rd, &mut header)?;

        let from = SocketAddress::from_raw(
            [header[0], header[1], header[2], header[3]],
            [header[4], header[5]],
        );
        let datagram_len = u16::from_be_bytes([header[6], header[7]]);
        let copied = buf.len().min(usize::from(datagram_len));

        let payload = rd.wrapping_add(UDP_HEADER_LEN as u16);
        self.bus.read(Block::RxBuffer(id), payload, &mut buf[..copied])?;
        self.bus.write_u16(block, RX_RD, payload.wrapping_add(datagram_len))?;
        self.command(id, SocketCommand::Recv)?;
        self.clear_socket_interrupts(id, SocketInterrupts::RECV)?;

        Ok(Some((copied, from)))
    }

    // =========================================================================
    // Flow Control
    // =========================================================================

    fn require_sendable(&mut self, id: u8) -> Result<(), SPI::Error> {
        if self.socket_status(id)?.is_sendable() {
            Ok(())
        } else {
            Err(SocketError::NotConnected.into())
        }
    }

    /// Poll a size register of socket `id` until it reports at least `needed`
    fn wait_for(&mut self, id: u8, reg: u16, needed: u16) -> Result<u16, SPI::Error> {
        let block = Block::Socket(id);
        let mut empty_polls = 0u32;

        loop {
            let size = self.bus.read_u16_stable(block, reg)?;
            if size >= needed {
                return Ok(size);
            }

            let status = self.socket_status(id)?;
            if !status.is_sendable() {
                #[cfg(feature = "defmt")]
                defmt::warn!("socket {} dropped to {} while waiting", id, status);

                return Err(IoError::ConnectionReset.into());
            }

            empty_polls += 1;
            if self.config.poll_limit.is_some_and(|limit| empty_polls >= limit) {
                #[cfg(feature = "defmt")]
                defmt::warn!("socket {} poll limit reached", id);

                return Err(IoError::Timeout.into());
            }

            self.delay.delay_ms(POLL_INTERVAL_MS);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
