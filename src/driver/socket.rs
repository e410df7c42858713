//! Socket manager.
//!
//! Each of the eight hardware sockets is driven by writing its command
//! register and observed through its status register. The status register is
//! the only source of truth for connection state; the driver keeps just the
//! configuration needed to (re-)open a socket.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use super::config::{BufferSize, Protocol, SocketConfig};
use super::device::W5500;
use super::error::{Error, Result, SocketError};
use super::interrupt::SocketInterrupts;
use crate::internal::constants::{IP_ADDR_LEN, MAX_SOCKET_ID, SOCKET_COUNT};
use crate::internal::register::Block;
use crate::internal::register::socket::{
    CR, DIPR, DPORT, IR, MR, MSSR, PORT, RXBUF_SIZE, SR, TXBUF_SIZE, cmd, status,
};

// =============================================================================
// Socket Status
// =============================================================================

/// Decoded socket status register (Sn_SR)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketStatus {
    /// Socket closed
    Closed,
    /// TCP socket opened, ready for connect or listen
    Init,
    /// Waiting for an incoming connection
    Listen,
    /// SYN sent, waiting for SYN/ACK
    SynSent,
    /// SYN received
    SynRecv,
    /// Connection established
    Established,
    /// Closing, FIN sent
    FinWait,
    /// Closing, simultaneous close
    Closing,
    /// Closing, waiting out the timer
    TimeWait,
    /// Peer closed its half of the connection
    CloseWait,
    /// Closing, waiting for the last ACK
    LastAck,
    /// UDP socket opened
    Udp,
    /// MACRAW socket opened
    MacRaw,
    /// Transitional or undocumented value
    Unknown(u8),
}

impl SocketStatus {
    /// Decode a raw Sn_SR value
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            status::CLOSED => SocketStatus::Closed,
            status::INIT => SocketStatus::Init,
            status::LISTEN => SocketStatus::Listen,
            status::SYNSENT => SocketStatus::SynSent,
            status::SYNRECV => SocketStatus::SynRecv,
            status::ESTABLISHED => SocketStatus::Established,
            status::FIN_WAIT => SocketStatus::FinWait,
            status::CLOSING => SocketStatus::Closing,
            status::TIME_WAIT => SocketStatus::TimeWait,
            status::CLOSE_WAIT => SocketStatus::CloseWait,
            status::LAST_ACK => SocketStatus::LastAck,
            status::UDP => SocketStatus::Udp,
            status::MACRAW => SocketStatus::MacRaw,
            other => SocketStatus::Unknown(other),
        }
    }

    /// Raw Sn_SR value
    pub const fn to_raw(self) -> u8 {
        match self {
            SocketStatus::Closed => status::CLOSED,
            SocketStatus::Init => status::INIT,
            SocketStatus::Listen => status::LISTEN,
            SocketStatus::SynSent => status::SYNSENT,
            SocketStatus::SynRecv => status::SYNRECV,
            SocketStatus::Established => status::ESTABLISHED,
            SocketStatus::FinWait => status::FIN_WAIT,
            SocketStatus::Closing => status::CLOSING,
            SocketStatus::TimeWait => status::TIME_WAIT,
            SocketStatus::CloseWait => status::CLOSE_WAIT,
            SocketStatus::LastAck => status::LAST_ACK,
            SocketStatus::Udp => status::UDP,
            SocketStatus::MacRaw => status::MACRAW,
            SocketStatus::Unknown(raw) => raw,
        }
    }

    /// Data can move through the socket buffers in this state
    #[inline]
    pub const fn is_sendable(self) -> bool {
        matches!(
            self,
            SocketStatus::Established | SocketStatus::Udp | SocketStatus::MacRaw
        )
    }
}

// =============================================================================
// Socket Command
// =============================================================================

/// Socket command register (Sn_CR) values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SocketCommand {
    /// Initialize the socket from its mode register
    Open = cmd::OPEN,
    /// Wait for a TCP connection
    Listen = cmd::LISTEN,
    /// Connect to the destination address
    Connect = cmd::CONNECT,
    /// Start the TCP close handshake
    Disconnect = cmd::DISCON,
    /// Close immediately
    Close = cmd::CLOSE,
    /// Transmit the TX buffer up to the write pointer
    Send = cmd::SEND,
    /// UDP transmit without ARP
    SendMac = cmd::SEND_MAC,
    /// TCP keep-alive
    SendKeep = cmd::SEND_KEEP,
    /// Commit the RX read pointer
    Recv = cmd::RECV,
}

impl SocketCommand {
    /// Value for the command register
    #[inline(always)]
    pub const fn to_reg_value(self) -> u8 {
        self as u8
    }
}

// =============================================================================
// Socket Address
// =============================================================================

/// IPv4 address and port in wire (big-endian) byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketAddress {
    /// IPv4 address
    pub ip: [u8; IP_ADDR_LEN],
    /// Port, big-endian
    pub port: [u8; 2],
}

impl SocketAddress {
    /// Create from an address and a host-order port number
    #[must_use]
    pub const fn new(ip: [u8; IP_ADDR_LEN], port: u16) -> Self {
        Self {
            ip,
            port: port.to_be_bytes(),
        }
    }

    /// Create from raw wire bytes
    #[must_use]
    pub const fn from_raw(ip: [u8; IP_ADDR_LEN], port: [u8; 2]) -> Self {
        Self { ip, port }
    }

    /// Port as a host-order number
    #[inline]
    pub const fn port_number(&self) -> u16 {
        u16::from_be_bytes(self.port)
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.ip;
        write!(f, "{a}.{b}.{c}.{d}:{}", self.port_number())
    }
}

/// Register block of socket `id`
pub(super) const fn socket_block(id: u8) -> core::result::Result<Block, SocketError> {
    if id > MAX_SOCKET_ID {
        return Err(SocketError::InvalidSocket);
    }
    Ok(Block::Socket(id))
}

// =============================================================================
// Socket Manager
// =============================================================================

impl<SPI, D, RST, INT> W5500<SPI, D, RST, INT>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Configuration record of socket `id`
    pub fn socket_config(&self, id: u8) -> core::result::Result<&SocketConfig, SocketError> {
        socket_block(id)?;
        Ok(&self.sockets[usize::from(id)])
    }

    /// Read and decode the status register of socket `id`
    pub fn socket_status(&mut self, id: u8) -> Result<SocketStatus, SPI::Error> {
        let block = socket_block(id)?;
        let raw = self.bus.read_u8(block, SR)?;
        Ok(SocketStatus::from_raw(raw))
    }

    /// Write a command to socket `id`
    ///
    /// No state is checked; the chip acts on the command asynchronously.
    pub fn command(&mut self, id: u8, command: SocketCommand) -> Result<(), SPI::Error> {
        let block = socket_block(id)?;
        self.bus.write_u8(block, CR, command.to_reg_value())
    }

    /// Read the interrupt flags of socket `id`
    pub fn socket_interrupts(&mut self, id: u8) -> Result<SocketInterrupts, SPI::Error> {
        let block = socket_block(id)?;
        let raw = self.bus.read_u8(block, IR)?;
        Ok(SocketInterrupts::from_raw(raw))
    }

    /// Clear the given interrupt flags of socket `id`
    pub fn clear_socket_interrupts(
        &mut self,
        id: u8,
        flags: SocketInterrupts,
    ) -> Result<(), SPI::Error> {
        let block = socket_block(id)?;
        self.bus.write_u8(block, IR, flags.to_raw())
    }

    /// Set the TCP MSS used the next time socket `id` is opened
    pub fn set_mss(&mut self, id: u8, mss: u16) -> core::result::Result<(), SocketError> {
        socket_block(id)?;
        self.sockets[usize::from(id)].mss = mss;
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open socket `id` with `protocol` and `buf_size` TX/RX buffers
    ///
    /// The socket must be CLOSED. TCP sockets move to INIT, UDP and MACRAW
    /// sockets become active immediately.
    ///
    /// # Errors
    /// - `SocketError::InvalidArgument` - MACRAW requested on a socket other than 0
    /// - `SocketError::InvalidState` - socket is not CLOSED
    pub fn open(
        &mut self,
        id: u8,
        protocol: Protocol,
        buf_size: BufferSize,
    ) -> Result<(), SPI::Error> {
        socket_block(id)?;
        if protocol == Protocol::MacRaw && id != 0 {
            return Err(SocketError::InvalidArgument.into());
        }
        if self.socket_status(id)? != SocketStatus::Closed {
            return Err(SocketError::InvalidState.into());
        }

        let record = &mut self.sockets[usize::from(id)];
        record.protocol = Some(protocol);
        record.tx_buffer = buf_size;
        record.rx_buffer = buf_size;

        if let Err(e) = self.reopen(id) {
            self.sockets[usize::from(id)].protocol = None;
            return Err(e);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("socket {} open as {}", id, protocol);

        Ok(())
    }

    /// Re-initialize socket `id` from its stored record and issue OPEN
    ///
    /// Writes the mode register, the MSS (TCP only) and both buffer sizes.
    pub fn reopen(&mut self, id: u8) -> Result<(), SPI::Error> {
        let block = socket_block(id)?;
        let record = self.sockets[usize::from(id)];
        let Some(protocol) = record.protocol else {
            return Err(SocketError::InvalidState.into());
        };

        self.bus.write_u8(block, MR, protocol.to_reg_value())?;
        if protocol == Protocol::Tcp {
            self.bus.write_u16(block, MSSR, record.mss)?;
        }
        self.bus.write_u8(block, RXBUF_SIZE, record.rx_buffer.to_reg_value())?;
        self.bus.write_u8(block, TXBUF_SIZE, record.tx_buffer.to_reg_value())?;
        self.command(id, SocketCommand::Open)
    }

    /// Set the local port of socket `id`
    pub fn bind(&mut self, id: u8, port: u16) -> Result<(), SPI::Error> {
        let block = socket_block(id)?;
        self.bus.write_u16(block, PORT, port)
    }

    /// Start a TCP connection from socket `id` to `addr`
    ///
    /// Only valid in INIT. Returns once CONNECT is issued; the outcome shows
    /// up later in [`socket_status`](Self::socket_status).
    pub fn connect(&mut self, id: u8, addr: &SocketAddress) -> Result<(), SPI::Error> {
        let block = socket_block(id)?;
        if self.socket_status(id)? != SocketStatus::Init {
            return Err(SocketError::InvalidState.into());
        }

        self.bus.write(block, DIPR, &addr.ip)?;
        self.bus.write(block, DPORT, &addr.port)?;
        self.command(id, SocketCommand::Connect)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("socket {} connecting to {}", id, addr);

        Ok(())
    }

    /// Wait for an incoming TCP connection on socket `id`
    ///
    /// Only valid in INIT.
    pub fn listen(&mut self, id: u8) -> Result<(), SPI::Error> {
        if self.socket_status(id)? != SocketStatus::Init {
            return Err(SocketError::InvalidState.into());
        }
        self.command(id, SocketCommand::Listen)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("socket {} listening", id);

        Ok(())
    }

    /// Start the TCP close handshake on socket `id`
    ///
    /// # Errors
    /// - `SocketError::NotConnected` - socket is neither ESTABLISHED nor CLOSE_WAIT
    pub fn disconnect(&mut self, id: u8) -> Result<(), SPI::Error> {
        match self.socket_status(id)? {
            SocketStatus::Established | SocketStatus::CloseWait => {
                self.command(id, SocketCommand::Disconnect)
            }
            _ => Err(SocketError::NotConnected.into()),
        }
    }

    /// Close socket `id` regardless of its state
    pub fn close(&mut self, id: u8) -> Result<(), SPI::Error> {
        self.command(id, SocketCommand::Close)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("socket {} closed", id);

        Ok(())
    }

    /// Close all eight sockets
    ///
    /// Every socket is attempted even if an earlier one fails; the first
    /// error is returned.
    pub fn close_all(&mut self) -> Result<(), SPI::Error> {
        let mut first: Option<Error<SPI::Error>> = None;
        for id in 0..SOCKET_COUNT as u8 {
            if let Err(e) = self.close(id) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
