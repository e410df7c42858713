//! Socket interrupt flags.
//!
//! This module provides the [`SocketInterrupts`] structure for parsing
//! and clearing the per-socket interrupt register (Sn_IR).

use crate::internal::register::socket::ir;

// =============================================================================
// Socket Interrupts
// =============================================================================

/// Interrupt flags parsed from a socket's interrupt register.
///
/// The chip sets these flags on its own; they stay set until written back
/// with a 1. The core never waits on them, they are exposed for callers
/// building event-driven handling around the interrupt line.
///
/// # Example
///
/// ```ignore
/// let flags = w5500.socket_interrupts(0)?;
/// if flags.recv {
///     let n = w5500.recv(0, &mut buf)?;
/// }
/// w5500.clear_socket_interrupts(0, flags)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketInterrupts {
    /// Connection established with the peer
    pub connected: bool,
    /// FIN or FIN/ACK received from the peer
    pub disconnected: bool,
    /// Data received
    pub recv: bool,
    /// ARP or TCP retransmission timeout
    pub timeout: bool,
    /// SEND command completed
    pub send_ok: bool,
}

impl SocketInterrupts {
    /// Only the RECV flag set
    pub const RECV: Self = Self {
        connected: false,
        disconnected: false,
        recv: true,
        timeout: false,
        send_ok: false,
    };

    /// Create from a raw Sn_IR value
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self {
            connected: (raw & ir::CON) != 0,
            disconnected: (raw & ir::DISCON) != 0,
            recv: (raw & ir::RECV) != 0,
            timeout: (raw & ir::TIMEOUT) != 0,
            send_ok: (raw & ir::SEND_OK) != 0,
        }
    }

    /// Convert to raw value for clearing (write-1-to-clear)
    #[inline]
    pub const fn to_raw(&self) -> u8 {
        let mut val = 0u8;
        if self.connected {
            val |= ir::CON;
        }
        if self.disconnected {
            val |= ir::DISCON;
        }
        if self.recv {
            val |= ir::RECV;
        }
        if self.timeout {
            val |= ir::TIMEOUT;
        }
        if self.send_ok {
            val |= ir::SEND_OK;
        }
        val
    }

    /// Check if any flag is set
    #[inline]
    pub const fn any(&self) -> bool {
        self.connected || self.disconnected || self.recv || self.timeout || self.send_ok
    }
}
