//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers and
//! configuration defaults used throughout the W5500 driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Sockets**: socket count, default MSS and buffer class
//! - **Timing**: reset pulse, reset polling, flow-control poll step
//! - **Reliability**: double-read retry bound
//! - **Defaults**: MAC address, TCP retry timer
//!
//! # Note
//!
//! Register addresses and bit definitions live in `internal::register`, next
//! to the frame header encoding that uses them.

// =============================================================================
// Sockets
// =============================================================================

/// Number of hardware sockets on the W5500
pub const SOCKET_COUNT: usize = 8;

/// Highest valid socket index
pub const MAX_SOCKET_ID: u8 = (SOCKET_COUNT - 1) as u8;

/// Default TCP maximum segment size
pub const DEFAULT_MSS: u16 = 1460;

/// Size of the per-datagram header the chip prepends to UDP payloads in RX
/// memory (4-byte source IP, 2-byte source port, 2-byte payload length)
pub const UDP_HEADER_LEN: usize = 8;

// =============================================================================
// Timing Constants
// =============================================================================

/// Minimum hardware reset pulse width in microseconds
pub const RESET_PULSE_US: u32 = 500;

/// Settle time after releasing reset, before the first Mode register read
pub const RESET_SETTLE_MS: u32 = 1;

/// Default timeout for the reset bit to clear, in milliseconds
pub const RESET_TIMEOUT_MS: u32 = 100;

/// Mode register poll interval while waiting for reset, in microseconds
pub const RESET_POLL_INTERVAL_US: u32 = 100;

/// Flow-control poll step while waiting for TX space or RX data
pub const POLL_INTERVAL_MS: u32 = 1;

// =============================================================================
// Reliability
// =============================================================================

/// Double-read attempts before a 16-bit counter register is declared unstable.
///
/// Tunable; five attempts has proven sufficient for the free-size and
/// received-size counters.
pub const STABLE_READ_ATTEMPTS: u32 = 5;

// =============================================================================
// Defaults
// =============================================================================

/// Default locally-administered MAC address
/// Bit 1 of first byte = 1 indicates locally administered
/// Bit 0 of first byte = 0 indicates unicast
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// IPv4 address length in bytes
pub const IP_ADDR_LEN: usize = 4;

/// Default TCP retry time in 100 µs units (200 ms, the chip reset value)
pub const DEFAULT_RETRY_TIME: u16 = 2000;

/// Default TCP retry count (the chip reset value)
pub const DEFAULT_RETRY_COUNT: u8 = 8;

/// Expected value of the Version register
pub const CHIP_VERSION: u8 = 0x04;
