//! Core driver components for the W5500.
//!
//! This module contains the building blocks for bringing up the chip and
//! driving its eight hardware sockets:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`device`] - The [`W5500`] driver: reset, addressing, PHY and teardown
//! - [`socket`] - Socket state machine (open, connect, listen, close)
//! - [`buffer`] - TX/RX buffer engine (send, recv, sendto, recvfrom)
//! - [`interrupt`] - Socket interrupt flags
//!
//! # Example
//!
//! ```ignore
//! use ph_w5500::driver::{W5500, W5500Config, Protocol, BufferSize, SocketAddress};
//!
//! let config = W5500Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! let mut w5500 = W5500::new(spi, delay, config);
//! w5500.init()?;
//!
//! w5500.open(0, Protocol::Tcp, BufferSize::Kb2)?;
//! w5500.connect(0, &SocketAddress::new([192, 168, 1, 10], 5000))?;
//! ```

// Submodules
pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod interrupt;
pub mod socket;

// Re-exports for convenience
pub use config::{
    BufferSize, Duplex, LinkState, NetworkConfig, PhyStatus, Protocol, SocketConfig, Speed,
    W5500Config,
};
pub use device::{W5500, W5500Parts};
pub use error::{ConfigError, Error, IoError, Result, SocketError};
pub use interrupt::SocketInterrupts;
pub use socket::{SocketAddress, SocketCommand, SocketStatus};
