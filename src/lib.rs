//! WIZnet W5500 Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the WIZnet W5500, an SPI-attached
//! Ethernet controller with a hardwired TCP/IP stack and eight sockets.
//!
//! The chip runs TCP, UDP and raw-MAC sockets on its own. This crate frames
//! register accesses over SPI, brings the chip up, and exposes socket-style
//! primitives (open, bind, listen, connect, send, recv, sendto, recvfrom,
//! disconnect, close) to firmware without a network stack of its own.
//!
//! # Architecture
//!
//! The driver is organized into four layers, leaves first:
//!
//! 1. **Register Access** ([`hal::spi`]): frame header encoding and the
//!    double-read guard for counters the chip updates mid-read
//! 2. **Device Control** ([`driver::device`]): reset, identity check,
//!    MAC/IP/subnet/gateway, PHY link, TCP retry settings
//! 3. **Socket Manager** ([`driver::socket`]): per-socket lifecycle driven
//!    through the command register and observed through the status register
//! 4. **Buffer Engine** ([`driver::buffer`]): TX/RX ring pointers, free-space
//!    polling, chunked stream transfer and UDP datagram framing
//!
//! All collaborators are `embedded-hal` 1.0 traits: an `SpiDevice` for the
//! bus, `DelayNs` for timing, and optional `OutputPin`/`InputPin` for the
//! reset and interrupt lines.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and driver logging
//! - `critical-section`: Enable ISR-safe `SharedW5500` wrapper
//!
//! # Example
//!
//! ```ignore
//! use ph_w5500::{
//!     BufferSize, NetworkConfig, Protocol, SocketAddress, SocketStatus, W5500, W5500Config,
//! };
//!
//! let config = W5500Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!     .with_network(NetworkConfig::new(
//!         [192, 168, 1, 50],
//!         [255, 255, 255, 0],
//!         [192, 168, 1, 1],
//!     ));
//!
//! let mut w5500 = W5500::new(spi, delay, config).with_reset_pin(reset);
//! let link = w5500.init()?;
//!
//! w5500.open(0, Protocol::Tcp, BufferSize::Kb2)?;
//! w5500.connect(0, &SocketAddress::new([192, 168, 1, 10], 5000))?;
//! while w5500.socket_status(0)? != SocketStatus::Established {}
//!
//! w5500.send(0, b"hello")?;
//! let mut buf = [0u8; 512];
//! let n = w5500.recv(0, &mut buf)?;
//! ```
//!
//! # Concurrency
//!
//! Every operation is blocking and runs to completion on the calling
//! context. `send`, `recv` and `sendto` poll in 1 ms steps while waiting for
//! buffer space or data; they return early only when the socket leaves a
//! sendable state, or after a configured poll limit
//! ([`W5500Config::with_poll_limit`]).

#![no_std]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
// Clippy lint levels live here; Cargo.toml carries the same table.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    BufferSize, Duplex, LinkState, NetworkConfig, PhyStatus, Protocol, SocketConfig, Speed,
    W5500Config,
};
pub use driver::device::{W5500, W5500Parts};
pub use driver::error::{ConfigError, Error, IoError, Result, SocketError};
pub use driver::interrupt::SocketInterrupts;
pub use driver::socket::{SocketAddress, SocketCommand, SocketStatus};
pub use hal::pins::NoPin;

/// Register map for advanced use.
///
/// Most users should prefer the driver APIs. Raw accesses through
/// [`hal::RegisterBus`] bypass the socket state checks and the driver's
/// record of each socket.
pub mod registers {
    pub use crate::internal::register::socket;
    pub use crate::internal::register::{
        Block, CTRL_BSB_SHIFT, CTRL_OM_MASK, CTRL_OM_VDM, CTRL_RWB_READ, CTRL_RWB_WRITE, GAR,
        HEADER_LEN, MR, PHYCFGR, RCR, RTR, SHAR, SIMR, SIPR, SIR, SUBR, VERSIONR, frame_header,
        mr, phycfgr,
    };
}

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedW5500;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Identity
        CHIP_VERSION,
        // Defaults
        DEFAULT_MAC_ADDR,
        DEFAULT_MSS,
        DEFAULT_RETRY_COUNT,
        DEFAULT_RETRY_TIME,
        IP_ADDR_LEN,
        MAC_ADDR_LEN,
        // Sockets
        MAX_SOCKET_ID,
        // Timing
        POLL_INTERVAL_MS,
        RESET_PULSE_US,
        RESET_TIMEOUT_MS,
        SOCKET_COUNT,
        // Reliability
        STABLE_READ_ATTEMPTS,
        UDP_HEADER_LEN,
    };
}
