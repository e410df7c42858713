//! Synchronization Support
//!
//! The W5500 shares one SPI channel between all eight sockets, so every
//! access has to be serialized. This module provides a critical-section
//! based wrapper for firmware that drives the chip from more than one
//! context (e.g. main loop and the interrupt-line handler):
//!
//! - [`SharedW5500`] - Critical-section protected driver, usable as a `static`
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use ph_w5500::sync::SharedW5500;
//!
//! static W5500: SharedW5500<MySpi, MyDelay> = SharedW5500::new();
//!
//! fn main() {
//!     W5500.install(W5500::new(spi, delay, W5500Config::default()));
//!     W5500.with(|w5500| w5500.init());
//! }
//! ```

mod shared;

pub use shared::SharedW5500;
