//! Hardware Abstraction Layer
//!
//! This module adapts the embedded-hal collaborators the driver depends on.
//!
//! # Modules
//!
//! - [`spi`]: Register access over an `embedded_hal::spi::SpiDevice`
//! - [`pins`]: Placeholder for the optional reset and interrupt lines
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod pins;
pub mod spi;

// Re-export commonly used types
pub use pins::NoPin;
pub use spi::RegisterBus;
