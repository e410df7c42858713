//! Error types for the W5500 driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Reset, identity and GPIO failures during bring-up
//! - [`SocketError`]: Invalid socket arguments and status preconditions
//! - [`IoError`]: Runtime failures inside register reads and TX/RX loops
//!
//! The unified [`Error`] enum wraps all domain errors plus the SPI bus error,
//! which is passed through untouched.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur during chip reset, identity check, or GPIO handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Reset bit in the Mode register never cleared
    ResetTimeout,
    /// Version register does not identify a W5500 (wrong or dead part)
    ChipIdMismatch,
    /// Reset pin could not be driven
    GpioError,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::ResetTimeout => "reset timed out",
            ConfigError::ChipIdMismatch => "chip version mismatch",
            ConfigError::GpioError => "GPIO error",
            ConfigError::InvalidConfig => "invalid configuration",
        }
    }
}

// =============================================================================
// Socket Errors
// =============================================================================

/// Socket argument and state errors
///
/// These are raised before the requested command reaches the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketError {
    /// Socket index outside 0..=7
    InvalidSocket,
    /// Argument not valid for this socket (e.g. MACRAW on socket != 0)
    InvalidArgument,
    /// Current socket status does not allow the operation
    InvalidState,
    /// Socket is not connected
    NotConnected,
    /// Operation requires a UDP socket
    WrongProtocol,
}

impl core::fmt::Display for SocketError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SocketError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SocketError::InvalidSocket => "invalid socket number",
            SocketError::InvalidArgument => "invalid argument",
            SocketError::InvalidState => "invalid socket state for operation",
            SocketError::NotConnected => "socket not connected",
            SocketError::WrongProtocol => "wrong protocol for socket",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime register and TX/RX errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// A 16-bit counter register never read the same value twice in a row
    UnstableRegister,
    /// Connection dropped while waiting for buffer space or data
    ConnectionReset,
    /// Configured poll limit exhausted
    Timeout,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::UnstableRegister => "register value unstable",
            IoError::ConnectionReset => "connection reset",
            IoError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// `E` is the error type of the SPI device.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Spi(e)) => { /* bus failure */ }
///     Err(Error::Socket(SocketError::NotConnected)) => { /* ... */ }
///     Err(Error::Io(IoError::ConnectionReset)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// SPI bus error
    Spi(E),
    /// Configuration error
    Config(ConfigError),
    /// Socket error
    Socket(SocketError),
    /// I/O error
    Io(IoError),
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "spi: {e:?}"),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Socket(e) => write!(f, "socket: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

// From impls for automatic conversion
impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E> From<SocketError> for Error<E> {
    fn from(e: SocketError) -> Self {
        Error::Socket(e)
    }
}

impl<E> From<IoError> for Error<E> {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for W5500 operations
pub type Result<T, E> = core::result::Result<T, Error<E>>;

// =============================================================================
// Unit Tests
// =============================================================================
