//! Configuration types for the W5500 driver

use crate::internal::constants::{
    DEFAULT_MAC_ADDR, DEFAULT_MSS, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_TIME, RESET_TIMEOUT_MS,
};
use crate::internal::register::{phycfgr, socket::mode};

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    #[default]
    Mbps100,
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// Ethernet link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No link partner
    #[default]
    Down,
    /// Link established
    Up,
}

impl LinkState {
    /// Returns `true` if the link is up
    #[inline(always)]
    pub const fn is_up(self) -> bool {
        matches!(self, LinkState::Up)
    }
}

/// PHY status decoded from the PHY configuration register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyStatus {
    /// Link state
    pub link: LinkState,
    /// Negotiated or forced speed
    pub speed: Speed,
    /// Negotiated or forced duplex
    pub duplex: Duplex,
}

impl PhyStatus {
    /// Decode a raw PHYCFGR value
    pub const fn from_raw(raw: u8) -> Self {
        Self {
            link: if raw & phycfgr::LNK != 0 {
                LinkState::Up
            } else {
                LinkState::Down
            },
            speed: if raw & phycfgr::SPD != 0 {
                Speed::Mbps100
            } else {
                Speed::Mbps10
            },
            duplex: if raw & phycfgr::DPX != 0 {
                Duplex::Full
            } else {
                Duplex::Half
            },
        }
    }
}

// =============================================================================
// Socket Configuration
// =============================================================================

/// Socket protocol mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Protocol {
    /// TCP stream
    Tcp = mode::TCP,
    /// UDP datagrams
    Udp = mode::UDP,
    /// Raw Ethernet frames (socket 0 only)
    MacRaw = mode::MACRAW,
}

impl Protocol {
    /// Value for the socket Mode register
    #[inline(always)]
    pub const fn to_reg_value(self) -> u8 {
        self as u8
    }
}

/// Per-socket hardware buffer size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BufferSize {
    /// No buffer memory
    Kb0 = 0,
    /// 1 KB
    Kb1 = 1,
    /// 2 KB (chip default)
    #[default]
    Kb2 = 2,
    /// 4 KB
    Kb4 = 4,
    /// 8 KB
    Kb8 = 8,
    /// 16 KB
    Kb16 = 16,
}

impl BufferSize {
    /// Value for the RX/TX buffer size registers
    #[inline(always)]
    pub const fn to_reg_value(self) -> u8 {
        self as u8
    }

    /// Buffer size in bytes
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        self as usize * 1024
    }
}

/// Software record used to (re-)initialize a socket's register block
///
/// The socket's run-time state lives in the chip's status register; this
/// record only holds what is written during open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketConfig {
    /// Protocol of the last successful open, `None` if never opened
    pub protocol: Option<Protocol>,
    /// TCP maximum segment size
    pub mss: u16,
    /// TX buffer size class
    pub tx_buffer: BufferSize,
    /// RX buffer size class
    pub rx_buffer: BufferSize,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketConfig {
    /// Closed socket with default MSS and 2 KB buffers
    #[must_use]
    pub const fn new() -> Self {
        Self {
            protocol: None,
            mss: DEFAULT_MSS,
            tx_buffer: BufferSize::Kb2,
            rx_buffer: BufferSize::Kb2,
        }
    }
}

// =============================================================================
// Device Configuration
// =============================================================================

/// Static IPv4 addressing programmed during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkConfig {
    /// Source IP address
    pub ip: [u8; 4],
    /// Subnet mask
    pub subnet: [u8; 4],
    /// Default gateway
    pub gateway: [u8; 4],
}

impl NetworkConfig {
    /// Create a network configuration
    #[must_use]
    pub const fn new(ip: [u8; 4], subnet: [u8; 4], gateway: [u8; 4]) -> Self {
        Self {
            ip,
            subnet,
            gateway,
        }
    }
}

/// W5500 device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct W5500Config {
    /// Source MAC address
    pub mac_address: [u8; 6],
    /// Optional static addressing applied during setup
    pub network: Option<NetworkConfig>,
    /// TCP retransmission timeout in 100 µs units (0 = leave unchanged)
    pub retry_time: u16,
    /// TCP retransmission count (0 = leave unchanged)
    pub retry_count: u8,
    /// Maximum time to wait for the reset bit to clear
    pub reset_timeout_ms: u32,
    /// Maximum empty polls in send/recv before giving up (`None` = wait forever)
    pub poll_limit: Option<u32>,
}

impl Default for W5500Config {
    fn default() -> Self {
        Self::new()
    }
}

impl W5500Config {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            network: None,
            retry_time: DEFAULT_RETRY_TIME,
            retry_count: DEFAULT_RETRY_COUNT,
            reset_timeout_ms: RESET_TIMEOUT_MS,
            poll_limit: None,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the MAC address
    ///
    /// If not set, a default locally-administered address
    /// (02:00:00:00:00:01) will be used.
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Program a static IP, subnet and gateway during setup
    #[must_use]
    pub const fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    /// Set the TCP retry time (100 µs units, 0 skips the write)
    #[must_use]
    pub const fn with_retry_time(mut self, retry_time: u16) -> Self {
        self.retry_time = retry_time;
        self
    }

    /// Set the TCP retry count (0 skips the write)
    #[must_use]
    pub const fn with_retry_count(mut self, retry_count: u8) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Set the reset timeout
    #[must_use]
    pub const fn with_reset_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.reset_timeout_ms = timeout_ms;
        self
    }

    /// Bound the send/recv poll loops
    ///
    /// With `Some(n)`, a transfer fails with [`IoError::Timeout`] after `n`
    /// consecutive polls found no buffer space or data.
    ///
    /// [`IoError::Timeout`]: crate::IoError::Timeout
    #[must_use]
    pub const fn with_poll_limit(mut self, limit: Option<u32>) -> Self {
        self.poll_limit = limit;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
