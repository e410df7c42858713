//! Core W5500 driver implementation.
//!
//! [`W5500`] owns the SPI device, the delay provider, the optional reset and
//! interrupt lines, and the configuration records of all eight sockets.
//! The socket state machine and the TX/RX buffer engine are implemented in
//! sibling modules as further `impl` blocks on the same type.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::config::{LinkState, NetworkConfig, PhyStatus, SocketConfig, W5500Config};
use super::error::{ConfigError, Result};
use crate::hal::pins::NoPin;
use crate::hal::spi::RegisterBus;
use crate::internal::constants::{
    CHIP_VERSION, IP_ADDR_LEN, MAC_ADDR_LEN, RESET_POLL_INTERVAL_US, RESET_PULSE_US,
    RESET_SETTLE_MS, SOCKET_COUNT,
};
use crate::internal::register::{
    Block, GAR, MR, PHYCFGR, RCR, RTR, SIMR, SIPR, SIR, SHAR, SUBR, VERSIONR, mr,
};

// =============================================================================
// Driver Structure
// =============================================================================

/// W5500 driver
///
/// # Type Parameters
/// * `SPI` - SPI device with chip select handling (`embedded_hal::spi::SpiDevice`)
/// * `D` - Delay provider used for reset timing and flow-control polling
/// * `RST` - Reset line (active low), [`NoPin`] if not wired
/// * `INT` - Interrupt line (active low), [`NoPin`] if not wired
///
/// All operations are blocking. The bus and every socket window share one
/// SPI channel, so concurrent use must be serialized by the caller (see
/// `sync::SharedW5500` with the `critical-section` feature).
pub struct W5500<SPI, D, RST = NoPin, INT = NoPin> {
    /// Register access layer
    pub(super) bus: RegisterBus<SPI>,
    /// Delay provider
    pub(super) delay: D,
    /// Optional hardware reset line
    pub(super) reset_pin: Option<RST>,
    /// Optional interrupt line
    pub(super) int_pin: Option<INT>,
    /// Device configuration
    pub(super) config: W5500Config,
    /// Per-socket configuration records
    pub(super) sockets: [SocketConfig; SOCKET_COUNT],
}

/// Collaborators handed back by [`W5500::release`]
#[derive(Debug)]
pub struct W5500Parts<SPI, D, RST, INT> {
    /// SPI device
    pub spi: SPI,
    /// Delay provider
    pub delay: D,
    /// Reset line, if one was attached
    pub reset_pin: Option<RST>,
    /// Interrupt line, if one was attached
    pub int_pin: Option<INT>,
}

impl<SPI, D> W5500<SPI, D, NoPin, NoPin>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Create a driver without reset or interrupt lines
    ///
    /// No bus traffic happens until [`init`](Self::init) or
    /// [`setup`](Self::setup) is called.
    pub fn new(spi: SPI, delay: D, config: W5500Config) -> Self {
        Self {
            bus: RegisterBus::new(spi),
            delay,
            reset_pin: None,
            int_pin: None,
            config,
            sockets: [SocketConfig::new(); SOCKET_COUNT],
        }
    }
}

impl<SPI, D, RST, INT> W5500<SPI, D, RST, INT>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Attach a hardware reset line
    ///
    /// With a reset line, [`reset`](Self::reset) pulses it instead of using
    /// the software reset bit.
    pub fn with_reset_pin<P: OutputPin>(self, pin: P) -> W5500<SPI, D, P, INT> {
        W5500 {
            bus: self.bus,
            delay: self.delay,
            reset_pin: Some(pin),
            int_pin: self.int_pin,
            config: self.config,
            sockets: self.sockets,
        }
    }

    /// Attach the interrupt line
    pub fn with_interrupt_pin<P: InputPin>(self, pin: P) -> W5500<SPI, D, RST, P> {
        W5500 {
            bus: self.bus,
            delay: self.delay,
            reset_pin: self.reset_pin,
            int_pin: Some(pin),
            config: self.config,
            sockets: self.sockets,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current device configuration
    #[inline(always)]
    pub fn config(&self) -> &W5500Config {
        &self.config
    }

    /// Mutable access to the interrupt line, if attached
    pub fn interrupt_pin_mut(&mut self) -> Option<&mut INT> {
        self.int_pin.as_mut()
    }

    // =========================================================================
    // Global Addressing
    // =========================================================================

    /// Program the source MAC address
    pub fn set_mac(&mut self, mac: &[u8; MAC_ADDR_LEN]) -> Result<(), SPI::Error> {
        self.bus.write(Block::Common, SHAR, mac)?;
        self.config.mac_address = *mac;
        Ok(())
    }

    /// Read back the source MAC address
    pub fn get_mac(&mut self) -> Result<[u8; MAC_ADDR_LEN], SPI::Error> {
        let mut mac = [0u8; MAC_ADDR_LEN];
        self.bus.read(Block::Common, SHAR, &mut mac)?;
        Ok(mac)
    }

    /// Program the source IP address
    pub fn set_ip(&mut self, ip: &[u8; IP_ADDR_LEN]) -> Result<(), SPI::Error> {
        self.bus.write(Block::Common, SIPR, ip)
    }

    /// Read back the source IP address
    pub fn get_ip(&mut self) -> Result<[u8; IP_ADDR_LEN], SPI::Error> {
        self.read_addr(SIPR)
    }

    /// Program the subnet mask
    pub fn set_subnet(&mut self, mask: &[u8; IP_ADDR_LEN]) -> Result<(), SPI::Error> {
        self.bus.write(Block::Common, SUBR, mask)
    }

    /// Read back the subnet mask
    pub fn get_subnet(&mut self) -> Result<[u8; IP_ADDR_LEN], SPI::Error> {
        self.read_addr(SUBR)
    }

    /// Program the default gateway
    pub fn set_gateway(&mut self, gateway: &[u8; IP_ADDR_LEN]) -> Result<(), SPI::Error> {
        self.bus.write(Block::Common, GAR, gateway)
    }

    /// Read back the default gateway
    pub fn get_gateway(&mut self) -> Result<[u8; IP_ADDR_LEN], SPI::Error> {
        self.read_addr(GAR)
    }

    /// Program IP, subnet and gateway together
    pub fn set_network(&mut self, network: &NetworkConfig) -> Result<(), SPI::Error> {
        self.set_ip(&network.ip)?;
        self.set_subnet(&network.subnet)?;
        self.set_gateway(&network.gateway)?;
        self.config.network = Some(*network);
        Ok(())
    }

    fn read_addr(&mut self, reg: u16) -> Result<[u8; IP_ADDR_LEN], SPI::Error> {
        let mut addr = [0u8; IP_ADDR_LEN];
        self.bus.read(Block::Common, reg, &mut addr)?;
        Ok(addr)
    }

    // =========================================================================
    // PHY and TCP Settings
    // =========================================================================

    /// Read the link bit of the PHY configuration register
    ///
    /// Link down is a status, not an error.
    pub fn check_link_status(&mut self) -> Result<LinkState, SPI::Error> {
        Ok(self.phy_status()?.link)
    }

    /// Read link, speed and duplex from the PHY configuration register
    pub fn phy_status(&mut self) -> Result<PhyStatus, SPI::Error> {
        let raw = self.bus.read_u8(Block::Common, PHYCFGR)?;
        Ok(PhyStatus::from_raw(raw))
    }

    /// Program the TCP retransmission timer and retry count
    ///
    /// `retry_time` is in 100 µs units. A zero value leaves the
    /// corresponding register untouched.
    pub fn tcp_config(&mut self, retry_time: u16, retry_count: u8) -> Result<(), SPI::Error> {
        if retry_time != 0 {
            self.bus.write_u16(Block::Common, RTR, retry_time)?;
            self.config.retry_time = retry_time;
        }
        if retry_count != 0 {
            self.bus.write_u8(Block::Common, RCR, retry_count)?;
            self.config.retry_count = retry_count;
        }
        Ok(())
    }

    /// Read the chip version register
    pub fn version(&mut self) -> Result<u8, SPI::Error> {
        self.bus.read_u8(Block::Common, VERSIONR)
    }

    // =========================================================================
    // Interrupt Registers
    // =========================================================================

    /// Enable the interrupt line for the sockets in `mask` (bit n = socket n)
    pub fn enable_socket_interrupts(&mut self, mask: u8) -> Result<(), SPI::Error> {
        self.bus.write_u8(Block::Common, SIMR, mask)
    }

    /// Sockets with a pending interrupt (bit n = socket n)
    pub fn pending_socket_interrupts(&mut self) -> Result<u8, SPI::Error> {
        self.bus.read_u8(Block::Common, SIR)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Hand back the collaborators without touching the chip
    pub fn release(self) -> W5500Parts<SPI, D, RST, INT> {
        W5500Parts {
            spi: self.bus.release(),
            delay: self.delay,
            reset_pin: self.reset_pin,
            int_pin: self.int_pin,
        }
    }

    /// Close every socket, then hand back the collaborators
    ///
    /// The collaborators are always returned; the second element carries
    /// the first error hit while closing sockets.
    pub fn remove(mut self) -> (W5500Parts<SPI, D, RST, INT>, Result<(), SPI::Error>) {
        let result = self.close_all();

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("W5500 teardown: socket close failed");
        }

        (self.release(), result)
    }
}

impl<SPI, D, RST, INT> W5500<SPI, D, RST, INT>
where
    SPI: SpiDevice,
    D: DelayNs,
    RST: OutputPin,
    INT: InputPin,
{
    // =========================================================================
    // Bring-up
    // =========================================================================

    /// Reset the chip and verify its identity
    ///
    /// Pulses the reset line low for at least 500 µs if one is attached,
    /// otherwise sets the software reset bit. Then waits for the reset bit to
    /// clear and checks the version register.
    ///
    /// # Errors
    /// - `ConfigError::GpioError` - reset line could not be driven
    /// - `ConfigError::ResetTimeout` - reset bit still set after the timeout
    /// - `ConfigError::ChipIdMismatch` - version register is not 0x04
    pub fn reset(&mut self) -> Result<(), SPI::Error> {
        match self.reset_pin.as_mut() {
            Some(pin) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("W5500 hardware reset");

                pin.set_low().map_err(|_| ConfigError::GpioError)?;
                self.delay.delay_us(RESET_PULSE_US);
                pin.set_high().map_err(|_| ConfigError::GpioError)?;
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("W5500 software reset");

                self.bus.write_u8(Block::Common, MR, mr::RST)?;
            }
        }

        self.delay.delay_ms(RESET_SETTLE_MS);
        self.wait_reset_done()?;

        let version = self.version()?;
        if version != CHIP_VERSION {
            #[cfg(feature = "defmt")]
            defmt::warn!("W5500 version mismatch: {=u8:#x}", version);

            return Err(ConfigError::ChipIdMismatch.into());
        }

        #[cfg(feature = "defmt")]
        defmt::info!("W5500 reset complete, version {=u8:#x}", version);

        Ok(())
    }

    fn wait_reset_done(&mut self) -> Result<(), SPI::Error> {
        for _ in 0..reset_poll_budget(self.config.reset_timeout_ms) {
            if self.bus.read_u8(Block::Common, MR)? & mr::RST == 0 {
                return Ok(());
            }
            self.delay.delay_us(RESET_POLL_INTERVAL_US);
        }

        Err(ConfigError::ResetTimeout.into())
    }

    /// Bring the chip into a usable state
    ///
    /// Runs reset, programs the MAC (and the static network settings if
    /// configured), applies the TCP retry settings and reports the link.
    pub fn setup(&mut self) -> Result<LinkState, SPI::Error> {
        self.reset()?;

        let mac = self.config.mac_address;
        self.set_mac(&mac)?;

        if let Some(network) = self.config.network {
            self.set_network(&network)?;
        }

        self.tcp_config(self.config.retry_time, self.config.retry_count)?;

        let link = self.check_link_status()?;

        #[cfg(feature = "defmt")]
        match link {
            LinkState::Up => defmt::info!("W5500 link up"),
            LinkState::Down => defmt::warn!("W5500 link down"),
        }

        Ok(link)
    }

    /// Reset every socket record to its defaults, then run [`setup`](Self::setup)
    pub fn init(&mut self) -> Result<LinkState, SPI::Error> {
        self.sockets = [SocketConfig::new(); SOCKET_COUNT];
        self.setup()
    }

    /// Sample the interrupt line
    ///
    /// Returns `None` when no interrupt line is attached. The line is active
    /// low; `Some(true)` means at least one unmasked interrupt is pending.
    pub fn interrupt_asserted(&mut self) -> Result<Option<bool>, SPI::Error> {
        match self.int_pin.as_mut() {
            Some(pin) => {
                let low = pin.is_low().map_err(|_| ConfigError::GpioError)?;
                Ok(Some(low))
            }
            None => Ok(None),
        }
    }
}

/// Mode register polls that fit in `timeout_ms`, at least one
const fn reset_poll_budget(timeout_ms: u32) -> u32 {
    let polls = timeout_ms.saturating_mul(1000) / RESET_POLL_INTERVAL_US;
    if polls == 0 { 1 } else { polls }
}

// =============================================================================
// Unit Tests
// =============================================================================
