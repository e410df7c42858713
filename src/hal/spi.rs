//! SPI register access layer
//!
//! Frames every register or buffer access as a single chip-select-framed
//! SPI transaction: a 3-byte header (address + control byte) followed by the
//! payload, in variable data length mode.

use embedded_hal::spi::{Operation, SpiDevice};

use crate::driver::error::{Error, IoError, Result};
use crate::internal::constants::STABLE_READ_ATTEMPTS;
use crate::internal::register::{Block, frame_header};

/// Register access over an SPI device
///
/// Bus errors are returned as [`Error::Spi`] without modification and are
/// never retried here.
#[derive(Debug)]
pub struct RegisterBus<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> RegisterBus<SPI> {
    /// Wrap an SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Write `data` starting at `addr` in `block`
    pub fn write(&mut self, block: Block, addr: u16, data: &[u8]) -> Result<(), SPI::Error> {
        let header = frame_header(block, addr, true);
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(data)])
            .map_err(Error::Spi)
    }

    /// Fill `buf` with bytes read starting at `addr` in `block`
    pub fn read(&mut self, block: Block, addr: u16, buf: &mut [u8]) -> Result<(), SPI::Error> {
        let header = frame_header(block, addr, false);
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(buf)])
            .map_err(Error::Spi)
    }

    /// Read a single-byte register
    pub fn read_u8(&mut self, block: Block, addr: u16) -> Result<u8, SPI::Error> {
        let mut buf = [0u8; 1];
        self.read(block, addr, &mut buf)?;
        Ok(buf[0])
    }

    /// Write a single-byte register
    pub fn write_u8(&mut self, block: Block, addr: u16, value: u8) -> Result<(), SPI::Error> {
        self.write(block, addr, &[value])
    }

    /// Read a big-endian 16-bit register once
    pub fn read_u16(&mut self, block: Block, addr: u16) -> Result<u16, SPI::Error> {
        let mut buf = [0u8; 2];
        self.read(block, addr, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a big-endian 16-bit register
    pub fn write_u16(&mut self, block: Block, addr: u16, value: u16) -> Result<(), SPI::Error> {
        self.write(block, addr, &value.to_be_bytes())
    }

    /// Read a 16-bit register that the chip may update mid-read
    ///
    /// The register is read twice and the value is only trusted when both
    /// reads agree. A stable register costs exactly two reads; after
    /// [`STABLE_READ_ATTEMPTS`] disagreeing pairs the read fails with
    /// [`IoError::UnstableRegister`].
    pub fn read_u16_stable(&mut self, block: Block, addr: u16) -> Result<u16, SPI::Error> {
        for _ in 0..STABLE_READ_ATTEMPTS {
            let first = self.read_u16(block, addr)?;
            let second = self.read_u16(block, addr)?;
            if first == second {
                return Ok(first);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("register {=u16:#x} in block {} never settled", addr, block);

        Err(IoError::UnstableRegister.into())
    }
}
