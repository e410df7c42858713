//! W5500 register map and SPI frame header encoding
//!
//! Every W5500 access is addressed by a 16-bit offset plus a 5-bit block
//! select. The common register block holds chip-wide settings; each of the
//! eight sockets owns a register block, a TX buffer block and an RX buffer
//! block.

pub mod socket;

// =============================================================================
// Block Select
// =============================================================================

/// Register or buffer window addressed by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Block {
    /// Common register block
    Common,
    /// Register block of socket `n`
    Socket(u8),
    /// TX buffer of socket `n`
    TxBuffer(u8),
    /// RX buffer of socket `n`
    RxBuffer(u8),
}

impl Block {
    /// 5-bit block select code
    ///
    /// Socket numbers are 0..=7; only the low three bits of `n` are encoded.
    #[inline(always)]
    pub const fn bsb(self) -> u8 {
        match self {
            Block::Common => 0x00,
            Block::Socket(n) => 1 | ((n & 0x07) << 2),
            Block::TxBuffer(n) => 2 | ((n & 0x07) << 2),
            Block::RxBuffer(n) => 3 | ((n & 0x07) << 2),
        }
    }

    /// Decode a block select code
    pub const fn from_bsb(bsb: u8) -> Option<Self> {
        if bsb == 0 {
            return Some(Block::Common);
        }
        if bsb > 31 {
            return None;
        }
        let n = (bsb - 1) / 4;
        match bsb % 4 {
            1 => Some(Block::Socket(n)),
            2 => Some(Block::TxBuffer(n)),
            3 => Some(Block::RxBuffer(n)),
            _ => None,
        }
    }
}

// =============================================================================
// Control Byte
// =============================================================================

/// Block select field shift (bits 7:3)
pub const CTRL_BSB_SHIFT: u8 = 3;
/// Read/write bit (bit 2): 1 = write
pub const CTRL_RWB_WRITE: u8 = 1 << 2;
/// Read/write bit (bit 2): 0 = read
pub const CTRL_RWB_READ: u8 = 0;
/// Operation mode mask (bits 1:0)
pub const CTRL_OM_MASK: u8 = 0x03;
/// Operation mode: variable data length (chip select framed)
pub const CTRL_OM_VDM: u8 = 0x00;

/// Frame header length in bytes
pub const HEADER_LEN: usize = 3;

/// Build the 3-byte SPI frame header: address high, address low, control
#[inline(always)]
pub const fn frame_header(block: Block, addr: u16, write: bool) -> [u8; HEADER_LEN] {
    let rwb = if write { CTRL_RWB_WRITE } else { CTRL_RWB_READ };
    let [hi, lo] = addr.to_be_bytes();
    [hi, lo, (block.bsb() << CTRL_BSB_SHIFT) | rwb | CTRL_OM_VDM]
}

// =============================================================================
// Common Registers (block 0x00)
// =============================================================================

/// Mode Register
pub const MR: u16 = 0x0000;
/// Gateway Address Register (4 bytes)
pub const GAR: u16 = 0x0001;
/// Subnet Mask Register (4 bytes)
pub const SUBR: u16 = 0x0005;
/// Source Hardware Address Register (6 bytes)
pub const SHAR: u16 = 0x0009;
/// Source IP Address Register (4 bytes)
pub const SIPR: u16 = 0x000F;
/// Socket Interrupt Register
pub const SIR: u16 = 0x0017;
/// Socket Interrupt Mask Register
pub const SIMR: u16 = 0x0018;
/// Retry Time Register (2 bytes, 100 µs units)
pub const RTR: u16 = 0x0019;
/// Retry Count Register
pub const RCR: u16 = 0x001B;
/// PHY Configuration Register
pub const PHYCFGR: u16 = 0x002E;
/// Chip Version Register
pub const VERSIONR: u16 = 0x0039;

/// Mode Register bits
pub mod mr {
    /// Software reset, self-clearing
    pub const RST: u8 = 1 << 7;
}

/// PHY Configuration Register bits
pub mod phycfgr {
    /// Link status (1 = up)
    pub const LNK: u8 = 1 << 0;
    /// Speed status (1 = 100 Mbps)
    pub const SPD: u8 = 1 << 1;
    /// Duplex status (1 = full)
    pub const DPX: u8 = 1 << 2;
}
