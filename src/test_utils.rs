//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the W5500 driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::vec::Vec;

use embedded_hal::spi::{self, Operation};

use crate::internal::register::socket::{
    self as sn, CR, IR, MR as SN_MR, RX_RD, RX_RSR, RX_WR, RXBUF_SIZE, SR, TX_FSR, TX_RD, TX_WR,
    TXBUF_SIZE, cmd, mode, status,
};
use crate::internal::register::{Block, CTRL_BSB_SHIFT, CTRL_RWB_WRITE, HEADER_LEN, MR, VERSIONR, mr};

// =============================================================================
// Mock SPI Error
// =============================================================================

/// Injected bus failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

// =============================================================================
// Mock W5500
// =============================================================================

/// One bus transaction as seen by the chip, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(Block, u16),
    Write(Block, u16),
}

/// Register-level model of a W5500 behind an SPI device
///
/// Decodes the 3-byte frame header of every transaction and emulates the
/// register file and socket buffers. Socket commands take effect
/// immediately: OPEN sets the status from the mode register, SEND drains
/// the TX ring, RECV commits the RX read pointer.
///
/// The driver can own the mock or borrow it (`&MockW5500` is also an
/// `SpiDevice`), so tests can inspect it while the driver is alive.
///
/// # Example
///
/// ```ignore
/// let spi = MockW5500::new();
/// let mut dev = W5500::new(&spi, MockDelay::new(), W5500Config::new());
/// dev.open(0, Protocol::Tcp, BufferSize::Kb2).unwrap();
/// assert_eq!(spi.commands(), vec![(0, cmd::OPEN)]);
/// ```
#[derive(Debug, Default)]
pub struct MockW5500 {
    /// Sparse chip memory: (block select, address) -> byte
    memory: RefCell<HashMap<(u8, u16), u8>>,
    /// Scripted read responses, consumed one per read transaction
    scripts: RefCell<HashMap<(u8, u16), VecDeque<Vec<u8>>>>,
    /// Committed RX read pointer per socket
    rx_committed: RefCell<HashMap<u8, u16>>,
    /// Record of register writes: (block, address, payload)
    write_log: RefCell<Vec<(Block, u16, Vec<u8>)>>,
    /// Reads and writes in arrival order
    access_log: RefCell<Vec<Access>>,
    /// Raw bytes of every write transaction
    frame_log: RefCell<Vec<Vec<u8>>>,
    /// Socket commands: (socket, command)
    command_log: RefCell<Vec<(u8, u8)>>,
    /// Read transactions per (block select, start address)
    read_counts: RefCell<HashMap<(u8, u16), usize>>,
    /// Transactions attempted
    transactions: Cell<usize>,
    /// Transactions allowed before the bus starts failing
    fail_after: Cell<Option<usize>>,
    /// Keep the reset bit set after a software reset
    reset_stuck: Cell<bool>,
}

impl MockW5500 {
    /// Create a chip in its power-on state
    pub fn new() -> Self {
        let mock = Self::default();
        mock.set_common_u8(VERSIONR, 0x04);
        for n in 0..8 {
            mock.set_socket_u8(n, RXBUF_SIZE, 2);
            mock.set_socket_u8(n, TXBUF_SIZE, 2);
        }
        mock
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Fail every transaction after the first `n`
    pub fn fail_after(&self, n: usize) {
        self.fail_after.set(Some(n));
    }

    /// Make the reset bit stick
    pub fn set_reset_stuck(&self, stuck: bool) {
        self.reset_stuck.set(stuck);
    }

    pub fn set_common_u8(&self, addr: u16, value: u8) {
        self.poke(Block::Common.bsb(), addr, value);
    }

    pub fn set_socket_u8(&self, n: u8, addr: u16, value: u8) {
        self.poke(Block::Socket(n).bsb(), addr, value);
    }

    pub fn set_socket_u16(&self, n: u8, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.set_socket_u8(n, addr, hi);
        self.set_socket_u8(n, addr + 1, lo);
    }

    /// Force the status register of socket `n`
    pub fn set_status(&self, n: u8, raw: u8) {
        self.set_socket_u8(n, SR, raw);
    }

    /// Queue 16-bit values returned by successive reads at `addr`
    pub fn script_u16(&self, block: Block, addr: u16, values: &[u16]) {
        let mut scripts = self.scripts.borrow_mut();
        let queue = scripts.entry((block.bsb(), addr)).or_default();
        for value in values {
            queue.push_back(value.to_be_bytes().to_vec());
        }
    }

    /// Queue 8-bit values returned by successive reads at `addr`
    pub fn script_u8(&self, block: Block, addr: u16, values: &[u8]) {
        let mut scripts = self.scripts.borrow_mut();
        let queue = scripts.entry((block.bsb(), addr)).or_default();
        for value in values {
            queue.push_back(std::vec![*value]);
        }
    }

    /// Append bytes to the RX ring of socket `n` as the chip would
    pub fn inject_rx(&self, n: u8, data: &[u8]) {
        let wr = self.socket_u16(n, RX_WR);
        let bsb = Block::RxBuffer(n).bsb();
        let mask = self.buffer_mask(n, RXBUF_SIZE);
        for (i, byte) in data.iter().enumerate() {
            self.poke(bsb, wr.wrapping_add(i as u16) & mask, *byte);
        }
        self.set_socket_u16(n, RX_WR, wr.wrapping_add(data.len() as u16));
        let ir = self.peek(Block::Socket(n).bsb(), IR);
        self.set_socket_u8(n, IR, ir | sn::ir::RECV);
    }

    /// Append a UDP datagram with its 8-byte header to the RX ring
    pub fn inject_udp(&self, n: u8, ip: [u8; 4], port: u16, payload: &[u8]) {
        let mut datagram = Vec::with_capacity(8 + payload.len());
        datagram.extend_from_slice(&ip);
        datagram.extend_from_slice(&port.to_be_bytes());
        datagram.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        datagram.extend_from_slice(payload);
        self.inject_rx(n, &datagram);
    }

    /// Clear all logs and counters
    pub fn clear_log(&self) {
        self.write_log.borrow_mut().clear();
        self.access_log.borrow_mut().clear();
        self.frame_log.borrow_mut().clear();
        self.command_log.borrow_mut().clear();
        self.read_counts.borrow_mut().clear();
        self.transactions.set(0);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Bytes of the common register block
    pub fn common(&self, addr: u16, len: usize) -> Vec<u8> {
        self.bytes(Block::Common.bsb(), addr, len)
    }

    /// Bytes of the register block of socket `n`
    pub fn socket_reg(&self, n: u8, addr: u16, len: usize) -> Vec<u8> {
        self.bytes(Block::Socket(n).bsb(), addr, len)
    }

    pub fn socket_u16(&self, n: u8, addr: u16) -> u16 {
        let bsb = Block::Socket(n).bsb();
        u16::from_be_bytes([self.peek(bsb, addr), self.peek(bsb, addr + 1)])
    }

    /// Bytes of the TX ring of socket `n` at the (unmasked) buffer offset
    pub fn tx_buffer(&self, n: u8, offset: u16, len: usize) -> Vec<u8> {
        self.bytes(Block::TxBuffer(n).bsb(), offset, len)
    }

    pub fn writes(&self) -> Vec<(Block, u16, Vec<u8>)> {
        self.write_log.borrow().clone()
    }

    /// Payloads written to a common register
    pub fn common_writes(&self, addr: u16) -> Vec<Vec<u8>> {
        self.writes_to(Block::Common, addr)
    }

    /// Payloads written to a register of socket `n`
    pub fn socket_writes(&self, n: u8, addr: u16) -> Vec<Vec<u8>> {
        self.writes_to(Block::Socket(n), addr)
    }

    /// Length of every write into a buffer block
    pub fn buffer_write_lens(&self, block: Block) -> Vec<usize> {
        self.write_log
            .borrow()
            .iter()
            .filter(|(b, _, _)| *b == block)
            .map(|(_, _, data)| data.len())
            .collect()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.access_log.borrow().clone()
    }

    /// Position of the first access matching `access`
    pub fn first_access(&self, access: Access) -> Option<usize> {
        self.access_log.borrow().iter().position(|a| *a == access)
    }

    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frame_log.borrow().clone()
    }

    pub fn commands(&self) -> Vec<(u8, u8)> {
        self.command_log.borrow().clone()
    }

    pub fn command_count(&self, n: u8, command: u8) -> usize {
        self.command_log
            .borrow()
            .iter()
            .filter(|&&(sock, c)| sock == n && c == command)
            .count()
    }

    /// Read transactions starting at `addr` in `block`
    pub fn read_count(&self, block: Block, addr: u16) -> usize {
        self.read_counts
            .borrow()
            .get(&(block.bsb(), addr))
            .copied()
            .unwrap_or(0)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.get()
    }

    // =========================================================================
    // Emulation
    // =========================================================================

    fn peek(&self, bsb: u8, addr: u16) -> u8 {
        self.memory.borrow().get(&(bsb, addr)).copied().unwrap_or(0)
    }

    fn poke(&self, bsb: u8, addr: u16, value: u8) {
        self.memory.borrow_mut().insert((bsb, addr), value);
    }

    fn bytes(&self, bsb: u8, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.peek(bsb, addr.wrapping_add(i as u16)))
            .collect()
    }

    fn writes_to(&self, block: Block, addr: u16) -> Vec<Vec<u8>> {
        self.write_log
            .borrow()
            .iter()
            .filter(|(b, a, _)| *b == block && *a == addr)
            .map(|(_, _, data)| data.clone())
            .collect()
    }

    fn buffer_size(&self, n: u8, size_reg: u16) -> u16 {
        u16::from(self.peek(Block::Socket(n).bsb(), size_reg)) * 1024
    }

    fn buffer_mask(&self, n: u8, size_reg: u16) -> u16 {
        self.buffer_size(n, size_reg).max(1) - 1
    }

    fn read_byte(&self, block: Block, addr: u16) -> u8 {
        match block {
            Block::Socket(n) => match addr {
                a if a == TX_FSR || a == TX_FSR + 1 => {
                    let used = self.socket_u16(n, TX_WR).wrapping_sub(self.socket_u16(n, TX_RD));
                    let free = self.buffer_size(n, TXBUF_SIZE).saturating_sub(used);
                    free.to_be_bytes()[usize::from(a - TX_FSR)]
                }
                a if a == RX_RSR || a == RX_RSR + 1 => {
                    let committed = self.rx_committed.borrow().get(&n).copied().unwrap_or(0);
                    let size = self.socket_u16(n, RX_WR).wrapping_sub(committed);
                    size.to_be_bytes()[usize::from(a - RX_RSR)]
                }
                _ => self.peek(block.bsb(), addr),
            },
            Block::TxBuffer(n) => self.peek(block.bsb(), addr & self.buffer_mask(n, TXBUF_SIZE)),
            Block::RxBuffer(n) => self.peek(block.bsb(), addr & self.buffer_mask(n, RXBUF_SIZE)),
            Block::Common => self.peek(block.bsb(), addr),
        }
    }

    fn apply_write(&self, block: Block, addr: u16, data: &[u8]) {
        self.write_log.borrow_mut().push((block, addr, data.to_vec()));

        for (i, byte) in data.iter().enumerate() {
            let a = addr.wrapping_add(i as u16);
            match block {
                Block::Common if a == MR => {
                    let value = if self.reset_stuck.get() { *byte } else { *byte & !mr::RST };
                    self.poke(0, MR, value);
                }
                Block::Socket(n) if a == CR => self.run_command(n, *byte),
                Block::Socket(n) if a == IR => {
                    let current = self.peek(block.bsb(), IR);
                    self.set_socket_u8(n, IR, current & !*byte);
                }
                Block::TxBuffer(n) => {
                    self.poke(block.bsb(), a & self.buffer_mask(n, TXBUF_SIZE), *byte);
                }
                Block::RxBuffer(n) => {
                    self.poke(block.bsb(), a & self.buffer_mask(n, RXBUF_SIZE), *byte);
                }
                _ => self.poke(block.bsb(), a, *byte),
            }
        }
    }

    fn run_command(&self, n: u8, command: u8) {
        self.command_log.borrow_mut().push((n, command));

        match command {
            cmd::OPEN => {
                let next = match self.peek(Block::Socket(n).bsb(), SN_MR) & mode::PROTOCOL_MASK {
                    mode::TCP => status::INIT,
                    mode::UDP => status::UDP,
                    mode::MACRAW => status::MACRAW,
                    _ => status::CLOSED,
                };
                self.set_status(n, next);
                for reg in [TX_RD, TX_WR, RX_RD, RX_WR] {
                    self.set_socket_u16(n, reg, 0);
                }
                self.rx_committed.borrow_mut().insert(n, 0);
            }
            cmd::LISTEN => {
                if self.peek(Block::Socket(n).bsb(), SR) == status::INIT {
                    self.set_status(n, status::LISTEN);
                }
            }
            cmd::DISCON | cmd::CLOSE => self.set_status(n, status::CLOSED),
            cmd::SEND | cmd::SEND_MAC | cmd::SEND_KEEP => {
                let wr = self.socket_u16(n, TX_WR);
                self.set_socket_u16(n, TX_RD, wr);
                let ir = self.peek(Block::Socket(n).bsb(), IR);
                self.set_socket_u8(n, IR, ir | sn::ir::SEND_OK);
            }
            cmd::RECV => {
                let rd = self.socket_u16(n, RX_RD);
                self.rx_committed.borrow_mut().insert(n, rd);
            }
            // CONNECT leaves the socket in INIT until a test moves it on
            _ => {}
        }
    }

    fn transact(&self, operations: &mut [Operation<'_, u8>]) -> Result<(), MockSpiError> {
        let attempt = self.transactions.get();
        self.transactions.set(attempt + 1);
        if self.fail_after.get().is_some_and(|limit| attempt >= limit) {
            return Err(MockSpiError);
        }

        let mut header: Vec<u8> = Vec::with_capacity(HEADER_LEN);
        let mut frame = Vec::new();
        let mut payload = Vec::new();
        let mut read_offset = 0u16;
        let mut scripted: Option<VecDeque<u8>> = None;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    for &byte in data.iter() {
                        frame.push(byte);
                        if header.len() < HEADER_LEN {
                            header.push(byte);
                        } else {
                            payload.push(byte);
                        }
                    }
                }
                Operation::Read(buf) => {
                    let (block, addr, ctrl) = decode_header(&header);
                    assert_eq!(ctrl & CTRL_RWB_WRITE, 0, "read frame with write bit set");

                    if read_offset == 0 {
                        self.access_log.borrow_mut().push(Access::Read(block, addr));
                        *self
                            .read_counts
                            .borrow_mut()
                            .entry((block.bsb(), addr))
                            .or_default() += 1;
                        scripted = self
                            .scripts
                            .borrow_mut()
                            .get_mut(&(block.bsb(), addr))
                            .and_then(VecDeque::pop_front)
                            .map(VecDeque::from);
                    }

                    for byte in buf.iter_mut() {
                        let a = addr.wrapping_add(read_offset);
                        *byte = scripted
                            .as_mut()
                            .and_then(VecDeque::pop_front)
                            .unwrap_or_else(|| self.read_byte(block, a));
                        read_offset += 1;
                    }
                }
                Operation::DelayNs(_) => {}
                Operation::Transfer(..) | Operation::TransferInPlace(_) => {
                    panic!("W5500 frames never use full-duplex transfers");
                }
            }
        }

        if !payload.is_empty() {
            let (block, addr, ctrl) = decode_header(&header);
            assert_ne!(ctrl & CTRL_RWB_WRITE, 0, "write frame without write bit");
            self.frame_log.borrow_mut().push(frame);
            self.access_log.borrow_mut().push(Access::Write(block, addr));
            self.apply_write(block, addr, &payload);
        }

        Ok(())
    }
}

fn decode_header(header: &[u8]) -> (Block, u16, u8) {
    assert_eq!(header.len(), HEADER_LEN, "incomplete frame header");
    let addr = u16::from_be_bytes([header[0], header[1]]);
    let ctrl = header[2];
    let block = Block::from_bsb(ctrl >> CTRL_BSB_SHIFT).expect("reserved block select");
    (block, addr, ctrl)
}

impl spi::ErrorType for MockW5500 {
    type Error = MockSpiError;
}

impl spi::SpiDevice for MockW5500 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.transact(operations)
    }
}

impl spi::ErrorType for &MockW5500 {
    type Error = MockSpiError;
}

impl spi::SpiDevice for &MockW5500 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.transact(operations)
    }
}

// =============================================================================
// Mock Pin
// =============================================================================

/// Injected GPIO failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Mock GPIO usable as the reset (output) or interrupt (input) line
///
/// Implemented for `&MockPin` so tests keep access to the recorded levels.
#[derive(Debug, Default)]
pub struct MockPin {
    /// Driven levels in order (true = high)
    levels: RefCell<Vec<bool>>,
    /// Level sampled as input
    input_low: Cell<bool>,
    /// Fail every operation
    fail: Cell<bool>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    pub fn set_input_low(&self, low: bool) {
        self.input_low.set(low);
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn drive(&self, high: bool) -> Result<(), MockPinError> {
        if self.fail.get() {
            return Err(MockPinError);
        }
        self.levels.borrow_mut().push(high);
        Ok(())
    }

    fn sample_low(&self) -> Result<bool, MockPinError> {
        if self.fail.get() {
            return Err(MockPinError);
        }
        Ok(self.input_low.get())
    }
}

impl embedded_hal::digital::ErrorType for &MockPin {
    type Error = MockPinError;
}

impl embedded_hal::digital::OutputPin for &MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

impl embedded_hal::digital::InputPin for &MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.sample_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.sample_low()
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: Cell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }

    fn add(&self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.add(ns);
    }
}

impl embedded_hal::delay::DelayNs for &MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.add(ns);
    }
}
