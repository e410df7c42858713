//! ISR-safe W5500 wrapper using critical sections.
//!
//! Provides [`SharedW5500`], a slot that can live in a `static` and hands out
//! exclusive access to the driver from thread or interrupt context.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::device::W5500;
use crate::hal::pins::NoPin;

/// ISR-safe W5500 slot using critical sections.
///
/// Starts empty so it can be declared `static`; the driver is moved in once
/// the SPI device exists. All access goes through `critical_section::with()`,
/// disabling interrupts for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// static W5500: SharedW5500<MySpi, MyDelay> = SharedW5500::new();
///
/// W5500.install(W5500::new(spi, delay, W5500Config::new()));
/// W5500.with(|w5500| w5500.init()).transpose()?;
///
/// #[interrupt]
/// fn GPIO_IRQ() {
///     W5500.with(|w5500| {
///         let pending = w5500.pending_socket_interrupts();
///     });
/// }
/// ```
pub struct SharedW5500<SPI, D, RST = NoPin, INT = NoPin> {
    slot: Mutex<RefCell<Option<W5500<SPI, D, RST, INT>>>>,
}

impl<SPI, D, RST, INT> SharedW5500<SPI, D, RST, INT> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Move a driver into the slot, returning the previous one.
    pub fn install(&self, device: W5500<SPI, D, RST, INT>) -> Option<W5500<SPI, D, RST, INT>> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(device))
    }

    /// Move the driver out of the slot.
    pub fn take(&self) -> Option<W5500<SPI, D, RST, INT>> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    /// Check whether a driver is installed.
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` if no driver is installed. Interrupts are disabled for
    /// the duration of the closure, including any flow-control polling the
    /// closure performs.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut W5500<SPI, D, RST, INT>) -> R,
    {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Like [`with`](Self::with), but also returns `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut W5500<SPI, D, RST, INT>) -> R,
    {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow(cs).try_borrow_mut().ok()?;
            slot.as_mut().map(f)
        })
    }
}

impl<SPI, D, RST, INT> Default for SharedW5500<SPI, D, RST, INT> {
    fn default() -> Self {
        Self::new()
    }
}
