//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to the panel's chip-on-glass controller (COG) over SPI.
//!
//! ## Hardware Requirements
//!
//! - SPI bus (MOSI + SCK, MISO or a 3-wire bidirectional line for the OTP read)
//! - Chip select, owned by the [`SpiDevice`]; large panels carry a second COG
//!   with its own chip select, provided as a second [`SpiDevice`]
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active low on iTC panels)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd_ext3::{Chip, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! // Soft reset on a small COG
//! interface.select(Chip::Primary);
//! let _ = interface.send_command(0x00);
//! let _ = interface.send_data(&[0x0E]);
//!
//! // Wait for the COG to release BUSY
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::trace;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Which COG subsequent traffic is routed to
///
/// Only large panels have a secondary COG. Single-COG interfaces route
/// everything to the primary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Chip {
    /// Primary (master) COG
    #[default]
    Primary,
    /// Secondary (slave) COG
    Secondary,
    /// Both COGs receive the same bytes
    Both,
}

/// Reset pulse timing, in milliseconds
///
/// The pulse is: wait `settle`, RST high, wait `high`, RST low, wait `low`,
/// RST high, wait `release`, then wait `deselect` before the first command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetTiming {
    /// Delay before the pulse
    pub settle: u32,
    /// Time held high before going low
    pub high: u32,
    /// Time held low
    pub low: u32,
    /// Time after returning high
    pub release: u32,
    /// Time before the bus is used
    pub deselect: u32,
}

/// Trait for hardware interface to the panel COG
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Screen`](crate::display::Screen) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// For most cases, use the provided [`Interface`] struct.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Route subsequent commands and data to `chip`
    fn select(&mut self, chip: Chip);

    /// Send a command byte with DC low
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes with DC high
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Read bytes from the primary COG with DC high
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn read_data(&mut self, buffer: &mut [u8]) -> InterfaceResult<(), Self::Error>;

    /// Pulse the reset line with the given timing
    fn reset<D: DelayNs>(&mut self, delay: &mut D, timing: &ResetTiming);

    /// Block until BUSY reports the COG idle
    ///
    /// There is no timeout: a panel that never releases BUSY hangs here.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the BUSY pin fails.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Whether a secondary COG is attached
    ///
    /// Large panels need one; without it, secondary traffic reaches the primary.
    fn has_secondary(&self) -> bool {
        false
    }

    /// Drive DC and RST low before power is removed
    fn release(&mut self);

    /// Restore idle levels on DC and RST after power returns
    fn wake(&mut self);
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for the EXT3 board
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`], one per COG
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device of the primary COG
    spi: SPI,
    /// SPI device of the secondary COG (large panels only)
    secondary: Option<SPI>,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin
    busy: BUSY,
    /// Current routing for writes
    target: Chip,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create an interface for a single-COG panel
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        Self {
            spi,
            secondary: None,
            dc,
            rst,
            busy,
            target: Chip::Primary,
            busy_active_high: false,
        }
    }

    /// Create an interface for a two-COG (large) panel
    ///
    /// `primary` and `secondary` share the SPI bus and differ by chip select.
    pub fn new_dual(primary: SPI, secondary: SPI, dc: DC, rst: RST, busy: BUSY) -> Self {
        let mut interface = Self::new(primary, dc, rst, busy);
        interface.secondary = Some(secondary);
        interface
    }

    /// Set busy pin polarity
    ///
    /// Default is active-low. Set to true for active-high boards.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    fn write<PinErr>(
        &mut self,
        bytes: &[u8],
    ) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>> {
        match (self.target, self.secondary.as_mut()) {
            (Chip::Primary, _) | (_, None) => self.spi.write(bytes).map_err(InterfaceError::Spi),
            (Chip::Secondary, Some(secondary)) => {
                secondary.write(bytes).map_err(InterfaceError::Spi)
            }
            (Chip::Both, Some(secondary)) => {
                self.spi.write(bytes).map_err(InterfaceError::Spi)?;
                secondary.write(bytes).map_err(InterfaceError::Spi)
            }
        }
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn select(&mut self, chip: Chip) {
        self.target = chip;
    }

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        trace!("command {command:#04x} -> {:?}", self.target);
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.write(&[command])
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.write(data)
    }

    fn read_data(&mut self, buffer: &mut [u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.read(buffer).map_err(InterfaceError::Spi)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D, timing: &ResetTiming) {
        delay.delay_ms(timing.settle);
        let _ = self.rst.set_high();
        delay.delay_ms(timing.high);
        let _ = self.rst.set_low();
        delay.delay_ms(timing.low);
        let _ = self.rst.set_high();
        delay.delay_ms(timing.release);
        delay.delay_ms(timing.deselect);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        loop {
            let is_busy = if self.busy_active_high {
                self.busy.is_high()
            } else {
                self.busy.is_low()
            };

            if !is_busy.map_err(InterfaceError::Pin)? {
                return Ok(());
            }

            delay.delay_ms(1);
        }
    }

    fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    fn release(&mut self) {
        let _ = self.dc.set_low();
        let _ = self.rst.set_low();
    }

    fn wake(&mut self) {
        let _ = self.dc.set_high();
        let _ = self.rst.set_high();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    /// Records every byte written
    #[derive(Debug, Default)]
    struct MockSpi {
        written: alloc::vec::Vec<u8>,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for operation in operations {
                match operation {
                    embedded_hal::spi::Operation::Write(bytes) => {
                        self.written.extend_from_slice(bytes);
                    }
                    embedded_hal::spi::Operation::Read(buffer) => buffer.fill(0xA5),
                    _ => {}
                }
            }
            Ok(())
        }
    }

    /// Busy pin that reports busy for a fixed number of polls
    #[derive(Debug, Default)]
    struct MockPin {
        busy_polls: u32,
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.is_low()?)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ms += ns / 1_000_000;
        }
    }

    type TestInterface = Interface<MockSpi, MockPin, MockPin, MockPin>;

    fn single() -> TestInterface {
        Interface::new(
            MockSpi::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        )
    }

    fn dual() -> TestInterface {
        Interface::new_dual(
            MockSpi::default(),
            MockSpi::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        )
    }

    #[test]
    fn test_default_busy_polarity_is_active_low() {
        let mut interface = single();
        assert!(!interface.busy_active_high());
        interface.set_busy_active_high(true);
        assert!(interface.busy_active_high());
    }

    #[test]
    fn test_busy_wait_polls_until_released() {
        let mut interface = single();
        interface.busy.busy_polls = 3;
        let mut delay = CountingDelay::default();
        interface.busy_wait(&mut delay).unwrap();
        assert_eq!(delay.ms, 3);
    }

    #[test]
    fn test_reset_timing_sums_delays() {
        let mut interface = single();
        let mut delay = CountingDelay::default();
        let timing = ResetTiming {
            settle: 5,
            high: 5,
            low: 10,
            release: 5,
            deselect: 5,
        };
        interface.reset(&mut delay, &timing);
        assert_eq!(delay.ms, 30);
    }

    #[test]
    fn test_single_chip_ignores_secondary_selection() {
        let mut interface = single();
        interface.select(Chip::Secondary);
        interface.send_command(0x12).unwrap();
        assert_eq!(interface.spi.written, [0x12]);
    }

    #[test]
    fn test_single_chip_has_no_secondary() {
        assert!(!single().has_secondary());
    }

    #[test]
    fn test_dual_chip_routing() {
        let mut interface = dual();
        assert!(interface.has_secondary());

        interface.select(Chip::Primary);
        interface.send_data(&[1]).unwrap();
        interface.select(Chip::Secondary);
        interface.send_data(&[2]).unwrap();
        interface.select(Chip::Both);
        interface.send_data(&[3]).unwrap();

        let secondary = interface.secondary.as_ref().unwrap();
        assert_eq!(interface.spi.written, [1, 3]);
        assert_eq!(secondary.written, [2, 3]);
    }

    #[test]
    fn test_read_data_reads_primary() {
        let mut interface = dual();
        let mut otp = [0u8; 4];
        interface.read_data(&mut otp).unwrap();
        assert_eq!(otp, [0xA5; 4]);
    }
}
