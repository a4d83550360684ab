//! COG command definitions
//!
//! Command bytes and OTP offsets used by the three controller families.
//! Commands are sent over SPI with the DC pin low, their parameters with DC
//! high.
//!
//! The OTP offsets locate the per-panel settings inside the 128-byte
//! calibration block. Their contents are passed to the COG as they are; the
//! driver never interprets them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd_ext3::{DisplayInterface, Interface, command};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! // Power on, then refresh
//! let _ = interface.send_command(command::POWER_ON);
//! let _ = interface.send_command(command::DISPLAY_REFRESH);
//! ```

use core::ops::Range;

// Panel and power

/// Panel setting (PSR); on small COGs, with [`SOFT_RESET`], a soft reset
pub const PANEL_SETTING: u8 = 0x00;

/// Power setting (PWR)
pub const POWER_SETTING: u8 = 0x01;

/// Turn off the DC/DC converter
pub const POWER_OFF: u8 = 0x02;

/// Turn on the DC/DC converter
pub const POWER_ON: u8 = 0x04;

/// Booster soft start (BTST)
pub const BOOSTER_SOFT_START: u8 = 0x06;

/// Deep sleep, followed by [`DEEP_SLEEP_CHECK`]
pub const DEEP_SLEEP: u8 = 0x07;

/// Check code required by [`DEEP_SLEEP`]
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;

/// Parameter of [`PANEL_SETTING`] requesting a soft reset (small COGs)
pub const SOFT_RESET: u8 = 0x0E;

// Image data

/// Start transmission of the black plane (DTM1)
pub const DATA_START_BLACK: u8 = 0x10;

/// Start the refresh waveform
pub const DISPLAY_REFRESH: u8 = 0x12;

/// Start transmission of the red plane (DTM2)
pub const DATA_START_RED: u8 = 0x13;

// Timing and geometry

/// PLL control
pub const PLL_CONTROL: u8 = 0x30;

/// VCOM and data interval setting (CDI)
pub const VCOM_DATA_INTERVAL: u8 = 0x50;

/// Gate/source non-overlap period (TCON)
pub const TCON: u8 = 0x60;

/// Resolution setting (TRES): sources then gates, 16-bit big-endian each
pub const RESOLUTION: u8 = 0x61;

/// Power saving (PWS)
pub const POWER_SAVING: u8 = 0xE3;

// Temperature

/// Activate the temperature written with [`TEMPERATURE_INPUT`]
pub const TEMPERATURE_ACTIVE: u8 = 0xE0;

/// Parameter of [`TEMPERATURE_ACTIVE`] selecting the external temperature
pub const TEMPERATURE_EXTERNAL: u8 = 0x02;

/// Input temperature, one signed byte in degrees Celsius
pub const TEMPERATURE_INPUT: u8 = 0xE5;

/// Added to the temperature byte to select the fast waveform (small COGs)
pub const FAST_TEMPERATURE_OFFSET: u8 = 0x40;

// OTP

/// Read the OTP block
pub const OTP_READ: u8 = 0xA2;

/// Size of the OTP block in bytes
pub const OTP_SIZE: usize = 128;

/// Expected first byte of a valid OTP bank
pub const OTP_BANK_MARKER: u8 = 0xA5;

/// Panel setting bytes
pub const OTP_PSR: Range<usize> = 16..18;

/// Power setting bytes (medium and large COGs)
pub const OTP_PWR: Range<usize> = 18..23;

/// Booster soft start bytes (medium and large COGs)
pub const OTP_BTST: Range<usize> = 23..26;

/// PLL byte (medium and large COGs)
pub const OTP_PLL: Range<usize> = 26..27;

/// VCOM and data interval byte (medium and large COGs)
pub const OTP_CDI: Range<usize> = 27..28;

/// TCON byte (medium and large COGs)
pub const OTP_TCON: Range<usize> = 28..29;

/// Power saving byte (medium and large COGs)
pub const OTP_PWS: Range<usize> = 29..30;
