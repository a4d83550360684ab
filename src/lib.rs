//! Pervasive Displays iTC E-Paper Driver
//!
//! A driver for Pervasive Displays iTC panels (1.54" to 11.98") on the EXT3
//! extension board, for monochrome and black-white-red films.
//!
//! ## Features
//!
//! - `no_std` compatible, no allocation
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Small, medium and large (dual-COG) controller families
//! - Global and fast updates, downgraded by temperature
//! - Six orientations plus portrait/landscape
//! - Power-enable pin sequencing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use epd_ext3::{Builder, Color, Interface, Orientation, Panel, PowerScope, Screen};
//!
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
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let power = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let config = match Builder::new()
//!     .panel(Panel::EPD_266_GS_09)
//!     .orientation(Orientation::Portrait)
//!     .temperature(22)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let buffer = [0u8; Panel::EPD_266_GS_09.buffer_size()];
//! let mut screen = Screen::new(interface, Some(power), buffer, config);
//! if screen.begin(&mut delay).is_err() {
//!     return;
//! }
//!
//! screen.clear(Color::White);
//! screen.set_point(10, 10, Color::Black);
//! let _ = screen.flush(&mut delay);
//! let _ = screen.suspend(PowerScope::GpioOnly);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Frame buffer accessor
pub mod buffer;
/// Chip-on-glass controller state machines
pub mod cog;
/// Colour palette and quantization
pub mod color;
/// COG command definitions
pub mod command;
/// Panel catalogue, orientation and builder
pub mod config;
/// Update orchestrator
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Update modes and mode checks
pub mod mode;
/// Panel power sequencing
pub mod power;
/// Coordinate orientation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use buffer::FrameBuffer;
pub use cog::{Cog, Otp, Phase, PhaseLog};
pub use color::{Color, PALETTE, Palette};
pub use config::{
    Builder, Config, DEFAULT_TEMPERATURE, Driver, Family, Film, Geometry, MAX_TEMPERATURE,
    MIN_TEMPERATURE, Orientation, Panel, Size,
};
pub use display::Screen;
pub use error::{BuilderError, Error};
pub use interface::{Chip, DisplayInterface, Interface, InterfaceError, ResetTiming};
pub use mode::{ModeCheck, TemperatureCheck, UpdateMode};
pub use power::{NoPowerPin, PowerScope, PowerSequencer, PowerState};
