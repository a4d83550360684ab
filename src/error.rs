//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and screen operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during screen operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Out-of-range pixel addresses are not errors: drawing outside the panel is
//! silently ignored. Unsupported update modes are not errors either; they are
//! downgraded by the [`ModeCheck`](crate::mode::ModeCheck).
//!
//! ## Example
//!
//! ```
//! use epd_ext3::{Builder, BuilderError, Panel};
//!
//! // Missing panel
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingPanel)));
//!
//! // Temperature out of range
//! let result = Builder::new().panel(Panel::EPD_266_GS_09).temperature(120).build();
//! assert!(result.is_err());
//! ```

use crate::config::{MAX_TEMPERATURE, MIN_TEMPERATURE};
use crate::interface::DisplayInterface;

/// Errors that can occur when driving the screen
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Frame buffer is too small for the panel
    ///
    /// The buffer must be at least [`Panel::buffer_size()`](crate::Panel::buffer_size) bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// A hardware operation was requested before `begin()`
    NotStarted,
    /// `begin()` was called twice
    AlreadyStarted,
    /// A two-COG panel was given an interface with a single COG
    MissingSecondary,
    /// The OTP block does not start with the expected bank marker
    OtpCheck {
        /// First byte read from OTP
        marker: u8,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::NotStarted => write!(f, "Screen not started, call begin() first"),
            Self::AlreadyStarted => write!(f, "Screen already started"),
            Self::MissingSecondary => {
                write!(f, "Large panel needs an interface with a secondary COG")
            }
            Self::OtpCheck { marker } => {
                write!(f, "OTP check failed: bank marker {marker:#04x}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug)]
pub enum BuilderError {
    /// Panel was not specified
    ///
    /// [`Builder::panel()`](crate::config::Builder::panel) must be called before building.
    MissingPanel,
    /// Temperature outside the accepted range
    InvalidTemperature(i8),
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingPanel => write!(f, "Panel must be specified"),
            Self::InvalidTemperature(celsius) => write!(
                f,
                "Invalid temperature {celsius}°C (accepted {MIN_TEMPERATURE}..={MAX_TEMPERATURE})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
