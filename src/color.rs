//! Colour palette and quantization
//!
//! iTC panels store one bit per pixel per bit-plane. Monochrome films use a
//! single black plane; black-white-red films add a red plane.
//!
//! | Colour | Black plane | Red plane |
//! |--------|-------------|-----------|
//! | White  | 0           | 0         |
//! | Black  | 1           | 0         |
//! | Red    | 0           | 1         |
//!
//! The combined colours [`Color::Grey`], [`Color::DarkRed`] and
//! [`Color::LightRed`] have no plane encoding of their own; they are dithered
//! on a checkerboard of their two basic colours.
//!
//! ## Example
//!
//! ```
//! use epd_ext3::{Color, PALETTE};
//!
//! assert_eq!(Color::from_rgb565(PALETTE.red), Color::Red);
//! assert_eq!(Color::Red.quantize(1, 0, 0), Color::Black);
//! assert_eq!(Color::Grey.quantize(1, 0, 0), Color::Black);
//! assert_eq!(Color::Grey.quantize(1, 1, 0), Color::White);
//! ```

/// Colours understood by the frame buffer
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black
    Black,
    /// White
    White,
    /// Red (black-white-red films only)
    Red,
    /// Black and white checkerboard
    Grey,
    /// Red and black checkerboard
    DarkRed,
    /// Red and white checkerboard
    LightRed,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

/// RGB565 values of the palette colours
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Black
    pub black: u16,
    /// White
    pub white: u16,
    /// Red
    pub red: u16,
    /// Grey
    pub grey: u16,
    /// Dark red
    pub dark_red: u16,
    /// Light red
    pub light_red: u16,
}

/// The palette shared by every screen
pub const PALETTE: Palette = Palette {
    black: 0x0000,
    white: 0xFFFF,
    red: 0xF800,
    grey: 0x7BEF,
    dark_red: 0x7800,
    light_red: 0xFC10,
};

impl Color {
    /// RGB565 value from [`PALETTE`]
    pub const fn to_rgb565(self) -> u16 {
        match self {
            Self::Black => PALETTE.black,
            Self::White => PALETTE.white,
            Self::Red => PALETTE.red,
            Self::Grey => PALETTE.grey,
            Self::DarkRed => PALETTE.dark_red,
            Self::LightRed => PALETTE.light_red,
        }
    }

    /// Nearest palette colour for an RGB565 value
    ///
    /// Exact palette values map to their colour. Anything else is red when
    /// the red channel clearly dominates, otherwise black or white by
    /// luminance.
    pub fn from_rgb565(rgb565: u16) -> Self {
        let exact = [
            Self::Black,
            Self::White,
            Self::Red,
            Self::Grey,
            Self::DarkRed,
            Self::LightRed,
        ];
        if let Some(color) = exact.into_iter().find(|c| c.to_rgb565() == rgb565) {
            return color;
        }

        // Expand to 8 bits per channel
        let red = u32::from((rgb565 >> 11) & 0x1F) * 255 / 31;
        let green = u32::from((rgb565 >> 5) & 0x3F) * 255 / 63;
        let blue = u32::from(rgb565 & 0x1F) * 255 / 31;

        if red >= 128 && green < 96 && blue < 96 {
            return Self::Red;
        }
        let luminance = (red * 299 + green * 587 + blue * 114) / 1000;
        if luminance < 128 { Self::Black } else { Self::White }
    }

    /// Reduce to a basic colour the panel can show at (x, y)
    ///
    /// `planes` is the panel's bit-plane count. Combined colours pick one of
    /// their two basic colours on `(x + y)` parity; red becomes black on
    /// monochrome panels.
    pub const fn quantize(self, planes: usize, x: u16, y: u16) -> Self {
        let even = (x as u32 + y as u32) % 2 == 0;
        let basic = match self {
            Self::Grey if even => Self::Black,
            Self::Grey => Self::White,
            Self::DarkRed if even => Self::Red,
            Self::DarkRed => Self::Black,
            Self::LightRed if even => Self::Red,
            Self::LightRed => Self::White,
            other => other,
        };
        match basic {
            Self::Red if planes < 2 => Self::Black,
            other => other,
        }
    }

    /// Whether the colour is one of black, white or red
    pub const fn is_basic(self) -> bool {
        matches!(self, Self::Black | Self::White | Self::Red)
    }

    /// Fill byte for the black plane
    ///
    /// Only meaningful for basic colours.
    pub const fn black_byte(self) -> u8 {
        match self {
            Self::Black => 0xFF,
            _ => 0x00,
        }
    }

    /// Fill byte for the red plane
    ///
    /// Only meaningful for basic colours.
    pub const fn red_byte(self) -> u8 {
        match self {
            Self::Red => 0xFF,
            _ => 0x00,
        }
    }
}
