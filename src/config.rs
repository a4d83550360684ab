//! Panel descriptor, orientation and configuration builder

use core::fmt;

pub use crate::error::BuilderError;

/// Default panel temperature in degrees Celsius
pub const DEFAULT_TEMPERATURE: i8 = 25;

/// Lowest temperature accepted by [`Builder::temperature`]
pub const MIN_TEMPERATURE: i8 = -40;

/// Highest temperature accepted by [`Builder::temperature`]
pub const MAX_TEMPERATURE: i8 = 85;

/// Panel diagonal size class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// 1.54"
    Size154,
    /// 2.13"
    Size213,
    /// 2.66"
    Size266,
    /// 2.71"
    Size271,
    /// 2.87"
    Size287,
    /// 2.90"
    Size290,
    /// 3.70"
    Size370,
    /// 4.17"
    Size417,
    /// 4.37"
    Size437,
    /// 5.65"
    Size565,
    /// 5.81"
    Size581,
    /// 7.41"
    Size741,
    /// 9.69"
    Size969,
    /// 11.98"
    Size1198,
}

impl Size {
    /// Diagonal in hundredths of an inch
    pub const fn diagonal(self) -> u16 {
        match self {
            Self::Size154 => 154,
            Self::Size213 => 213,
            Self::Size266 => 266,
            Self::Size271 => 271,
            Self::Size287 => 287,
            Self::Size290 => 290,
            Self::Size370 => 370,
            Self::Size417 => 417,
            Self::Size437 => 437,
            Self::Size565 => 565,
            Self::Size581 => 581,
            Self::Size741 => 741,
            Self::Size969 => 969,
            Self::Size1198 => 1198,
        }
    }

    /// Native geometry (source outputs x gate outputs)
    pub const fn geometry(self) -> Geometry {
        let (sources, gates) = match self {
            Self::Size154 => (152, 152),
            Self::Size213 => (104, 212),
            Self::Size266 => (152, 296),
            Self::Size271 => (176, 264),
            Self::Size287 => (128, 296),
            Self::Size290 => (168, 384),
            Self::Size370 => (240, 416),
            Self::Size417 => (400, 300),
            Self::Size437 => (176, 480),
            Self::Size565 => (448, 600),
            Self::Size581 => (256, 720),
            Self::Size741 => (480, 800),
            Self::Size969 => (672, 960),
            Self::Size1198 => (768, 960),
        };
        Geometry { sources, gates }
    }
}

/// Front-plane film technology
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Film {
    /// Black-white-red
    C,
    /// Monochrome
    G,
    /// Monochrome, freezer range
    H,
    /// Black-white-red, wide temperature
    J,
    /// Monochrome, wide temperature, fast update
    K,
    /// Monochrome, fast update
    P,
}

impl Film {
    /// Number of bit-planes per frame
    pub const fn planes(self) -> usize {
        match self {
            Self::C | Self::J => 2,
            Self::G | Self::H | Self::K | Self::P => 1,
        }
    }

    /// Whether the film carries a fast update waveform
    pub const fn supports_fast(self) -> bool {
        matches!(self, Self::K | Self::P)
    }

    /// Supported global update temperature range in degrees Celsius
    pub const fn temperature_range(self) -> (i8, i8) {
        match self {
            Self::H | Self::J | Self::K => (-15, 60),
            Self::C | Self::G | Self::P => (0, 50),
        }
    }

    fn letter(self) -> char {
        match self {
            Self::C => 'C',
            Self::G => 'G',
            Self::H => 'H',
            Self::J => 'J',
            Self::K => 'K',
            Self::P => 'P',
        }
    }
}

/// Driver generation of the panel's chip-on-glass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    /// Driver 5
    Driver5,
    /// Driver 8
    Driver8,
    /// Driver 9
    Driver9,
}

/// Chip-on-glass controller family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Single COG, up to 4.17"
    Small,
    /// Single COG, 4.37" to 7.41"
    Medium,
    /// Two COGs, each driving half of the gate lines
    Large,
}

/// Panel resolution in native orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Source outputs (pixels per row, multiple of 8)
    pub sources: u16,
    /// Gate outputs (rows)
    pub gates: u16,
}

impl Geometry {
    /// Bytes per row
    pub const fn row_bytes(&self) -> usize {
        self.sources as usize / 8
    }

    /// Bytes per bit-plane
    pub const fn page_size(&self) -> usize {
        self.row_bytes() * self.gates as usize
    }
}

/// Immutable description of one panel model
///
/// Fixes size, film and driver for the lifetime of a [`Screen`](crate::Screen),
/// and with them geometry, colour depth and controller family.
///
/// ```
/// use epd_ext3::{Family, Panel};
///
/// let panel = Panel::EPD_969_CS_08;
/// assert_eq!(panel.family(), Family::Large);
/// assert_eq!(panel.planes(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    /// Diagonal size class
    pub size: Size,
    /// Film technology
    pub film: Film,
    /// COG driver generation
    pub driver: Driver,
}

impl Panel {
    /// 5.81" black-white-red, previous type
    pub const EPD_581_CS_08: Self = Self::new(Size::Size581, Film::C, Driver::Driver8);
    /// 7.41" black-white-red, previous type
    pub const EPD_741_CS_08: Self = Self::new(Size::Size741, Film::C, Driver::Driver8);
    /// 9.69" black-white-red, previous type
    pub const EPD_969_CS_08: Self = Self::new(Size::Size969, Film::C, Driver::Driver8);
    /// 11.98" black-white-red, previous type
    pub const EPD_B98_CS_08: Self = Self::new(Size::Size1198, Film::C, Driver::Driver8);
    /// 1.54" monochrome
    pub const EPD_154_GS_09: Self = Self::new(Size::Size154, Film::G, Driver::Driver9);
    /// 2.13" monochrome
    pub const EPD_213_GS_09: Self = Self::new(Size::Size213, Film::G, Driver::Driver9);
    /// 2.66" monochrome
    pub const EPD_266_GS_09: Self = Self::new(Size::Size266, Film::G, Driver::Driver9);
    /// 4.17" monochrome
    pub const EPD_417_GS_05: Self = Self::new(Size::Size417, Film::G, Driver::Driver5);
    /// 4.37" monochrome
    pub const EPD_437_GS_08: Self = Self::new(Size::Size437, Film::G, Driver::Driver8);
    /// 7.41" monochrome
    pub const EPD_741_GS_08: Self = Self::new(Size::Size741, Film::G, Driver::Driver8);
    /// 11.98" monochrome
    pub const EPD_B98_GS_08: Self = Self::new(Size::Size1198, Film::G, Driver::Driver8);

    /// Describe a panel
    pub const fn new(size: Size, film: Film, driver: Driver) -> Self {
        Self { size, film, driver }
    }

    /// Native geometry
    pub const fn geometry(&self) -> Geometry {
        self.size.geometry()
    }

    /// Controller family driving this panel
    pub const fn family(&self) -> Family {
        match self.size {
            Size::Size969 | Size::Size1198 => Family::Large,
            Size::Size437 | Size::Size565 | Size::Size581 | Size::Size741 => Family::Medium,
            _ => Family::Small,
        }
    }

    /// Number of bit-planes per frame (1 for monochrome, 2 for black-white-red)
    pub const fn planes(&self) -> usize {
        self.film.planes()
    }

    /// Bytes in one frame (all planes)
    pub const fn frame_size(&self) -> usize {
        self.geometry().page_size() * self.planes()
    }

    /// Bytes the frame buffer must provide: next frame followed by old frame
    pub const fn buffer_size(&self) -> usize {
        self.frame_size() * 2
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagonal = self.size.diagonal();
        let kind = if self.planes() == 2 {
            "black-white-red"
        } else {
            "monochrome"
        };
        write!(
            f,
            "iTC {}.{:02}\" {} ({})",
            diagonal / 100,
            diagonal % 100,
            kind,
            self.film.letter()
        )
    }
}

/// Logical orientation of the frame buffer
///
/// Only changes address arithmetic; storage is never touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Native orientation
    #[default]
    Rotate0,
    /// 90 degrees clockwise
    Rotate90,
    /// 180 degrees
    Rotate180,
    /// 270 degrees clockwise
    Rotate270,
    /// Native orientation, mirrored left to right
    MirrorX,
    /// Native orientation, mirrored top to bottom
    MirrorY,
    /// Whichever rotation makes the screen taller than wide
    Portrait,
    /// Whichever rotation makes the screen wider than tall
    Landscape,
}

impl Orientation {
    /// Resolve `Portrait` and `Landscape` against panel geometry
    ///
    /// Concrete orientations are returned unchanged.
    pub const fn resolve(self, geometry: Geometry) -> Self {
        let native_portrait = geometry.gates >= geometry.sources;
        match self {
            Self::Portrait if native_portrait => Self::Rotate0,
            Self::Portrait => Self::Rotate90,
            Self::Landscape if native_portrait => Self::Rotate90,
            Self::Landscape => Self::Rotate0,
            other => other,
        }
    }

    /// Whether logical width and height are swapped relative to native
    pub const fn is_transposed(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Screen configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel model
    pub panel: Panel,
    /// Initial orientation (already resolved)
    pub orientation: Orientation,
    /// Panel temperature in degrees Celsius
    pub temperature: i8,
}

/// Builder for constructing screen configuration
///
/// # Example
///
/// ```
/// use epd_ext3::{Builder, Orientation, Panel};
///
/// let config = match Builder::new()
///     .panel(Panel::EPD_266_GS_09)
///     .orientation(Orientation::Landscape)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.orientation, Orientation::Rotate90);
/// ```
#[must_use]
pub struct Builder {
    panel: Option<Panel>,
    orientation: Orientation,
    temperature: i8,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            panel: None,
            orientation: Orientation::Rotate0,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the panel model (required)
    pub fn panel(mut self, panel: Panel) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Set the initial orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the panel temperature in degrees Celsius
    pub fn temperature(mut self, celsius: i8) -> Self {
        self.temperature = celsius;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingPanel` if no panel was set, and
    /// `BuilderError::InvalidTemperature` if the temperature is outside
    /// [`MIN_TEMPERATURE`]..=[`MAX_TEMPERATURE`].
    pub fn build(self) -> Result<Config, BuilderError> {
        let panel = self.panel.ok_or(BuilderError::MissingPanel)?;
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(BuilderError::InvalidTemperature(self.temperature));
        }
        Ok(Config {
            panel,
            orientation: self.orientation.resolve(panel.geometry()),
            temperature: self.temperature,
        })
    }
}
