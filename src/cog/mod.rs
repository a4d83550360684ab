//! Chip-on-glass controller state machines
//!
//! Every panel update walks the same six phases, in order:
//!
//! 1. [`Phase::Reset`] - pulse the reset line
//! 2. [`Phase::GetCalibrationData`] - read the 128-byte OTP block
//! 3. [`Phase::Initial`] - configure the COG from OTP and geometry
//! 4. [`Phase::SendImageData`] - stream the bit-planes
//! 5. [`Phase::Update`] - play the waveform, blocking on BUSY
//! 6. [`Phase::PowerOff`] - leave the COG safe to suspend
//!
//! Each of the three families implements [`CogPhases`] on its own. [`Cog`]
//! picks the family once, from the panel, and every cycle starts again from
//! Reset: nothing is carried over from the previous update.

mod large;
mod medium;
mod small;

pub use large::LargeCog;
pub use medium::MediumCog;
pub use small::SmallCog;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::color::Color;
use crate::command::{OTP_BANK_MARKER, OTP_READ, OTP_SIZE};
use crate::config::{Family, Geometry, Panel};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::mode::UpdateMode;

type CogResult<I> = core::result::Result<(), Error<I>>;

/// Most phases one cycle can record: three setup phases, three image/update
/// pairs and power-off
pub const MAX_PHASES: usize = 10;

/// One step of the update cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Hardware reset
    Reset,
    /// OTP read
    GetCalibrationData,
    /// COG configuration
    Initial,
    /// Bit-plane transfer
    SendImageData,
    /// Waveform playback
    Update,
    /// DC/DC off
    PowerOff,
}

/// Phases entered during the last cycle, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseLog {
    entries: [Phase; MAX_PHASES],
    len: usize,
}

impl Default for PhaseLog {
    fn default() -> Self {
        Self {
            entries: [Phase::Reset; MAX_PHASES],
            len: 0,
        }
    }
}

impl PhaseLog {
    fn clear(&mut self) {
        self.len = 0;
    }

    fn enter(&mut self, phase: Phase) {
        debug!("cog: {phase:?}");
        if let Some(slot) = self.entries.get_mut(self.len) {
            *slot = phase;
            self.len += 1;
        }
    }

    /// Recorded phases
    pub fn as_slice(&self) -> &[Phase] {
        &self.entries[..self.len]
    }

    /// How many times `phase` was entered
    pub fn count(&self, phase: Phase) -> usize {
        self.as_slice().iter().filter(|p| **p == phase).count()
    }

    /// Last phase entered
    pub fn last(&self) -> Option<Phase> {
        self.as_slice().last().copied()
    }
}

/// Calibration block read from the panel's one-time-programmed memory
#[derive(Clone, Debug)]
pub struct Otp {
    data: [u8; OTP_SIZE],
    valid: bool,
}

impl Default for Otp {
    fn default() -> Self {
        Self {
            data: [0; OTP_SIZE],
            valid: false,
        }
    }
}

impl Otp {
    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; OTP_SIZE] {
        &self.data
    }

    /// Whether the block was read since the last reset or suspend
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the block stale
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// Image source for one SendImageData phase
#[derive(Clone, Copy, Debug)]
pub enum Frame<'a> {
    /// Planes of the frame buffer; `red` is `None` on monochrome panels
    Buffer {
        /// Black plane
        black: &'a [u8],
        /// Red plane
        red: Option<&'a [u8]>,
    },
    /// Whole panel in one basic colour
    Fill(Color),
}

impl<'a> Frame<'a> {
    fn black(&self, page: usize) -> Plane<'a> {
        match *self {
            Self::Buffer { black, .. } => Plane::Bytes(black),
            Self::Fill(color) => Plane::Fill(color.black_byte(), page),
        }
    }

    fn red(&self, page: usize) -> Plane<'a> {
        match *self {
            Self::Buffer { red: Some(red), .. } => Plane::Bytes(red),
            Self::Buffer { red: None, .. } => Plane::Fill(0x00, page),
            Self::Fill(color) => Plane::Fill(color.red_byte(), page),
        }
    }
}

/// Bytes of one bit-plane, either borrowed or a repeated fill byte
#[derive(Clone, Copy, Debug)]
enum Plane<'a> {
    Bytes(&'a [u8]),
    Fill(u8, usize),
}

impl Plane<'_> {
    /// Sub-range of the plane
    fn slice(self, range: core::ops::Range<usize>) -> Self {
        match self {
            Self::Bytes(bytes) => Self::Bytes(bytes.get(range).unwrap_or(&[])),
            Self::Fill(byte, len) => {
                let end = range.end.min(len);
                Self::Fill(byte, end.saturating_sub(range.start))
            }
        }
    }
}

/// Inputs of one cycle that do not change between phases
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// Native geometry
    pub geometry: Geometry,
    /// Panel temperature in degrees Celsius
    pub temperature: i8,
    /// Mode chosen by the mode check
    pub mode: UpdateMode,
}

/// The six-phase contract shared by all COG families
pub trait CogPhases {
    /// Pulse the reset line with family timing
    fn reset<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I>;

    /// Read the OTP block into `otp`
    fn get_data_otp<I: DisplayInterface>(&self, interface: &mut I, otp: &mut Otp) -> CogResult<I>;

    /// Configure the COG from OTP, geometry and temperature
    fn initial<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
        otp: &Otp,
        settings: &Settings,
    ) -> CogResult<I>;

    /// Stream one frame into COG memory
    fn send_image_data<I: DisplayInterface>(
        &self,
        interface: &mut I,
        frame: &Frame<'_>,
        settings: &Settings,
    ) -> CogResult<I>;

    /// Play the waveform and wait for BUSY to clear
    fn update<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I>;

    /// Turn the DC/DC converter off
    fn power_off<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I>;
}

/// Controller family bound to a screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cog {
    /// Single small COG
    Small(SmallCog),
    /// Single medium COG
    Medium(MediumCog),
    /// Primary and secondary large COGs
    Large(LargeCog),
}

impl Cog {
    /// Select the family for `panel`
    pub fn for_panel(panel: &Panel) -> Self {
        match panel.family() {
            Family::Small => Self::Small(SmallCog),
            Family::Medium => Self::Medium(MediumCog),
            Family::Large => Self::Large(LargeCog),
        }
    }

    /// Family of this controller
    pub fn family(&self) -> Family {
        match self {
            Self::Small(_) => Family::Small,
            Self::Medium(_) => Family::Medium,
            Self::Large(_) => Family::Large,
        }
    }

    /// Run one full cycle: setup, one send/update pair per frame, power-off
    pub fn run_cycle<I, D>(
        &self,
        interface: &mut I,
        delay: &mut D,
        otp: &mut Otp,
        settings: &Settings,
        frames: &[Frame<'_>],
        log: &mut PhaseLog,
    ) -> CogResult<I>
    where
        I: DisplayInterface,
        D: DelayNs,
    {
        match self {
            Self::Small(cog) => run_cycle(cog, interface, delay, otp, settings, frames, log),
            Self::Medium(cog) => run_cycle(cog, interface, delay, otp, settings, frames, log),
            Self::Large(cog) => run_cycle(cog, interface, delay, otp, settings, frames, log),
        }
    }
}

fn run_cycle<C, I, D>(
    cog: &C,
    interface: &mut I,
    delay: &mut D,
    otp: &mut Otp,
    settings: &Settings,
    frames: &[Frame<'_>],
    log: &mut PhaseLog,
) -> CogResult<I>
where
    C: CogPhases,
    I: DisplayInterface,
    D: DelayNs,
{
    log.clear();

    log.enter(Phase::Reset);
    otp.invalidate();
    cog.reset(interface, delay)?;

    log.enter(Phase::GetCalibrationData);
    cog.get_data_otp(interface, otp)?;

    log.enter(Phase::Initial);
    cog.initial(interface, delay, otp, settings)?;

    for frame in frames {
        log.enter(Phase::SendImageData);
        cog.send_image_data(interface, frame, settings)?;

        log.enter(Phase::Update);
        cog.update(interface, delay)?;
    }

    log.enter(Phase::PowerOff);
    cog.power_off(interface, delay)
}

// Bus helpers shared by the families

fn command<I: DisplayInterface>(interface: &mut I, command: u8, data: &[u8]) -> CogResult<I> {
    interface.send_command(command).map_err(Error::Interface)?;
    if !data.is_empty() {
        interface.send_data(data).map_err(Error::Interface)?;
    }
    Ok(())
}

fn send_plane<I: DisplayInterface>(
    interface: &mut I,
    command: u8,
    plane: Plane<'_>,
) -> CogResult<I> {
    interface.send_command(command).map_err(Error::Interface)?;
    match plane {
        Plane::Bytes(bytes) => interface.send_data(bytes).map_err(Error::Interface),
        Plane::Fill(byte, len) => {
            let chunk = [byte; 64];
            let mut remaining = len;
            while remaining > 0 {
                let n = remaining.min(chunk.len());
                interface.send_data(&chunk[..n]).map_err(Error::Interface)?;
                remaining -= n;
            }
            Ok(())
        }
    }
}

fn busy_wait<I: DisplayInterface, D: DelayNs>(interface: &mut I, delay: &mut D) -> CogResult<I> {
    interface.busy_wait(delay).map_err(Error::Interface)
}

/// Read the OTP block from the primary COG and check its bank marker
fn read_otp<I: DisplayInterface>(interface: &mut I, otp: &mut Otp) -> CogResult<I> {
    interface.send_command(OTP_READ).map_err(Error::Interface)?;
    // First byte clocked out after the command is a dummy
    let mut dummy = [0u8; 1];
    interface.read_data(&mut dummy).map_err(Error::Interface)?;
    interface.read_data(&mut otp.data).map_err(Error::Interface)?;

    let marker = otp.data[0];
    if marker != OTP_BANK_MARKER {
        return Err(Error::OtpCheck { marker });
    }
    otp.valid = true;
    Ok(())
}

/// Temperature byte as sent to the COG
fn temperature_byte(temperature: i8) -> u8 {
    temperature as u8
}

/// Resolution parameters: sources then gates, big-endian
fn resolution(sources: u16, gates: u16) -> [u8; 4] {
    let [s_high, s_low] = sources.to_be_bytes();
    let [g_high, g_low] = gates.to_be_bytes();
    [s_high, s_low, g_high, g_low]
}
