//! Update orchestrator
//!
//! [`Screen`] owns the interface, the power sequencer and the frame buffer,
//! and turns drawing plus `flush` into complete COG cycles.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::buffer::FrameBuffer;
use crate::cog::{Cog, Frame, Otp, PhaseLog, Settings};
use crate::color::Color;
use crate::config::{Config, Family, MAX_TEMPERATURE, MIN_TEMPERATURE, Orientation, Panel};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::mode::{ModeCheck, TemperatureCheck, UpdateMode};
use crate::power::{PowerScope, PowerSequencer, PowerState};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Fills played by [`Screen::regenerate`]
const REGENERATE_FILLS: [Frame<'static>; 3] = [
    Frame::Fill(Color::White),
    Frame::Fill(Color::Black),
    Frame::Fill(Color::White),
];

/// One iTC panel on an EXT3 board
///
/// Created without touching hardware; call [`begin`](Self::begin) once before
/// any update.
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `P` - Power-enable pin implementing [`OutputPin`]
/// * `B` - Frame buffer storage, at least [`Panel::buffer_size`] bytes
/// * `M` - Mode check deciding which update mode actually runs
pub struct Screen<I, P, B, M = TemperatureCheck>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    power: PowerSequencer<P>,
    frame: FrameBuffer<B>,
    config: Config,
    cog: Cog,
    mode_check: M,
    otp: Otp,
    started: bool,
    last_cycle: PhaseLog,
}

impl<I, P, B> Screen<I, P, B>
where
    I: DisplayInterface,
    P: OutputPin,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a screen; `power` is `None` when the board has no power-enable pin
    pub fn new(interface: I, power: Option<P>, buffer: B, config: Config) -> Self {
        let frame = FrameBuffer::new(buffer, &config.panel, config.orientation);
        Self {
            interface,
            power: PowerSequencer::new(power),
            frame,
            cog: Cog::for_panel(&config.panel),
            config,
            mode_check: TemperatureCheck,
            otp: Otp::default(),
            started: false,
            last_cycle: PhaseLog::default(),
        }
    }
}

impl<I, P, B, M> Screen<I, P, B, M>
where
    I: DisplayInterface,
    P: OutputPin,
    B: AsRef<[u8]> + AsMut<[u8]>,
    M: ModeCheck,
{
    /// Replace the mode check
    pub fn with_mode_check<N: ModeCheck>(self, mode_check: N) -> Screen<I, P, B, N> {
        Screen {
            interface: self.interface,
            power: self.power,
            frame: self.frame,
            config: self.config,
            cog: self.cog,
            mode_check,
            otp: self.otp,
            started: self.started,
            last_cycle: self.last_cycle,
        }
    }

    /// Add a second power rail, switched after the power-enable pin
    pub fn with_secondary_rail(mut self, rail: P) -> Self {
        self.power = self.power.with_secondary_rail(rail);
        self
    }

    /// Validate the buffer, clear both frames to white and power the panel
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`] on a second call, [`Error::BufferTooSmall`]
    /// when the buffer cannot hold two frames, [`Error::MissingSecondary`]
    /// when a large panel sits on a single-COG interface.
    pub fn begin<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }
        self.frame
            .check_len()
            .map_err(|(required, provided)| Error::BufferTooSmall { required, provided })?;
        if self.cog.family() == Family::Large && !self.interface.has_secondary() {
            return Err(Error::MissingSecondary);
        }

        self.frame.clear(Color::White);
        self.frame.fill_old(Color::White);
        self.power.resume(&mut self.interface, delay);
        self.started = true;

        debug!("screen: {} {:?} started", self.config.panel, self.cog.family());
        Ok(())
    }

    /// Send the next frame with a global update
    pub fn flush<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.flush_mode(UpdateMode::Global, delay).map(|_| ())
    }

    /// Send the next frame, downgrading `mode` as the mode check decides
    ///
    /// Returns the mode that ran. [`UpdateMode::None`] leaves the panel and
    /// both frames untouched.
    pub fn flush_mode<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> core::result::Result<UpdateMode, Error<I>> {
        self.ensure_started()?;
        let mode = self.check_mode(mode);
        if mode == UpdateMode::None {
            return Ok(mode);
        }

        self.power.resume(&mut self.interface, delay);
        let (black, red) = self.frame.next_planes();
        let frames = [Frame::Buffer { black, red }];
        let settings = self.settings(mode);
        self.cog.run_cycle(
            &mut self.interface,
            delay,
            &mut self.otp,
            &settings,
            &frames,
            &mut self.last_cycle,
        )?;

        self.frame.commit();
        Ok(mode)
    }

    /// Clear ghosting with a white, black, white sequence in one cycle
    ///
    /// The next frame is kept; the old frame becomes white.
    pub fn regenerate<D: DelayNs>(
        &mut self,
        mode: UpdateMode,
        delay: &mut D,
    ) -> core::result::Result<UpdateMode, Error<I>> {
        self.ensure_started()?;
        let mode = self.check_mode(mode);
        if mode == UpdateMode::None {
            return Ok(mode);
        }

        self.power.resume(&mut self.interface, delay);
        let settings = self.settings(mode);
        self.cog.run_cycle(
            &mut self.interface,
            delay,
            &mut self.otp,
            &settings,
            &REGENERATE_FILLS,
            &mut self.last_cycle,
        )?;

        self.frame.fill_old(Color::White);
        Ok(mode)
    }

    /// Suspend within `scope`; the OTP block is read again on the next cycle
    pub fn suspend(&mut self, scope: PowerScope) -> DisplayResult<I> {
        self.ensure_started()?;
        self.power.suspend(&mut self.interface, scope);
        if self.power.state() == PowerState::Off {
            self.otp.invalidate();
        }
        Ok(())
    }

    /// Power the panel again after [`suspend`](Self::suspend)
    pub fn resume<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_started()?;
        self.power.resume(&mut self.interface, delay);
        Ok(())
    }

    /// Fill the next frame
    pub fn clear(&mut self, color: Color) {
        self.frame.clear(color);
    }

    /// Set one pixel of the next frame; out-of-range coordinates are ignored
    pub fn set_point(&mut self, x: u16, y: u16, color: Color) {
        self.frame.set_point(x, y, color);
    }

    /// Read one pixel of the next frame
    pub fn get_point(&self, x: u16, y: u16) -> Option<Color> {
        self.frame.get_point(x, y)
    }

    /// Change logical orientation
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.frame.set_orientation(orientation);
    }

    /// Current orientation
    pub fn orientation(&self) -> Orientation {
        self.frame.orientation()
    }

    /// Logical (width, height)
    pub fn size(&self) -> (u16, u16) {
        self.frame.size()
    }

    /// Set the panel temperature, clamped to the supported range
    pub fn set_temperature(&mut self, celsius: i8) {
        self.config.temperature = celsius.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
    }

    /// Panel temperature in degrees Celsius
    pub fn temperature(&self) -> i8 {
        self.config.temperature
    }

    /// Panel model
    pub fn panel(&self) -> &Panel {
        &self.config.panel
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Phases run by the last cycle
    pub fn last_cycle(&self) -> &PhaseLog {
        &self.last_cycle
    }

    /// Panel power state
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// OTP block from the last cycle
    pub fn otp(&self) -> &Otp {
        &self.otp
    }

    /// Whether [`begin`](Self::begin) succeeded
    pub fn is_started(&self) -> bool {
        self.started
    }

    fn ensure_started(&self) -> DisplayResult<I> {
        if self.started {
            Ok(())
        } else {
            Err(Error::NotStarted)
        }
    }

    fn check_mode(&self, requested: UpdateMode) -> UpdateMode {
        let mode = self
            .mode_check
            .check_mode(requested, self.config.temperature, &self.config.panel);
        if mode != requested {
            debug!("screen: {requested:?} downgraded to {mode:?}");
        }
        mode
    }

    fn settings(&self, mode: UpdateMode) -> Settings {
        Settings {
            geometry: self.config.panel.geometry(),
            temperature: self.config.temperature,
            mode,
        }
    }
}
