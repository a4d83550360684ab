//! Panel power sequencing
//!
//! Tracks whether the panel is powered and drives the power-enable pin and
//! the interface's control lines on suspend and resume. A board without any
//! switched rail keeps the panel powered; suspending it does nothing.
//!
//! Pin errors are ignored: these lines are fire-and-forget and a failure
//! shows up as a panel that does not refresh.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::interface::DisplayInterface;

/// Time for the panel supply to settle after power-enable goes high
pub const POWER_SETTLE_MS: u32 = 8;

/// What [`suspend`](PowerSequencer::suspend) is allowed to switch off
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerScope {
    /// Leave everything as it is
    None,
    /// Remove panel power and drive the control lines low
    #[default]
    GpioOnly,
}

/// Power state of the panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerState {
    /// Power removed, control lines low
    #[default]
    Off,
    /// Powered, control lines at idle levels
    On,
}

/// Pin type for boards without a power-enable line
///
/// Pass `None::<NoPowerPin>` where a power pin is expected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPowerPin;

impl embedded_hal::digital::ErrorType for NoPowerPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPowerPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Drives the panel's power-enable pin(s)
pub struct PowerSequencer<P> {
    /// Panel power-enable, `None` when not connected
    power: Option<P>,
    /// Optional second rail, switched after `power` on resume and before it on suspend
    secondary: Option<P>,
    state: PowerState,
}

impl<P: OutputPin> PowerSequencer<P> {
    /// Create a sequencer; `None` means the power-enable pin is not connected
    pub fn new(power: Option<P>) -> Self {
        Self {
            power,
            secondary: None,
            state: PowerState::Off,
        }
    }

    /// Add a second power rail
    pub fn with_secondary_rail(mut self, rail: P) -> Self {
        self.secondary = Some(rail);
        self
    }

    /// Current state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Whether any rail can be switched
    pub fn is_switchable(&self) -> bool {
        self.power.is_some() || self.secondary.is_some()
    }

    /// Power the panel and restore the control lines
    ///
    /// Does nothing when already on.
    pub fn resume<I, D>(&mut self, interface: &mut I, delay: &mut D)
    where
        I: DisplayInterface,
        D: DelayNs,
    {
        if self.state == PowerState::On {
            return;
        }

        debug!("power: resume");
        if let Some(pin) = self.power.as_mut() {
            let _ = pin.set_high();
        }
        if let Some(pin) = self.secondary.as_mut() {
            let _ = pin.set_high();
        }
        interface.wake();
        if self.is_switchable() {
            delay.delay_ms(POWER_SETTLE_MS);
        }
        self.state = PowerState::On;
    }

    /// Suspend the panel within `scope`
    ///
    /// Without a switched rail, [`PowerScope::GpioOnly`] behaves as
    /// [`PowerScope::None`]. Does nothing when already off.
    pub fn suspend<I>(&mut self, interface: &mut I, scope: PowerScope)
    where
        I: DisplayInterface,
    {
        let scope = match (scope, self.is_switchable()) {
            (PowerScope::GpioOnly, false) => {
                debug!("power: no switched rail, suspend skipped");
                PowerScope::None
            }
            (scope, _) => scope,
        };
        if scope == PowerScope::None || self.state == PowerState::Off {
            return;
        }

        debug!("power: suspend");
        interface.release();
        if let Some(pin) = self.secondary.as_mut() {
            let _ = pin.set_low();
        }
        if let Some(pin) = self.power.as_mut() {
            let _ = pin.set_low();
        }
        self.state = PowerState::Off;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::convert::Infallible;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct LoggedPin {
        name: &'static str,
        log: Log,
    }

    impl embedded_hal::digital::ErrorType for LoggedPin {
        type Error = Infallible;
    }

    impl OutputPin for LoggedPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let entry = if self.name == "power" { "power low" } else { "rail low" };
            self.log.borrow_mut().push(entry);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            let entry = if self.name == "power" { "power high" } else { "rail high" };
            self.log.borrow_mut().push(entry);
            Ok(())
        }
    }

    struct LoggedInterface {
        log: Log,
    }

    impl DisplayInterface for LoggedInterface {
        type Error = Infallible;

        fn select(&mut self, _chip: crate::interface::Chip) {}

        fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn read_data(&mut self, _buffer: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D, _timing: &crate::interface::ResetTiming) {}

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }

        fn release(&mut self) {
            self.log.borrow_mut().push("release");
        }

        fn wake(&mut self) {
            self.log.borrow_mut().push("wake");
        }
    }

    struct NoDelay;
    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
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

    fn setup(connected: bool) -> (PowerSequencer<LoggedPin>, LoggedInterface, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let pin = connected.then(|| LoggedPin {
            name: "power",
            log: log.clone(),
        });
        let interface = LoggedInterface { log: log.clone() };
        (PowerSequencer::new(pin), interface, log)
    }

    #[test]
    fn test_resume_is_idempotent() {
        let (mut power, mut interface, log) = setup(true);
        power.resume(&mut interface, &mut NoDelay);
        let once = log.borrow().clone();
        power.resume(&mut interface, &mut NoDelay);
        assert_eq!(*log.borrow(), once);
        assert_eq!(once, ["power high", "wake"]);
        assert_eq!(power.state(), PowerState::On);
    }

    #[test]
    fn test_suspend_gpio_only() {
        let (mut power, mut interface, log) = setup(true);
        power.resume(&mut interface, &mut NoDelay);
        log.borrow_mut().clear();

        power.suspend(&mut interface, PowerScope::GpioOnly);
        assert_eq!(*log.borrow(), ["release", "power low"]);
        assert_eq!(power.state(), PowerState::Off);

        // Already off
        power.suspend(&mut interface, PowerScope::GpioOnly);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_suspend_none_is_noop() {
        let (mut power, mut interface, log) = setup(true);
        power.resume(&mut interface, &mut NoDelay);
        log.borrow_mut().clear();
        power.suspend(&mut interface, PowerScope::None);
        assert!(log.borrow().is_empty());
        assert_eq!(power.state(), PowerState::On);
    }

    #[test]
    fn test_suspend_without_pin_falls_back_to_none() {
        let (mut gpio_only, mut interface_a, log_a) = setup(false);
        let (mut none, mut interface_b, log_b) = setup(false);
        gpio_only.resume(&mut interface_a, &mut NoDelay);
        none.resume(&mut interface_b, &mut NoDelay);

        gpio_only.suspend(&mut interface_a, PowerScope::GpioOnly);
        none.suspend(&mut interface_b, PowerScope::None);

        assert_eq!(*log_a.borrow(), *log_b.borrow());
        assert_eq!(gpio_only.state(), none.state());
        assert_eq!(gpio_only.state(), PowerState::On);
        assert!(!gpio_only.is_switchable());
    }

    #[test]
    fn test_secondary_rail_order() {
        let (power, mut interface, log) = setup(true);
        let mut power = power.with_secondary_rail(LoggedPin {
            name: "rail",
            log: log.clone(),
        });
        power.resume(&mut interface, &mut NoDelay);
        power.suspend(&mut interface, PowerScope::GpioOnly);
        assert_eq!(
            *log.borrow(),
            ["power high", "rail high", "wake", "release", "rail low", "power low"]
        );
    }

    #[test]
    fn test_secondary_rail_without_power_pin() {
        let (power, mut interface, log) = setup(false);
        let mut power = power.with_secondary_rail(LoggedPin {
            name: "rail",
            log: log.clone(),
        });
        assert!(power.is_switchable());

        let mut delay = CountingDelay::default();
        power.resume(&mut interface, &mut delay);
        assert_eq!(delay.ms, POWER_SETTLE_MS);

        power.suspend(&mut interface, PowerScope::GpioOnly);
        assert_eq!(power.state(), PowerState::Off);
        assert_eq!(*log.borrow(), ["rail high", "wake", "release", "rail low"]);
    }

    #[test]
    fn test_settle_delay_only_when_switched() {
        let (mut power, mut interface, _log) = setup(false);
        let mut delay = CountingDelay::default();
        power.resume(&mut interface, &mut delay);
        assert_eq!(delay.ms, 0);

        let (mut power, mut interface, _log) = setup(true);
        let mut delay = CountingDelay::default();
        power.resume(&mut interface, &mut delay);
        assert_eq!(delay.ms, POWER_SETTLE_MS);
    }
}
