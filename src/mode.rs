//! Update modes and the temperature-informed mode check

use log::warn;

use crate::config::{Family, Panel};

/// Refresh strategy for one flush
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Do not update the panel
    None,
    /// Full-panel refresh
    #[default]
    Global,
    /// Full-panel refresh with the fast waveform
    Fast,
}

/// Decides which update mode a panel can run under current conditions
///
/// The [`Screen`](crate::Screen) uses the returned mode as it is.
pub trait ModeCheck {
    /// Best supported mode for `requested`
    fn check_mode(&self, requested: UpdateMode, temperature: i8, panel: &Panel) -> UpdateMode;
}

/// Default mode check, from film capabilities and temperature
///
/// - `None` stays `None`.
/// - `Fast` needs a small COG, a fast-capable film and 0..=50 °C, otherwise it
///   becomes `Global`. Medium and large COGs have no fast waveform.
/// - `Global` is always kept; outside the film's range a warning is logged.
///
/// ```
/// use epd_ext3::{ModeCheck, Panel, TemperatureCheck, UpdateMode};
///
/// let check = TemperatureCheck;
/// let mode = check.check_mode(UpdateMode::Fast, 25, &Panel::EPD_266_GS_09);
/// assert_eq!(mode, UpdateMode::Global);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TemperatureCheck;

/// Temperature range for the fast waveform
const FAST_RANGE: (i8, i8) = (0, 50);

impl ModeCheck for TemperatureCheck {
    fn check_mode(&self, requested: UpdateMode, temperature: i8, panel: &Panel) -> UpdateMode {
        match requested {
            UpdateMode::None => UpdateMode::None,
            UpdateMode::Fast
                if panel.family() == Family::Small
                    && panel.film.supports_fast()
                    && (FAST_RANGE.0..=FAST_RANGE.1).contains(&temperature) =>
            {
                UpdateMode::Fast
            }
            UpdateMode::Fast | UpdateMode::Global => {
                let (low, high) = panel.film.temperature_range();
                if !(low..=high).contains(&temperature) {
                    warn!(
                        "{temperature}°C outside {low}..={high}°C for {panel}, global update anyway"
                    );
                }
                UpdateMode::Global
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Driver, Film, Size};

    const FAST_PANEL: Panel = Panel::new(Size::Size266, Film::K, Driver::Driver9);

    #[test]
    fn test_none_stays_none() {
        let mode = TemperatureCheck.check_mode(UpdateMode::None, 25, &FAST_PANEL);
        assert_eq!(mode, UpdateMode::None);
    }

    #[test]
    fn test_global_always_kept() {
        for temperature in [-40, -15, 0, 25, 60, 85] {
            let mode =
                TemperatureCheck.check_mode(UpdateMode::Global, temperature, &Panel::EPD_154_GS_09);
            assert_eq!(mode, UpdateMode::Global);
        }
    }

    #[test]
    fn test_fast_needs_capable_film() {
        let mode = TemperatureCheck.check_mode(UpdateMode::Fast, 25, &Panel::EPD_154_GS_09);
        assert_eq!(mode, UpdateMode::Global);
        let mode = TemperatureCheck.check_mode(UpdateMode::Fast, 25, &FAST_PANEL);
        assert_eq!(mode, UpdateMode::Fast);
    }

    #[test]
    fn test_fast_only_on_small_cog() {
        let medium = Panel::new(Size::Size741, Film::K, Driver::Driver8);
        let large = Panel::new(Size::Size969, Film::K, Driver::Driver8);
        assert_eq!(medium.family(), Family::Medium);
        assert_eq!(large.family(), Family::Large);
        assert_eq!(TemperatureCheck.check_mode(UpdateMode::Fast, 25, &medium), UpdateMode::Global);
        assert_eq!(TemperatureCheck.check_mode(UpdateMode::Fast, 25, &large), UpdateMode::Global);
    }

    #[test]
    fn test_fast_downgraded_when_cold() {
        let mode = TemperatureCheck.check_mode(UpdateMode::Fast, -5, &FAST_PANEL);
        assert_eq!(mode, UpdateMode::Global);
        let mode = TemperatureCheck.check_mode(UpdateMode::Fast, 51, &FAST_PANEL);
        assert_eq!(mode, UpdateMode::Global);
    }

    #[test]
    fn test_downgrade_is_deterministic() {
        let first = TemperatureCheck.check_mode(UpdateMode::Fast, 55, &FAST_PANEL);
        for _ in 0..10 {
            assert_eq!(TemperatureCheck.check_mode(UpdateMode::Fast, 55, &FAST_PANEL), first);
        }
    }
}
