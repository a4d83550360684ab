//! Medium COG: 4.37" to 7.41" panels, one controller configured from OTP

use embedded_hal::delay::DelayNs;

use super::{
    CogPhases, CogResult, Frame, Otp, Settings, busy_wait, command, read_otp, resolution,
    send_plane, temperature_byte,
};
use crate::command::{
    BOOSTER_SOFT_START, DATA_START_BLACK, DATA_START_RED, DEEP_SLEEP, DEEP_SLEEP_CHECK,
    DISPLAY_REFRESH, OTP_BTST, OTP_CDI, OTP_PLL, OTP_PSR, OTP_PWR, OTP_PWS, OTP_TCON,
    PANEL_SETTING, PLL_CONTROL, POWER_OFF, POWER_ON, POWER_SAVING, POWER_SETTING, RESOLUTION, TCON,
    TEMPERATURE_ACTIVE, TEMPERATURE_EXTERNAL, TEMPERATURE_INPUT, VCOM_DATA_INTERVAL,
};
use crate::interface::{Chip, DisplayInterface, ResetTiming};

const RESET: ResetTiming = ResetTiming {
    settle: 200,
    high: 20,
    low: 200,
    release: 50,
    deselect: 5,
};

/// Controller of medium panels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MediumCog;

impl CogPhases for MediumCog {
    fn reset<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I> {
        interface.select(Chip::Primary);
        interface.reset(delay, &RESET);
        Ok(())
    }

    fn get_data_otp<I: DisplayInterface>(&self, interface: &mut I, otp: &mut Otp) -> CogResult<I> {
        read_otp(interface, otp)
    }

    fn initial<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
        otp: &Otp,
        settings: &Settings,
    ) -> CogResult<I> {
        let otp = otp.as_bytes();
        let geometry = settings.geometry;

        command(interface, PANEL_SETTING, &otp[OTP_PSR])?;
        command(interface, POWER_SETTING, &otp[OTP_PWR])?;
        command(interface, BOOSTER_SOFT_START, &otp[OTP_BTST])?;
        command(interface, PLL_CONTROL, &otp[OTP_PLL])?;
        command(interface, VCOM_DATA_INTERVAL, &otp[OTP_CDI])?;
        command(interface, TCON, &otp[OTP_TCON])?;
        command(interface, RESOLUTION, &resolution(geometry.sources, geometry.gates))?;
        command(interface, POWER_SAVING, &otp[OTP_PWS])?;

        // Fast mode has no waveform of its own here; the temperature is sent as is
        command(interface, TEMPERATURE_INPUT, &[temperature_byte(settings.temperature)])?;
        command(interface, TEMPERATURE_ACTIVE, &[TEMPERATURE_EXTERNAL])?;
        busy_wait(interface, delay)
    }

    fn send_image_data<I: DisplayInterface>(
        &self,
        interface: &mut I,
        frame: &Frame<'_>,
        settings: &Settings,
    ) -> CogResult<I> {
        let page = settings.geometry.page_size();
        send_plane(interface, DATA_START_BLACK, frame.black(page))?;
        send_plane(interface, DATA_START_RED, frame.red(page))
    }

    fn update<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I> {
        command(interface, POWER_ON, &[])?;
        busy_wait(interface, delay)?;
        command(interface, DISPLAY_REFRESH, &[])?;
        busy_wait(interface, delay)
    }

    fn power_off<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I> {
        command(interface, POWER_OFF, &[])?;
        busy_wait(interface, delay)?;
        command(interface, DEEP_SLEEP, &[DEEP_SLEEP_CHECK])
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{Event, MockDelay, MockInterface};
    use super::*;
    use crate::config::Panel;
    use crate::mode::UpdateMode;
    use alloc::vec;

    #[test]
    fn test_reset_timing() {
        let mut interface = MockInterface::new();
        MediumCog.reset(&mut interface, &mut MockDelay).unwrap();
        assert_eq!(interface.events, [Event::Reset(RESET)]);
    }

    #[test]
    fn test_initial_from_otp() {
        let panel = Panel::EPD_741_GS_08;
        let settings = Settings {
            geometry: panel.geometry(),
            temperature: 22,
            mode: UpdateMode::Fast,
        };
        let mut interface = MockInterface::new();
        let mut otp = Otp::default();
        MediumCog.get_data_otp(&mut interface, &mut otp).unwrap();
        MediumCog
            .initial(&mut interface, &mut MockDelay, &otp, &settings)
            .unwrap();

        let expected = interface.otp;
        assert_eq!(interface.data_after(Chip::Primary, POWER_SETTING), [&expected[OTP_PWR]]);
        assert_eq!(interface.data_after(Chip::Primary, BOOSTER_SOFT_START), [&expected[OTP_BTST]]);
        assert_eq!(interface.data_after(Chip::Primary, POWER_SAVING), [&expected[OTP_PWS]]);
        // 480 sources, 800 gates
        assert_eq!(
            interface.data_after(Chip::Primary, RESOLUTION),
            [vec![0x01, 0xE0, 0x03, 0x20]]
        );
        assert_eq!(interface.data_after(Chip::Primary, TEMPERATURE_INPUT), [vec![22u8]]);
    }

    #[test]
    fn test_send_colour_planes() {
        let panel = Panel::EPD_581_CS_08;
        let settings = Settings {
            geometry: panel.geometry(),
            temperature: 25,
            mode: UpdateMode::Global,
        };
        let page = panel.geometry().page_size();
        let black = vec![0x0Fu8; page];
        let red = vec![0xF0u8; page];
        let mut interface = MockInterface::new();
        MediumCog
            .send_image_data(
                &mut interface,
                &Frame::Buffer {
                    black: &black,
                    red: Some(&red),
                },
                &settings,
            )
            .unwrap();

        assert_eq!(interface.data_after(Chip::Primary, DATA_START_BLACK), [black]);
        assert_eq!(interface.data_after(Chip::Primary, DATA_START_RED), [red]);
    }

    #[test]
    fn test_power_off_enters_deep_sleep() {
        let mut interface = MockInterface::new();
        MediumCog.power_off(&mut interface, &mut MockDelay).unwrap();
        assert_eq!(interface.commands(), [POWER_OFF, DEEP_SLEEP]);
        assert_eq!(interface.data_after(Chip::Primary, DEEP_SLEEP), [[DEEP_SLEEP_CHECK]]);
    }
}
