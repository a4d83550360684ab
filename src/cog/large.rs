//! Large COG: 9.69" and 11.98" panels, primary and secondary controllers
//!
//! Each controller drives half of the gate lines. Settings go to both chips;
//! image rows `0..gates / 2` go to the primary and the rest to the secondary.
//! The OTP block is read from the primary only.

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

/// Controller pair of large panels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LargeCog;

impl CogPhases for LargeCog {
    fn reset<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I> {
        // Both COGs share the reset line
        interface.select(Chip::Both);
        interface.reset(delay, &RESET);
        Ok(())
    }

    fn get_data_otp<I: DisplayInterface>(&self, interface: &mut I, otp: &mut Otp) -> CogResult<I> {
        interface.select(Chip::Primary);
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

        interface.select(Chip::Both);
        command(interface, PANEL_SETTING, &otp[OTP_PSR])?;
        command(interface, POWER_SETTING, &otp[OTP_PWR])?;
        command(interface, BOOSTER_SOFT_START, &otp[OTP_BTST])?;
        command(interface, PLL_CONTROL, &otp[OTP_PLL])?;
        command(interface, VCOM_DATA_INTERVAL, &otp[OTP_CDI])?;
        command(interface, TCON, &otp[OTP_TCON])?;
        command(interface, RESOLUTION, &resolution(geometry.sources, geometry.gates / 2))?;
        command(interface, POWER_SAVING, &otp[OTP_PWS])?;
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
        let half = page / 2;
        let black = frame.black(page);
        let red = frame.red(page);

        interface.select(Chip::Primary);
        send_plane(interface, DATA_START_BLACK, black.slice(0..half))?;
        send_plane(interface, DATA_START_RED, red.slice(0..half))?;

        interface.select(Chip::Secondary);
        send_plane(interface, DATA_START_BLACK, black.slice(half..page))?;
        send_plane(interface, DATA_START_RED, red.slice(half..page))
    }

    fn update<I: DisplayInterface, D: DelayNs>(
        &self,
        interface: &mut I,
        delay: &mut D,
    ) -> CogResult<I> {
        interface.select(Chip::Both);
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
        interface.select(Chip::Both);
        command(interface, POWER_OFF, &[])?;
        busy_wait(interface, delay)?;
        command(interface, DEEP_SLEEP, &[DEEP_SLEEP_CHECK])
    }
}
