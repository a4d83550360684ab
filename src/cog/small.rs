//! Small COG: 1.54" to 4.2" panels, one controller

use embedded_hal::delay::DelayNs;

use super::{
    CogPhases, CogResult, Frame, Otp, Settings, busy_wait, command, read_otp, send_plane,
    temperature_byte,
};
use crate::command::{
    DATA_START_BLACK, DATA_START_RED, DISPLAY_REFRESH, FAST_TEMPERATURE_OFFSET, OTP_PSR,
    PANEL_SETTING, POWER_OFF, POWER_ON, SOFT_RESET, TEMPERATURE_ACTIVE, TEMPERATURE_EXTERNAL,
    TEMPERATURE_INPUT,
};
use crate::interface::{Chip, DisplayInterface, ResetTiming};
use crate::mode::UpdateMode;

const RESET: ResetTiming = ResetTiming {
    settle: 5,
    high: 5,
    low: 10,
    release: 5,
    deselect: 5,
};

/// Controller of small panels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmallCog;

impl CogPhases for SmallCog {
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
        command(interface, PANEL_SETTING, &[SOFT_RESET])?;
        busy_wait(interface, delay)?;

        let mut temperature = temperature_byte(settings.temperature);
        if settings.mode == UpdateMode::Fast {
            temperature = temperature.wrapping_add(FAST_TEMPERATURE_OFFSET);
        }
        command(interface, TEMPERATURE_INPUT, &[temperature])?;
        command(interface, TEMPERATURE_ACTIVE, &[TEMPERATURE_EXTERNAL])?;
        command(interface, PANEL_SETTING, &otp.as_bytes()[OTP_PSR])
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
        busy_wait(interface, delay)?;
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
        busy_wait(interface, delay)
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{Event, MockDelay, MockInterface};
    use super::*;
    use crate::color::Color;
    use crate::config::Panel;

    fn settings(mode: UpdateMode, temperature: i8) -> Settings {
        Settings {
            geometry: Panel::EPD_154_GS_09.geometry(),
            temperature,
            mode,
        }
    }

    fn initialised(mode: UpdateMode, temperature: i8) -> MockInterface {
        let mut interface = MockInterface::new();
        let mut otp = Otp::default();
        SmallCog.reset(&mut interface, &mut MockDelay).unwrap();
        SmallCog.get_data_otp(&mut interface, &mut otp).unwrap();
        SmallCog
            .initial(&mut interface, &mut MockDelay, &otp, &settings(mode, temperature))
            .unwrap();
        interface
    }

    #[test]
    fn test_reset_timing() {
        let mut interface = MockInterface::new();
        SmallCog.reset(&mut interface, &mut MockDelay).unwrap();
        assert_eq!(interface.events, [Event::Reset(RESET)]);
    }

    #[test]
    fn test_initial_sequence() {
        let interface = initialised(UpdateMode::Global, 25);
        assert_eq!(
            interface.commands(),
            [
                crate::command::OTP_READ,
                PANEL_SETTING,
                TEMPERATURE_INPUT,
                TEMPERATURE_ACTIVE,
                PANEL_SETTING,
            ]
        );
        assert_eq!(interface.data_after(Chip::Primary, TEMPERATURE_INPUT), [[25u8]]);
        let panel_settings = interface.data_after(Chip::Primary, PANEL_SETTING);
        assert_eq!(panel_settings[0], [SOFT_RESET]);
        assert_eq!(panel_settings[1], interface.otp[OTP_PSR]);
    }

    #[test]
    fn test_fast_mode_offsets_temperature() {
        let interface = initialised(UpdateMode::Fast, 25);
        assert_eq!(
            interface.data_after(Chip::Primary, TEMPERATURE_INPUT),
            [[25 + FAST_TEMPERATURE_OFFSET]]
        );
    }

    #[test]
    fn test_send_mono_buffer() {
        let mut interface = MockInterface::new();
        let page = Panel::EPD_154_GS_09.geometry().page_size();
        let black = alloc::vec![0xAAu8; page];
        let frame = Frame::Buffer {
            black: &black,
            red: None,
        };
        SmallCog
            .send_image_data(&mut interface, &frame, &settings(UpdateMode::Global, 25))
            .unwrap();

        assert_eq!(interface.data_after(Chip::Primary, DATA_START_BLACK), [black]);
        let red = interface.data_after(Chip::Primary, DATA_START_RED);
        assert_eq!(red[0].len(), page);
        assert!(red[0].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_send_fill() {
        let mut interface = MockInterface::new();
        let page = Panel::EPD_154_GS_09.geometry().page_size();
        SmallCog
            .send_image_data(
                &mut interface,
                &Frame::Fill(Color::Black),
                &settings(UpdateMode::Global, 25),
            )
            .unwrap();
        let black = interface.data_after(Chip::Primary, DATA_START_BLACK);
        assert_eq!(black[0].len(), page);
        assert!(black[0].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_update_waits_for_busy() {
        let mut interface = MockInterface::new();
        SmallCog.update(&mut interface, &mut MockDelay).unwrap();
        assert_eq!(
            interface.events,
            [
                Event::BusyWait,
                Event::Command(Chip::Primary, POWER_ON),
                Event::BusyWait,
                Event::Command(Chip::Primary, DISPLAY_REFRESH),
                Event::BusyWait,
            ]
        );
    }

    #[test]
    fn test_power_off() {
        let mut interface = MockInterface::new();
        SmallCog.power_off(&mut interface, &mut MockDelay).unwrap();
        assert_eq!(
            interface.events,
            [Event::Command(Chip::Primary, POWER_OFF), Event::BusyWait]
        );
    }
}
