//! Graphics support via embedded-graphics
//!
//! [`Screen`] implements [`DrawTarget`] and [`OriginDimensions`], drawing into
//! the next frame through the current orientation. Nothing reaches the panel
//! until [`Screen::flush`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use epd_ext3::{Builder, Color, Interface, NoPowerPin, Orientation, Panel, Screen};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let panel = Panel::EPD_266_GS_09;
//! let config = match Builder::new()
//!     .panel(panel)
//!     .orientation(Orientation::Landscape)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! let buffer = vec![0u8; panel.buffer_size()];
//! let mut screen = Screen::new(interface, None::<NoPowerPin>, buffer, config);
//! if screen.begin(&mut delay).is_err() {
//!     return;
//! }
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut screen);
//!
//! let _ = Circle::new(Point::new(100, 50), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Grey, 2))
//!     .draw(&mut screen);
//!
//! let _ = Text::new(
//!     "Hello, iTC!",
//!     Point::new(10, 100),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut screen);
//!
//! let _ = screen.flush(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};
use embedded_hal::digital::OutputPin;

use crate::color::Color;
use crate::display::Screen;
use crate::interface::DisplayInterface;
use crate::mode::ModeCheck;

impl<I, P, B, M> DrawTarget for Screen<I, P, B, M>
where
    I: DisplayInterface,
    P: OutputPin,
    B: AsRef<[u8]> + AsMut<[u8]>,
    M: ModeCheck,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
                continue;
            };
            self.set_point(x, y, color);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Screen::clear(self, color);
        Ok(())
    }
}

impl<I, P, B, M> OriginDimensions for Screen<I, P, B, M>
where
    I: DisplayInterface,
    P: OutputPin,
    B: AsRef<[u8]> + AsMut<[u8]>,
    M: ModeCheck,
{
    fn size(&self) -> Size {
        let (width, height) = Screen::size(self);
        Size::new(width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cog::mock::MockInterface;
    use crate::config::{Builder, Orientation, Panel};
    use crate::power::NoPowerPin;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::Drawable;
    use embedded_graphics::primitives::{Primitive, PrimitiveStyle, Rectangle};

    fn test_screen(orientation: Orientation) -> Screen<MockInterface, NoPowerPin, Vec<u8>> {
        let panel = Panel::EPD_213_GS_09;
        let config = Builder::new()
            .panel(panel)
            .orientation(orientation)
            .build()
            .unwrap();
        Screen::new(MockInterface::new(), None, vec![0u8; panel.buffer_size()], config)
    }

    #[test]
    fn test_size_follows_orientation() {
        assert_eq!(
            OriginDimensions::size(&test_screen(Orientation::Rotate0)),
            Size::new(104, 212)
        );
        assert_eq!(
            OriginDimensions::size(&test_screen(Orientation::Rotate90)),
            Size::new(212, 104)
        );
    }

    #[test]
    fn test_draw_rectangle() {
        let mut screen = test_screen(Orientation::Rotate90);
        Rectangle::new(Point::new(10, 10), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut screen)
            .unwrap();

        assert_eq!(screen.get_point(10, 10), Some(Color::Black));
        assert_eq!(screen.get_point(13, 13), Some(Color::Black));
        assert_eq!(screen.get_point(14, 10), Some(Color::White));
    }

    #[test]
    fn test_negative_and_out_of_range_pixels_ignored() {
        let mut screen = test_screen(Orientation::Rotate0);
        let pixels = [
            Pixel(Point::new(-1, 0), Color::Black),
            Pixel(Point::new(0, -1), Color::Black),
            Pixel(Point::new(104, 0), Color::Black),
            Pixel(Point::new(0, 70_000), Color::Black),
        ];
        screen.draw_iter(pixels).unwrap();
        assert!((0..212).all(|y| screen.get_point(0, y) == Some(Color::White)));
    }

    #[test]
    fn test_draw_target_clear() {
        let mut screen = test_screen(Orientation::Rotate0);
        DrawTarget::clear(&mut screen, Color::Black).unwrap();
        assert_eq!(screen.get_point(50, 100), Some(Color::Black));
    }
}
