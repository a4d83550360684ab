//! Frame buffer accessor
//!
//! Wraps caller-provided storage holding two frames: the *next* frame, which
//! drawing code edits, followed by the *old* frame, a copy of what the panel
//! last showed. Each frame is one bit-plane (monochrome) or two (black plane
//! then red plane).

use crate::color::Color;
use crate::config::{Geometry, Orientation, Panel};
use crate::rotation::{logical_size, to_bit_address};

/// Pixel storage for one panel
pub struct FrameBuffer<B> {
    buffer: B,
    geometry: Geometry,
    planes: usize,
    orientation: Orientation,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` for `panel`; the length is checked by [`Self::check_len`]
    pub fn new(buffer: B, panel: &Panel, orientation: Orientation) -> Self {
        let geometry = panel.geometry();
        Self {
            buffer,
            geometry,
            planes: panel.planes(),
            orientation: orientation.resolve(geometry),
        }
    }

    /// Verify the storage holds a next and an old frame
    ///
    /// Returns `(required, provided)` on failure.
    pub fn check_len(&self) -> Result<(), (usize, usize)> {
        let required = self.frame_size() * 2;
        let provided = self.buffer.as_ref().len();
        if provided < required {
            Err((required, provided))
        } else {
            Ok(())
        }
    }

    /// Bytes in one bit-plane
    pub fn page_size(&self) -> usize {
        self.geometry.page_size()
    }

    /// Bytes in one frame
    pub fn frame_size(&self) -> usize {
        self.page_size() * self.planes
    }

    /// Number of bit-planes per frame
    pub fn planes(&self) -> usize {
        self.planes
    }

    /// Current orientation (always resolved)
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Change orientation; contents are left as they are
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation.resolve(self.geometry);
    }

    /// Logical (width, height) for the current orientation
    pub fn size(&self) -> (u16, u16) {
        logical_size(self.geometry, self.orientation)
    }

    /// Set one pixel of the next frame
    ///
    /// Out-of-range coordinates are ignored.
    pub fn set_point(&mut self, x: u16, y: u16, color: Color) {
        let Some(address) = to_bit_address(x, y, self.geometry, self.orientation) else {
            return;
        };
        let page = self.page_size();
        let planes = self.planes;
        let Some(next) = self.buffer.as_mut().get_mut(..page * planes) else {
            return;
        };

        let (black, red) = match color.quantize(planes, x, y) {
            Color::Black => (true, false),
            Color::Red => (false, true),
            _ => (false, false),
        };

        write_bit(&mut next[address.index], address.mask, black);
        if planes > 1 {
            write_bit(&mut next[page + address.index], address.mask, red);
        }
    }

    /// Read one pixel of the next frame
    ///
    /// `None` for out-of-range coordinates.
    pub fn get_point(&self, x: u16, y: u16) -> Option<Color> {
        let address = to_bit_address(x, y, self.geometry, self.orientation)?;
        let page = self.page_size();
        let next = self.buffer.as_ref().get(..self.frame_size())?;

        if self.planes > 1 && next[page + address.index] & address.mask != 0 {
            return Some(Color::Red);
        }
        if next[address.index] & address.mask != 0 {
            Some(Color::Black)
        } else {
            Some(Color::White)
        }
    }

    /// Fill the next frame with one colour
    pub fn clear(&mut self, color: Color) {
        if color.is_basic() {
            let color = color.quantize(self.planes, 0, 0);
            let page = self.page_size();
            let frame = self.frame_size();
            if let Some(next) = self.buffer.as_mut().get_mut(..frame) {
                let (black, red) = next.split_at_mut(page);
                black.fill(color.black_byte());
                red.fill(color.red_byte());
            }
            return;
        }

        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                self.set_point(x, y, color);
            }
        }
    }

    /// Fill the old frame with one basic colour
    pub fn fill_old(&mut self, color: Color) {
        let color = color.quantize(self.planes, 0, 0);
        let page = self.page_size();
        let frame = self.frame_size();
        if let Some(old) = self.buffer.as_mut().get_mut(frame..frame * 2) {
            let (black, red) = old.split_at_mut(page);
            black.fill(color.black_byte());
            red.fill(color.red_byte());
        }
    }

    /// Copy the next frame into the old frame
    pub fn commit(&mut self) {
        let frame = self.frame_size();
        if let Some(both) = self.buffer.as_mut().get_mut(..frame * 2) {
            let (next, old) = both.split_at_mut(frame);
            old.copy_from_slice(next);
        }
    }

    /// Black and red planes of the next frame
    ///
    /// The red plane is `None` on monochrome panels.
    pub fn next_planes(&self) -> (&[u8], Option<&[u8]>) {
        let page = self.page_size();
        let next = &self.buffer.as_ref()[..self.frame_size()];
        let (black, red) = next.split_at(page);
        (black, (self.planes > 1).then_some(red))
    }

    /// The old frame
    pub fn old(&self) -> &[u8] {
        let frame = self.frame_size();
        &self.buffer.as_ref()[frame..frame * 2]
    }
}

fn write_bit(byte: &mut u8, mask: u8, set: bool) {
    if set {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
