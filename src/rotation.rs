//! Coordinate orientation utilities
//!
//! Maps logical (x, y) coordinates, as seen by drawing code, onto the panel's
//! canonical (column, row) grid and from there onto a byte index and bit mask
//! within one bit-plane of the frame buffer.
//!
//! Bit-planes store 8 horizontal pixels per byte, most significant bit first,
//! row after row, `sources / 8` bytes per row.
//!
//! ## Orientations
//!
//! - **Rotate0**: native, logical size `sources x gates`
//! - **Rotate90**: 90° clockwise, logical size `gates x sources`
//! - **Rotate180**: origin at the native bottom-right
//! - **Rotate270**: 270° clockwise
//! - **MirrorX** / **MirrorY**: native size, flipped along one axis
//!
//! ## Example
//!
//! ```
//! use epd_ext3::rotation::to_bit_address;
//! use epd_ext3::{Geometry, Orientation};
//!
//! let geometry = Geometry { sources: 16, gates: 4 };
//!
//! let address = to_bit_address(9, 1, geometry, Orientation::Rotate0);
//! assert_eq!(address.map(|a| (a.index, a.mask)), Some((3, 0x40)));
//!
//! // Outside the panel
//! assert!(to_bit_address(16, 0, geometry, Orientation::Rotate0).is_none());
//! ```

use crate::config::{Geometry, Orientation};

/// Location of one pixel within a bit-plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitAddress {
    /// Byte index into the bit-plane
    pub index: usize,
    /// Bit mask within the byte (0x80 for the leftmost pixel)
    pub mask: u8,
}

/// Logical width and height for an orientation
pub fn logical_size(geometry: Geometry, orientation: Orientation) -> (u16, u16) {
    if orientation.resolve(geometry).is_transposed() {
        (geometry.gates, geometry.sources)
    } else {
        (geometry.sources, geometry.gates)
    }
}

/// Check and orient logical coordinates
///
/// Returns the canonical (column, row), or `None` when (x, y) lies outside
/// the logical screen for this orientation.
pub fn orient_coordinates(
    x: u16,
    y: u16,
    geometry: Geometry,
    orientation: Orientation,
) -> Option<(u16, u16)> {
    let (width, height) = logical_size(geometry, orientation);
    if x >= width || y >= height {
        return None;
    }

    let last_column = geometry.sources - 1;
    let last_row = geometry.gates - 1;

    let canonical = match orientation.resolve(geometry) {
        Orientation::Rotate0 => (x, y),
        Orientation::Rotate90 => (last_column - y, x),
        Orientation::Rotate180 => (last_column - x, last_row - y),
        Orientation::Rotate270 => (y, last_row - x),
        Orientation::MirrorX => (last_column - x, y),
        Orientation::MirrorY => (x, last_row - y),
        // resolve() never yields the auto-selection variants
        Orientation::Portrait | Orientation::Landscape => (x, y),
    };
    Some(canonical)
}

/// Convert logical coordinates into a bit address
///
/// `None` when the coordinates are outside the logical screen.
pub fn to_bit_address(
    x: u16,
    y: u16,
    geometry: Geometry,
    orientation: Orientation,
) -> Option<BitAddress> {
    let (column, row) = orient_coordinates(x, y, geometry, orientation)?;
    Some(BitAddress {
        index: row as usize * geometry.row_bytes() + column as usize / 8,
        mask: 0x80 >> (column % 8),
    })
}

/// Convert a bit address back into logical coordinates
///
/// Inverse of [`to_bit_address`]. `None` when the address lies outside the
/// bit-plane or the mask is not a single bit.
pub fn from_bit_address(
    address: BitAddress,
    geometry: Geometry,
    orientation: Orientation,
) -> Option<(u16, u16)> {
    if address.index >= geometry.page_size() || address.mask.count_ones() != 1 {
        return None;
    }

    let row = (address.index / geometry.row_bytes()) as u16;
    let column = ((address.index % geometry.row_bytes()) * 8) as u16
        + address.mask.leading_zeros() as u16;

    let last_column = geometry.sources - 1;
    let last_row = geometry.gates - 1;

    let logical = match orientation.resolve(geometry) {
        Orientation::Rotate0 => (column, row),
        Orientation::Rotate90 => (row, last_column - column),
        Orientation::Rotate180 => (last_column - column, last_row - row),
        Orientation::Rotate270 => (last_row - row, column),
        Orientation::MirrorX => (last_column - column, row),
        Orientation::MirrorY => (column, last_row - row),
        Orientation::Portrait | Orientation::Landscape => (column, row),
    };
    Some(logical)
}
