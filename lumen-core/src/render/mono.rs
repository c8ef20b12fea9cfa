//! Monochrome pixel packing
//!
//! Panels pack eight pixels per byte, either along a row or down a column
//! (vertical tiling, the page layout of most OLED controllers). The runtime
//! works on whole bytes, so redraw areas are widened to byte boundaries on
//! the packed axis and single pixels are written through `set_px`.

use lumen_hal::{PixelFormat, ScreenInfo};

use super::Area;

/// Bit layout of a 1 bit per pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonoLayout {
    /// A byte covers 8 vertically stacked pixels
    pub vtiled: bool,
    /// The first pixel of a byte is its most significant bit
    pub msb_first: bool,
    /// A set bit is black (MONO10) rather than white (MONO01)
    pub inverted: bool,
}

impl MonoLayout {
    /// Layout for a display format, `None` for colour formats
    pub fn for_format(format: PixelFormat, info: ScreenInfo) -> Option<Self> {
        let inverted = match format {
            PixelFormat::Mono01 => false,
            PixelFormat::Mono10 => true,
            _ => return None,
        };

        Some(Self {
            vtiled: info.mono_vtiled,
            msb_first: info.mono_msb_first,
            inverted,
        })
    }

    /// Widen `area` to whole bytes on the packed axis
    pub fn round(&self, area: &mut Area) {
        if self.vtiled {
            area.y1 &= !0x7;
            area.y2 |= 0x7;
        } else {
            area.x1 &= !0x7;
            area.x2 |= 0x7;
        }
    }

    /// Write one pixel into `buf`, a buffer `buf_w` pixels wide
    ///
    /// `white` is the runtime's colour for the pixel. Pixels outside the
    /// buffer are ignored.
    pub fn set_px(&self, buf: &mut [u8], buf_w: u16, x: u16, y: u16, white: bool) {
        let (index, bit) = self.locate(buf_w, x, y);
        let Some(byte) = buf.get_mut(index) else {
            return;
        };

        let mask = 1u8 << bit;
        if white != self.inverted {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    fn locate(&self, buf_w: u16, x: u16, y: u16) -> (usize, u8) {
        let (x, y, w) = (usize::from(x), usize::from(y), usize::from(buf_w));

        let (index, offset) = if self.vtiled {
            (x + (y / 8) * w, y % 8)
        } else {
            (x / 8 + y * w / 8, x % 8)
        };

        let bit = if self.msb_first { 7 - offset } else { offset };
        (index, bit as u8)
    }
}
