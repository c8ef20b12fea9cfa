//! Render binding selection and flush

use lumen_hal::{DisplayDevice, DisplayError, PixelFormat, ScreenInfo, WriteDescriptor};

use super::mono::MonoLayout;
use super::Area;
use crate::runtime::ColorDepth;

/// Render callbacks bound to a display
///
/// Chosen once during initialization from the display's pixel format and
/// the runtime's color depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderBinding {
    /// 32 bit runtime colour written as is
    Argb8888,
    /// 32 bit runtime colour packed down to 24 bits before writing
    Rgb888,
    /// 16 bit runtime colour written as is
    Rgb565,
    /// 1 bit runtime colour drawn pixel by pixel into packed bytes
    Mono(MonoLayout),
}

impl RenderBinding {
    /// Pick the callbacks for a display format and runtime color depth
    ///
    /// Returns `None` when the pair has no callbacks.
    pub fn select(format: PixelFormat, depth: ColorDepth, info: ScreenInfo) -> Option<Self> {
        match (format, depth) {
            (PixelFormat::Argb8888, ColorDepth::Bits32) => Some(RenderBinding::Argb8888),
            (PixelFormat::Rgb888, ColorDepth::Bits32) => Some(RenderBinding::Rgb888),
            (PixelFormat::Rgb565, ColorDepth::Bits16) => Some(RenderBinding::Rgb565),
            (PixelFormat::Mono01 | PixelFormat::Mono10, ColorDepth::Bits1) => {
                MonoLayout::for_format(format, info).map(RenderBinding::Mono)
            }
            _ => None,
        }
    }

    /// Bytes written to the display for `pixels` pixels
    pub fn bytes_for(&self, pixels: usize) -> usize {
        match self {
            RenderBinding::Argb8888 => pixels.saturating_mul(4),
            RenderBinding::Rgb888 => pixels.saturating_mul(3),
            RenderBinding::Rgb565 => pixels.saturating_mul(2),
            RenderBinding::Mono(_) => pixels.div_ceil(8),
        }
    }

    /// Returns true when the runtime must draw through [`Self::set_px`]
    pub fn uses_set_px(&self) -> bool {
        matches!(self, RenderBinding::Mono(_))
    }

    /// Push a rendered area to the display
    ///
    /// `pixels` holds the area in the runtime's layout. For RGB888 it is
    /// repacked in place, so its contents are undefined afterwards.
    pub fn flush<D: DisplayDevice + ?Sized>(
        &self,
        display: &mut D,
        area: &Area,
        pixels: &mut [u8],
    ) -> Result<(), DisplayError> {
        let (x, y, width, height) = area.to_display()?;
        let count = usize::from(width) * usize::from(height);
        let buf_size = self.bytes_for(count);

        if let RenderBinding::Rgb888 = self {
            let src = pixels
                .get_mut(..count.saturating_mul(4))
                .ok_or(DisplayError::InvalidBuffer)?;
            pack_rgb888(src);
        }

        let data = pixels.get(..buf_size).ok_or(DisplayError::InvalidBuffer)?;
        let desc = WriteDescriptor {
            buf_size,
            width,
            height,
            pitch: width,
        };

        display.write(x, y, &desc, data)
    }

    /// Widen a redraw area to what the display can address
    ///
    /// Only monochrome layouts are rounded.
    pub fn rounder(&self, area: &mut Area) {
        if let RenderBinding::Mono(layout) = self {
            layout.round(area);
        }
    }

    /// Draw a single pixel into a monochrome buffer
    ///
    /// No-op for colour bindings, where the runtime writes pixels itself.
    pub fn set_px(&self, buf: &mut [u8], buf_w: u16, x: u16, y: u16, white: bool) {
        if let RenderBinding::Mono(layout) = self {
            layout.set_px(buf, buf_w, x, y, white);
        }
    }
}

/// Repack 32 bit pixels (B, G, R, A in memory) into 24 bit R, G, B
fn pack_rgb888(buf: &mut [u8]) {
    let count = buf.len() / 4;

    // Each destination pixel ends before the next source pixel starts
    for i in 0..count {
        let src = i * 4;
        let (b, g, r) = (buf[src], buf[src + 1], buf[src + 2]);
        let dst = i * 3;
        buf[dst] = r;
        buf[dst + 1] = g;
        buf[dst + 2] = b;
    }
}
