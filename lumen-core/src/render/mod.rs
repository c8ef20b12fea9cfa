//! Render callbacks
//!
//! The runtime draws into the draw buffer in its own color layout. These
//! callbacks turn a finished area into the layout the display expects and
//! push it out.

mod binding;
mod mono;

pub use binding::RenderBinding;
pub use mono::MonoLayout;

use lumen_hal::DisplayError;

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    /// Create an area from its corners
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels, zero for an empty area
    pub fn width(&self) -> u32 {
        span(self.x1, self.x2)
    }

    /// Height in pixels, zero for an empty area
    pub fn height(&self) -> u32 {
        span(self.y1, self.y2)
    }

    /// Origin and size in display units
    ///
    /// Fails for areas starting left of or above the panel or too large to
    /// describe.
    pub(crate) fn to_display(self) -> Result<(u16, u16, u16, u16), DisplayError> {
        let x = u16::try_from(self.x1).map_err(|_| DisplayError::InvalidCoordinates)?;
        let y = u16::try_from(self.y1).map_err(|_| DisplayError::InvalidCoordinates)?;
        let w = u16::try_from(self.width()).map_err(|_| DisplayError::InvalidCoordinates)?;
        let h = u16::try_from(self.height()).map_err(|_| DisplayError::InvalidCoordinates)?;
        Ok((x, y, w, h))
    }
}

/// Inclusive length of `start..=end`, saturating at `u32::MAX`
fn span(start: i32, end: i32) -> u32 {
    let len = i64::from(end) - i64::from(start) + 1;
    u32::try_from(len.max(0)).unwrap_or(u32::MAX)
}
