//! Display device abstraction
//!
//! Capability query and raw pixel writes. Implementations push pixels to
//! the panel; everything about buffer sizing and pixel packing lives in the
//! glue on top.

/// Pixel formats a display can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 32 bits per pixel, alpha in the top byte
    Argb8888,
    /// 24 bits per pixel
    Rgb888,
    /// 16 bits per pixel, red in the top bits
    Rgb565,
    /// 16 bits per pixel, blue in the top bits
    Bgr565,
    /// 1 bit per pixel, 0 = black, 1 = white
    Mono01,
    /// 1 bit per pixel, 1 = black, 0 = white
    Mono10,
}

impl PixelFormat {
    /// Returns true for the 1 bit per pixel formats
    pub fn is_mono(self) -> bool {
        matches!(self, PixelFormat::Mono01 | PixelFormat::Mono10)
    }
}

/// Current display orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    #[default]
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
}

impl Orientation {
    /// Returns true when the logical axes are swapped relative to the panel
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Orientation::Rotated90 | Orientation::Rotated270)
    }
}

/// Memory layout hints for monochrome panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenInfo {
    /// One byte covers 8 vertically stacked pixels (page layout)
    pub mono_vtiled: bool,
    /// Most significant bit is the first pixel of a byte
    pub mono_msb_first: bool,
}

/// Snapshot of what the display reports about itself
///
/// Orientation can change at runtime, so callers query again instead of
/// holding on to an old snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayCapabilities {
    /// Horizontal resolution in pixels
    pub x_resolution: u16,
    /// Vertical resolution in pixels
    pub y_resolution: u16,
    /// Pixel format currently in use
    pub pixel_format: PixelFormat,
    /// Orientation currently in use
    pub current_orientation: Orientation,
    /// Layout hints for monochrome formats
    pub screen_info: ScreenInfo,
}

/// Describes the pixel data passed to [`DisplayDevice::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteDescriptor {
    /// Number of bytes of pixel data
    pub buf_size: usize,
    /// Width of the written area in pixels
    pub width: u16,
    /// Height of the written area in pixels
    pub height: u16,
    /// Pixels between the starts of consecutive rows
    pub pitch: u16,
}

/// Display device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Area lies outside the panel
    InvalidCoordinates,
    /// Pixel data is shorter than the descriptor claims
    InvalidBuffer,
    /// Operation not supported by this panel
    Unsupported,
}

/// Display device trait
///
/// Provides a hardware-agnostic interface for pushing rendered pixels to a
/// panel.
pub trait DisplayDevice {
    /// Query the current capabilities
    fn capabilities(&self) -> DisplayCapabilities;

    /// Write a block of pixels with its top-left corner at (`x`, `y`)
    ///
    /// `buf` is laid out in the display's current pixel format.
    fn write(
        &mut self,
        x: u16,
        y: u16,
        desc: &WriteDescriptor,
        buf: &[u8],
    ) -> Result<(), DisplayError>;

    /// Change the panel orientation
    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        let _ = orientation;
        Err(DisplayError::Unsupported)
    }
}

impl<T: DisplayDevice + ?Sized> DisplayDevice for &mut T {
    fn capabilities(&self) -> DisplayCapabilities {
        (**self).capabilities()
    }

    fn write(
        &mut self,
        x: u16,
        y: u16,
        desc: &WriteDescriptor,
        buf: &[u8],
    ) -> Result<(), DisplayError> {
        (**self).write(x, y, desc, buf)
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        (**self).set_orientation(orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_turns() {
        assert!(!Orientation::Normal.is_quarter_turn());
        assert!(Orientation::Rotated90.is_quarter_turn());
        assert!(!Orientation::Rotated180.is_quarter_turn());
        assert!(Orientation::Rotated270.is_quarter_turn());
    }

    #[test]
    fn test_mono_formats() {
        assert!(PixelFormat::Mono01.is_mono());
        assert!(PixelFormat::Mono10.is_mono());
        assert!(!PixelFormat::Rgb565.is_mono());
        assert!(!PixelFormat::Argb8888.is_mono());
    }
}
