//! Scan-to-display coordinate mapping
//!
//! Scan devices report coordinates in a fixed physical frame. The swap and
//! invert flags correct wiring quirks in that physical frame; rotation then
//! moves the point into the display's current logical frame. The order of
//! the steps is significant whenever the display is rotated.

use lumen_hal::{DisplayCapabilities, DisplayDevice, Orientation, RawInputSample};

use super::queue::SampleSource;
use crate::config::PointerConfig;

/// Pointer contact state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
    Pressed,
    #[default]
    Released,
}

/// Pointer position in display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
    pub state: PointerState,
}

impl PointerSample {
    /// Create a sample
    pub const fn new(x: i32, y: i32, state: PointerState) -> Self {
        Self { x, y, state }
    }

    /// Returns true while in contact
    pub fn is_pressed(&self) -> bool {
        self.state == PointerState::Pressed
    }
}

/// Physical-frame corrections for a scan device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MapperFlags {
    /// Exchange X and Y
    pub swap_xy: bool,
    /// Mirror X
    pub invert_x: bool,
    /// Mirror Y
    pub invert_y: bool,
}

impl From<&PointerConfig> for MapperFlags {
    fn from(config: &PointerConfig) -> Self {
        Self {
            swap_xy: config.swap_xy,
            invert_x: config.invert_x,
            invert_y: config.invert_y,
        }
    }
}

/// Map a raw scan sample into display coordinates
///
/// Steps, in order: axis swap, invert X, invert Y, rotation.
pub fn transform(
    raw: RawInputSample,
    flags: MapperFlags,
    caps: &DisplayCapabilities,
) -> PointerSample {
    let x_res = i32::from(caps.x_resolution);
    let y_res = i32::from(caps.y_resolution);
    let quarter_turn = caps.current_orientation.is_quarter_turn();

    // Out-of-range scan values saturate instead of wrapping negative
    let mut x = i32::try_from(raw.col).unwrap_or(i32::MAX);
    let mut y = i32::try_from(raw.row).unwrap_or(i32::MAX);

    if flags.swap_xy {
        core::mem::swap(&mut x, &mut y);
    }

    // The physical axes trade places with the logical ones on quarter turns
    if flags.invert_x {
        let limit = if quarter_turn { y_res } else { x_res };
        x = limit.saturating_sub(x);
    }

    if flags.invert_y {
        let limit = if quarter_turn { x_res } else { y_res };
        y = limit.saturating_sub(y);
    }

    let (x, y) = match caps.current_orientation {
        Orientation::Normal => (x, y),
        Orientation::Rotated90 => (y, y_res.saturating_sub(x)),
        Orientation::Rotated180 => (x_res.saturating_sub(x), y_res.saturating_sub(y)),
        Orientation::Rotated270 => (x_res.saturating_sub(y), x),
    };

    let state = if raw.pressed {
        PointerState::Pressed
    } else {
        PointerState::Released
    };

    PointerSample { x, y, state }
}

/// Level-triggered pointer mapper
///
/// Holds the last mapped sample and repeats it while no new raw sample is
/// available, so the runtime reads a stable pointer every frame.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    flags: MapperFlags,
    last: PointerSample,
}

impl CoordinateMapper {
    /// Create a mapper; the initial sample is (0, 0) released
    pub fn new(flags: MapperFlags) -> Self {
        Self {
            flags,
            last: PointerSample::default(),
        }
    }

    /// Configured corrections
    pub fn flags(&self) -> MapperFlags {
        self.flags
    }

    /// Last emitted sample
    pub fn last(&self) -> PointerSample {
        self.last
    }

    /// Read the pointer for this frame
    ///
    /// Takes at most one raw sample from `source`. Display capabilities are
    /// queried for every new sample since the orientation can change at
    /// runtime.
    pub fn poll<D: DisplayDevice + ?Sized>(
        &mut self,
        source: &dyn SampleSource,
        display: &D,
    ) -> PointerSample {
        if let Some(raw) = source.poll_sample() {
            let caps = display.capabilities();
            self.last = transform(raw, self.flags, &caps);
            trace!("Pointer at ({}, {})", self.last.x, self.last.y);
        }

        self.last
    }
}
