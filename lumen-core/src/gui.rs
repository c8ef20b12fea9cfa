//! GUI context
//!
//! Everything the runtime calls back into after initialization: the
//! display, the bound render callbacks and the optional pointer input.

use lumen_hal::{DisplayDevice, DisplayError, ScanDevice};

use crate::buffer::Resolution;
use crate::input::{CoordinateMapper, MapperFlags, PointerSample, SampleSource};
use crate::render::{Area, RenderBinding};

/// Pointer input attached to a [`Gui`]
pub struct PointerInput<'q, S> {
    device: S,
    source: &'q dyn SampleSource,
    mapper: CoordinateMapper,
}

impl<'q, S> PointerInput<'q, S> {
    /// Pair a configured scan device with the queue it feeds
    pub fn new(device: S, source: &'q dyn SampleSource, flags: MapperFlags) -> Self {
        Self {
            device,
            source,
            mapper: CoordinateMapper::new(flags),
        }
    }

    /// The scan device
    pub fn device(&self) -> &S {
        &self.device
    }
}

/// Initialized display and input glue
pub struct Gui<'q, D, S> {
    display: D,
    render: RenderBinding,
    resolution: Resolution,
    pointer: Option<PointerInput<'q, S>>,
}

impl<'q, D: DisplayDevice, S> Gui<'q, D, S> {
    /// Display-only context
    pub fn new(display: D, render: RenderBinding, resolution: Resolution) -> Self {
        Self {
            display,
            render,
            resolution,
            pointer: None,
        }
    }

    pub(crate) fn attach_pointer(&mut self, pointer: PointerInput<'q, S>) {
        self.pointer = Some(pointer);
    }

    /// Flush callback
    ///
    /// Writes `pixels`, the rendered contents of `area`, to the display.
    pub fn flush(&mut self, area: &Area, pixels: &mut [u8]) -> Result<(), DisplayError> {
        self.render
            .flush(&mut self.display, area, pixels)
            .inspect_err(|e| error!("Display write failed: {:?}", e))
    }

    /// Rounder callback
    pub fn rounder(&self, area: &mut Area) {
        self.render.rounder(area);
    }

    /// Set-pixel callback for monochrome displays
    pub fn set_px(&self, buf: &mut [u8], buf_w: u16, x: u16, y: u16, white: bool) {
        self.render.set_px(buf, buf_w, x, y, white);
    }

    /// Pointer read callback
    ///
    /// Without pointer input this is always (0, 0) released.
    pub fn read_pointer(&mut self) -> PointerSample {
        match &mut self.pointer {
            Some(pointer) => pointer.mapper.poll(pointer.source, &self.display),
            None => PointerSample::default(),
        }
    }

    /// Negotiated resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Bound render callbacks
    pub fn render_binding(&self) -> RenderBinding {
        self.render
    }

    /// Returns true when pointer input was set up
    pub fn has_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    /// Pointer input, if set up
    pub fn pointer(&self) -> Option<&PointerInput<'q, S>> {
        self.pointer.as_ref()
    }

    /// Bound display device
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Bound display device, for board code that drives it directly
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

impl<'q, D: DisplayDevice, S: ScanDevice<'q>> Gui<'q, D, S> {
    /// Stop pointer sampling and detach the pointer input
    ///
    /// The draw buffer belongs to the runtime and is released with it.
    pub fn detach_pointer(&mut self) -> Option<S> {
        let mut pointer = self.pointer.take()?;
        if let Err(e) = pointer.device.disable_callback() {
            warn!("Failed to disable scan callback: {:?}", e);
        }
        Some(pointer.device)
    }
}
