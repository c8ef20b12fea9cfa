//! Minimal graphics runtime
//!
//! Stands in for a full retained-mode GUI library on boards that only need
//! a status screen. It keeps the registered display driver, redraws the
//! screen when the pointer changes and renders through the callbacks bound
//! during initialization.

use alloc::boxed::Box;

use defmt::*;
use lumen_core::error::RegistrationError;
use lumen_core::runtime::runtime_log_enabled;
use lumen_core::{
    Area, ColorDepth, DisplayDriver, GraphicsRuntime, Gui, InputDriver, LogLevel, LogSink,
    PointerSample,
};
use lumen_hal::DisplayDevice;

/// Crosshair arm length in pixels
const CROSSHAIR: u32 = 4;

pub struct DemoRuntime {
    depth: ColorDepth,
    log: Option<(LogSink, LogLevel)>,
    display: Option<DisplayDriver<Box<[u8]>>>,
    pointer_registered: bool,
    last: Option<PointerSample>,
}

impl DemoRuntime {
    pub fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            log: None,
            display: None,
            pointer_registered: false,
            last: None,
        }
    }

    fn log(&self, line: &str) {
        if let Some((sink, level)) = self.log {
            if runtime_log_enabled(line, level) {
                sink(line);
            }
        }
    }

    /// Poll input and redraw the screen if anything changed
    pub fn refresh<D: DisplayDevice, S>(&mut self, gui: &mut Gui<'_, D, S>) {
        let sample = gui.read_pointer();
        if self.last == Some(sample) {
            return;
        }
        self.last = Some(sample);

        let depth = self.depth;
        let Some(driver) = self.display.as_mut() else {
            return;
        };

        let (hor_res, ver_res) = (i32::from(driver.hor_res), i32::from(driver.ver_res));
        let rows = stripe_rows(driver.draw_buf.pixel_capacity(), driver.hor_res, depth);
        if rows == 0 {
            error!("Draw buffer smaller than one stripe");
            return;
        }

        let buf = driver.draw_buf.buf_a();
        let mut y = 0;

        while y < ver_res {
            let mut area = Area::new(0, y, hor_res - 1, y.saturating_add(rows - 1).min(ver_res - 1));
            gui.rounder(&mut area);

            let len = render_stripe(gui, buf, &area, depth, &sample, hor_res, ver_res);
            if gui.flush(&area, &mut buf[..len]).is_err() {
                return;
            }

            y = area.y2 + 1;
        }

        trace!("Screen redrawn for {}", sample);
    }
}

impl GraphicsRuntime<Box<[u8]>> for DemoRuntime {
    fn init(&mut self) {
        self.display = None;
        self.pointer_registered = false;
        self.last = None;
    }

    fn set_log_sink(&mut self, sink: LogSink, level: LogLevel) {
        self.log = Some((sink, level));
    }

    fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    fn register_display(
        &mut self,
        driver: DisplayDriver<Box<[u8]>>,
    ) -> Result<(), RegistrationError> {
        if self.display.is_some() {
            self.log("[Error] display already registered");
            return Err(RegistrationError);
        }

        self.display = Some(driver);
        self.log("[Info] display registered");
        Ok(())
    }

    fn register_input(&mut self, _driver: InputDriver) -> Result<(), RegistrationError> {
        if self.pointer_registered {
            self.log("[Error] pointer already registered");
            return Err(RegistrationError);
        }

        self.pointer_registered = true;
        self.log("[Info] pointer registered");
        Ok(())
    }
}

/// Rows per flush that fit in the draw buffer
///
/// Monochrome stripes are whole pages so the rounder never grows them past
/// the buffer.
fn stripe_rows(pixel_capacity: u32, hor_res: u16, depth: ColorDepth) -> i32 {
    let rows = pixel_capacity / u32::from(hor_res.max(1));
    let rows = match depth {
        ColorDepth::Bits1 => rows & !7,
        _ => rows,
    };
    i32::try_from(rows).unwrap_or(i32::MAX)
}

/// Render one stripe into `buf`, returning the bytes used
fn render_stripe<D: DisplayDevice, S>(
    gui: &Gui<'_, D, S>,
    buf: &mut [u8],
    area: &Area,
    depth: ColorDepth,
    pointer: &PointerSample,
    hor_res: i32,
    ver_res: i32,
) -> usize {
    let width = area.width() as usize;
    let height = area.height() as usize;
    let pixels = width * height;

    if gui.render_binding().uses_set_px() {
        let len = gui.render_binding().bytes_for(pixels).min(buf.len());
        buf[..len].fill(0);

        for row in 0..height as u16 {
            for col in 0..width as u16 {
                let x = area.x1 + i32::from(col);
                let y = area.y1 + i32::from(row);
                let lit = is_lit(x, y, pointer, hor_res, ver_res);
                gui.set_px(&mut buf[..len], width as u16, col, row, lit);
            }
        }
        return len;
    }

    let bytes_per_px = usize::from(depth.bits() / 8);
    let len = (pixels * bytes_per_px).min(buf.len());

    for (i, px) in buf[..len].chunks_exact_mut(bytes_per_px).enumerate() {
        let x = area.x1 + (i % width) as i32;
        let y = area.y1 + (i / width) as i32;
        px.fill(if is_lit(x, y, pointer, hor_res, ver_res) { 0xFF } else { 0x00 });
    }
    len
}

/// Screen border, plus a crosshair while the pointer is pressed
fn is_lit(x: i32, y: i32, pointer: &PointerSample, hor_res: i32, ver_res: i32) -> bool {
    let border = x == 0 || y == 0 || x == hor_res - 1 || y == ver_res - 1;

    let crosshair = pointer.is_pressed()
        && ((x == pointer.x && y.abs_diff(pointer.y) <= CROSSHAIR)
            || (y == pointer.y && x.abs_diff(pointer.x) <= CROSSHAIR));

    border || crosshair
}
