//! Test doubles for the collaborator traits

use std::cell::Cell;
use std::rc::Rc;

use lumen_hal::{
    DisplayCapabilities, DisplayDevice, DisplayError, Orientation, PixelFormat, RawInputSample,
    ScanCallback, ScanDevice, ScanError, ScreenInfo, WriteDescriptor,
};

use crate::buffer::BufferPool;
use crate::error::RegistrationError;
use crate::config::LogLevel;
use crate::runtime::{
    runtime_log_enabled, ColorDepth, DisplayDriver, GraphicsRuntime, InputDriver, LogSink,
};

pub fn caps(x: u16, y: u16, format: PixelFormat) -> DisplayCapabilities {
    caps_oriented(x, y, format, Orientation::Normal)
}

pub fn caps_oriented(
    x: u16,
    y: u16,
    format: PixelFormat,
    orientation: Orientation,
) -> DisplayCapabilities {
    DisplayCapabilities {
        x_resolution: x,
        y_resolution: y,
        pixel_format: format,
        current_orientation: orientation,
        screen_info: ScreenInfo::default(),
    }
}

/// Zeroed region living for the rest of the test binary
pub fn leak(len: usize) -> &'static mut [u8] {
    Box::leak(vec![0u8; len].into_boxed_slice())
}

/// Pool that counts allocations and live buffers
pub struct CountingPool {
    allocations: Cell<usize>,
    live: Rc<Cell<usize>>,
    fail_after: Option<usize>,
}

impl CountingPool {
    pub fn new() -> Self {
        Self {
            allocations: Cell::new(0),
            live: Rc::new(Cell::new(0)),
            fail_after: None,
        }
    }

    /// Pool that refuses every request after `n` successful ones
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn live(&self) -> usize {
        self.live.get()
    }
}

impl BufferPool for CountingPool {
    type Buffer = TrackedBuffer;

    fn allocate(&self, len: usize) -> Option<TrackedBuffer> {
        if self.fail_after.is_some_and(|n| self.allocations.get() >= n) {
            return None;
        }

        self.allocations.set(self.allocations.get() + 1);
        self.live.set(self.live.get() + 1);

        Some(TrackedBuffer {
            data: vec![0; len],
            live: self.live.clone(),
        })
    }
}

pub struct TrackedBuffer {
    data: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl AsRef<[u8]> for TrackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for TrackedBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

pub type RecordedWrite = (u16, u16, WriteDescriptor, Vec<u8>);

/// Display recording every write
pub struct MockDisplay {
    caps: Cell<DisplayCapabilities>,
    queries: Cell<usize>,
    writes: Vec<RecordedWrite>,
}

impl MockDisplay {
    pub fn new(caps: DisplayCapabilities) -> Self {
        Self {
            caps: Cell::new(caps),
            queries: Cell::new(0),
            writes: Vec::new(),
        }
    }

    /// Change what the display reports, as a rotation would
    pub fn set_caps(&self, caps: DisplayCapabilities) {
        self.caps.set(caps);
    }

    pub fn capability_queries(&self) -> usize {
        self.queries.get()
    }

    pub fn writes(&self) -> &[RecordedWrite] {
        &self.writes
    }
}

impl DisplayDevice for MockDisplay {
    fn capabilities(&self) -> DisplayCapabilities {
        self.queries.set(self.queries.get() + 1);
        self.caps.get()
    }

    fn write(
        &mut self,
        x: u16,
        y: u16,
        desc: &WriteDescriptor,
        buf: &[u8],
    ) -> Result<(), DisplayError> {
        self.writes.push((x, y, *desc, buf.to_vec()));
        Ok(())
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        let mut caps = self.caps.get();
        caps.current_orientation = orientation;
        self.caps.set(caps);
        Ok(())
    }
}

/// Runtime keeping whatever is registered with it
pub struct MockRuntime<B> {
    depth: ColorDepth,
    init_calls: usize,
    log_sinks: usize,
    log: Option<(LogSink, LogLevel)>,
    sink_before_init: bool,
    displays: Vec<DisplayDriver<B>>,
    inputs: Vec<InputDriver>,
    fail_display: bool,
    fail_input: bool,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> MockRuntime<B> {
    pub fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            init_calls: 0,
            log_sinks: 0,
            log: None,
            sink_before_init: false,
            displays: Vec::new(),
            inputs: Vec::new(),
            fail_display: false,
            fail_input: false,
        }
    }

    pub fn failing_display(mut self) -> Self {
        self.fail_display = true;
        self
    }

    pub fn failing_input(mut self) -> Self {
        self.fail_input = true;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    pub fn log_sinks(&self) -> usize {
        self.log_sinks
    }

    /// Level the log sink was registered with
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log.map(|(_, level)| level)
    }

    /// Returns true when the sink was registered before `init`
    pub fn sink_before_init(&self) -> bool {
        self.sink_before_init
    }

    /// Emit a runtime log line, returning true if it reached the sink
    pub fn emit(&self, line: &str) -> bool {
        match self.log {
            Some((sink, level)) if runtime_log_enabled(line, level) => {
                sink(line);
                true
            }
            _ => false,
        }
    }

    pub fn displays(&self) -> usize {
        self.displays.len()
    }

    pub fn inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn last_draw_buffer_len(&self) -> Option<usize> {
        self.displays.last().map(|d| d.draw_buf.byte_len())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> GraphicsRuntime<B> for MockRuntime<B> {
    fn init(&mut self) {
        self.init_calls += 1;
    }

    fn set_log_sink(&mut self, sink: LogSink, level: LogLevel) {
        self.log_sinks += 1;
        self.sink_before_init = self.init_calls == 0;
        self.log = Some((sink, level));
        self.emit("[Warn] log sink registered");
    }

    fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    fn register_display(&mut self, driver: DisplayDriver<B>) -> Result<(), RegistrationError> {
        if self.fail_display {
            return Err(RegistrationError);
        }
        self.displays.push(driver);
        Ok(())
    }

    fn register_input(&mut self, driver: InputDriver) -> Result<(), RegistrationError> {
        if self.fail_input {
            return Err(RegistrationError);
        }
        self.inputs.push(driver);
        Ok(())
    }
}

/// Scan device driven by the test through [`MockScan::emit`]
pub struct MockScan<'a> {
    callback: Option<&'a (dyn ScanCallback + Sync)>,
    enabled: bool,
    fail_configure: bool,
}

impl<'a> MockScan<'a> {
    pub fn new() -> Self {
        Self {
            callback: None,
            enabled: false,
            fail_configure: false,
        }
    }

    pub fn failing_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.callback.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Deliver a sample as the interrupt handler would
    pub fn emit(&self, sample: RawInputSample) {
        if let (true, Some(callback)) = (self.enabled, self.callback) {
            callback.on_sample(sample);
        }
    }
}

impl<'a> ScanDevice<'a> for MockScan<'a> {
    fn configure(&mut self, callback: &'a (dyn ScanCallback + Sync)) -> Result<(), ScanError> {
        if self.fail_configure {
            return Err(ScanError::Configuration);
        }
        self.callback = Some(callback);
        Ok(())
    }

    fn enable_callback(&mut self) -> Result<(), ScanError> {
        if self.callback.is_none() {
            return Err(ScanError::NotConfigured);
        }
        self.enabled = true;
        Ok(())
    }

    fn disable_callback(&mut self) -> Result<(), ScanError> {
        self.enabled = false;
        Ok(())
    }
}
