//! Graphics runtime boundary
//!
//! The retained-mode runtime is an external collaborator. This module
//! describes what initialization hands to it and what it needs back, and
//! bridges its text log into ours.

use core::fmt;

use crate::buffer::DrawBuffer;
use crate::config::LogLevel;
use crate::error::RegistrationError;
use crate::render::RenderBinding;

/// Color depth the runtime was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorDepth {
    Bits1,
    Bits8,
    Bits16,
    Bits32,
}

impl ColorDepth {
    /// Bits per pixel
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::Bits1 => 1,
            ColorDepth::Bits8 => 8,
            ColorDepth::Bits16 => 16,
            ColorDepth::Bits32 => 32,
        }
    }
}

/// Receiver for the runtime's log lines
pub type LogSink = fn(&str);

/// Display driver registration
///
/// Moves the draw buffer into the runtime. Pooled buffer memory goes back
/// to its pool when the runtime drops the driver.
pub struct DisplayDriver<B> {
    /// Negotiated horizontal resolution
    pub hor_res: u16,
    /// Negotiated vertical resolution
    pub ver_res: u16,
    /// Buffers the runtime renders into
    pub draw_buf: DrawBuffer<B>,
    /// Callbacks bound for this display
    pub render: RenderBinding,
}

impl<B: AsRef<[u8]>> fmt::Debug for DisplayDriver<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayDriver")
            .field("hor_res", &self.hor_res)
            .field("ver_res", &self.ver_res)
            .field("draw_buf", &self.draw_buf)
            .field("render", &self.render)
            .finish()
    }
}

/// Kind of input device registered with the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKind {
    Pointer,
}

/// Input driver registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputDriver {
    pub kind: InputKind,
}

impl InputDriver {
    /// Pointer device read through `Gui::read_pointer`
    pub const fn pointer() -> Self {
        Self {
            kind: InputKind::Pointer,
        }
    }
}

/// The graphics runtime, generic over the pool buffer type `B`
pub trait GraphicsRuntime<B> {
    /// Initialize runtime internals
    fn init(&mut self);

    /// Route runtime log lines up to `level` to `sink`
    ///
    /// Lines above `level` must not reach the sink; [`runtime_log_enabled`]
    /// decides per line.
    fn set_log_sink(&mut self, sink: LogSink, level: LogLevel);

    /// Color depth the runtime renders in
    fn color_depth(&self) -> ColorDepth;

    /// Register the display driver
    fn register_display(&mut self, driver: DisplayDriver<B>) -> Result<(), RegistrationError>;

    /// Register an input driver
    fn register_input(&mut self, driver: InputDriver) -> Result<(), RegistrationError>;
}

impl<B, T: GraphicsRuntime<B> + ?Sized> GraphicsRuntime<B> for &mut T {
    fn init(&mut self) {
        (**self).init()
    }

    fn set_log_sink(&mut self, sink: LogSink, level: LogLevel) {
        (**self).set_log_sink(sink, level)
    }

    fn color_depth(&self) -> ColorDepth {
        (**self).color_depth()
    }

    fn register_display(&mut self, driver: DisplayDriver<B>) -> Result<(), RegistrationError> {
        (**self).register_display(driver)
    }

    fn register_input(&mut self, driver: InputDriver) -> Result<(), RegistrationError> {
        (**self).register_input(driver)
    }
}

const LEVEL_PREFIXES: [(&str, LogLevel); 4] = [
    ("[Error] ", LogLevel::Error),
    ("[Warn] ", LogLevel::Warn),
    ("[Info] ", LogLevel::Info),
    ("[Trace] ", LogLevel::Trace),
];

/// Split a runtime log line into its level and message
pub fn parse_runtime_log(line: &str) -> Option<(LogLevel, &str)> {
    LEVEL_PREFIXES.iter().find_map(|(prefix, level)| {
        line.strip_prefix(*prefix)
            .map(|msg| (*level, msg.trim_end()))
    })
}

/// Returns true when `line` is at or below the configured `max` level
///
/// Lines without a known level prefix never pass, and nothing passes at
/// `LogLevel::Off`.
pub fn runtime_log_enabled(line: &str, max: LogLevel) -> bool {
    parse_runtime_log(line).is_some_and(|(level, _)| level <= max)
}

/// Log sink forwarding runtime lines at their own level
///
/// Trace lines are logged at debug. Lines without a known level prefix are
/// dropped.
pub fn forward_runtime_log(line: &str) {
    match parse_runtime_log(line) {
        Some((LogLevel::Error, msg)) => error!("{}", msg),
        Some((LogLevel::Warn, msg)) => warn!("{}", msg),
        Some((LogLevel::Info, msg)) => info!("{}", msg),
        Some((LogLevel::Trace, msg)) => debug!("{}", msg),
        Some((LogLevel::Off, _)) | None => {}
    }
}
