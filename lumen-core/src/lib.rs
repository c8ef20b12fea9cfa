//! Board-agnostic glue between display/input hardware and a GUI runtime
//!
//! This crate contains the logic that sits between the collaborator traits
//! in `lumen-hal` and a retained-mode graphics runtime:
//!
//! - Draw buffer sizing and allocation (static reservation or heap pool)
//! - Pixel-format specific flush, rounder and set-pixel callbacks
//! - Bounded input queue between scan interrupts and the runtime's poll
//! - Coordinate mapping from the physical scan frame to the display frame
//! - The initialization sequence that wires it all together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod buffer;
pub mod config;
pub mod error;
pub mod gui;
pub mod input;
pub mod render;
pub mod runtime;
pub mod sequencer;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::{AllocationStrategy, BufferAllocator, BufferPool, DrawBuffer, HeapPool, Resolution};
pub use config::{AllocationMode, BufferConfig, GuiConfig, LogLevel, PointerConfig};
pub use error::{AllocError, InitError, PointerError, QueueFull};
pub use gui::{Gui, PointerInput};
pub use input::{CoordinateMapper, InputEventQueue, PointerSample, PointerState};
pub use render::{Area, MonoLayout, RenderBinding};
pub use runtime::{ColorDepth, DisplayDriver, GraphicsRuntime, InputDriver, InputKind, LogSink};
pub use sequencer::initialize;
