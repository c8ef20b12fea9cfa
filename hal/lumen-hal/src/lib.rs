//! Lumen Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the GUI glue talks to. Board
//! support code implements them for concrete panels and touch controllers,
//! so the same glue runs unchanged on different hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  GUI runtime + lumen-core glue          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ display       │       │ scan / touch  │
//! │ drivers       │       │ drivers       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::DisplayDevice`] - Capability query and pixel writes
//! - [`scan::ScanDevice`], [`scan::ScanCallback`] - Asynchronous scan input
//! - [`registry::DeviceRegistry`] - Lookup of devices by name

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod registry;
pub mod scan;

// Re-export key traits at crate root for convenience
pub use display::{
    DisplayCapabilities, DisplayDevice, DisplayError, Orientation, PixelFormat, ScreenInfo,
    WriteDescriptor,
};
pub use registry::{DeviceRegistry, NamedDevices};
pub use scan::{RawInputSample, ScanCallback, ScanDevice, ScanError};
