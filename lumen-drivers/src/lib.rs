//! Device implementations
//!
//! Concrete implementations of the collaborator traits in `lumen-hal`:
//!
//! - SH1106 monochrome OLED over blocking I2C
//! - Scan device fed by a polling task through a shared slot

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod sh1106;
pub mod slot_scan;

pub use sh1106::Sh1106;
pub use slot_scan::{ScanSlot, SlotScan};
