//! Device lookup by name
//!
//! The glue binds exactly one display and at most one scan device, both
//! selected by name from board configuration.

use crate::scan::{ScanCallback, ScanDevice, ScanError};

/// Named device lookup
///
/// Lookups hand ownership of the device to the caller, so each device can
/// be resolved once.
pub trait DeviceRegistry {
    /// Display device type
    type Display;
    /// Scan device type
    type Scan;

    /// Resolve the display with the given name
    fn display(&mut self, name: &str) -> Option<Self::Display>;

    /// Resolve the scan device with the given name
    fn scan(&mut self, name: &str) -> Option<Self::Scan>;
}

/// Placeholder scan device for display-only boards
///
/// Uninhabited: a registry typed with `NoScan` never yields a scan device.
#[derive(Debug)]
pub enum NoScan {}

impl<'a> ScanDevice<'a> for NoScan {
    fn configure(&mut self, _callback: &'a (dyn ScanCallback + Sync)) -> Result<(), ScanError> {
        match *self {}
    }

    fn enable_callback(&mut self) -> Result<(), ScanError> {
        match *self {}
    }

    fn disable_callback(&mut self) -> Result<(), ScanError> {
        match *self {}
    }
}

/// Registry holding one named display and one optional named scan device
pub struct NamedDevices<D, S = NoScan> {
    display: Option<(&'static str, D)>,
    scan: Option<(&'static str, S)>,
}

impl<D, S> Default for NamedDevices<D, S> {
    fn default() -> Self {
        Self {
            display: None,
            scan: None,
        }
    }
}

impl<D, S> NamedDevices<D, S> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the display under `name`
    pub fn with_display(mut self, name: &'static str, display: D) -> Self {
        self.display = Some((name, display));
        self
    }

    /// Register the scan device under `name`
    pub fn with_scan(mut self, name: &'static str, scan: S) -> Self {
        self.scan = Some((name, scan));
        self
    }
}

impl<D, S> DeviceRegistry for NamedDevices<D, S> {
    type Display = D;
    type Scan = S;

    fn display(&mut self, name: &str) -> Option<D> {
        match self.display.take() {
            Some((registered, device)) if registered == name => Some(device),
            other => {
                self.display = other;
                None
            }
        }
    }

    fn scan(&mut self, name: &str) -> Option<S> {
        match self.scan.take() {
            Some((registered, device)) if registered == name => Some(device),
            other => {
                self.scan = other;
                None
            }
        }
    }
}
