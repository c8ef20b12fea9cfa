//! Error types
//!
//! Everything returned from buffer allocation or initialization is fatal to
//! bring-up. Pointer and queue errors are recovered locally.

/// Draw buffer allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// Display is larger than the configured resolution ceiling
    UnsupportedResolution,
    /// No buffer layout exists for the display's pixel format
    UnsupportedPixelFormat,
    /// Memory for a buffer could not be obtained
    OutOfMemory,
}

/// Initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Configuration failed validation
    InvalidConfig,
    /// No display registered under the configured name
    DeviceNotFound,
    /// Display is larger than the configured resolution ceiling
    UnsupportedResolution,
    /// No buffer layout exists for the display's pixel format
    UnsupportedPixelFormat,
    /// Memory for a draw buffer could not be obtained
    OutOfMemory,
    /// No render callbacks match the display and runtime color depth
    UnsupportedDisplay,
    /// The runtime refused the display driver
    RegistrationFailed,
}

impl From<AllocError> for InitError {
    fn from(e: AllocError) -> Self {
        match e {
            AllocError::UnsupportedResolution => InitError::UnsupportedResolution,
            AllocError::UnsupportedPixelFormat => InitError::UnsupportedPixelFormat,
            AllocError::OutOfMemory => InitError::OutOfMemory,
        }
    }
}

/// Pointer input setup errors
///
/// Pointer input is optional, so these are logged and initialization
/// carries on without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerError {
    /// No scan device registered under the configured name
    DeviceNotFound,
    /// The scan device rejected the callback
    ConfigureFailed,
    /// The runtime refused the input driver
    RegistrationFailed,
}

/// Input queue was full; the newest sample was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

/// Runtime registration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistrationError;
