//! Scan input abstractions
//!
//! Keyboard-scan style devices (touch controllers, key matrices) report
//! samples from interrupt context through a callback registered once.

/// Raw sample as reported by a scan device
///
/// `col` is the physical X axis and `row` the physical Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawInputSample {
    /// Row (physical Y)
    pub row: u32,
    /// Column (physical X)
    pub col: u32,
    /// Contact present
    pub pressed: bool,
}

impl RawInputSample {
    /// Create a sample from physical X/Y coordinates
    pub const fn at(x: u32, y: u32, pressed: bool) -> Self {
        Self {
            row: y,
            col: x,
            pressed,
        }
    }
}

/// Scan device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError {
    /// Device rejected the configuration
    Configuration,
    /// Communication error with the device
    Communication,
    /// No callback has been configured yet
    NotConfigured,
}

/// Receiver of scan samples
///
/// Called from interrupt context. Implementations must not block.
pub trait ScanCallback {
    /// Deliver one sample
    fn on_sample(&self, sample: RawInputSample);
}

/// Scan device trait
///
/// The callback reference must outlive the device's use of it, hence the
/// lifetime on the trait.
pub trait ScanDevice<'a> {
    /// Install the callback that receives samples
    fn configure(&mut self, callback: &'a (dyn ScanCallback + Sync)) -> Result<(), ScanError>;

    /// Start delivering samples to the callback
    fn enable_callback(&mut self) -> Result<(), ScanError>;

    /// Stop delivering samples
    fn disable_callback(&mut self) -> Result<(), ScanError>;
}
