//! Task-fed scan device
//!
//! Some input hardware is read by a polling task rather than an interrupt
//! handler owned by the driver (a GPIO button, a touch controller behind a
//! shared bus). The task and the scan device share a [`ScanSlot`]: the
//! device installs and enables the callback, the task delivers samples.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use lumen_hal::{RawInputSample, ScanCallback, ScanDevice, ScanError};

#[derive(Clone, Copy)]
struct SlotState<'a> {
    callback: Option<&'a (dyn ScanCallback + Sync)>,
    enabled: bool,
}

/// Callback slot shared between a scan device and the task feeding it
pub struct ScanSlot<'a, M: RawMutex> {
    state: Mutex<M, Cell<SlotState<'a>>>,
}

impl<'a, M: RawMutex> ScanSlot<'a, M> {
    /// Create an empty, disabled slot
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(SlotState {
                callback: None,
                enabled: false,
            })),
        }
    }

    /// Scan device handle backed by this slot
    pub fn device(&self) -> SlotScan<'_, 'a, M> {
        SlotScan { slot: self }
    }

    /// Hand a sample to the installed callback
    ///
    /// Returns false when no callback is installed or delivery is disabled.
    pub fn deliver(&self, sample: RawInputSample) -> bool {
        let state = self.state.lock(Cell::get);

        match (state.enabled, state.callback) {
            (true, Some(callback)) => {
                callback.on_sample(sample);
                true
            }
            _ => false,
        }
    }

    /// Returns true while samples are being delivered
    pub fn is_enabled(&self) -> bool {
        self.state.lock(|s| s.get().enabled)
    }

    fn update(&self, f: impl FnOnce(&mut SlotState<'a>)) {
        self.state.lock(|s| {
            let mut state = s.get();
            f(&mut state);
            s.set(state);
        });
    }
}

impl<M: RawMutex> Default for ScanSlot<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan device side of a [`ScanSlot`]
pub struct SlotScan<'s, 'a, M: RawMutex> {
    slot: &'s ScanSlot<'a, M>,
}

impl<'a, M: RawMutex> ScanDevice<'a> for SlotScan<'_, 'a, M> {
    fn configure(&mut self, callback: &'a (dyn ScanCallback + Sync)) -> Result<(), ScanError> {
        self.slot.update(|s| s.callback = Some(callback));
        Ok(())
    }

    fn enable_callback(&mut self) -> Result<(), ScanError> {
        let mut result = Ok(());
        self.slot.update(|s| {
            if s.callback.is_some() {
                s.enabled = true;
            } else {
                result = Err(ScanError::NotConfigured);
            }
        });
        result
    }

    fn disable_callback(&mut self) -> Result<(), ScanError> {
        self.slot.update(|s| s.enabled = false);
        Ok(())
    }
}
