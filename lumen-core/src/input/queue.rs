//! Input event queue
//!
//! Bounded channel between the scan device's interrupt callback and the
//! runtime's input poll. Neither side ever waits: a full queue drops the
//! newest sample, an empty queue simply has nothing to report.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use lumen_hal::{RawInputSample, ScanCallback};

use crate::error::QueueFull;

/// Consumer side of an input queue
pub trait SampleSource {
    /// Take the oldest pending sample, if any
    fn poll_sample(&self) -> Option<RawInputSample>;
}

/// A queue usable as both scan callback and sample source
///
/// Blanket-implemented; lets the initialization sequence hold the queue as
/// a single trait object.
pub trait InputQueue: ScanCallback + SampleSource + Sync {
    /// Producer view handed to the scan device
    fn as_callback(&self) -> &(dyn ScanCallback + Sync);

    /// Consumer view polled by the pointer input
    fn as_source(&self) -> &dyn SampleSource;
}

impl<T: ScanCallback + SampleSource + Sync> InputQueue for T {
    fn as_callback(&self) -> &(dyn ScanCallback + Sync) {
        self
    }

    fn as_source(&self) -> &dyn SampleSource {
        self
    }
}

/// Fixed-capacity scan sample queue
pub struct InputEventQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, RawInputSample, N>,
}

impl<M: RawMutex, const N: usize> InputEventQueue<M, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue a sample without blocking
    ///
    /// On a full queue the new sample is dropped and the queued ones are
    /// kept.
    pub fn push(&self, sample: RawInputSample) -> Result<(), QueueFull> {
        self.channel.try_send(sample).map_err(|_| {
            warn!("Input queue full, dropping sample");
            QueueFull
        })
    }

    /// Dequeue the oldest sample without blocking
    pub fn pop(&self) -> Option<RawInputSample> {
        self.channel.try_receive().ok()
    }

    /// Number of queued samples
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Returns true when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Maximum number of queued samples
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for InputEventQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> ScanCallback for InputEventQueue<M, N> {
    fn on_sample(&self, sample: RawInputSample) {
        // Overflow is already logged; a lost touch sample is cosmetic
        let _ = self.push(sample);
    }
}

impl<M: RawMutex, const N: usize> SampleSource for InputEventQueue<M, N> {
    fn poll_sample(&self) -> Option<RawInputSample> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type Queue<const N: usize> = InputEventQueue<CriticalSectionRawMutex, N>;

    #[test]
    fn test_fifo_order() {
        let queue = Queue::<4>::new();
        queue.push(RawInputSample::at(1, 1, true)).unwrap();
        queue.push(RawInputSample::at(2, 2, false)).unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(RawInputSample::at(1, 1, true)));
        assert_eq!(queue.pop(), Some(RawInputSample::at(2, 2, false)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let queue = Queue::<3>::new();
        for i in 0..3 {
            queue.push(RawInputSample::at(i, i, true)).unwrap();
        }

        assert_eq!(queue.push(RawInputSample::at(99, 99, true)), Err(QueueFull));
        assert_eq!(queue.len(), queue.capacity());

        for i in 0..3 {
            assert_eq!(queue.pop(), Some(RawInputSample::at(i, i, true)));
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_callback_never_fails() {
        let queue = Queue::<1>::new();
        queue.on_sample(RawInputSample::at(1, 2, true));
        queue.on_sample(RawInputSample::at(3, 4, true));

        assert_eq!(queue.poll_sample(), Some(RawInputSample::at(1, 2, true)));
        assert_eq!(queue.poll_sample(), None);
    }

    #[test]
    fn test_trait_object_views() {
        let queue = Queue::<2>::new();
        let dyn_queue: &dyn InputQueue = &queue;

        dyn_queue.as_callback().on_sample(RawInputSample::at(5, 6, false));
        assert_eq!(
            dyn_queue.as_source().poll_sample(),
            Some(RawInputSample::at(5, 6, false))
        );
    }
}
