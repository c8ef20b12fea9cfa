//! Buffer memory sources

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Source of dynamically allocated buffer memory
///
/// Dropping a returned buffer gives its memory back to the pool.
pub trait BufferPool {
    /// Owned buffer handed out by this pool
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Obtain a zeroed buffer of exactly `len` bytes
    ///
    /// Returns `None` when the pool cannot satisfy the request.
    fn allocate(&self, len: usize) -> Option<Self::Buffer>;
}

impl<P: BufferPool + ?Sized> BufferPool for &P {
    type Buffer = P::Buffer;

    fn allocate(&self, len: usize) -> Option<Self::Buffer> {
        (**self).allocate(len)
    }
}

/// Pool backed by the global allocator
///
/// Uses fallible reservation, so an exhausted heap yields `None` instead of
/// aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapPool;

impl BufferPool for HeapPool {
    type Buffer = Box<[u8]>;

    fn allocate(&self, len: usize) -> Option<Box<[u8]>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0);
        Some(buf.into_boxed_slice())
    }
}

/// Word-aligned region for static reservation
///
/// The runtime may access pixels as 16 or 32 bit words, so the region is
/// 4-byte aligned.
#[repr(C, align(4))]
pub struct ReservedBuffer<const N: usize>([u8; N]);

impl<const N: usize> ReservedBuffer<N> {
    /// Create a zeroed region
    pub const fn new() -> Self {
        Self([0; N])
    }

    /// Size of the region in bytes
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true for a zero-sized region
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// View the region as bytes
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> Default for ReservedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Regions reserved at build time for static allocation
pub struct StaticReservation {
    /// First (or only) buffer
    pub buf_a: &'static mut [u8],
    /// Second buffer, used when double-buffering
    pub buf_b: Option<&'static mut [u8]>,
}

impl StaticReservation {
    /// Reservation with a single buffer
    pub fn single(buf_a: &'static mut [u8]) -> Self {
        Self { buf_a, buf_b: None }
    }

    /// Reservation with two buffers
    pub fn double(buf_a: &'static mut [u8], buf_b: &'static mut [u8]) -> Self {
        Self {
            buf_a,
            buf_b: Some(buf_b),
        }
    }
}
