//! Draw buffer allocation
//!
//! Sizes the buffer(s) the GUI runtime renders into and obtains their
//! memory, either from regions reserved at build time or from a pool.

pub mod allocator;
pub mod pool;
pub mod size;

pub use allocator::{AllocationStrategy, BufferAllocator, DrawBuffer, Region, Resolution};
pub use pool::{BufferPool, HeapPool, ReservedBuffer, StaticReservation};
pub use size::{bytes_per_buffer, pixel_count, static_buffer_bytes, static_pixel_capacity};
