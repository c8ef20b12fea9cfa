//! Pointer input
//!
//! Raw scan samples travel from interrupt context through a bounded queue
//! to the runtime's poll, where they are mapped into display coordinates.

pub mod mapper;
pub mod queue;

pub use mapper::{transform, CoordinateMapper, MapperFlags, PointerSample, PointerState};
pub use queue::{InputEventQueue, InputQueue, SampleSource};
