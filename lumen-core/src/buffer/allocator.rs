//! Draw buffer allocator
//!
//! Static mode hands out regions reserved at build time and only checks the
//! live display against the configured ceiling. Dynamic mode sizes buffers
//! from the live resolution and pixel format and takes them from a pool.

use core::fmt;
use core::ops::{Deref, DerefMut};

use lumen_hal::DisplayCapabilities;

use super::pool::{BufferPool, StaticReservation};
use super::size::{bytes_per_buffer, pixel_count, static_pixel_capacity};
use crate::config::{AllocationMode, BufferConfig};
use crate::error::AllocError;

/// Resolution negotiated with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resolution {
    /// Horizontal resolution in pixels
    pub hor_res: u16,
    /// Vertical resolution in pixels
    pub ver_res: u16,
}

/// Memory backing one draw buffer
pub enum Region<B> {
    /// Region reserved at build time
    Reserved(&'static mut [u8]),
    /// Buffer taken from a pool, returned to it on drop
    Pooled(B),
}

impl<B: AsRef<[u8]>> Deref for Region<B> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Region::Reserved(buf) => buf,
            Region::Pooled(buf) => buf.as_ref(),
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> DerefMut for Region<B> {
    fn deref_mut(&mut self) -> &mut [u8] {
        match self {
            Region::Reserved(buf) => buf,
            Region::Pooled(buf) => buf.as_mut(),
        }
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for Region<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Region::Reserved(_) => "Reserved",
            Region::Pooled(_) => "Pooled",
        };
        f.debug_struct(kind).field("len", &self.len()).finish()
    }
}

/// Draw buffer descriptor handed to the GUI runtime
///
/// The runtime owns the read/write lifecycle once the display driver is
/// registered. Dropping the descriptor releases pooled memory.
pub struct DrawBuffer<B> {
    buf_a: Region<B>,
    buf_b: Option<Region<B>>,
    pixel_capacity: u32,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> DrawBuffer<B> {
    /// Number of pixels each buffer holds
    pub fn pixel_capacity(&self) -> u32 {
        self.pixel_capacity
    }

    /// Size of each buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.buf_a.len()
    }

    /// Returns true when a second buffer is present
    pub fn is_double_buffered(&self) -> bool {
        self.buf_b.is_some()
    }

    /// First (or only) buffer
    pub fn buf_a(&mut self) -> &mut [u8] {
        &mut self.buf_a
    }

    /// Second buffer, if double-buffering
    pub fn buf_b(&mut self) -> Option<&mut [u8]> {
        self.buf_b.as_deref_mut()
    }

    /// Both buffers at once
    pub fn buffers(&mut self) -> (&mut [u8], Option<&mut [u8]>) {
        (&mut self.buf_a, self.buf_b.as_deref_mut())
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for DrawBuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawBuffer")
            .field("buf_a", &self.buf_a)
            .field("buf_b", &self.buf_b)
            .field("pixel_capacity", &self.pixel_capacity)
            .finish()
    }
}

/// Where the allocator gets its memory
pub enum AllocationStrategy<'p, P: BufferPool> {
    /// Regions reserved at build time
    Static(StaticReservation),
    /// Buffers sized at runtime and taken from a pool
    Dynamic(&'p P),
}

/// Draw buffer allocator
pub struct BufferAllocator<'p, P: BufferPool> {
    strategy: AllocationStrategy<'p, P>,
}

impl<'p, P: BufferPool> BufferAllocator<'p, P> {
    /// Create an allocator with the given strategy
    pub fn new(strategy: AllocationStrategy<'p, P>) -> Self {
        Self { strategy }
    }

    /// Allocator handing out build-time reserved regions
    pub fn reserved(reservation: StaticReservation) -> Self {
        Self::new(AllocationStrategy::Static(reservation))
    }

    /// Allocator taking buffers from `pool`
    pub fn pooled(pool: &'p P) -> Self {
        Self::new(AllocationStrategy::Dynamic(pool))
    }

    /// Allocation mode implemented by this allocator
    pub fn mode(&self) -> AllocationMode {
        match self.strategy {
            AllocationStrategy::Static(_) => AllocationMode::Static,
            AllocationStrategy::Dynamic(_) => AllocationMode::Dynamic,
        }
    }

    /// Produce the draw buffer for a display
    ///
    /// The negotiated resolution is written to `resolution`. In static mode
    /// each axis within the ceiling is written even when the other one is
    /// rejected.
    pub fn allocate(
        self,
        config: &BufferConfig,
        caps: &DisplayCapabilities,
        resolution: &mut Resolution,
    ) -> Result<DrawBuffer<P::Buffer>, AllocError> {
        match self.strategy {
            AllocationStrategy::Static(reservation) => {
                allocate_reserved(reservation, config, caps, resolution)
            }
            AllocationStrategy::Dynamic(pool) => allocate_pooled(pool, config, caps, resolution),
        }
    }
}

fn allocate_reserved<B>(
    reservation: StaticReservation,
    config: &BufferConfig,
    caps: &DisplayCapabilities,
    resolution: &mut Resolution,
) -> Result<DrawBuffer<B>, AllocError> {
    let mut result = Ok(());

    if caps.x_resolution <= config.hor_res_max {
        resolution.hor_res = caps.x_resolution;
    } else {
        error!(
            "Horizontal resolution {} is larger than maximum {}",
            caps.x_resolution,
            config.hor_res_max
        );
        result = Err(AllocError::UnsupportedResolution);
    }

    if caps.y_resolution <= config.ver_res_max {
        resolution.ver_res = caps.y_resolution;
    } else {
        error!(
            "Vertical resolution {} is larger than maximum {}",
            caps.y_resolution,
            config.ver_res_max
        );
        result = Err(AllocError::UnsupportedResolution);
    }

    result?;

    let StaticReservation { buf_a, buf_b } = reservation;

    let buf_b = if config.double_buffered {
        match buf_b {
            Some(buf) => Some(buf),
            None => {
                error!("Double buffering configured without a second reserved region");
                return Err(AllocError::OutOfMemory);
            }
        }
    } else {
        None
    };

    let bytes = match &buf_b {
        Some(b) => buf_a.len().min(b.len()),
        None => buf_a.len(),
    };
    let pixel_capacity = static_pixel_capacity(bytes, config.bits_per_pixel);

    if pixel_capacity < u32::from(resolution.hor_res) {
        error!(
            "Reserved buffer holds {} pixels, less than one row of {}",
            pixel_capacity,
            resolution.hor_res
        );
        return Err(AllocError::OutOfMemory);
    }

    Ok(DrawBuffer {
        buf_a: Region::Reserved(buf_a),
        buf_b: buf_b.map(Region::Reserved),
        pixel_capacity,
    })
}

fn allocate_pooled<P: BufferPool>(
    pool: &P,
    config: &BufferConfig,
    caps: &DisplayCapabilities,
    resolution: &mut Resolution,
) -> Result<DrawBuffer<P::Buffer>, AllocError> {
    let pixels = pixel_count(config.vdb_percent, caps.x_resolution, caps.y_resolution);

    let size = bytes_per_buffer(caps.pixel_format, pixels).inspect_err(|e| match e {
        AllocError::UnsupportedPixelFormat => {
            error!("No buffer layout for pixel format {:?}", caps.pixel_format)
        }
        _ => error!("Draw buffer for {} pixels is too large", pixels),
    })?;

    let buf_a = pool.allocate(size).ok_or_else(|| {
        error!("Failed to allocate memory for rendering buffer");
        AllocError::OutOfMemory
    })?;

    let buf_b = if config.double_buffered {
        match pool.allocate(size) {
            Some(buf) => Some(buf),
            None => {
                drop(buf_a);
                error!("Failed to allocate memory for rendering buffer");
                return Err(AllocError::OutOfMemory);
            }
        }
    } else {
        None
    };

    resolution.hor_res = caps.x_resolution;
    resolution.ver_res = caps.y_resolution;

    debug!(
        "Allocated {} byte draw buffer(s) for {} pixels",
        size,
        pixels
    );

    Ok(DrawBuffer {
        buf_a: Region::Pooled(buf_a),
        buf_b: buf_b.map(Region::Pooled),
        pixel_capacity: pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::pool::HeapPool;
    use crate::testing::{caps, leak, CountingPool};
    use lumen_hal::PixelFormat;

    fn dynamic(double_buffered: bool) -> BufferConfig {
        BufferConfig {
            mode: AllocationMode::Dynamic,
            double_buffered,
            vdb_percent: 10,
            ..BufferConfig::default()
        }
    }

    fn fixed(double_buffered: bool) -> BufferConfig {
        BufferConfig {
            mode: AllocationMode::Static,
            double_buffered,
            vdb_percent: 10,
            hor_res_max: 320,
            ver_res_max: 240,
            bits_per_pixel: 16,
        }
    }

    #[test]
    fn test_dynamic_sizes_per_format() {
        let cases = [
            (PixelFormat::Argb8888, 4 * 7680),
            (PixelFormat::Rgb888, 3 * 7680),
            (PixelFormat::Rgb565, 2 * 7680),
            (PixelFormat::Mono01, 960),
            (PixelFormat::Mono10, 960),
        ];

        for (format, bytes) in cases {
            let mut res = Resolution::default();
            let mut buf = BufferAllocator::pooled(&HeapPool)
                .allocate(&dynamic(false), &caps(320, 240, format), &mut res)
                .unwrap();

            assert_eq!(buf.byte_len(), bytes);
            assert_eq!(buf.pixel_capacity(), 7680);
            assert!(!buf.is_double_buffered());
            assert!(buf.buf_b().is_none());
            assert_eq!(res, Resolution { hor_res: 320, ver_res: 240 });
        }
    }

    #[test]
    fn test_dynamic_one_row_minimum() {
        let mut config = dynamic(false);
        config.vdb_percent = 1;

        let mut res = Resolution::default();
        let buf = BufferAllocator::pooled(&HeapPool)
            .allocate(&config, &caps(320, 10, PixelFormat::Rgb565), &mut res)
            .unwrap();

        assert_eq!(buf.pixel_capacity(), 320);
        assert_eq!(buf.byte_len(), 640);
    }

    #[test]
    fn test_unsupported_format_allocates_nothing() {
        let pool = CountingPool::new();
        let mut res = Resolution::default();

        let result = BufferAllocator::pooled(&pool).allocate(
            &dynamic(true),
            &caps(320, 240, PixelFormat::Bgr565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::UnsupportedPixelFormat);
        assert_eq!(pool.allocations(), 0);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_first_buffer_failure() {
        let pool = CountingPool::failing_after(0);
        let mut res = Resolution::default();

        let result = BufferAllocator::pooled(&pool).allocate(
            &dynamic(true),
            &caps(320, 240, PixelFormat::Rgb565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::OutOfMemory);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_second_buffer_failure_releases_first() {
        let pool = CountingPool::failing_after(1);
        let mut res = Resolution::default();

        let result = BufferAllocator::pooled(&pool).allocate(
            &dynamic(true),
            &caps(320, 240, PixelFormat::Rgb565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::OutOfMemory);
        assert_eq!(pool.allocations(), 1);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_double_buffer_dropped_releases_both() {
        let pool = CountingPool::new();
        let mut res = Resolution::default();

        let mut buf = BufferAllocator::pooled(&pool)
            .allocate(
                &dynamic(true),
                &caps(100, 100, PixelFormat::Argb8888),
                &mut res,
            )
            .unwrap();

        assert!(buf.is_double_buffered());
        let (a, b) = buf.buffers();
        assert_eq!(a.len(), 4000);
        assert_eq!(b.map(|b| b.len()), Some(4000));
        assert_eq!(pool.live(), 2);

        drop(buf);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn test_static_within_ceiling() {
        let reservation = StaticReservation::double(leak(15360), leak(15360));
        let mut res = Resolution::default();

        let buf = BufferAllocator::<HeapPool>::reserved(reservation)
            .allocate(&fixed(true), &caps(240, 160, PixelFormat::Rgb565), &mut res)
            .unwrap();

        // Sized from the ceiling, not from the live display
        assert_eq!(buf.pixel_capacity(), 7680);
        assert_eq!(buf.byte_len(), 15360);
        assert!(buf.is_double_buffered());
        assert_eq!(res, Resolution { hor_res: 240, ver_res: 160 });
    }

    #[test]
    fn test_static_single_ignores_second_region() {
        let reservation = StaticReservation::double(leak(15360), leak(15360));
        let mut res = Resolution::default();

        let buf = BufferAllocator::<HeapPool>::reserved(reservation)
            .allocate(&fixed(false), &caps(320, 240, PixelFormat::Rgb565), &mut res)
            .unwrap();

        assert!(!buf.is_double_buffered());
    }

    #[test]
    fn test_static_resolution_too_large() {
        let reservation = StaticReservation::single(leak(15360));
        let mut res = Resolution::default();

        let result = BufferAllocator::<HeapPool>::reserved(reservation).allocate(
            &fixed(false),
            &caps(480, 240, PixelFormat::Rgb565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::UnsupportedResolution);
        // The axis that fits is still negotiated
        assert_eq!(res, Resolution { hor_res: 0, ver_res: 240 });
    }

    #[test]
    fn test_static_missing_second_region() {
        let reservation = StaticReservation::single(leak(15360));
        let mut res = Resolution::default();

        let result = BufferAllocator::<HeapPool>::reserved(reservation).allocate(
            &fixed(true),
            &caps(320, 240, PixelFormat::Rgb565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::OutOfMemory);
    }

    #[test]
    fn test_static_region_smaller_than_a_row() {
        let reservation = StaticReservation::single(leak(100));
        let mut res = Resolution::default();

        let result = BufferAllocator::<HeapPool>::reserved(reservation).allocate(
            &fixed(false),
            &caps(320, 240, PixelFormat::Rgb565),
            &mut res,
        );

        assert_eq!(result.unwrap_err(), AllocError::OutOfMemory);
    }

    #[test]
    fn test_mode_follows_strategy() {
        assert_eq!(
            BufferAllocator::pooled(&HeapPool).mode(),
            AllocationMode::Dynamic
        );
        assert_eq!(
            BufferAllocator::<HeapPool>::reserved(StaticReservation::single(leak(8))).mode(),
            AllocationMode::Static
        );
    }
}
