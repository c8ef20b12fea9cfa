//! Buffer size arithmetic

use lumen_hal::PixelFormat;

use crate::error::AllocError;

/// Pixels in a dynamically sized buffer
///
/// `vdb_percent` of the full frame, never less than one display row: the
/// runtime renders at least a full line at a time.
pub fn pixel_count(vdb_percent: u8, hor_res: u16, ver_res: u16) -> u32 {
    let frame = u64::from(hor_res) * u64::from(ver_res);
    let count = u64::from(vdb_percent) * frame / 100;
    let count = u32::try_from(count).unwrap_or(u32::MAX);

    count.max(u32::from(hor_res))
}

/// Bytes needed to hold `pixel_count` pixels in `format`
///
/// Fails with `UnsupportedPixelFormat` for formats the glue has no buffer
/// layout for, and with `OutOfMemory` when the size does not fit `usize`.
pub fn bytes_per_buffer(format: PixelFormat, pixel_count: u32) -> Result<usize, AllocError> {
    let bytes = exact_bytes(format, pixel_count).ok_or(AllocError::UnsupportedPixelFormat)?;
    usize::try_from(bytes).map_err(|_| AllocError::OutOfMemory)
}

fn exact_bytes(format: PixelFormat, pixel_count: u32) -> Option<u64> {
    let pixels = u64::from(pixel_count);

    match format {
        PixelFormat::Argb8888 => Some(4 * pixels),
        PixelFormat::Rgb888 => Some(3 * pixels),
        PixelFormat::Rgb565 => Some(2 * pixels),
        PixelFormat::Mono01 | PixelFormat::Mono10 => Some(pixels.div_ceil(8)),
        PixelFormat::Bgr565 => None,
    }
}

/// Bytes of one statically reserved buffer
///
/// Sized from the resolution ceiling rather than the live display so the
/// region can be a `static` array.
pub const fn static_buffer_bytes(
    vdb_percent: u8,
    hor_res_max: u16,
    ver_res_max: u16,
    bits_per_pixel: u8,
) -> usize {
    let pixels = (vdb_percent as usize * hor_res_max as usize * ver_res_max as usize) / 100;
    bits_per_pixel as usize * pixels / 8
}

/// Pixels that fit in a reserved region of `bytes` bytes
pub const fn static_pixel_capacity(bytes: usize, bits_per_pixel: u8) -> u32 {
    if bits_per_pixel == 0 {
        return 0;
    }
    (bytes * 8 / bits_per_pixel as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pixel_count_percent() {
        assert_eq!(pixel_count(10, 320, 240), 7680);
        assert_eq!(pixel_count(100, 320, 240), 76800);
        // floor(33 * 10 * 10 / 100) = 33
        assert_eq!(pixel_count(33, 10, 10), 33);
    }

    #[test]
    fn test_pixel_count_one_row_minimum() {
        // 1% of 320x2 is 6 pixels, raised to a full row
        assert_eq!(pixel_count(1, 320, 2), 320);
        assert_eq!(pixel_count(0, 128, 64), 128);
    }

    #[test]
    fn test_mono_bytes_round_up() {
        assert_eq!(bytes_per_buffer(PixelFormat::Mono01, 15), Ok(2));
        assert_eq!(bytes_per_buffer(PixelFormat::Mono10, 16), Ok(2));
        assert_eq!(bytes_per_buffer(PixelFormat::Mono01, 17), Ok(3));
        assert_eq!(bytes_per_buffer(PixelFormat::Mono10, 0), Ok(0));
    }

    #[test]
    fn test_unsupported_format() {
        assert_eq!(
            bytes_per_buffer(PixelFormat::Bgr565, 100),
            Err(AllocError::UnsupportedPixelFormat)
        );
    }

    #[test]
    fn test_full_frame_argb_never_wraps() {
        // 32768x32768 at 100% is 2^30 pixels, 2^32 bytes in ARGB8888
        let pixels = pixel_count(100, 32768, 32768);
        assert_eq!(pixels, 1 << 30);

        let expected = usize::try_from(1u64 << 32).map_err(|_| AllocError::OutOfMemory);
        assert_eq!(bytes_per_buffer(PixelFormat::Argb8888, pixels), expected);
        assert_ne!(bytes_per_buffer(PixelFormat::Argb8888, pixels), Ok(0));
    }

    #[test]
    fn test_static_sizing() {
        assert_eq!(static_buffer_bytes(10, 320, 240, 16), 15360);
        assert_eq!(static_pixel_capacity(15360, 16), 7680);

        // 1 bpp: 10% of 128x64 = 819 pixels -> 102 bytes -> 816 pixels
        assert_eq!(static_buffer_bytes(10, 128, 64, 1), 102);
        assert_eq!(static_pixel_capacity(102, 1), 816);

        assert_eq!(static_pixel_capacity(100, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_pixel_count_at_least_one_row(
            vdb in 0u8..=u8::MAX,
            hor in 1u16..=u16::MAX,
            ver in 0u16..=u16::MAX,
        ) {
            prop_assert!(pixel_count(vdb, hor, ver) >= u32::from(hor));
        }

        #[test]
        fn prop_color_bytes_exact(count in 0u32..1_000_000) {
            let n = count as usize;
            prop_assert_eq!(bytes_per_buffer(PixelFormat::Argb8888, count), Ok(4 * n));
            prop_assert_eq!(bytes_per_buffer(PixelFormat::Rgb888, count), Ok(3 * n));
            prop_assert_eq!(bytes_per_buffer(PixelFormat::Rgb565, count), Ok(2 * n));
        }

        #[test]
        fn prop_bytes_cover_every_pixel(count in any::<u32>()) {
            let layouts = [
                (PixelFormat::Argb8888, 32),
                (PixelFormat::Rgb888, 24),
                (PixelFormat::Rgb565, 16),
                (PixelFormat::Mono01, 1),
            ];

            for (format, bpp) in layouts {
                match bytes_per_buffer(format, count) {
                    Ok(bytes) => prop_assert!(bytes as u64 >= u64::from(count) * bpp / 8),
                    Err(e) => prop_assert_eq!(e, AllocError::OutOfMemory),
                }
            }
        }

        #[test]
        fn prop_mono_bytes_ceil(count in 0u32..1_000_000) {
            let bytes = bytes_per_buffer(PixelFormat::Mono01, count).unwrap();
            prop_assert!(bytes * 8 >= count as usize);
            prop_assert!(bytes * 8 < count as usize + 8);
        }
    }
}
