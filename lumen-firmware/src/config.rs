//! GUI configuration generated from gui.toml

use lumen_core::buffer::static_buffer_bytes;
use lumen_core::config::{AllocationMode, BufferConfig, ConfigError, GuiConfig, LogLevel};

/// Pointer settings as written in gui.toml
pub struct PointerSettings {
    pub device_name: &'static str,
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

include!(concat!(env!("OUT_DIR"), "/gui_config.rs"));

/// Bytes reserved per draw buffer in static mode
#[allow(dead_code)]
pub const STATIC_BUFFER_BYTES: usize =
    static_buffer_bytes(VDB_PERCENT, HOR_RES_MAX, VER_RES_MAX, BITS_PER_PIXEL);

/// Assemble the runtime configuration
///
/// build.rs already validated these values, so this only fails if the
/// generated constants and the config types drift apart.
pub fn gui_config() -> Result<GuiConfig, ConfigError> {
    let mut config = GuiConfig::for_display(DISPLAY_NAME)?;

    config.buffer = BufferConfig {
        mode: ALLOCATION_MODE,
        double_buffered: DOUBLE_BUFFERED,
        vdb_percent: VDB_PERCENT,
        hor_res_max: HOR_RES_MAX,
        ver_res_max: VER_RES_MAX,
        bits_per_pixel: BITS_PER_PIXEL,
    };
    config.log_level = LOG_LEVEL;

    if let Some(p) = POINTER {
        config = config.with_pointer(p.device_name, p.swap_xy, p.invert_x, p.invert_y)?;
    }

    config.validate()?;
    Ok(config)
}
