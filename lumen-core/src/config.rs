//! Configuration type definitions
//!
//! These types carry the build-time choices of a board: which devices to
//! bind, how to size and obtain draw buffers, and how to correct the scan
//! device's axes. Firmware fills them from constants generated by its
//! build script.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum device name length
pub const MAX_NAME_LEN: usize = 32;

/// Default input queue depth
pub const DEFAULT_QUEUE_DEPTH: usize = 10;

/// Bits per pixel accepted for static buffer sizing
pub const SUPPORTED_BITS_PER_PIXEL: [u8; 5] = [1, 8, 16, 24, 32];

/// Where draw buffer memory comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AllocationMode {
    /// Regions reserved at build time, sized from the resolution ceiling
    Static,
    /// Heap buffers sized from the live display resolution
    #[default]
    Dynamic,
}

/// Log level for messages coming out of the GUI runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Runtime logging disabled, no sink is registered
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Trace,
}

/// Draw buffer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferConfig {
    /// Allocation mode
    pub mode: AllocationMode,
    /// Allocate a second buffer so the runtime can render while flushing
    pub double_buffered: bool,
    /// Buffer size as a percentage of a full frame (1-100)
    pub vdb_percent: u8,
    /// Largest supported horizontal resolution
    pub hor_res_max: u16,
    /// Largest supported vertical resolution
    pub ver_res_max: u16,
    /// Bits per pixel used to size static buffers
    pub bits_per_pixel: u8,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            mode: AllocationMode::Dynamic,
            double_buffered: false,
            vdb_percent: 10,
            hor_res_max: 320,
            ver_res_max: 240,
            bits_per_pixel: 16,
        }
    }
}

/// Pointer input configuration
///
/// The flags correct wiring quirks of the scan device in its physical
/// frame, before rotation into the display frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointerConfig {
    /// Scan device name
    pub device_name: String<MAX_NAME_LEN>,
    /// Exchange X and Y
    pub swap_xy: bool,
    /// Mirror X
    pub invert_x: bool,
    /// Mirror Y
    pub invert_y: bool,
}

/// Complete GUI glue configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuiConfig {
    /// Display device name
    pub display_name: String<MAX_NAME_LEN>,
    /// Draw buffer configuration
    pub buffer: BufferConfig,
    /// Pointer input, if the board has one
    pub pointer: Option<PointerConfig>,
    /// Runtime log level
    pub log_level: LogLevel,
}

impl Default for GuiConfig {
    fn default() -> Self {
        let mut display_name = String::new();
        // "DISPLAY" always fits in MAX_NAME_LEN
        let _ = display_name.push_str("DISPLAY");

        Self {
            display_name,
            buffer: BufferConfig::default(),
            pointer: None,
            log_level: LogLevel::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A device name is empty
    EmptyName,
    /// Device name longer than MAX_NAME_LEN
    NameTooLong,
    /// vdb_percent outside 1-100
    BufferPercent,
    /// Unsupported bits per pixel
    BitsPerPixel,
    /// Resolution ceiling of zero
    ResolutionCeiling,
}

impl GuiConfig {
    /// Create a configuration for the named display with default buffers
    pub fn for_display(name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            display_name: device_name(name)?,
            ..Self::default()
        })
    }

    /// Enable pointer input from the named scan device
    pub fn with_pointer(
        mut self,
        name: &str,
        swap_xy: bool,
        invert_x: bool,
        invert_y: bool,
    ) -> Result<Self, ConfigError> {
        self.pointer = Some(PointerConfig {
            device_name: device_name(name)?,
            swap_xy,
            invert_x,
            invert_y,
        });
        Ok(self)
    }

    /// Check the configuration for values the glue cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if let Some(pointer) = &self.pointer {
            if pointer.device_name.is_empty() {
                return Err(ConfigError::EmptyName);
            }
        }

        self.buffer.validate()
    }
}

impl BufferConfig {
    /// Check buffer sizing parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vdb_percent == 0 || self.vdb_percent > 100 {
            return Err(ConfigError::BufferPercent);
        }

        if !SUPPORTED_BITS_PER_PIXEL.contains(&self.bits_per_pixel) {
            return Err(ConfigError::BitsPerPixel);
        }

        if self.hor_res_max == 0 || self.ver_res_max == 0 {
            return Err(ConfigError::ResolutionCeiling);
        }

        Ok(())
    }
}

/// Build a bounded device name
pub fn device_name(name: &str) -> Result<String<MAX_NAME_LEN>, ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName);
    }

    let mut s = String::new();
    s.push_str(name).map_err(|_| ConfigError::NameTooLong)?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GuiConfig::default();
        assert_eq!(config.display_name.as_str(), "DISPLAY");
        assert_eq!(config.buffer.mode, AllocationMode::Dynamic);
        assert!(config.pointer.is_none());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_vdb_percent_range() {
        let mut config = GuiConfig::default();

        config.buffer.vdb_percent = 0;
        assert_eq!(config.validate(), Err(ConfigError::BufferPercent));

        config.buffer.vdb_percent = 101;
        assert_eq!(config.validate(), Err(ConfigError::BufferPercent));

        config.buffer.vdb_percent = 100;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_bits_per_pixel() {
        let mut config = GuiConfig::default();
        config.buffer.bits_per_pixel = 12;
        assert_eq!(config.validate(), Err(ConfigError::BitsPerPixel));

        for bpp in SUPPORTED_BITS_PER_PIXEL {
            config.buffer.bits_per_pixel = bpp;
            assert_eq!(config.validate(), Ok(()));
        }
    }

    #[test]
    fn test_zero_ceiling() {
        let mut config = GuiConfig::default();
        config.buffer.ver_res_max = 0;
        assert_eq!(config.validate(), Err(ConfigError::ResolutionCeiling));
    }

    #[test]
    fn test_names() {
        assert_eq!(GuiConfig::for_display("").unwrap_err(), ConfigError::EmptyName);
        assert_eq!(
            GuiConfig::for_display("a-display-name-well-over-thirty-two-bytes").unwrap_err(),
            ConfigError::NameTooLong
        );

        let config = GuiConfig::for_display("ST7789V")
            .unwrap()
            .with_pointer("FT5336", true, false, true)
            .unwrap();
        let pointer = config.pointer.as_ref().unwrap();
        assert_eq!(pointer.device_name.as_str(), "FT5336");
        assert!(pointer.swap_xy);
        assert!(!pointer.invert_x);
        assert!(pointer.invert_y);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Warn < LogLevel::Trace);
    }
}
