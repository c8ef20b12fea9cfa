//! Build script for lumen-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates gui.toml at compile time
//! - Generates the GUI configuration constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use lumen_core::config::{AllocationMode, GuiConfig, LogLevel};

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate gui.toml
fn load_config() -> GuiConfig {
    println!("cargo:rerun-if-changed=gui.toml");

    let config_path = Path::new("gui.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: gui.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a gui.toml configuration file.            ║\n\
            ║  Please create one in the lumen-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read gui.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: GuiConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid gui.toml                                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid GUI configuration in gui.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(describe(e))
        );
    }

    println!("cargo:warning=gui.toml validated successfully");
    config
}

/// Explain a validation failure in terms of gui.toml keys
fn describe(e: lumen_core::config::ConfigError) -> &'static str {
    use lumen_core::config::ConfigError;

    match e {
        ConfigError::EmptyName => "display_name and pointer.device_name must not be empty",
        ConfigError::NameTooLong => "device names are limited to 32 bytes",
        ConfigError::BufferPercent => "buffer.vdb_percent must be 1-100",
        ConfigError::BitsPerPixel => "buffer.bits_per_pixel must be 1, 8, 16, 24 or 32",
        ConfigError::ResolutionCeiling => "buffer.hor_res_max and ver_res_max must be non-zero",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write gui_config.rs into OUT_DIR
fn generate_config(config: &GuiConfig) {
    println!("cargo:rustc-check-cfg=cfg(gui_static_buffers)");
    println!("cargo:rustc-check-cfg=cfg(gui_double_buffered)");

    let buffer = &config.buffer;

    if buffer.mode == AllocationMode::Static {
        println!("cargo:rustc-cfg=gui_static_buffers");
    }
    if buffer.double_buffered {
        println!("cargo:rustc-cfg=gui_double_buffered");
    }

    let mode = match buffer.mode {
        AllocationMode::Static => "Static",
        AllocationMode::Dynamic => "Dynamic",
    };

    let log_level = match config.log_level {
        LogLevel::Off => "Off",
        LogLevel::Error => "Error",
        LogLevel::Warn => "Warn",
        LogLevel::Info => "Info",
        LogLevel::Trace => "Trace",
    };

    let pointer = match &config.pointer {
        Some(p) => format!(
            "Some(PointerSettings {{ device_name: {:?}, swap_xy: {}, invert_x: {}, invert_y: {} }})",
            p.device_name.as_str(),
            p.swap_xy,
            p.invert_x,
            p.invert_y
        ),
        None => "None".to_string(),
    };

    let source = format!(
        "// Generated from gui.toml by build.rs\n\
         pub const DISPLAY_NAME: &str = {:?};\n\
         pub const ALLOCATION_MODE: AllocationMode = AllocationMode::{};\n\
         pub const DOUBLE_BUFFERED: bool = {};\n\
         pub const VDB_PERCENT: u8 = {};\n\
         pub const HOR_RES_MAX: u16 = {};\n\
         pub const VER_RES_MAX: u16 = {};\n\
         pub const BITS_PER_PIXEL: u8 = {};\n\
         pub const LOG_LEVEL: LogLevel = LogLevel::{};\n\
         pub const POINTER: Option<PointerSettings> = {};\n",
        config.display_name.as_str(),
        mode,
        buffer.double_buffered,
        buffer.vdb_percent,
        buffer.hor_res_max,
        buffer.ver_res_max,
        buffer.bits_per_pixel,
        log_level,
        pointer,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("gui_config.rs"), source).unwrap();
}
