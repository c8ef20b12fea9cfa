//! SH1106 OLED Display Driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C.
//!
//! Controller RAM is organized in 8-row pages, one byte per column per
//! page with the top row in bit 0, so the panel reports a vertically tiled,
//! LSB-first MONO01 layout. The controller has 132 columns of RAM; the
//! visible 128 start at column 2.

use embedded_hal::i2c::I2c;
use lumen_hal::{
    DisplayCapabilities, DisplayDevice, DisplayError, Orientation, PixelFormat, ScreenInfo,
    WriteDescriptor,
};

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: u16 = 128;
pub const HEIGHT: u16 = 64;
const PAGES: u16 = HEIGHT / 8;

/// First visible RAM column
const COLUMN_OFFSET: u8 = 2;

/// Control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Longest command batch sent in one transfer
const MAX_COMMANDS: usize = 24;

/// SH1106 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_NORMAL: u8 = 0xA0;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Segment remap and COM scan direction for an orientation
fn scan_direction(orientation: Orientation) -> Result<[u8; 2], DisplayError> {
    match orientation {
        Orientation::Normal => Ok([cmd::SET_SEG_REMAP, cmd::SET_COM_SCAN_DEC]),
        Orientation::Rotated180 => Ok([cmd::SET_SEG_NORMAL, cmd::SET_COM_SCAN_INC]),
        Orientation::Rotated90 | Orientation::Rotated270 => Err(DisplayError::Unsupported),
    }
}

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    orientation: Orientation,
}

impl<I2C: I2c> Sh1106<I2C> {
    /// Create a new SH1106 driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a new SH1106 driver at `address`
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            orientation: Orientation::Normal,
        }
    }

    /// Initialize the display and clear its RAM
    pub fn init(&mut self) -> Result<(), DisplayError> {
        let [seg, com] = scan_direction(self.orientation)?;

        self.commands(&[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            seg,
            com,
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
        ])?;

        self.clear()?;
        self.commands(&[cmd::DISPLAY_ON])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SH1106 at {=u8:#x} initialized", self.address);

        Ok(())
    }

    /// Blank every visible page
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        let mut frame = [0u8; WIDTH as usize + 1];
        frame[0] = CONTROL_DATA;

        for page in 0..PAGES as u8 {
            self.set_cursor(page, COLUMN_OFFSET)?;
            self.data(&frame)?;
        }

        Ok(())
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.commands(&[cmd::SET_CONTRAST, contrast])
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.commands(&[if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }])
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.commands(&[if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        }])
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn set_cursor(&mut self, page: u8, column: u8) -> Result<(), DisplayError> {
        self.commands(&[
            cmd::SET_PAGE_ADDR | page,
            cmd::SET_LOW_COLUMN | (column & 0x0F),
            cmd::SET_HIGH_COLUMN | (column >> 4),
        ])
    }

    /// Send commands, batched into as few transfers as possible
    fn commands(&mut self, cmds: &[u8]) -> Result<(), DisplayError> {
        let mut frame = [0u8; MAX_COMMANDS + 1];
        frame[0] = CONTROL_COMMAND;

        for chunk in cmds.chunks(MAX_COMMANDS) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.address, &frame[..=chunk.len()])
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }

    /// Send a data frame; `frame[0]` must be the data control byte
    fn data(&mut self, frame: &[u8]) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, frame)
            .map_err(|_| DisplayError::Communication)
    }
}

impl<I2C: I2c> DisplayDevice for Sh1106<I2C> {
    fn capabilities(&self) -> DisplayCapabilities {
        DisplayCapabilities {
            x_resolution: WIDTH,
            y_resolution: HEIGHT,
            pixel_format: PixelFormat::Mono01,
            current_orientation: self.orientation,
            screen_info: ScreenInfo {
                mono_vtiled: true,
                mono_msb_first: false,
            },
        }
    }

    /// Write whole pages
    ///
    /// `y` and the height must be multiples of 8; callers round areas to
    /// page boundaries first.
    fn write(
        &mut self,
        x: u16,
        y: u16,
        desc: &WriteDescriptor,
        buf: &[u8],
    ) -> Result<(), DisplayError> {
        if desc.width == 0 || desc.height == 0 {
            return Ok(());
        }

        if y % 8 != 0 || desc.height % 8 != 0 {
            return Err(DisplayError::InvalidCoordinates);
        }

        if u32::from(x) + u32::from(desc.width) > u32::from(WIDTH)
            || u32::from(y) + u32::from(desc.height) > u32::from(HEIGHT)
        {
            return Err(DisplayError::InvalidCoordinates);
        }

        let width = usize::from(desc.width);
        let stride = usize::from(desc.pitch);
        let pages = usize::from(desc.height / 8);

        if stride < width || buf.len() < stride * (pages - 1) + width {
            return Err(DisplayError::InvalidBuffer);
        }

        let first_page = (y / 8) as u8;
        let column = x as u8 + COLUMN_OFFSET;

        let mut frame = [0u8; WIDTH as usize + 1];
        frame[0] = CONTROL_DATA;

        for page in 0..pages {
            let start = page * stride;
            frame[1..=width].copy_from_slice(&buf[start..start + width]);

            self.set_cursor(first_page + page as u8, column)?;
            self.data(&frame[..=width])?;
        }

        Ok(())
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        let [seg, com] = scan_direction(orientation).inspect_err(|_| {
            #[cfg(feature = "defmt")]
            defmt::warn!("SH1106 cannot rotate to {}", orientation);
        })?;
        self.commands(&[seg, com])?;
        self.orientation = orientation;
        Ok(())
    }
}
