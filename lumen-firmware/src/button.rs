//! Button scan task
//!
//! Turns a single push button into pointer samples. Each press reports a
//! contact at the current cursor position; the cursor then steps across
//! the panel so successive presses land on different spots.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use lumen_drivers::ScanSlot;
use lumen_hal::RawInputSample;

/// Debounce interval after each edge
const DEBOUNCE: Duration = Duration::from_millis(20);

/// Cursor step per press, in scan units
const STEP: u32 = 16;

/// Scan frame the cursor wraps in
const FRAME_WIDTH: u32 = 128;
const FRAME_HEIGHT: u32 = 64;

/// Cursor walking the scan frame row by row
struct Cursor {
    col: u32,
    row: u32,
}

impl Cursor {
    const fn new() -> Self {
        Self {
            col: STEP / 2,
            row: STEP / 2,
        }
    }

    fn advance(&mut self) {
        self.col += STEP;
        if self.col >= FRAME_WIDTH {
            self.col = STEP / 2;
            self.row = (self.row + STEP) % FRAME_HEIGHT;
        }
    }
}

/// Button task
///
/// The button is active low. Samples go through `slot`, so nothing is
/// delivered until the scan device has been configured and enabled.
#[embassy_executor::task]
pub async fn button_task(
    mut button: Input<'static>,
    slot: &'static ScanSlot<'static, CriticalSectionRawMutex>,
) {
    info!("Button task started");

    let mut cursor = Cursor::new();

    loop {
        button.wait_for_any_edge().await;
        Timer::after(DEBOUNCE).await;

        let pressed = button.is_low();
        let sample = RawInputSample::at(cursor.col, cursor.row, pressed);

        if !slot.deliver(sample) {
            trace!("Button sample dropped, scan callback disabled");
        }

        if !pressed {
            cursor.advance();
        }
    }
}
