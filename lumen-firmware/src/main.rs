//! Lumen - reference firmware
//!
//! Brings up an SH1106 OLED on I2C0 and a push button as pointer input on
//! an RP2040 board, then runs a small status screen on top of the glue in
//! lumen-core. Buffer and pointer settings come from gui.toml.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};
use embedded_alloc::LlffHeap as Heap;
use {defmt_rtt as _, panic_probe as _};

use lumen_core::config::DEFAULT_QUEUE_DEPTH;
use lumen_core::{BufferAllocator, ColorDepth, HeapPool, InputEventQueue};
use lumen_drivers::{ScanSlot, Sh1106};
use lumen_hal::NamedDevices;

use crate::runtime::DemoRuntime;

mod button;
mod config;
mod runtime;

// Heap allocator for dynamic draw buffers
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 32KB
const HEAP_SIZE: usize = 32 * 1024;

/// Samples from the button task, drained by the pointer read callback
static INPUT_QUEUE: InputEventQueue<CriticalSectionRawMutex, DEFAULT_QUEUE_DEPTH> =
    InputEventQueue::new();

/// Callback slot shared by the button scan device and the button task
static SCAN_SLOT: ScanSlot<'static, CriticalSectionRawMutex> = ScanSlot::new();

#[cfg(gui_static_buffers)]
mod reserved {
    use lumen_core::buffer::{ReservedBuffer, StaticReservation};
    use static_cell::ConstStaticCell;

    use crate::config::STATIC_BUFFER_BYTES;

    static BUF_A: ConstStaticCell<ReservedBuffer<STATIC_BUFFER_BYTES>> =
        ConstStaticCell::new(ReservedBuffer::new());

    #[cfg(gui_double_buffered)]
    static BUF_B: ConstStaticCell<ReservedBuffer<STATIC_BUFFER_BYTES>> =
        ConstStaticCell::new(ReservedBuffer::new());

    /// Hand out the build-time regions, once
    #[cfg(gui_double_buffered)]
    pub fn take() -> StaticReservation {
        StaticReservation::double(BUF_A.take().as_mut_slice(), BUF_B.take().as_mut_slice())
    }

    /// Hand out the build-time region, once
    #[cfg(not(gui_double_buffered))]
    pub fn take() -> StaticReservation {
        StaticReservation::single(BUF_A.take().as_mut_slice())
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumen firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let gui_config = match config::gui_config() {
        Ok(config) => config,
        Err(e) => defmt::panic!("Invalid generated GUI configuration: {:?}", e),
    };

    // SH1106 on I2C0 (SDA=GPIO4, SCL=GPIO5)
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, I2cConfig::default());
    let mut display = Sh1106::new(i2c);
    if let Err(e) = display.init() {
        defmt::panic!("SH1106 init failed: {:?}", e);
    }
    info!("SH1106 initialized");

    let mut devices = NamedDevices::new().with_display(config::DISPLAY_NAME, display);
    if let Some(pointer) = config::POINTER {
        devices = devices.with_scan(pointer.device_name, SCAN_SLOT.device());
    }

    #[cfg(gui_static_buffers)]
    let allocator = BufferAllocator::<HeapPool>::reserved(reserved::take());
    #[cfg(not(gui_static_buffers))]
    let allocator = BufferAllocator::pooled(&HeapPool);

    let mut runtime = DemoRuntime::new(ColorDepth::Bits1);

    let mut gui = match lumen_core::initialize(
        &mut devices,
        &mut runtime,
        allocator,
        Some(&INPUT_QUEUE),
        &gui_config,
    ) {
        Ok(gui) => gui,
        Err(e) => defmt::panic!("GUI initialization failed: {:?}", e),
    };

    // Push button on GPIO15, active low
    let button = Input::new(p.PIN_15, Pull::Up);
    spawner.spawn(button::button_task(button, &SCAN_SLOT)).unwrap();

    info!("GUI running, pointer={}", gui.has_pointer());

    let mut ticker = Ticker::every(Duration::from_millis(100));
    loop {
        runtime.refresh(&mut gui);
        ticker.next().await;
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
