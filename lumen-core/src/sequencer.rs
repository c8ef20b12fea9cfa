//! Initialization sequence
//!
//! Brings up the display path in a fixed order and stops at the first
//! failure. Pointer input comes last and is optional: if it cannot be set
//! up the GUI still runs without it.

use lumen_hal::{DeviceRegistry, DisplayDevice, ScanDevice};

use crate::buffer::{BufferAllocator, BufferPool, Resolution};
use crate::config::{GuiConfig, LogLevel, PointerConfig};
use crate::error::{InitError, PointerError};
use crate::gui::{Gui, PointerInput};
use crate::input::{InputQueue, MapperFlags};
use crate::render::RenderBinding;
use crate::runtime::{forward_runtime_log, DisplayDriver, GraphicsRuntime, InputDriver};

/// Initialize the display and input glue
///
/// 1. Resolve the display
/// 2. Hook up the runtime log, then initialize the runtime
/// 3. Allocate draw buffers
/// 4. Bind render callbacks for the pixel format and color depth
/// 5. Register the display driver
/// 6. Set up pointer input, if configured
///
/// `queue` receives scan samples and is polled by [`Gui::read_pointer`].
/// It is only needed when `config.pointer` is set.
pub fn initialize<'q, R, G, P>(
    registry: &mut R,
    runtime: &mut G,
    allocator: BufferAllocator<'_, P>,
    queue: Option<&'q dyn InputQueue>,
    config: &GuiConfig,
) -> Result<Gui<'q, R::Display, R::Scan>, InitError>
where
    R: DeviceRegistry,
    R::Display: DisplayDevice,
    R::Scan: ScanDevice<'q>,
    G: GraphicsRuntime<P::Buffer>,
    P: BufferPool,
{
    if let Err(e) = config.validate() {
        error!("Invalid GUI configuration: {:?}", e);
        return Err(InitError::InvalidConfig);
    }

    if allocator.mode() != config.buffer.mode {
        error!(
            "Allocator mode {:?} does not match configured mode {:?}",
            allocator.mode(),
            config.buffer.mode
        );
        return Err(InitError::InvalidConfig);
    }

    let display = registry.display(&config.display_name).ok_or_else(|| {
        error!("Display device {} not found", config.display_name.as_str());
        InitError::DeviceNotFound
    })?;

    // Sink first so lines logged during init are captured
    if config.log_level != LogLevel::Off {
        runtime.set_log_sink(forward_runtime_log, config.log_level);
    }
    runtime.init();

    let caps = display.capabilities();
    let mut resolution = Resolution::default();
    let draw_buf = allocator.allocate(&config.buffer, &caps, &mut resolution)?;

    let depth = runtime.color_depth();
    let render = RenderBinding::select(caps.pixel_format, depth, caps.screen_info)
        .ok_or_else(|| {
            error!(
                "No render callbacks for {:?} at {} bit color",
                caps.pixel_format,
                depth.bits()
            );
            InitError::UnsupportedDisplay
        })?;

    let driver = DisplayDriver {
        hor_res: resolution.hor_res,
        ver_res: resolution.ver_res,
        draw_buf,
        render,
    };

    runtime.register_display(driver).map_err(|_| {
        error!("Failed to register display device");
        InitError::RegistrationFailed
    })?;

    info!(
        "Display {} registered at {}x{}",
        config.display_name.as_str(),
        resolution.hor_res,
        resolution.ver_res
    );

    let mut gui = Gui::new(display, render, resolution);

    if let Some(pointer) = &config.pointer {
        match queue {
            Some(queue) => match attach_pointer::<R, G, P::Buffer>(registry, runtime, queue, pointer) {
                Ok(input) => gui.attach_pointer(input),
                Err(e) => warn!("Continuing without pointer input: {:?}", e),
            },
            None => warn!("Pointer input configured without an input queue"),
        }
    }

    Ok(gui)
}

fn attach_pointer<'q, R, G, B>(
    registry: &mut R,
    runtime: &mut G,
    queue: &'q dyn InputQueue,
    config: &PointerConfig,
) -> Result<PointerInput<'q, R::Scan>, PointerError>
where
    R: DeviceRegistry,
    R::Scan: ScanDevice<'q>,
    G: GraphicsRuntime<B>,
{
    let mut device = registry.scan(&config.device_name).ok_or_else(|| {
        error!("Scan device {} not found", config.device_name.as_str());
        PointerError::DeviceNotFound
    })?;

    device.configure(queue.as_callback()).map_err(|e| {
        error!("Failed to configure scan device: {:?}", e);
        PointerError::ConfigureFailed
    })?;

    runtime.register_input(InputDriver::pointer()).map_err(|_| {
        error!("Failed to register input device");
        PointerError::RegistrationFailed
    })?;

    if let Err(e) = device.enable_callback() {
        warn!("Failed to enable scan callback: {:?}", e);
    }

    Ok(PointerInput::new(
        device,
        queue.as_source(),
        MapperFlags::from(config),
    ))
}
