//////////////////////////////////////////////////
// Using

use std::ffi::CString;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext, Version};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

use crate::config::DemoConfig;
use crate::device::{Gl, GlDevice};
use crate::error::DemoError;
use crate::input::{Key, KeyboardState};
use crate::platform::{FramebufferListener, Platform, Window};

//////////////////////////////////////////////////
// Definition

/// glutin + winit windowing for desktop targets.
#[derive(Default)]
pub struct DesktopPlatform {
    display: Option<Display>,
}

pub struct DesktopWindow {
    // dropped in declaration order: surface and context go before the window
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: winit::window::Window,
    event_loop: EventLoop<()>,
    keyboard: KeyboardState,
    should_close: bool,
}

/// Collects what one pump of the event loop delivered.
struct EventPump<'a> {
    keyboard: &'a mut KeyboardState,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

//////////////////////////////////////////////////
// Implementations

impl Platform for DesktopPlatform {
    type Window = DesktopWindow;

    fn create_window(&mut self, config: &DemoConfig) -> Result<DesktopWindow, DemoError> {
        let event_loop = EventLoop::new().map_err(DemoError::window_creation)?;

        let attributes = winit::window::Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let template = ConfigTemplateBuilder::new().with_alpha_size(8).with_transparency(cfg!(cgl_backend));
        let display_builder = DisplayBuilder::new().with_window_attributes(Some(attributes));

        let (window, gl_config) = display_builder.build(&event_loop, template, gl_config_picker).map_err(DemoError::window_creation)?;
        let window = window.ok_or_else(|| DemoError::window_creation("display did not create a window"))?;
        log::debug!("Picked a config with {} samples", gl_config.num_samples());

        let not_current = create_gl_context(&window, &gl_config, config.gl_version)?;
        let attrs = window.build_surface_attributes(Default::default()).map_err(DemoError::window_creation)?;
        let surface = unsafe { gl_config.display().create_window_surface(&gl_config, &attrs) }.map_err(DemoError::window_creation)?;
        let context = not_current.make_current(&surface).map_err(DemoError::window_creation)?;

        if config.vsync {
            if let Err(res) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                log::error!("Error setting vsync: {res:?}");
            }
        }

        self.display = Some(gl_config.display());
        log::info!("Created window \"{}\" ({} x {})", config.title, config.width, config.height);

        Ok(DesktopWindow {
            surface,
            context,
            window,
            event_loop,
            keyboard: KeyboardState::default(),
            should_close: false,
        })
    }

    fn load_device(&mut self, window: &mut DesktopWindow) -> Result<Gl, DemoError> {
        let display = window.context.display();

        let device = GlDevice::try_load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        })?;
        log::debug!("Loaded OpenGL functions");
        let gl: Gl = Rc::new(device);
        Ok(gl)
    }

    fn terminate(&mut self) {
        // NOTE: nvidia on Wayland touches the display from its exit hook, so EGL
        // displays are terminated explicitly once every window is gone.
        let _gl_display = self.display.take();

        #[cfg(egl_backend)]
        #[allow(irrefutable_let_patterns)]
        if let Some(Display::Egl(display)) = _gl_display {
            unsafe {
                display.terminate();
            }
        }
    }
}

impl Window for DesktopWindow {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keyboard.is_pressed(key)
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn swap_buffers(&mut self) {
        if let Err(err) = self.surface.swap_buffers(&self.context) {
            log::error!("Failed to swap buffers: {}", err);
        }
    }

    fn poll_events(&mut self, listener: &mut dyn FramebufferListener) {
        let mut pump = EventPump {
            keyboard: &mut self.keyboard,
            close_requested: false,
            resized: None,
        };
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);
        let EventPump { close_requested, resized, .. } = pump;

        if close_requested || matches!(status, PumpStatus::Exit(_)) {
            self.should_close = true;
        }

        // Some platforms like EGL require resizing GL surface to update the size
        if let Some(size) = resized {
            if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                self.surface.resize(&self.context, width, height);
                listener.framebuffer_resized(size.width, size.height);
            }
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.apply(event.into()),
            WindowEvent::Focused(false) => self.keyboard.clear(),
            WindowEvent::Resized(size) if size.width != 0 && size.height != 0 => self.resized = Some(size),
            WindowEvent::CloseRequested => self.close_requested = true,
            _ => (),
        }
    }
}

//////////////////////////////////////////////////
// Helpers

pub fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            let transparency_check = config.supports_transparency().unwrap_or(false) & !accum.supports_transparency().unwrap_or(false);
            if transparency_check || config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("Display offered no GL config")
}

fn create_gl_context(window: &winit::window::Window, gl_config: &Config, (major, minor): (u8, u8)) -> Result<NotCurrentContext, DemoError> {
    let raw_window_handle = window.window_handle().ok().map(|wh| wh.as_raw());

    let context_attributes = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .build(raw_window_handle);

    let gl_display = gl_config.display();
    unsafe { gl_display.create_context(gl_config, &context_attributes) }.map_err(DemoError::window_creation)
}
