//////////////////////////////////////////////////
// Using

use crate::config::DemoConfig;
use crate::device::Gl;
use crate::error::DemoError;
use crate::input::Key;

//////////////////////////////////////////////////
// Traits

/// Receives drawable size changes while a window is polling its events.
pub trait FramebufferListener {
    fn framebuffer_resized(&mut self, width: u32, height: u32);
}

/// Windowing system able to open one window with a current OpenGL context.
pub trait Platform {
    type Window: Window;

    /// Creates the window and makes its context current.
    fn create_window(&mut self, config: &DemoConfig) -> Result<Self::Window, DemoError>;

    /// Resolves the OpenGL entry points for the window's current context.
    fn load_device(&mut self, window: &mut Self::Window) -> Result<Gl, DemoError>;

    /// Shuts the windowing system down. Windows must be dropped before.
    fn terminate(&mut self);
}

pub trait Window {
    /// Whether `key` is held down as of the last poll.
    fn is_key_pressed(&self, key: Key) -> bool;

    fn should_close(&self) -> bool;

    fn set_should_close(&mut self, value: bool);

    fn swap_buffers(&mut self);

    /// Processes pending events without blocking. Resizes are forwarded to
    /// `listener` before this returns.
    fn poll_events(&mut self, listener: &mut dyn FramebufferListener);

    fn framebuffer_size(&self) -> (u32, u32);
}
