//////////////////////////////////////////////////
// Module

pub mod app;
pub mod config;
pub mod demo;
pub mod device;
pub mod error;
pub mod graphics;
pub mod input;
pub mod mesh;
pub mod opengl;
pub mod platform;
pub mod shaders;

#[cfg(test)]
mod testing;

//////////////////////////////////////////////////
// OpenGL binding

pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

//////////////////////////////////////////////////
// Prelude

pub mod prelude {
    pub use crate::app::DesktopPlatform;
    pub use crate::config::DemoConfig;
    pub use crate::demo::{DemoState, DrawMode, RenderLoopDemo};
    pub use crate::device::{Device, Gl};
    pub use crate::error::DemoError;
    pub use crate::gl;
    pub use crate::gl::types::*;
    pub use crate::platform::{FramebufferListener, Platform, Window};
    pub use log::LevelFilter;
}

//////////////////////////////////////////////////
// Entry

use log::LevelFilter;

use crate::app::DesktopPlatform;
use crate::config::DemoConfig;
use crate::demo::{DrawMode, RenderLoopDemo};

/// Runs one demo on the desktop and returns its exit status.
pub fn start(config: DemoConfig, mode: DrawMode) -> i32 {
    RenderLoopDemo::new(DesktopPlatform::default(), config, mode).with_logging(LevelFilter::Info).run()
}
