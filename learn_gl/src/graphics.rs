//////////////////////////////////////////////////
// Using

use crate::config::DemoConfig;
use crate::device::Gl;
use crate::gl;
use crate::gl::types::*;
use crate::opengl::check_error;
use crate::platform::FramebufferListener;

//////////////////////////////////////////////////
// Definition

/// Window region normalized device coordinates are mapped onto.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: GLint,
    pub y: GLint,
    pub width: GLsizei,
    pub height: GLsizei,
}

/// Per-context render state: the device, its viewport and the clear colour.
#[derive(Debug)]
pub struct Renderer {
    gl: Gl,
    viewport: Viewport,
    clear_color: [f32; 4],
}

//////////////////////////////////////////////////
// Implementation

impl Viewport {
    pub fn full(width: u32, height: u32) -> Viewport {
        Viewport {
            x: 0,
            y: 0,
            width: width as GLsizei,
            height: height as GLsizei,
        }
    }
}

impl Renderer {
    /// Logs the driver strings and sets up the viewport for a `size` drawable.
    pub fn new(gl: &Gl, config: &DemoConfig, (width, height): (u32, u32)) -> Renderer {
        if let Some(renderer) = gl.get_string(gl::RENDERER) {
            log::info!("Running on {}", renderer);
        }
        if let Some(version) = gl.get_string(gl::VERSION) {
            log::info!("OpenGL Version {}", version);
        }
        if let Some(shaders_version) = gl.get_string(gl::SHADING_LANGUAGE_VERSION) {
            log::info!("Shaders version on {}", shaders_version);
        }

        let mut renderer = Renderer {
            gl: gl.clone(),
            viewport: Viewport::default(),
            clear_color: config.clear_color,
        };
        renderer.resize(width, height);
        renderer.set_wireframe(config.wireframe);
        renderer
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Makes the viewport cover the whole `width` x `height` drawable.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::full(width, height);
        log::debug!("Viewport resized to {} x {}", width, height);

        let Viewport { x, y, width, height } = self.viewport;
        self.gl.viewport(x, y, width, height);
        check_error(&self.gl, "Failed to set viewport");
    }

    pub fn clear(&self) {
        let [red, green, blue, alpha] = self.clear_color;
        self.gl.clear_color(red, green, blue, alpha);
        self.gl.clear(gl::COLOR_BUFFER_BIT);
        check_error(&self.gl, "Failed to clear");
    }

    pub fn set_wireframe(&self, enabled: bool) {
        if enabled {
            self.gl.polygon_mode(gl::FRONT_AND_BACK, gl::LINE);
            log::debug!("Wireframe mode enabled");
        } else {
            self.gl.polygon_mode(gl::FRONT_AND_BACK, gl::FILL);
        }
        check_error(&self.gl, "Failed to set polygon mode");
    }
}

impl FramebufferListener for Renderer {
    fn framebuffer_resized(&mut self, width: u32, height: u32) {
        self.resize(width, height);
    }
}
