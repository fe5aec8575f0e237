//////////////////////////////////////////////////
// Using

use log::LevelFilter;

use crate::config::DemoConfig;
use crate::device::Gl;
use crate::error::DemoError;
use crate::graphics::Renderer;
use crate::input::Key;
use crate::mesh::{GlMesh, MeshData};
use crate::opengl::{GlResource, GlShader};
use crate::platform::{Platform, Window};
use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

//////////////////////////////////////////////////
// Definition

/// What a demo uploads at start and draws every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Clear only.
    Window,
    /// Uploads the triangle but has no shader, so nothing is drawn.
    Triangle,
    /// Draws the triangle with the orange shader.
    ShadedTriangle,
    /// Draws the rectangle from an index buffer with the orange shader.
    IndexedRectangle,
}

/// Lifecycle of a demo run. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DemoState {
    Uninitialized,
    Running,
    Closing,
    Terminated,
}

pub struct RenderLoopDemo<P: Platform> {
    platform: P,
    config: DemoConfig,
    mode: DrawMode,
    state: DemoState,
    window: Option<P::Window>,
    renderer: Option<Renderer>,
    shader: Option<GlShader>,
    mesh: Option<GlMesh>,
}

//////////////////////////////////////////////////
// Implementation

impl DrawMode {
    pub fn mesh(&self) -> Option<MeshData> {
        match self {
            DrawMode::Window => None,
            DrawMode::Triangle | DrawMode::ShadedTriangle => Some(MeshData::triangle()),
            DrawMode::IndexedRectangle => Some(MeshData::rectangle()),
        }
    }

    pub fn uses_shader(&self) -> bool {
        matches!(self, DrawMode::ShadedTriangle | DrawMode::IndexedRectangle)
    }
}

impl<P: Platform> RenderLoopDemo<P> {
    pub fn new(platform: P, config: DemoConfig, mode: DrawMode) -> Self {
        RenderLoopDemo {
            platform,
            config,
            mode,
            state: DemoState::Uninitialized,
            window: None,
            renderer: None,
            shader: None,
            mesh: None,
        }
    }

    pub fn with_logging(self, level_filter: LevelFilter) -> Self {
        // a second demo in the same process keeps the first logger
        let _ = env_logger::builder()
            .filter_level(level_filter) // Default Log Level
            .parse_default_env()
            .try_init();
        self
    }

    pub fn state(&self) -> DemoState {
        self.state
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    pub fn shader(&self) -> Option<&GlShader> {
        self.shader.as_ref()
    }

    pub fn mesh(&self) -> Option<&GlMesh> {
        self.mesh.as_ref()
    }

    /// Runs the whole demo and returns the process exit status.
    pub fn run(&mut self) -> i32 {
        log::info!("Initializing application...");
        if let Err(err) = self.initialize() {
            log::error!("{}", err);
            return err.exit_code();
        }

        self.setup_resources();

        log::info!("Running render loop...");
        self.run_loop();

        log::info!("Exiting application...");
        self.shutdown();
        0
    }

    /// Opens the window, makes its context current and loads the GL functions.
    ///
    /// On failure the platform is terminated and the demo ends up in
    /// [`DemoState::Terminated`] without ever running the loop. A demo that
    /// already left [`DemoState::Uninitialized`] cannot be initialized again.
    pub fn initialize(&mut self) -> Result<(), DemoError> {
        if self.state != DemoState::Uninitialized {
            return Err(DemoError::AlreadyStarted(self.state));
        }

        let mut window = match self.platform.create_window(&self.config) {
            Ok(window) => window,
            Err(err) => {
                self.abort();
                return Err(err);
            }
        };
        let gl = match self.platform.load_device(&mut window) {
            Ok(gl) => gl,
            Err(err) => {
                drop(window);
                self.abort();
                return Err(err);
            }
        };

        self.renderer = Some(Renderer::new(&gl, &self.config, window.framebuffer_size()));
        self.window = Some(window);
        self.transition(DemoState::Running);
        Ok(())
    }

    /// Builds whatever the draw mode needs.
    pub fn setup_resources(&mut self) {
        let Some(gl) = self.renderer.as_ref().map(|renderer| renderer.gl().clone()) else {
            log::warn!("No device to create resources on");
            return;
        };
        if self.mode.uses_shader() {
            self.shader = Some(Self::build_shader_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER));
        }
        if let Some(mesh) = self.mode.mesh() {
            self.mesh = Some(Self::upload_mesh(&gl, mesh.vertices, mesh.indices));
        }
    }

    /// Compiles and links a program. Failures are logged, never fatal.
    pub fn build_shader_program(gl: &Gl, vertex_source: &str, fragment_source: &str) -> GlShader {
        GlShader::new(gl, vertex_source, fragment_source)
    }

    pub fn upload_mesh(gl: &Gl, vertices: &[f32], indices: Option<&[u32]>) -> GlMesh {
        GlMesh::upload(gl, vertices, indices)
    }

    /// Clears, draws and presents frames until the window's close flag is set.
    pub fn run_loop(&mut self) {
        let (Some(window), Some(renderer)) = (self.window.as_mut(), self.renderer.as_mut()) else {
            log::warn!("Render loop started without a window");
            return;
        };

        while !window.should_close() {
            // input
            if window.is_key_pressed(Key::Escape) {
                log::debug!("Escape pressed, closing window");
                window.set_should_close(true);
            }

            // render
            renderer.clear();
            if let (Some(shader), Some(mesh)) = (self.shader.as_mut(), self.mesh.as_mut()) {
                mesh.draw(shader);
            }

            window.swap_buffers();
            window.poll_events(renderer);
        }

        self.transition(DemoState::Closing);
    }

    /// Resets the viewport to cover `width` x `height` from the origin.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    /// Releases every GL resource, then the window, then the platform.
    pub fn shutdown(&mut self) {
        if self.state == DemoState::Terminated {
            return;
        }
        if let Some(mut mesh) = self.mesh.take() {
            mesh.release();
        }
        if let Some(mut shader) = self.shader.take() {
            shader.release();
        }
        self.renderer = None;
        self.window = None;
        self.platform.terminate();
        self.transition(DemoState::Terminated);
    }

    fn abort(&mut self) {
        self.platform.terminate();
        self.transition(DemoState::Terminated);
    }

    fn transition(&mut self, next: DemoState) {
        if next <= self.state {
            log::warn!("Refusing state change {:?} -> {:?}", self.state, next);
            return;
        }
        log::debug!("State {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<P: Platform> Drop for RenderLoopDemo<P> {
    fn drop(&mut self) {
        if self.state != DemoState::Uninitialized {
            self.shutdown();
        }
    }
}
