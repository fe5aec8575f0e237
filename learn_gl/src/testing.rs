//! Test doubles for the GL device and the windowing system.

//////////////////////////////////////////////////
// Using

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::ffi::CStr;
use std::rc::Rc;

use crate::config::DemoConfig;
use crate::device::{Device, Gl};
use crate::error::DemoError;
use crate::gl;
use crate::gl::types::*;
use crate::input::Key;
use crate::platform::{FramebufferListener, Platform, Window};

//////////////////////////////////////////////////
// Recording device

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    Viewport(GLint, GLint, GLsizei, GLsizei),
    PolygonMode(GLenum, GLenum),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    GenBuffer(GLuint),
    BindBuffer(GLenum, GLuint),
    BufferData { target: GLenum, size: usize, usage: GLenum },
    DeleteBuffer(GLuint),
    VertexAttribPointer { slot: GLuint, components: GLint, kind: GLenum, normalized: GLboolean, stride: GLsizei, offset: usize },
    EnableVertexAttribArray(GLuint),
    CreateShader(GLenum, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    DetachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    DrawArrays { mode: GLenum, first: GLint, count: GLsizei },
    DrawElements { mode: GLenum, count: GLsizei, kind: GLenum, offset: usize },
}

/// Records every call. Sources without a `#version` line fail to compile,
/// and programs with a failed stage fail to link.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<GLuint>,
    compiled: RefCell<HashMap<GLuint, bool>>,
    sources: RefCell<HashMap<GLuint, String>>,
    attached: RefCell<HashMap<GLuint, Vec<GLuint>>>,
    linked: RefCell<HashMap<GLuint, bool>>,
}

impl RecordingDevice {
    pub fn new() -> Rc<RecordingDevice> {
        Rc::new(RecordingDevice::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn filter(&self, predicate: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.calls.borrow().iter().filter(|call| predicate(call)).cloned().collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Device for RecordingDevice {
    fn get_error(&self) -> GLenum {
        gl::NO_ERROR
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        match name {
            gl::RENDERER => Some("Recording renderer".to_owned()),
            gl::VERSION => Some("3.3.0 Core".to_owned()),
            gl::SHADING_LANGUAGE_VERSION => Some("3.30".to_owned()),
            _ => None,
        }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(Call::Clear(mask));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn polygon_mode(&self, face: GLenum, mode: GLenum) {
        self.record(Call::PolygonMode(face, mode));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let id = self.next_id();
        self.record(Call::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        self.record(Call::BindVertexArray(id));
    }

    fn delete_vertex_array(&self, id: GLuint) {
        self.record(Call::DeleteVertexArray(id));
    }

    fn gen_buffer(&self) -> GLuint {
        let id = self.next_id();
        self.record(Call::GenBuffer(id));
        id
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        self.record(Call::BindBuffer(target, id));
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        self.record(Call::BufferData { target, size: data.len(), usage });
    }

    fn delete_buffer(&self, id: GLuint) {
        self.record(Call::DeleteBuffer(id));
    }

    fn vertex_attrib_pointer(&self, slot: GLuint, components: GLint, kind: GLenum, normalized: GLboolean, stride: GLsizei, offset: usize) {
        self.record(Call::VertexAttribPointer {
            slot,
            components,
            kind,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, slot: GLuint) {
        self.record(Call::EnableVertexAttribArray(slot));
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        let id = self.next_id();
        self.record(Call::CreateShader(kind, id));
        id
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        self.sources.borrow_mut().insert(shader, source.to_string_lossy().into_owned());
    }

    fn compile_shader(&self, shader: GLuint) {
        let ok = self.sources.borrow().get(&shader).map(|source| source.contains("#version")).unwrap_or(false);
        self.compiled.borrow_mut().insert(shader, ok);
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.compiled.borrow().get(&shader).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "0:1(1): error: syntax error, unexpected IDENTIFIER\n".to_owned()
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let id = self.next_id();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.attached.borrow_mut().entry(program).or_default().push(shader);
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(shaders) = self.attached.borrow_mut().get_mut(&program) {
            shaders.retain(|attached| *attached != shader);
        }
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        let ok = self
            .attached
            .borrow()
            .get(&program)
            .map(|shaders| !shaders.is_empty() && shaders.iter().all(|shader| self.shader_compile_status(*shader)))
            .unwrap_or(false);
        self.linked.borrow_mut().insert(program, ok);
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.linked.borrow().get(&program).copied().unwrap_or(false)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            "error: linking with uncompiled/unspecialized shader\n".to_owned()
        }
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        self.record(Call::DrawArrays { mode, first, count });
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, offset: usize) {
        self.record(Call::DrawElements { mode, count, kind, offset });
    }
}

//////////////////////////////////////////////////
// Scripted platform

/// Window state delivered by one `poll_events` call.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Frame {
    pub escape: bool,
    pub close: bool,
    pub resize: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    WindowCreated,
    DeviceLoaded,
    Swap,
    Poll,
    WindowDropped,
    Terminated,
}

pub type PlatformLog = Rc<RefCell<Vec<PlatformEvent>>>;

/// Platform whose failures and window events are scripted up front.
/// A window closes itself once its script runs out.
#[derive(Debug)]
pub struct ScriptedPlatform {
    pub fail_window: bool,
    pub fail_loader: bool,
    device: Rc<RecordingDevice>,
    frames: Vec<Frame>,
    log: PlatformLog,
}

#[derive(Debug)]
pub struct ScriptedWindow {
    frames: VecDeque<Frame>,
    current: Frame,
    size: (u32, u32),
    should_close: bool,
    log: PlatformLog,
}

impl ScriptedPlatform {
    pub fn new(frames: Vec<Frame>) -> ScriptedPlatform {
        ScriptedPlatform {
            fail_window: false,
            fail_loader: false,
            device: RecordingDevice::new(),
            frames,
            log: Rc::default(),
        }
    }

    pub fn failing_window() -> ScriptedPlatform {
        ScriptedPlatform { fail_window: true, ..Self::new(Vec::new()) }
    }

    pub fn failing_loader() -> ScriptedPlatform {
        ScriptedPlatform { fail_loader: true, ..Self::new(Vec::new()) }
    }

    pub fn device(&self) -> Rc<RecordingDevice> {
        self.device.clone()
    }

    pub fn log(&self) -> PlatformLog {
        self.log.clone()
    }
}

impl Platform for ScriptedPlatform {
    type Window = ScriptedWindow;

    fn create_window(&mut self, config: &DemoConfig) -> Result<ScriptedWindow, DemoError> {
        if self.fail_window {
            return Err(DemoError::window_creation("scripted failure"));
        }
        self.log.borrow_mut().push(PlatformEvent::WindowCreated);
        Ok(ScriptedWindow {
            frames: self.frames.iter().copied().collect(),
            current: Frame::default(),
            size: (config.width, config.height),
            should_close: false,
            log: self.log.clone(),
        })
    }

    fn load_device(&mut self, _window: &mut ScriptedWindow) -> Result<Gl, DemoError> {
        if self.fail_loader {
            return Err(DemoError::function_loader("scripted failure"));
        }
        self.log.borrow_mut().push(PlatformEvent::DeviceLoaded);
        let gl: Gl = self.device.clone();
        Ok(gl)
    }

    fn terminate(&mut self) {
        self.log.borrow_mut().push(PlatformEvent::Terminated);
    }
}

impl Window for ScriptedWindow {
    fn is_key_pressed(&self, key: Key) -> bool {
        key == Key::Escape && self.current.escape
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }

    fn swap_buffers(&mut self) {
        self.log.borrow_mut().push(PlatformEvent::Swap);
    }

    fn poll_events(&mut self, listener: &mut dyn FramebufferListener) {
        self.log.borrow_mut().push(PlatformEvent::Poll);
        match self.frames.pop_front() {
            Some(frame) => {
                self.current = frame;
                if let Some((width, height)) = frame.resize {
                    self.size = (width, height);
                    listener.framebuffer_resized(width, height);
                }
                if frame.close {
                    self.should_close = true;
                }
            }
            None => self.should_close = true,
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }
}

impl Drop for ScriptedWindow {
    fn drop(&mut self) {
        self.log.borrow_mut().push(PlatformEvent::WindowDropped);
    }
}
