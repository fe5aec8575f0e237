//////////////////////////////////////////////////
// Using

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;

use crate::device::{to_c_source, Gl};
use crate::gl;
use crate::gl::types::*;

//////////////////////////////////////////////////
// Resources

#[allow(drop_bounds)]
pub trait GlResource: Drop {
    fn release(&mut self);
}

/// How one shader input reads its bytes out of a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub slot: GLuint,
    pub components: GLint,
    pub kind: GLenum,
    pub normalized: bool,
    pub stride: usize,
    pub offset: usize,
}

/// `layout (location = 0) in vec3`: three tightly packed floats per vertex.
pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    slot: 0,
    components: 3,
    kind: gl::FLOAT,
    normalized: false,
    stride: 3 * size_of::<f32>(),
    offset: 0,
};

#[derive(Debug, Default)]
pub struct GlVertexArrayObject {
    gl: Option<Gl>,
    id: GLuint,
}

#[derive(Debug)]
pub struct GlVertexBuffer<T: Pod> {
    gl: Option<Gl>,
    id: GLuint,
    count: usize,
    phantom: PhantomData<T>,
}

#[derive(Debug, Default)]
pub struct GlIndexBuffer {
    gl: Option<Gl>,
    id: GLuint,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Non-fatal problem reported while building a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderDiagnostic {
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}

#[derive(Debug, Default)]
pub struct GlShader {
    gl: Option<Gl>,
    program: GLuint,
    linked: bool,
    diagnostics: Vec<ShaderDiagnostic>,
}

//////////////////////////////////////////////////
// Vertex Array Object

impl GlVertexArrayObject {
    pub fn new(gl: &Gl) -> GlVertexArrayObject {
        let id = gl.gen_vertex_array();
        if !check_error(gl, "Failed to create vertex array object") {
            log::debug!("Created vertex array object {}", id);
        }
        GlVertexArrayObject { gl: Some(gl.clone()), id }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&mut self) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.bind_vertex_array(self.id);
        check_error(gl, "Failed to bind vertex array");
    }

    pub fn unbind(&mut self) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.bind_vertex_array(0);
        check_error(gl, "Failed to unbind vertex array");
    }

    /// Points `attribute.slot` at `vbo`. The vertex array must be bound.
    pub fn bind_attrib<T: Pod>(&mut self, vbo: &GlVertexBuffer<T>, attribute: &VertexAttribute) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        let normalized = if attribute.normalized { gl::TRUE } else { gl::FALSE };
        gl.bind_buffer(gl::ARRAY_BUFFER, vbo.id);
        check_error(gl, "Failed to bind vertex buffer");
        gl.vertex_attrib_pointer(attribute.slot, attribute.components, attribute.kind, normalized, attribute.stride as GLsizei, attribute.offset);
        check_error(gl, "Failed to set vertex attrib");
        gl.enable_vertex_attrib_array(attribute.slot);
        check_error(gl, "Failed to enable vertex attrib");
        gl.bind_buffer(gl::ARRAY_BUFFER, 0);
    }

    /// Records `ibo` as the element buffer of this vertex array. The vertex array must be bound.
    pub fn bind_indices(&mut self, ibo: &GlIndexBuffer) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, ibo.id);
        check_error(gl, "Failed to bind index buffer");
    }
}

//////////////////////////////////////////////////
// Vertex Buffer

impl<T: Pod> GlVertexBuffer<T> {
    pub fn new(gl: &Gl, usage: GLenum, data: &[T]) -> GlVertexBuffer<T> {
        let id = gl.gen_buffer();
        gl.bind_buffer(gl::ARRAY_BUFFER, id);
        gl.buffer_data(gl::ARRAY_BUFFER, bytemuck::cast_slice(data), usage);
        gl.bind_buffer(gl::ARRAY_BUFFER, 0);
        if !check_error(gl, "Failed to create vertex buffer") {
            log::debug!("Created vertex buffer {} ({} bytes)", id, data.len() * size_of::<T>());
        }
        GlVertexBuffer {
            gl: Some(gl.clone()),
            id,
            count: data.len(),
            phantom: PhantomData,
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn byte_len(&self) -> usize {
        self.count * size_of::<T>()
    }
}

impl<T: Pod> Default for GlVertexBuffer<T> {
    fn default() -> Self {
        GlVertexBuffer {
            gl: None,
            id: 0,
            count: 0,
            phantom: PhantomData,
        }
    }
}

//////////////////////////////////////////////////
// Index Buffer

impl GlIndexBuffer {
    pub fn new(gl: &Gl, usage: GLenum, indices: &[u32]) -> GlIndexBuffer {
        let id = gl.gen_buffer();
        gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, id);
        gl.buffer_data(gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), usage);
        gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        if !check_error(gl, "Failed to create index buffer") {
            log::debug!("Created index buffer {} ({} indices)", id, indices.len());
        }
        GlIndexBuffer {
            gl: Some(gl.clone()),
            id,
            count: indices.len(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

//////////////////////////////////////////////////
// Shader

impl ShaderStage {
    fn kind(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "Vertex"),
            ShaderStage::Fragment => write!(f, "Fragment"),
        }
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderDiagnostic::Compile { stage, log } => write!(f, "{} shader compilation failed: {}", stage, log.trim_end()),
            ShaderDiagnostic::Link { log } => write!(f, "Shader program linking failed: {}", log.trim_end()),
        }
    }
}

impl GlShader {
    /// Compiles both stages and links them.
    ///
    /// Compile and link failures are logged and kept as diagnostics; the
    /// program handle is returned either way and simply renders nothing useful.
    pub fn new(gl: &Gl, vert: &str, frag: &str) -> GlShader {
        let mut diagnostics = Vec::new();

        let vs = compile_stage(gl, ShaderStage::Vertex, vert, &mut diagnostics);
        let fs = compile_stage(gl, ShaderStage::Fragment, frag, &mut diagnostics);

        let program = gl.create_program();
        if !check_error(gl, "Failed to create shader program") {
            log::debug!("Created shader program {}", program);
        }

        gl.attach_shader(program, vs);
        if !check_error(gl, "Failed to attach vertex shader") {
            log::debug!("Attached vertex shader {} to program {}", vs, program);
        }
        gl.attach_shader(program, fs);
        if !check_error(gl, "Failed to attach fragment shader") {
            log::debug!("Attached fragment shader {} to program {}", fs, program);
        }

        gl.link_program(program);
        let linked = gl.program_link_status(program);
        if linked {
            log::debug!("Linked program {}", program);
        } else {
            let diagnostic = ShaderDiagnostic::Link { log: gl.program_info_log(program) };
            log::error!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }

        // stage objects are not needed once linked
        for shader in [vs, fs] {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
            if !check_error(gl, "Failed to destroy shaders") {
                log::debug!("Deleted shader {}", shader);
            }
        }

        GlShader {
            gl: Some(gl.clone()),
            program,
            linked,
            diagnostics,
        }
    }

    pub fn program(&self) -> GLuint {
        self.program
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    pub fn bind(&mut self) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.use_program(self.program);
        check_error(gl, "Failed to bind program");
    }

    pub fn draw_arrays(&mut self, mode: GLenum, vertex_count: usize) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.draw_arrays(mode, 0, vertex_count as GLsizei);
        check_error(gl, "Failed to draw");
    }

    pub fn draw_elements(&mut self, mode: GLenum, index_count: usize) {
        let gl = self.gl.as_ref().expect("Missing OpenGL Context!");
        gl.draw_elements(mode, index_count as GLsizei, gl::UNSIGNED_INT, 0);
        check_error(gl, "Failed to draw");
    }
}

fn compile_stage(gl: &Gl, stage: ShaderStage, source: &str, diagnostics: &mut Vec<ShaderDiagnostic>) -> GLuint {
    let shader = gl.create_shader(stage.kind());
    if !check_error(gl, "Failed to create shaders") {
        log::debug!("Created {} shader {}", stage, shader);
    }

    gl.shader_source(shader, &to_c_source(source));
    gl.compile_shader(shader);
    if gl.shader_compile_status(shader) {
        log::debug!("Compiled {} shader {}", stage, shader);
    } else {
        let diagnostic = ShaderDiagnostic::Compile { stage, log: gl.shader_info_log(shader) };
        log::error!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }
    shader
}

//////////////////////////////////////////////////
// Trait Impl GlResource

impl GlResource for GlVertexArrayObject {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            gl.delete_vertex_array(self.id);
            if !check_error(gl, "Failed to release vertex array object") {
                log::debug!("Deleted vertex array object {}", self.id)
            }
        }
        self.gl = None;
    }
}
impl Drop for GlVertexArrayObject {
    fn drop(&mut self) {
        self.release()
    }
}

impl<T: Pod> GlResource for GlVertexBuffer<T> {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            gl.delete_buffer(self.id);
            if !check_error(gl, "Failed to release vertex buffer") {
                log::debug!("Deleted vertex buffer {}", self.id)
            }
        }
        self.gl = None;
    }
}
impl<T: Pod> Drop for GlVertexBuffer<T> {
    fn drop(&mut self) {
        self.release()
    }
}

impl GlResource for GlIndexBuffer {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            gl.delete_buffer(self.id);
            if !check_error(gl, "Failed to release index buffer") {
                log::debug!("Deleted index buffer {}", self.id);
            }
        }
        self.gl = None;
    }
}
impl Drop for GlIndexBuffer {
    fn drop(&mut self) {
        self.release()
    }
}

impl GlResource for GlShader {
    fn release(&mut self) {
        if let Some(gl) = self.gl.as_ref() {
            gl.delete_program(self.program);
            if !check_error(gl, "Failed to destroy shaders") {
                log::debug!("Deleted program {}", self.program);
            }
        }
        self.gl = None;
    }
}
impl Drop for GlShader {
    fn drop(&mut self) {
        self.release()
    }
}

//////////////////////////////////////////////////
// Check error call

/// Drains the GL error queue, logging every code. Returns true if anything was queued.
#[inline]
#[cfg(debug_assertions)]
pub fn check_error(gl: &Gl, description: &str) -> bool {
    let mut err = gl.get_error();
    let mut has_error = false;
    while err != gl::NO_ERROR {
        log::error!("{}. ErrorCode {}", description, err);
        err = gl.get_error();
        has_error = true;
    }
    has_error
}

#[inline]
#[cfg(not(debug_assertions))]
pub fn check_error(_gl: &Gl, _description: &str) -> bool {
    false
}
