//////////////////////////////////////////////////
// Using

use std::ffi::{CStr, CString};
use std::fmt;
use std::rc::Rc;

use crate::error::DemoError;
use crate::gl;
use crate::gl::types::*;

//////////////////////////////////////////////////
// Types

/// Shared handle to the loaded OpenGL function table.
pub type Gl = Rc<dyn Device>;

//////////////////////////////////////////////////
// Device

/// The OpenGL entry points the demo calls, behind safe signatures.
///
/// Every method maps onto exactly one GL call (plus the queries needed to
/// read back strings and logs). Callers must only use a device while its
/// context is current on the calling thread.
pub trait Device: fmt::Debug {
    fn get_error(&self) -> GLenum;

    fn get_string(&self, name: GLenum) -> Option<String>;

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);

    fn clear(&self, mask: GLbitfield);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);

    fn polygon_mode(&self, face: GLenum, mode: GLenum);

    fn gen_vertex_array(&self) -> GLuint;

    fn bind_vertex_array(&self, id: GLuint);

    fn delete_vertex_array(&self, id: GLuint);

    fn gen_buffer(&self) -> GLuint;

    fn bind_buffer(&self, target: GLenum, id: GLuint);

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);

    fn delete_buffer(&self, id: GLuint);

    fn vertex_attrib_pointer(&self, slot: GLuint, components: GLint, kind: GLenum, normalized: GLboolean, stride: GLsizei, offset: usize);

    fn enable_vertex_attrib_array(&self, slot: GLuint);

    fn create_shader(&self, kind: GLenum) -> GLuint;

    fn shader_source(&self, shader: GLuint, source: &CStr);

    fn compile_shader(&self, shader: GLuint);

    fn shader_compile_status(&self, shader: GLuint) -> bool;

    fn shader_info_log(&self, shader: GLuint) -> String;

    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;

    fn attach_shader(&self, program: GLuint, shader: GLuint);

    fn detach_shader(&self, program: GLuint, shader: GLuint);

    fn link_program(&self, program: GLuint);

    fn program_link_status(&self, program: GLuint) -> bool;

    fn program_info_log(&self, program: GLuint) -> String;

    fn use_program(&self, program: GLuint);

    fn delete_program(&self, program: GLuint);

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei);

    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, offset: usize);
}

//////////////////////////////////////////////////
// OpenGL device

/// [`Device`] backed by the generated OpenGL 3.3 core bindings.
pub struct GlDevice {
    gl: gl::Gl,
}

impl GlDevice {
    pub fn load_with<F>(loader: F) -> GlDevice
    where
        F: FnMut(&'static str) -> *const std::ffi::c_void,
    {
        GlDevice { gl: gl::Gl::load_with(loader) }
    }

    /// Loads the bindings and fails if any entry point [`Device`] calls stayed unresolved.
    pub fn try_load_with<F>(loader: F) -> Result<GlDevice, DemoError>
    where
        F: FnMut(&'static str) -> *const std::ffi::c_void,
    {
        let device = GlDevice::load_with(loader);
        let missing = device.missing_entry_points();
        if missing.is_empty() {
            Ok(device)
        } else {
            Err(DemoError::function_loader(format!("unresolved entry points: {}", missing.join(", "))))
        }
    }

    /// Names of the entry points used by [`Device`] that the loader did not resolve.
    pub fn missing_entry_points(&self) -> Vec<&'static str> {
        let gl = &self.gl;
        [
            ("glGetError", gl.GetError.is_loaded()),
            ("glGetString", gl.GetString.is_loaded()),
            ("glClearColor", gl.ClearColor.is_loaded()),
            ("glClear", gl.Clear.is_loaded()),
            ("glViewport", gl.Viewport.is_loaded()),
            ("glPolygonMode", gl.PolygonMode.is_loaded()),
            ("glGenVertexArrays", gl.GenVertexArrays.is_loaded()),
            ("glBindVertexArray", gl.BindVertexArray.is_loaded()),
            ("glDeleteVertexArrays", gl.DeleteVertexArrays.is_loaded()),
            ("glGenBuffers", gl.GenBuffers.is_loaded()),
            ("glBindBuffer", gl.BindBuffer.is_loaded()),
            ("glBufferData", gl.BufferData.is_loaded()),
            ("glDeleteBuffers", gl.DeleteBuffers.is_loaded()),
            ("glVertexAttribPointer", gl.VertexAttribPointer.is_loaded()),
            ("glEnableVertexAttribArray", gl.EnableVertexAttribArray.is_loaded()),
            ("glCreateShader", gl.CreateShader.is_loaded()),
            ("glShaderSource", gl.ShaderSource.is_loaded()),
            ("glCompileShader", gl.CompileShader.is_loaded()),
            ("glGetShaderiv", gl.GetShaderiv.is_loaded()),
            ("glGetShaderInfoLog", gl.GetShaderInfoLog.is_loaded()),
            ("glDeleteShader", gl.DeleteShader.is_loaded()),
            ("glCreateProgram", gl.CreateProgram.is_loaded()),
            ("glAttachShader", gl.AttachShader.is_loaded()),
            ("glDetachShader", gl.DetachShader.is_loaded()),
            ("glLinkProgram", gl.LinkProgram.is_loaded()),
            ("glGetProgramiv", gl.GetProgramiv.is_loaded()),
            ("glGetProgramInfoLog", gl.GetProgramInfoLog.is_loaded()),
            ("glUseProgram", gl.UseProgram.is_loaded()),
            ("glDeleteProgram", gl.DeleteProgram.is_loaded()),
            ("glDrawArrays", gl.DrawArrays.is_loaded()),
            ("glDrawElements", gl.DrawElements.is_loaded()),
        ]
        .into_iter()
        .filter(|(_, loaded)| !loaded)
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlDevice").finish()
    }
}

impl Device for GlDevice {
    fn get_error(&self) -> GLenum {
        unsafe { self.gl.GetError() }
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        unsafe {
            let ptr = self.gl.GetString(name);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned())
            }
        }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.ClearColor(red, green, blue, alpha) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { self.gl.Clear(mask) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { self.gl.Viewport(x, y, width, height) }
    }

    fn polygon_mode(&self, face: GLenum, mode: GLenum) {
        unsafe { self.gl.PolygonMode(face, mode) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut id: GLuint = 0;
        unsafe { self.gl.GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        unsafe { self.gl.BindVertexArray(id) }
    }

    fn delete_vertex_array(&self, id: GLuint) {
        unsafe { self.gl.DeleteVertexArrays(1, &id) }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut id: GLuint = 0;
        unsafe { self.gl.GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        unsafe { self.gl.BindBuffer(target, id) }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe { self.gl.BufferData(target, data.len() as GLsizeiptr, data.as_ptr() as *const _, usage) }
    }

    fn delete_buffer(&self, id: GLuint) {
        unsafe { self.gl.DeleteBuffers(1, &id) }
    }

    fn vertex_attrib_pointer(&self, slot: GLuint, components: GLint, kind: GLenum, normalized: GLboolean, stride: GLsizei, offset: usize) {
        unsafe { self.gl.VertexAttribPointer(slot, components, kind, normalized, stride, offset as *const () as *const _) }
    }

    fn enable_vertex_attrib_array(&self, slot: GLuint) {
        unsafe { self.gl.EnableVertexAttribArray(slot) }
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { self.gl.CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe { self.gl.ShaderSource(shader, 1, [source.as_ptr()].as_ptr(), std::ptr::null()) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { self.gl.CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut status: GLint = 0;
        unsafe { self.gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut length: GLint = 0;
        unsafe { self.gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length) };
        let mut buffer = vec![0u8; length.max(1) as usize];
        let mut written: GLsizei = 0;
        unsafe { self.gl.GetShaderInfoLog(shader, buffer.len() as GLsizei, &mut written, buffer.as_mut_ptr() as *mut _) };
        buffer.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { self.gl.DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { self.gl.CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { self.gl.AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { self.gl.DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { self.gl.LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut status: GLint = 0;
        unsafe { self.gl.GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut length: GLint = 0;
        unsafe { self.gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length) };
        let mut buffer = vec![0u8; length.max(1) as usize];
        let mut written: GLsizei = 0;
        unsafe { self.gl.GetProgramInfoLog(program, buffer.len() as GLsizei, &mut written, buffer.as_mut_ptr() as *mut _) };
        buffer.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn use_program(&self, program: GLuint) {
        unsafe { self.gl.UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { self.gl.DeleteProgram(program) }
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        unsafe { self.gl.DrawArrays(mode, first, count) }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, offset: usize) {
        unsafe { self.gl.DrawElements(mode, count, kind, offset as *const () as *const _) }
    }
}

//////////////////////////////////////////////////
// Helpers

/// Converts shader source into the nul terminated form GL expects.
///
/// Interior nul bytes would truncate the source anyway, so the text is cut
/// at the first one instead of failing.
pub fn to_c_source(source: &str) -> CString {
    let end = source.find('\0').unwrap_or(source.len());
    CString::new(&source[..end]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // never called, only has to be non-null
    fn resolved() -> *const std::ffi::c_void {
        std::ptr::NonNull::<std::ffi::c_void>::dangling().as_ptr()
    }

    #[test]
    fn test_every_entry_point_resolved() {
        let device = GlDevice::try_load_with(|_| resolved());
        assert!(device.is_ok());
    }

    #[test]
    fn test_unresolved_entry_point_is_a_loader_error() {
        let device = GlDevice::try_load_with(|symbol| if symbol.starts_with("glDrawElements") { std::ptr::null() } else { resolved() });
        let Err(err) = device else {
            panic!("glDrawElements was not reported");
        };
        assert_eq!(err, DemoError::function_loader("unresolved entry points: glDrawElements"));
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn test_c_source_stops_at_interior_nul() {
        assert_eq!(to_c_source("void main() {}\0junk").to_str().ok(), Some("void main() {}"));
        assert_eq!(to_c_source("plain").to_str().ok(), Some("plain"));
    }
}
