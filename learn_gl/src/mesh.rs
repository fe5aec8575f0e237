//////////////////////////////////////////////////
// Using

use crate::device::Gl;
use crate::gl;
use crate::opengl::{GlIndexBuffer, GlResource, GlShader, GlVertexArrayObject, GlVertexBuffer, VertexAttribute, POSITION_ATTRIBUTE};

//////////////////////////////////////////////////
// Geometry

#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

#[rustfmt::skip]
pub const RECTANGLE_VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0, // top right
     0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5,  0.5, 0.0, // top left
];

#[rustfmt::skip]
pub const RECTANGLE_INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

//////////////////////////////////////////////////
// Definition

/// Literal geometry, before it reaches the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshData {
    pub vertices: &'static [f32],
    pub indices: Option<&'static [u32]>,
}

/// A vertex array with its vertex buffer and, for indexed drawing, its index buffer.
#[derive(Debug, Default)]
pub struct GlMesh {
    vao: GlVertexArrayObject,
    vbo: GlVertexBuffer<f32>,
    ibo: Option<GlIndexBuffer>,
    layout: Option<VertexAttribute>,
}

//////////////////////////////////////////////////
// Implementation

impl MeshData {
    pub const fn triangle() -> Self {
        MeshData {
            vertices: &TRIANGLE_VERTICES,
            indices: None,
        }
    }

    pub const fn rectangle() -> Self {
        MeshData {
            vertices: &RECTANGLE_VERTICES,
            indices: Some(&RECTANGLE_INDICES),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / POSITION_ATTRIBUTE.components as usize
    }
}

impl GlMesh {
    /// Copies the arrays into static GPU buffers and describes them with [`POSITION_ATTRIBUTE`].
    pub fn upload(gl: &Gl, vertices: &[f32], indices: Option<&[u32]>) -> GlMesh {
        let vbo = GlVertexBuffer::new(gl, gl::STATIC_DRAW, vertices);
        let ibo = indices.map(|indices| GlIndexBuffer::new(gl, gl::STATIC_DRAW, indices));

        let mut vao = GlVertexArrayObject::new(gl);
        vao.bind();
        vao.bind_attrib(&vbo, &POSITION_ATTRIBUTE);
        if let Some(ibo) = ibo.as_ref() {
            vao.bind_indices(ibo);
        }
        vao.unbind();

        GlMesh {
            vao,
            vbo,
            ibo,
            layout: Some(POSITION_ATTRIBUTE),
        }
    }

    pub fn vertex_buffer(&self) -> &GlVertexBuffer<f32> {
        &self.vbo
    }

    pub fn index_buffer(&self) -> Option<&GlIndexBuffer> {
        self.ibo.as_ref()
    }

    pub fn layout(&self) -> Option<&VertexAttribute> {
        self.layout.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.layout.map(|layout| self.vbo.count() / layout.components as usize).unwrap_or(0)
    }

    /// Draws the whole mesh as triangles with `shader`, indexed when an index buffer exists.
    pub fn draw(&mut self, shader: &mut GlShader) {
        shader.bind();
        self.vao.bind();
        match self.ibo.as_ref() {
            Some(ibo) => shader.draw_elements(gl::TRIANGLES, ibo.count()),
            None => shader.draw_arrays(gl::TRIANGLES, self.vertex_count()),
        }
        self.vao.unbind();
    }
}

impl GlResource for GlMesh {
    fn release(&mut self) {
        self.vao.release();
        self.vbo.release();
        if let Some(ibo) = self.ibo.as_mut() {
            ibo.release();
        }
        self.layout = None;
    }
}
impl Drop for GlMesh {
    fn drop(&mut self) {
        self.release()
    }
}
