use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Checks the data against the attributes without touching GL.
    pub fn layout(&self) -> Result<VertexLayout, GBError> {
        let components: usize = self.attributes.iter().map(|a| a.size()).sum();

        if components == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.is_empty() || self.data.len() % components != 0 {
            return Err(GBError::InvalidDataLength);
        }

        Ok(VertexLayout {
            components,
            vertices: self.data.len() / components,
        })
    }

    /// Uploads the data once into a static buffer and records the attribute
    /// layout in a fresh vertex array. Both are unbound afterwards.
    pub fn build(self) -> Result<Geometry, GBError> {
        let layout = self.layout()?;

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    layout.stride_bytes() as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        log::debug!(
            "uploaded {} vertices into buffer {vbo} (vertex array {vao})",
            layout.vertices
        );

        Ok(Geometry {
            vao,
            vbo,
            vertices: layout.vertices,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Floats per vertex.
    pub components: usize,
    pub vertices: usize,
}

impl VertexLayout {
    pub fn stride_bytes(&self) -> usize {
        self.components * std::mem::size_of::<f32>()
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    vertices: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }
    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        log::trace!("deleting vertex array {} and buffer {}", self.vao, self.vbo);
        unsafe {
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
        }
    }
}
