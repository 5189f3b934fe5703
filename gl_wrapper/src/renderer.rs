use crate::geometry::Geometry;
use crate::program::Program;

pub struct GlRenderer {
    draw_calls: u64,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { draw_calls: 0 }
    }

    /// Non-indexed triangle list draw of the first `count` vertices.
    pub fn draw(&mut self, geometry: &Geometry, program: &Program, count: usize) {
        debug_assert!(count <= geometry.vertices());

        unsafe {
            gl::UseProgram(program.get_id());
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(gl::TRIANGLES, 0, count as i32);
        }

        self.draw_calls += 1;
    }

    pub fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe {
            gl::Viewport(x, y, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn set_wireframe(&self, enabled: bool) {
        let mode = if enabled { gl::LINE } else { gl::FILL };

        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
        }
    }

    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
