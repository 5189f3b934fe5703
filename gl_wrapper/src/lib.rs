/// Two independent triangles, three floats per vertex, no shared vertices.
#[rustfmt::skip]
pub const TWO_TRIANGLES: [f32; 18] = [
    // first triangle
    -0.9, -0.8, 0.0,
    0.1, -0.1, 0.0,
    -0.4, 0.4, 0.0,
    // second triangle
    0.0, 0.4, 0.0,
    0.8, 0.8, 0.0,
    0.4, -0.6, 0.0,
];

pub mod geometry;
pub mod loader;
pub mod program;
pub mod renderer;
pub mod shader;
