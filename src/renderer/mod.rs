//! WebGPU rendering module
//!
//! The sim is tessellated into flat colored triangles every frame and
//! drawn with a single pass-through pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_scene;
pub use vertex::Vertex;
