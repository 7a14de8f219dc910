//! WebGPU rendering module
//!
//! The scene is rebuilt as one triangle list per frame; reels that are not
//! moving reuse their cached vertices.

pub mod atlas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use atlas::{TextureAtlas, UvRect};
pub use pipeline::RenderState;
pub use scene::{ReelMeshCache, build_scene};
pub use vertex::Vertex;
