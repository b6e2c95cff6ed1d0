//! WebGPU rendering module
//!
//! The scene is batched into vertex-colored triangles and drawn with a single
//! pipeline; text goes to the DOM HUD.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::{QuadBatch, TextItem};
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
