//! WebGPU rendering module
//!
//! The scene is rebuilt as flat-colored triangles every frame and drawn by a
//! single alpha-blended pipeline. Text (HUD, game-over message) lives in the DOM.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{FieldRenderer, RenderError, field_to_ndc};
pub use shapes::build_scene;
pub use vertex::Vertex;
