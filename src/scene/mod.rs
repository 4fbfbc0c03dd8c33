//! Scene Graph Module
//!
//! Renderer-agnostic description of a background scene:
//! - [`SceneGraph`]: root container owning every visual object
//! - [`VisualObject`]: one geometry + one material + a rigid transform
//! - [`Viewpoint`]: perspective camera that always faces its target

pub mod camera;
pub mod node;
pub mod scene;

pub use camera::Viewpoint;
pub use node::{ObjectId, ObjectKind, VisualObject};
pub use scene::SceneGraph;
