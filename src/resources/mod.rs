//! Resource Module
//!
//! CPU-side shape and appearance data owned by visual objects:
//!
//! - [`Geometry`]: flat position buffer, optional triangle indices, version counter
//! - [`Material`]: flat color, opacity, blending, wireframe flag
//!
//! Both carry a process-unique id. GPU allocations created for them live in
//! the renderer, keyed by that id, and are released explicitly when the
//! owning object is discarded.

pub mod geometry;
pub mod material;

pub use geometry::{Geometry, GeometryId, MAX_PLANE_SEGMENTS};
pub use material::{Blending, Material, MaterialId};
