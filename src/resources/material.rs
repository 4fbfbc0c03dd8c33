use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec4;

/// Process-unique material identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(1);

/// How fragments combine with what is already in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blending {
    /// Source-over alpha blending.
    #[default]
    Normal,
    /// `dst + src * alpha`; overlapping points brighten.
    Additive,
}

/// Appearance of a visual object: an unlit flat color.
///
/// Not `Clone`: the id names one GPU allocation and must stay unique.
#[derive(Debug)]
pub struct Material {
    id: MaterialId,
    /// RGB plus opacity in `w`.
    pub color: Vec4,
    pub blending: Blending,
    /// Draw triangle edges instead of filled triangles.
    pub wireframe: bool,
    /// Point size in world units. Only meaningful for point clouds; backends
    /// that cannot size points draw them one pixel wide.
    pub point_size: f32,
}

impl Material {
    /// Unlit material with normal blending.
    #[must_use]
    pub fn new_basic(color: Vec4) -> Self {
        Self {
            id: MaterialId(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed)),
            color,
            blending: Blending::Normal,
            wireframe: false,
            point_size: 1.0,
        }
    }

    /// Point-cloud material.
    #[must_use]
    pub fn new_points(color: Vec4, point_size: f32) -> Self {
        Self {
            point_size,
            ..Self::new_basic(color)
        }
    }

    #[must_use]
    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    #[must_use]
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.color.w
    }
}
