use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Quat, Vec3};

use crate::resources::{Geometry, Material};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// How the renderer assembles the geometry's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// One point per vertex.
    Points,
    /// Indexed triangles, or their edges when the material is wireframe.
    Mesh,
}

/// A renderable node: one shape plus one appearance, with a rigid transform.
#[derive(Debug)]
pub struct VisualObject {
    id: ObjectId,
    pub name: Cow<'static, str>,
    pub kind: ObjectKind,
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    pub rotation: Quat,
    pub visible: bool,
}

impl VisualObject {
    #[must_use]
    pub fn new(kind: ObjectKind, geometry: Geometry, material: Material) -> Self {
        Self {
            id: ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)),
            name: Cow::Borrowed("Object"),
            kind,
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: true,
        }
    }

    #[must_use]
    pub fn new_points(geometry: Geometry, material: Material) -> Self {
        Self::new(ObjectKind::Points, geometry, material)
    }

    #[must_use]
    pub fn new_mesh(geometry: Geometry, material: Material) -> Self {
        Self::new(ObjectKind::Mesh, geometry, material)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Rotates about the world +Y axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (Quat::from_rotation_y(angle) * self.rotation).normalize();
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}
