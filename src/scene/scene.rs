use glam::Vec3;

use crate::scene::node::{ObjectId, VisualObject};

/// Scene graph root. Owns every visual object drawn in a frame.
///
/// The background scenes are flat (one or two objects, no hierarchy), so the
/// root keeps its children in insertion order and the origin is fixed.
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: Vec<VisualObject>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// World-space origin of the root. Viewpoints look here.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn add(&mut self, object: VisualObject) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        id
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualObject> {
        self.objects.iter()
    }

    /// Removes and yields every object, leaving the root empty.
    pub fn drain(&mut self) -> impl Iterator<Item = VisualObject> + '_ {
        self.objects.drain(..)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
