use glam::{Mat4, Vec3};

use crate::settings::ViewpointSettings;

/// Perspective viewpoint: projection parameters plus a position that always
/// faces `target`.
#[derive(Debug, Clone)]
pub struct Viewpoint {
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    // Cached, renderer reads only
    projection_matrix: Mat4,
}

impl Viewpoint {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut viewpoint = Self {
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            projection_matrix: Mat4::IDENTITY,
        };
        viewpoint.update_projection_matrix();
        viewpoint
    }

    #[must_use]
    pub fn from_settings(settings: &ViewpointSettings, aspect: f32) -> Self {
        let mut viewpoint = Self::new_perspective(settings.fov_degrees, aspect, settings.near, settings.far);
        viewpoint.position = settings.position();
        viewpoint.look_at(Vec3::ZERO);
        viewpoint
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh maps depth to 0..1, matching wgpu NDC.
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Exponential smoothing: moves `factor` of the way toward `goal`.
    pub fn ease_toward(&mut self, goal: Vec3, factor: f32) {
        self.position += (goal - self.position) * factor;
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        // A viewpoint sitting on its target has no direction; look down -Z.
        let target = if self.position.distance_squared(self.target) < f32::EPSILON {
            self.position + Vec3::NEG_Z
        } else {
            self.target
        };
        Mat4::look_at_rh(self.position, target, self.up)
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }
}
