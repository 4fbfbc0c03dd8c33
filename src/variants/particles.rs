use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::errors::{BackdropError, Result};
use crate::resources::{Blending, Geometry, Material};
use crate::scene::{ObjectId, SceneGraph, Viewpoint, VisualObject};
use crate::settings::{ParticleFieldSettings, rgba_from_hex};
use crate::variants::{SceneVariant, VariantKind};

/// Ambient point cloud for the dark theme.
///
/// Coordinates are drawn once, uniformly inside an origin-centred cube. Each
/// frame only the cloud's rotation changes; no per-point work happens after
/// construction.
#[derive(Debug)]
pub struct ParticleField {
    settings: ParticleFieldSettings,
    seed: Option<u64>,
    cloud: Option<ObjectId>,
}

impl ParticleField {
    #[must_use]
    pub fn new(settings: ParticleFieldSettings, seed: Option<u64>) -> Self {
        Self {
            settings,
            seed,
            cloud: None,
        }
    }

    /// The point cloud object, once constructed.
    #[must_use]
    pub fn cloud(&self) -> Option<ObjectId> {
        self.cloud
    }

    fn scatter(&self) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or_else(rand::random));
        let half = self.settings.extent / 2.0;
        (0..self.settings.count * 3)
            .map(|_| rng.random_range(-half..half))
            .collect()
    }
}

impl SceneVariant for ParticleField {
    fn kind(&self) -> VariantKind {
        VariantKind::AmbientParticles
    }

    fn construct(&mut self, aspect: f32) -> Result<(SceneGraph, Viewpoint)> {
        let extent = self.settings.extent;
        if !extent.is_finite() || extent <= 0.0 {
            return Err(BackdropError::Construction(format!(
                "particle extent must be positive and finite, got {extent}"
            )));
        }

        let geometry = Geometry::from_positions(self.scatter());
        let material = Material::new_points(
            rgba_from_hex(self.settings.color, self.settings.opacity),
            self.settings.point_size,
        )
        .with_blending(Blending::Additive);

        let mut scene = SceneGraph::new();
        let cloud = scene.add(VisualObject::new_points(geometry, material).with_name("ParticleCloud"));
        self.cloud = Some(cloud);

        let viewpoint = Viewpoint::from_settings(&self.settings.viewpoint, aspect);
        log::debug!("Particle field built: {} points", self.settings.count);
        Ok((scene, viewpoint))
    }

    fn update(&mut self, scene: &mut SceneGraph, _elapsed: f32) {
        if let Some(cloud) = self.cloud.and_then(|id| scene.get_mut(id)) {
            cloud.rotate_y(self.settings.rotation_speed);
        }
    }

    fn parallax_scale(&self) -> f32 {
        self.settings.parallax_scale
    }
}
