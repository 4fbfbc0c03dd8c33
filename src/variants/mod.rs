//! Scene Variants
//!
//! The two background scenes share one lifecycle and differ only in what
//! they build and how they mutate it each frame:
//!
//! | Theme | Variant | Per-frame mutation |
//! |---|---|---|
//! | dark  | [`ParticleField`] | rigid rotation of a point cloud about +Y |
//! | light | [`WaveSurface`]   | in-place height recomputation of a grid |

pub mod particles;
pub mod waves;

pub use particles::ParticleField;
pub use waves::{WaveParams, WaveSurface, wave_height};

use crate::errors::Result;
use crate::scene::{SceneGraph, Viewpoint};
use crate::settings::BackdropSettings;
use crate::theme::Theme;

/// Which variant a manager is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    AmbientParticles,
    WaveSurface,
}

/// One background scene shape.
pub trait SceneVariant {
    fn kind(&self) -> VariantKind;

    /// Builds the graph root and its viewpoint for a surface of the given
    /// aspect ratio. Called exactly once per variant instance.
    fn construct(&mut self, aspect: f32) -> Result<(SceneGraph, Viewpoint)>;

    /// Variant-specific mutation for one frame. `elapsed` is seconds since
    /// construction.
    fn update(&mut self, scene: &mut SceneGraph, elapsed: f32);

    /// Multiplier from pointer state to the viewpoint's easing target.
    fn parallax_scale(&self) -> f32;
}

/// Selects the variant for `theme`.
#[must_use]
pub fn for_theme(theme: Theme, settings: &BackdropSettings) -> Box<dyn SceneVariant> {
    match theme {
        Theme::Dark => Box::new(ParticleField::new(settings.particles.clone(), settings.seed)),
        Theme::Light => Box::new(WaveSurface::new(settings.waves.clone())),
    }
}
