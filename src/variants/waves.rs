use crate::errors::{BackdropError, Result};
use crate::resources::{Geometry, MAX_PLANE_SEGMENTS, Material};
use crate::scene::{ObjectId, SceneGraph, Viewpoint, VisualObject};
use crate::settings::{WaveSurfaceSettings, rgba_from_hex};
use crate::variants::{SceneVariant, VariantKind};

/// Coefficients of the two-sine height field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub amplitude: f32,
    pub k1: f32,
    pub k2: f32,
}

impl From<&WaveSurfaceSettings> for WaveParams {
    fn from(settings: &WaveSurfaceSettings) -> Self {
        Self {
            amplitude: settings.amplitude,
            k1: settings.k1,
            k2: settings.k2,
        }
    }
}

/// Height of the wave surface at planar coordinates `(px, py)` after `t`
/// seconds: `A·sin(k1·px + t) + A·sin(k2·py + t)`.
#[inline]
#[must_use]
pub fn wave_height(px: f32, py: f32, t: f32, params: WaveParams) -> f32 {
    params.amplitude * (params.k1 * px + t).sin() + params.amplitude * (params.k2 * py + t).sin()
}

/// Undulating wireframe grid for the light theme.
#[derive(Debug)]
pub struct WaveSurface {
    settings: WaveSurfaceSettings,
    params: WaveParams,
    plane: Option<ObjectId>,
}

impl WaveSurface {
    #[must_use]
    pub fn new(settings: WaveSurfaceSettings) -> Self {
        let params = WaveParams::from(&settings);
        Self {
            settings,
            params,
            plane: None,
        }
    }

    #[must_use]
    pub fn params(&self) -> WaveParams {
        self.params
    }

    /// The grid object, once constructed.
    #[must_use]
    pub fn plane(&self) -> Option<ObjectId> {
        self.plane
    }
}

impl SceneVariant for WaveSurface {
    fn kind(&self) -> VariantKind {
        VariantKind::WaveSurface
    }

    fn construct(&mut self, aspect: f32) -> Result<(SceneGraph, Viewpoint)> {
        let s = &self.settings;
        if !(s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0) {
            return Err(BackdropError::Construction(format!(
                "wave surface size must be positive and finite, got {}x{}",
                s.width, s.height
            )));
        }

        let segments = 1..=MAX_PLANE_SEGMENTS;
        if !segments.contains(&s.segments_x) || !segments.contains(&s.segments_y) {
            return Err(BackdropError::Construction(format!(
                "wave surface segments must be within 1..={MAX_PLANE_SEGMENTS}, got {}x{}",
                s.segments_x, s.segments_y
            )));
        }

        let geometry = Geometry::new_plane(s.width, s.height, s.segments_x, s.segments_y);
        let material = Material::new_basic(rgba_from_hex(s.color, s.opacity)).with_wireframe(true);

        let mut scene = SceneGraph::new();
        let plane = scene.add(VisualObject::new_mesh(geometry, material).with_name("WavePlane"));
        self.plane = Some(plane);

        let viewpoint = Viewpoint::from_settings(&s.viewpoint, aspect);
        log::debug!("Wave surface built: {}x{} segments", s.segments_x, s.segments_y);
        Ok((scene, viewpoint))
    }

    fn update(&mut self, scene: &mut SceneGraph, elapsed: f32) {
        let Some(plane) = self.plane.and_then(|id| scene.get_mut(id)) else {
            return;
        };
        let params = self.params;
        plane.geometry.update_positions(|positions| {
            for vertex in positions.chunks_exact_mut(3) {
                vertex[2] = wave_height(vertex[0], vertex[1], elapsed, params);
            }
        });
    }

    fn parallax_scale(&self) -> f32 {
        self.settings.parallax_scale
    }
}
