//! Backdrop Settings
//!
//! Every cosmetic parameter of the two background scenes lives here. None of
//! them are normative: the defaults reproduce the look of the original page,
//! and any field may be overridden from a JSON file. Missing fields keep
//! their defaults.
//!
//! ```rust,ignore
//! use backdrop::settings::BackdropSettings;
//!
//! let settings = BackdropSettings::from_json_str(r#"{ "particles": { "count": 2000 } }"#)?;
//! assert_eq!(settings.particles.count, 2000);
//! assert_eq!(settings.waves.segments_x, 50);
//! ```

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Converts a `0xRRGGBB` color and an opacity into linear RGBA components
/// in `[0, 1]` (no gamma conversion).
#[must_use]
pub fn rgba_from_hex(hex: u32, opacity: f32) -> Vec4 {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Vec4::new(r, g, b, opacity.clamp(0.0, 1.0))
}

// ============================================================================
// Top-level settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSettings {
    /// Stable id of the output surface element.
    pub surface_id: String,
    /// Fraction of the remaining distance the viewpoint travels per frame.
    pub smoothing: f32,
    /// Divisor applied to centred cursor pixels before they become pointer state.
    pub pointer_divisor: f32,
    /// Fixed RNG seed for particle placement; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub particles: ParticleFieldSettings,
    pub waves: WaveSurfaceSettings,
    pub renderer: RendererSettings,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            surface_id: "background-canvas".to_string(),
            smoothing: 0.02,
            pointer_divisor: 100.0,
            seed: None,
            particles: ParticleFieldSettings::default(),
            waves: WaveSurfaceSettings::default(),
            renderer: RendererSettings::default(),
        }
    }
}

impl BackdropSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Loads settings from `path`, falling back to defaults (with a warning)
    /// when the file is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default backdrop settings ({}): {e}", path.display());
                Self::default()
            }
        }
    }
}

// ============================================================================
// Viewpoint
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewpointSettings {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl ViewpointSettings {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl Default for ViewpointSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 50.0],
        }
    }
}

// ============================================================================
// Ambient particle field (dark theme)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFieldSettings {
    pub count: usize,
    /// Edge length of the origin-centred cube the points are scattered in.
    pub extent: f32,
    pub color: u32,
    pub opacity: f32,
    pub point_size: f32,
    /// Rotation about +Y applied every frame, in radians.
    pub rotation_speed: f32,
    /// Pointer-to-viewpoint-target multiplier.
    pub parallax_scale: f32,
    pub viewpoint: ViewpointSettings,
}

impl Default for ParticleFieldSettings {
    fn default() -> Self {
        Self {
            count: 5000,
            extent: 500.0,
            color: 0x4a_de_80,
            opacity: 0.7,
            point_size: 0.25,
            rotation_speed: 0.0002,
            parallax_scale: 1.0,
            viewpoint: ViewpointSettings::default(),
        }
    }
}

// ============================================================================
// Wave surface (light theme)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSurfaceSettings {
    pub width: f32,
    pub height: f32,
    pub segments_x: u32,
    pub segments_y: u32,
    pub color: u32,
    pub opacity: f32,
    pub amplitude: f32,
    /// Spatial frequency along x.
    pub k1: f32,
    /// Spatial frequency along y.
    pub k2: f32,
    pub parallax_scale: f32,
    pub viewpoint: ViewpointSettings,
}

impl Default for WaveSurfaceSettings {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            segments_x: 50,
            segments_y: 50,
            color: 0x22_c5_5e,
            opacity: 0.15,
            amplitude: 5.0,
            k1: 0.02,
            k2: 0.03,
            parallax_scale: 0.5,
            viewpoint: ViewpointSettings {
                fov_degrees: 55.0,
                near: 1.0,
                far: 1000.0,
                position: [0.0, 0.0, 120.0],
            },
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    #[default]
    LowPower,
    HighPerformance,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(value: PowerPreference) -> Self {
        match value {
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub power_preference: PowerPreference,
    pub vsync: bool,
    /// Clear color (RGBA). Fully transparent by default so page content
    /// behind the surface shows through.
    pub clear_color: [f32; 4],
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            power_preference: PowerPreference::LowPower,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl RendererSettings {
    #[must_use]
    pub fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        }
    }
}
