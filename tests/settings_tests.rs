//! Settings Tests
//!
//! Tests for:
//! - Default values of every scene parameter
//! - Partial JSON overrides keeping unspecified defaults
//! - Malformed and missing settings files
//! - Hex color conversion

use glam::Vec4;

use backdrop::errors::BackdropError;
use backdrop::settings::{BackdropSettings, PowerPreference, rgba_from_hex};

const EPSILON: f32 = 1e-6;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn particle_defaults() {
    let p = BackdropSettings::default().particles;
    assert_eq!(p.count, 5000);
    assert!(approx(p.extent, 500.0));
    assert_eq!(p.color, 0x4a_de_80);
    assert!(approx(p.opacity, 0.7));
    assert!(approx(p.rotation_speed, 0.0002));
    assert!(approx(p.parallax_scale, 1.0));
    assert!(approx(p.viewpoint.fov_degrees, 75.0));
    assert_eq!(p.viewpoint.position, [0.0, 0.0, 50.0]);
}

#[test]
fn wave_defaults() {
    let w = BackdropSettings::default().waves;
    assert_eq!((w.segments_x, w.segments_y), (50, 50));
    assert!(approx(w.width, 500.0));
    assert!(approx(w.amplitude, 5.0));
    assert!(approx(w.k1, 0.02));
    assert!(approx(w.k2, 0.03));
    assert!(approx(w.parallax_scale, 0.5));
    assert!(approx(w.viewpoint.fov_degrees, 55.0));
    assert_eq!(w.viewpoint.position, [0.0, 0.0, 120.0]);
}

#[test]
fn lifecycle_defaults() {
    let s = BackdropSettings::default();
    assert_eq!(s.surface_id, "background-canvas");
    assert!(approx(s.smoothing, 0.02));
    assert!(approx(s.pointer_divisor, 100.0));
    assert_eq!(s.seed, None);
    assert!(s.renderer.vsync);
    assert_eq!(s.renderer.clear_color, [0.0; 4]);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn partial_json_keeps_other_defaults() -> anyhow::Result<()> {
    let s = BackdropSettings::from_json_str(
        r#"{
            "seed": 9,
            "particles": { "count": 2000 },
            "waves": { "amplitude": 8.0 },
            "renderer": { "power_preference": "high-performance" }
        }"#,
    )?;

    assert_eq!(s.seed, Some(9));
    assert_eq!(s.particles.count, 2000);
    assert!(approx(s.particles.opacity, 0.7));
    assert!(approx(s.waves.amplitude, 8.0));
    assert_eq!(s.waves.segments_x, 50);
    assert_eq!(s.renderer.power_preference, PowerPreference::HighPerformance);
    Ok(())
}

#[test]
fn empty_object_is_default() -> anyhow::Result<()> {
    assert_eq!(BackdropSettings::from_json_str("{}")?, BackdropSettings::default());
    Ok(())
}

#[test]
fn malformed_json_is_settings_error() {
    let err = BackdropSettings::from_json_str("{ \"smoothing\": ").unwrap_err();
    assert!(matches!(err, BackdropError::Settings(_)));
    assert!(!err.is_capability());
}

#[test]
fn missing_file_is_io_error() {
    let err = BackdropSettings::load("/definitely/not/here/backdrop.json").unwrap_err();
    assert!(matches!(err, BackdropError::Io(_)));
}

#[test]
fn load_or_default_falls_back() {
    let s = BackdropSettings::load_or_default("/definitely/not/here/backdrop.json");
    assert_eq!(s, BackdropSettings::default());
}

#[test]
fn settings_round_trip_through_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("backdrop-settings-{}.json", std::process::id()));
    let mut original = BackdropSettings::default();
    original.waves.segments_y = 12;
    std::fs::write(&path, serde_json::to_string_pretty(&original)?)?;

    let loaded = BackdropSettings::load(&path)?;
    assert_eq!(loaded, original);

    std::fs::remove_file(path)?;
    Ok(())
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn hex_color_components() {
    let c = rgba_from_hex(0xFF_80_00, 0.5);
    assert!(approx(c.x, 1.0));
    assert!(approx(c.y, 128.0 / 255.0));
    assert!(approx(c.z, 0.0));
    assert!(approx(c.w, 0.5));
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(rgba_from_hex(0x00_00_00, 3.0), Vec4::new(0.0, 0.0, 0.0, 1.0));
}
