//! Scene Manager Lifecycle Tests
//!
//! Tests for:
//! - Theme to variant selection (dark, light, unknown names)
//! - Teardown ordering: frame cancel, per-object release, renderer dispose, rebuild
//! - Repeated theme switches never leaking renderers or GPU allocations
//! - Stale frame rejection after a switch
//! - Capability and construction failures parking the manager in Disabled
//! - Viewport resize and pointer parallax easing

use std::time::Duration;

use glam::Vec3;

use backdrop::backend::headless::{LedgerEvent, LedgerHandle, RecordingBackend};
use backdrop::frame::{FrameHandle, FrameScheduler, ManualScheduler};
use backdrop::input::Viewport;
use backdrop::manager::{SceneManager, SceneStatus};
use backdrop::settings::BackdropSettings;
use backdrop::theme::Theme;
use backdrop::utils::time::Instant;
use backdrop::variants::VariantKind;

type TestManager = SceneManager<RecordingBackend, ManualScheduler>;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Small scenes keep the tests quick; the lifecycle does not depend on size.
fn small_settings() -> BackdropSettings {
    let mut settings = BackdropSettings::default();
    settings.seed = Some(42);
    settings.particles.count = 200;
    settings.waves.segments_x = 8;
    settings.waves.segments_y = 8;
    settings
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn manager_with(settings: BackdropSettings) -> (TestManager, LedgerHandle) {
    init_logging();
    let backend = RecordingBackend::new();
    let ledger = backend.ledger();
    let manager = SceneManager::new(backend, ManualScheduler::new(), settings, Viewport::new(1280, 720));
    (manager, ledger)
}

fn manager() -> (TestManager, LedgerHandle) {
    manager_with(small_settings())
}

/// Fires every pending frame once.
fn pump(manager: &mut TestManager, now: Instant) -> usize {
    let due = manager.scheduler_mut().take_due();
    due.into_iter().filter(|h| manager.on_frame(*h, now)).count()
}

fn pump_frames(manager: &mut TestManager, frames: u32) {
    let start = Instant::now();
    for i in 0..frames {
        pump(manager, start + Duration::from_millis(16 * u64::from(i + 1)));
    }
}

// ============================================================================
// Theme Selection
// ============================================================================

#[test]
fn dark_theme_runs_particle_field() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);

    assert_eq!(
        manager.status(),
        SceneStatus::Running {
            theme: Theme::Dark,
            variant: VariantKind::AmbientParticles
        }
    );
}

#[test]
fn light_theme_runs_wave_surface() {
    let (mut manager, _) = manager();
    manager.start(Theme::Light);

    assert_eq!(
        manager.status(),
        SceneStatus::Running {
            theme: Theme::Light,
            variant: VariantKind::WaveSurface
        }
    );
}

#[test]
fn unknown_theme_name_selects_wave_surface() {
    let (mut manager, _) = manager();
    manager.start(Theme::parse("sepia"));

    assert!(matches!(
        manager.status(),
        SceneStatus::Running {
            variant: VariantKind::WaveSurface,
            ..
        }
    ));
}

#[test]
fn missing_theme_attribute_selects_particle_field() {
    let (mut manager, _) = manager();
    manager.start(Theme::from_attribute(None));

    assert_eq!(manager.theme(), Some(Theme::Dark));
}

// ============================================================================
// Start
// ============================================================================

#[test]
fn start_schedules_exactly_one_frame() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Dark);

    assert_eq!(manager.scheduler().pending().len(), 1);
    assert_eq!(manager.scheduled_frame(), manager.scheduler().pending().first().copied());
    assert_eq!(ledger.read(|l| l.renderers_created), 1);
}

#[test]
fn second_start_is_ignored() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Dark);
    manager.start(Theme::Light);

    assert_eq!(manager.theme(), Some(Theme::Dark));
    assert_eq!(ledger.read(|l| l.renderers_created), 1);
}

#[test]
fn switch_before_start_builds_requested_theme() {
    let (mut manager, _) = manager();
    manager.switch_theme(Theme::Light);

    assert_eq!(manager.theme(), Some(Theme::Light));
}

#[test]
fn frames_render_and_reschedule() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Light);
    pump_frames(&mut manager, 5);

    assert_eq!(ledger.read(|l| l.frames_rendered), 5);
    assert_eq!(manager.scheduler().pending().len(), 1);
}

// ============================================================================
// Teardown Ordering
// ============================================================================

#[test]
fn old_scene_is_fully_released_before_new_renderer_exists() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Dark);
    pump_frames(&mut manager, 3);
    manager.switch_theme(Theme::Light);

    ledger.read(|l| {
        let geometry_released = l
            .position(|e| matches!(e, LedgerEvent::GeometryReleased(1, _)))
            .expect("geometry of first renderer released");
        let material_released = l
            .position(|e| matches!(e, LedgerEvent::MaterialReleased(1, _)))
            .expect("material of first renderer released");
        let disposed = l
            .position(|e| *e == LedgerEvent::RendererDisposed(1))
            .expect("first renderer disposed");
        let created = l
            .position(|e| *e == LedgerEvent::RendererCreated(2))
            .expect("second renderer created");

        assert!(geometry_released < disposed);
        assert!(material_released < disposed);
        assert!(disposed < created);
        assert_eq!(l.leaked_on_dispose, 0);
    });
}

/// Manual scheduler that also logs cancellations into the backend ledger.
struct LedgerScheduler {
    inner: ManualScheduler,
    ledger: LedgerHandle,
}

impl FrameScheduler for LedgerScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.inner.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.ledger.record(LedgerEvent::FrameCancelled(handle));
        self.inner.cancel_frame(handle);
    }
}

#[test]
fn frame_cancel_precedes_release_dispose_and_rebuild() {
    init_logging();
    let backend = RecordingBackend::new();
    let ledger = backend.ledger();
    let scheduler = LedgerScheduler {
        inner: ManualScheduler::new(),
        ledger: ledger.clone(),
    };
    let mut manager = SceneManager::new(backend, scheduler, small_settings(), Viewport::new(1280, 720));
    manager.start(Theme::Light);

    let start = Instant::now();
    for i in 1..=3_u64 {
        for handle in manager.scheduler_mut().inner.take_due() {
            manager.on_frame(handle, start + Duration::from_millis(16 * i));
        }
    }
    let scheduled = manager.scheduled_frame().expect("frame scheduled");

    manager.switch_theme(Theme::Dark);

    ledger.read(|l| {
        let cancelled = l
            .position(|e| *e == LedgerEvent::FrameCancelled(scheduled))
            .expect("pending frame cancelled");
        let released = l
            .position(|e| matches!(e, LedgerEvent::GeometryReleased(1, _)))
            .expect("geometry released");
        let disposed = l
            .position(|e| *e == LedgerEvent::RendererDisposed(1))
            .expect("renderer disposed");
        let created = l
            .position(|e| *e == LedgerEvent::RendererCreated(2))
            .expect("next renderer created");

        assert!(cancelled < released, "cancel at {cancelled}, release at {released}");
        assert!(released < disposed);
        assert!(disposed < created);
    });
}

#[test]
fn switch_cancels_pending_frame() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);
    let first = manager.scheduled_frame().expect("frame scheduled");

    manager.switch_theme(Theme::Light);

    assert_eq!(manager.scheduler().cancelled_count(), 1);
    assert!(!manager.scheduler().pending().contains(&first));
    assert_eq!(manager.scheduler().pending().len(), 1);
}

#[test]
fn stale_frame_after_switch_is_rejected() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Dark);
    let stale = manager.scheduled_frame().expect("frame scheduled");

    manager.switch_theme(Theme::Light);

    assert!(!manager.on_frame(stale, Instant::now()));
    assert_eq!(ledger.read(|l| l.frames_rendered), 0);
}

#[test]
fn switch_to_current_theme_still_rebuilds() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Dark);
    manager.switch_theme(Theme::Dark);

    ledger.read(|l| {
        assert_eq!(l.renderers_created, 2);
        assert_eq!(l.renderers_disposed, 1);
    });
    assert_eq!(manager.theme(), Some(Theme::Dark));
}

// ============================================================================
// Leak Freedom
// ============================================================================

#[test]
fn fifty_toggles_leave_one_renderer_and_no_leaks() {
    let (mut manager, ledger) = manager();
    let mut theme = Theme::Dark;
    manager.start(theme);

    for _ in 0..50 {
        pump_frames(&mut manager, 2);
        theme = theme.toggled();
        manager.switch_theme(theme);
    }
    pump_frames(&mut manager, 1);

    ledger.read(|l| {
        assert_eq!(l.live_renderers(), 1);
        assert_eq!(l.renderers_created, 51);
        assert_eq!(l.max_live_renderers, 1);
        assert_eq!(l.leaked_on_dispose, 0);
        // Only the live scene's single object holds allocations.
        assert_eq!(l.live_geometries(), 1);
        assert_eq!(l.live_materials(), 1);
    });
}

#[test]
fn rapid_toggles_without_frames_never_overlap_renderers() {
    let (mut manager, ledger) = manager();
    let mut theme = Theme::Light;
    manager.start(theme);

    for _ in 0..10 {
        theme = theme.toggled();
        manager.switch_theme(theme);
    }

    ledger.read(|l| {
        assert_eq!(l.max_live_renderers, 1);
        assert_eq!(l.live_renderers(), 1);
    });
    assert_eq!(manager.scheduler().pending().len(), 1);
    assert_eq!(manager.theme(), Some(theme));
}

#[test]
fn shutdown_releases_everything() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Light);
    pump_frames(&mut manager, 3);

    assert!(manager.is_running());
    manager.shutdown();

    assert!(!manager.is_running());
    assert_eq!(manager.status(), SceneStatus::Uninitialized);
    assert!(manager.scheduled_frame().is_none());
    assert!(manager.scheduler().pending().is_empty());
    ledger.read(|l| {
        assert_eq!(l.live_renderers(), 0);
        assert_eq!(l.live_geometries(), 0);
        assert_eq!(l.live_materials(), 0);
        assert_eq!(l.leaked_on_dispose, 0);
    });
}

// ============================================================================
// Failure Handling
// ============================================================================

#[test]
fn missing_capability_disables_and_hides_surface() {
    let backend = RecordingBackend::unavailable();
    let ledger = backend.ledger();
    let mut manager = SceneManager::new(backend, ManualScheduler::new(), small_settings(), Viewport::default());

    manager.start(Theme::Dark);

    assert_eq!(manager.status(), SceneStatus::Disabled);
    assert!(manager.scheduler().pending().is_empty());
    ledger.read(|l| {
        assert!(l.surface_hidden);
        assert_eq!(l.renderers_created, 0);
    });
}

#[test]
fn disabled_manager_ignores_theme_switches() {
    let mut backend = RecordingBackend::new();
    backend.set_available(false);
    let ledger = backend.ledger();
    let mut manager = SceneManager::new(backend, ManualScheduler::new(), small_settings(), Viewport::default());
    manager.start(Theme::Dark);

    manager.switch_theme(Theme::Light);
    manager.switch_theme(Theme::Dark);

    assert_eq!(manager.status(), SceneStatus::Disabled);
    assert_eq!(ledger.read(|l| l.renderers_created), 0);
}

#[test]
fn construction_failure_disposes_renderer_and_disables() {
    let mut settings = small_settings();
    settings.particles.extent = -1.0;
    let (mut manager, ledger) = manager_with(settings);

    manager.start(Theme::Dark);

    assert_eq!(manager.status(), SceneStatus::Disabled);
    ledger.read(|l| {
        assert!(l.surface_hidden);
        assert_eq!(l.renderers_created, 1);
        assert_eq!(l.live_renderers(), 0);
    });
}

#[test]
fn failure_during_switch_leaves_no_live_scene() {
    let mut settings = small_settings();
    settings.waves.width = f32::NAN;
    let (mut manager, ledger) = manager_with(settings);
    manager.start(Theme::Dark);
    pump_frames(&mut manager, 2);

    manager.switch_theme(Theme::Light);

    assert_eq!(manager.status(), SceneStatus::Disabled);
    assert!(manager.scheduler().pending().is_empty());
    ledger.read(|l| {
        assert_eq!(l.live_renderers(), 0);
        assert_eq!(l.live_geometries(), 0);
        assert_eq!(l.leaked_on_dispose, 0);
    });
}

#[test]
fn oversized_wave_grid_disables_instead_of_panicking() {
    let mut settings = small_settings();
    settings.waves.segments_x = u32::MAX;
    settings.waves.segments_y = u32::MAX;
    let (mut manager, ledger) = manager_with(settings);

    manager.start(Theme::Light);

    assert_eq!(manager.status(), SceneStatus::Disabled);
    ledger.read(|l| {
        assert!(l.surface_hidden);
        assert_eq!(l.live_renderers(), 0);
    });
}

// ============================================================================
// Resize & Pointer
// ============================================================================

#[test]
fn resize_without_scene_is_recorded_for_next_build() {
    let (mut manager, ledger) = manager();
    manager.on_viewport_resize(Viewport::new(800, 400));
    manager.start(Theme::Dark);

    assert_eq!(ledger.read(|l| l.last_viewport), Some(Viewport::new(800, 400)));
    let viewpoint = manager.viewpoint().expect("scene running");
    assert!(approx(viewpoint.aspect, 2.0));
}

#[test]
fn resize_updates_viewpoint_and_renderer() {
    let (mut manager, ledger) = manager();
    manager.start(Theme::Light);

    manager.on_viewport_resize(Viewport::new(1000, 1000));

    assert!(approx(manager.viewpoint().expect("scene running").aspect, 1.0));
    assert_eq!(manager.renderer().map(|r| r.viewport()), Some(Viewport::new(1000, 1000)));
    assert_eq!(ledger.read(|l| l.last_viewport), Some(Viewport::new(1000, 1000)));
}

#[test]
fn zero_height_resize_keeps_aspect_finite() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);
    manager.on_viewport_resize(Viewport::new(640, 0));

    let aspect = manager.viewpoint().expect("scene running").aspect;
    assert!(aspect.is_finite() && aspect > 0.0);
}

#[test]
fn pointer_eases_viewpoint_by_smoothing_factor() {
    let (mut manager, _) = manager();
    manager.start(Theme::Light);
    manager.on_pointer_move(2.0, 3.0);

    pump_frames(&mut manager, 1);

    // Wave parallax 0.5: goal (1.0, -1.5, 120), 2% of the way per frame.
    let position = manager.viewpoint().expect("scene running").position;
    assert!(approx(position.x, 0.02), "x = {}", position.x);
    assert!(approx(position.y, -0.03), "y = {}", position.y);
    assert!(approx(position.z, 120.0));
}

#[test]
fn viewpoint_converges_on_pointer_goal() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);
    manager.on_pointer_move(-4.0, 1.0);

    pump_frames(&mut manager, 600);

    let viewpoint = manager.viewpoint().expect("scene running");
    let goal = Vec3::new(-4.0, -1.0, 50.0);
    assert!(viewpoint.position.distance(goal) < 0.01);
    assert_eq!(viewpoint.target, Vec3::ZERO);
}

#[test]
fn easing_never_overshoots_goal() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);
    manager.on_pointer_move(3.0, 0.0);

    let start = Instant::now();
    let mut last_x = 0.0;
    for i in 1..=200_u64 {
        pump(&mut manager, start + Duration::from_millis(16 * i));
        let x = manager.viewpoint().expect("scene running").position.x;
        assert!(x >= last_x, "frame {i}: moved away from goal");
        assert!(x <= 3.0, "frame {i}: overshot to {x}");
        last_x = x;
    }
}

#[test]
fn pointer_state_survives_theme_switch() {
    let (mut manager, _) = manager();
    manager.start(Theme::Dark);
    manager.on_pointer_move(1.5, -0.5);
    manager.switch_theme(Theme::Light);

    assert!(approx(manager.pointer().x, 1.5));
    assert!(approx(manager.pointer().y, -0.5));
}

#[test]
fn manual_scheduler_handles_are_monotonic() {
    let mut scheduler = ManualScheduler::new();
    let a = scheduler.request_frame();
    let b = scheduler.request_frame();
    assert!(b > a);
}
