//! Scene Lifecycle Manager
//!
//! [`SceneManager`] owns at most one live background scene. It builds the
//! variant for the current theme, drives the per-frame update through a
//! [`FrameScheduler`], and tears the scene down completely before building a
//! replacement.
//!
//! # States
//!
//! ```text
//!                 start(theme)                 switch_theme(theme')
//! Uninitialized ───────────────▶ Running ─────────▶ Disposing ─────────▶ Running
//!        │                          │                                     │
//!        └────── capability or construction failure ──────────────────────┴──▶ Disabled
//! ```
//!
//! # Teardown order
//!
//! 1. Cancel the scheduled frame and forget its handle, so a callback the host
//!    already queued is rejected by [`SceneManager::on_frame`].
//! 2. Walk every visual object and release its geometry and material.
//! 3. Dispose the renderer.
//!
//! Only then does construction of the next scene begin, so at most one
//! renderer and one set of GPU allocations exists at any time.
//!
//! # Failure policy
//!
//! Failures never escape `start` or `switch_theme`. They are logged, the
//! output surface is hidden and the manager parks in [`SceneStatus::Disabled`]
//! for the rest of its life.

use glam::Vec3;

use crate::backend::{RenderBackend, SurfaceRenderer};
use crate::errors::Result;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::input::{PointerState, Viewport};
use crate::scene::{SceneGraph, Viewpoint};
use crate::settings::BackdropSettings;
use crate::theme::Theme;
use crate::utils::time::{Instant, SceneClock};
use crate::variants::{self, SceneVariant, VariantKind};

// ============================================================================
// Scene Handle
// ============================================================================

/// The three resources that make up one live scene.
pub struct SceneHandle<R: SurfaceRenderer> {
    renderer: R,
    scene: SceneGraph,
    viewpoint: Viewpoint,
}

impl<R: SurfaceRenderer> SceneHandle<R> {
    /// Releases every GPU-backed resource, objects first, renderer last.
    fn dispose(mut self) {
        for object in self.scene.drain() {
            self.renderer.release_geometry(object.geometry.id());
            self.renderer.release_material(object.material.id());
        }
        self.renderer.dispose();
    }
}

struct RunningScene<R: SurfaceRenderer> {
    theme: Theme,
    variant: Box<dyn SceneVariant>,
    handle: SceneHandle<R>,
    clock: SceneClock,
    frame: Option<FrameHandle>,
}

enum SceneState<R: SurfaceRenderer> {
    Uninitialized,
    Running(RunningScene<R>),
    Disposing,
    Disabled,
}

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneStatus {
    Uninitialized,
    Running { theme: Theme, variant: VariantKind },
    Disposing,
    Disabled,
}

// ============================================================================
// Manager
// ============================================================================

pub struct SceneManager<B: RenderBackend, S: FrameScheduler> {
    backend: B,
    scheduler: S,
    settings: BackdropSettings,
    viewport: Viewport,
    pointer: PointerState,
    state: SceneState<B::Renderer>,
}

impl<B: RenderBackend, S: FrameScheduler> SceneManager<B, S> {
    #[must_use]
    pub fn new(backend: B, scheduler: S, settings: BackdropSettings, viewport: Viewport) -> Self {
        Self {
            backend,
            scheduler,
            settings,
            viewport,
            pointer: PointerState::default(),
            state: SceneState::Uninitialized,
        }
    }

    /// Builds the first scene. Only valid from `Uninitialized`.
    pub fn start(&mut self, initial_theme: Theme) {
        if !matches!(self.state, SceneState::Uninitialized) {
            log::warn!("Background scene already started; ignoring start({initial_theme})");
            return;
        }
        self.enter(initial_theme);
    }

    /// Replaces the current scene with the variant for `theme`.
    ///
    /// Always a full rebuild, even when `theme` is already current.
    pub fn switch_theme(&mut self, theme: Theme) {
        match self.state {
            SceneState::Uninitialized => self.enter(theme),
            SceneState::Running(_) => {
                self.teardown();
                self.enter(theme);
            }
            SceneState::Disabled => {
                log::debug!("Background disabled; ignoring switch to {theme}");
            }
            SceneState::Disposing => {
                log::warn!("Theme switch requested during teardown; ignoring");
            }
        }
    }

    /// Disposes the current scene, if any, and returns to `Uninitialized`.
    pub fn shutdown(&mut self) {
        if matches!(self.state, SceneState::Running(_)) {
            self.teardown();
            self.state = SceneState::Uninitialized;
        }
    }

    /// Matches the viewpoint and output surface to a new viewport.
    pub fn on_viewport_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let SceneState::Running(running) = &mut self.state {
            running.handle.viewpoint.set_aspect(viewport.aspect());
            running.handle.renderer.resize(viewport);
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = PointerState::new(x, y);
    }

    /// Runs the per-frame update for `handle` and schedules the next frame.
    ///
    /// Returns `false` without touching the scene if `handle` is not the
    /// frame currently scheduled (cancelled, stale, or no scene running).
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> bool {
        let SceneState::Running(running) = &mut self.state else {
            log::debug!("Dropping frame {handle:?}: no scene running");
            return false;
        };
        if running.frame != Some(handle) {
            log::debug!("Dropping stale frame {handle:?}");
            return false;
        }
        running.frame = None;

        running.clock.tick(now);
        let elapsed = running.clock.elapsed_seconds();

        // 1. Variant mutation
        running.variant.update(&mut running.handle.scene, elapsed);

        // 2. Parallax easing
        let scale = running.variant.parallax_scale();
        let viewpoint = &mut running.handle.viewpoint;
        let goal = Vec3::new(
            self.pointer.x * scale,
            -self.pointer.y * scale,
            viewpoint.position.z,
        );
        viewpoint.ease_toward(goal, self.settings.smoothing);
        viewpoint.look_at(running.handle.scene.origin());

        // 3. Render
        let handle_ref = &mut running.handle;
        if let Err(e) = handle_ref.renderer.render(&handle_ref.scene, &handle_ref.viewpoint) {
            log::warn!("Background frame skipped: {e}");
        }

        running.frame = Some(self.scheduler.request_frame());
        true
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn status(&self) -> SceneStatus {
        match &self.state {
            SceneState::Uninitialized => SceneStatus::Uninitialized,
            SceneState::Running(running) => SceneStatus::Running {
                theme: running.theme,
                variant: running.variant.kind(),
            },
            SceneState::Disposing => SceneStatus::Disposing,
            SceneState::Disabled => SceneStatus::Disabled,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, SceneState::Running(_))
    }

    #[must_use]
    pub fn theme(&self) -> Option<Theme> {
        match &self.state {
            SceneState::Running(running) => Some(running.theme),
            _ => None,
        }
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn settings(&self) -> &BackdropSettings {
        &self.settings
    }

    #[must_use]
    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        match &self.state {
            SceneState::Running(running) => running.frame,
            _ => None,
        }
    }

    #[must_use]
    pub fn viewpoint(&self) -> Option<&Viewpoint> {
        match &self.state {
            SceneState::Running(running) => Some(&running.handle.viewpoint),
            _ => None,
        }
    }

    #[must_use]
    pub fn scene_graph(&self) -> Option<&SceneGraph> {
        match &self.state {
            SceneState::Running(running) => Some(&running.handle.scene),
            _ => None,
        }
    }

    #[must_use]
    pub fn renderer(&self) -> Option<&B::Renderer> {
        match &self.state {
            SceneState::Running(running) => Some(&running.handle.renderer),
            _ => None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ------------------------------------------------------------------------
    // Lifecycle internals
    // ------------------------------------------------------------------------

    fn enter(&mut self, theme: Theme) {
        match self.construct(theme) {
            Ok(running) => {
                log::info!("Background scene running: {theme} ({:?})", running.variant.kind());
                self.state = SceneState::Running(running);
            }
            Err(e) => {
                if e.is_capability() {
                    log::error!("Graphics unavailable; 3D background disabled: {e}");
                } else {
                    log::error!("Could not build {theme} background scene; 3D background disabled: {e}");
                }
                self.backend.hide_surface();
                self.state = SceneState::Disabled;
            }
        }
    }

    fn construct(&mut self, theme: Theme) -> Result<RunningScene<B::Renderer>> {
        let mut variant = variants::for_theme(theme, &self.settings);
        let renderer = self.backend.create_renderer(self.viewport)?;

        let (scene, viewpoint) = match variant.construct(self.viewport.aspect()) {
            Ok(built) => built,
            Err(e) => {
                renderer.dispose();
                return Err(e);
            }
        };

        let frame = self.scheduler.request_frame();
        Ok(RunningScene {
            theme,
            variant,
            handle: SceneHandle {
                renderer,
                scene,
                viewpoint,
            },
            clock: SceneClock::starting_at(Instant::now()),
            frame: Some(frame),
        })
    }

    fn teardown(&mut self) {
        let SceneState::Running(running) = std::mem::replace(&mut self.state, SceneState::Disposing) else {
            return;
        };
        log::info!("Disposing background scene: {}", running.theme);

        if let Some(frame) = running.frame {
            self.scheduler.cancel_frame(frame);
        }
        running.handle.dispose();
    }
}
