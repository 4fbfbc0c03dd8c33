//! Winit Host
//!
//! Binds a [`SceneManager`] to a real output surface: a native window, or
//! on the web the canvas element named by
//! [`BackdropSettings::surface_id`](crate::settings::BackdropSettings::surface_id).
//!
//! Host events map onto manager operations:
//!
//! | winit event | manager call |
//! |---|---|
//! | `Resized` | [`SceneManager::on_viewport_resize`] |
//! | `CursorMoved` | [`SceneManager::on_pointer_move`] (logical pixels, centred, divided by `pointer_divisor`) |
//! | `RedrawRequested` | [`SceneManager::on_frame`] for the pending frame handle |
//! | [`BackdropEvent`] / `T` key | theme persisted, then [`SceneManager::switch_theme`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use backdrop::app::BackdropApp;
//! use backdrop::settings::BackdropSettings;
//! use backdrop::theme::{FileThemeStore, Theme};
//!
//! fn main() -> backdrop::errors::Result<()> {
//!     env_logger::init();
//!     BackdropApp::new(BackdropSettings::default(), FileThemeStore::new("theme.json"), Theme::Dark).run()
//! }
//! ```

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
pub use winit::window::{Window, WindowId};

use crate::backend::gpu::{SurfaceSource, WgpuBackend};
use crate::errors::Result;
use crate::frame::{FrameHandle, FrameScheduler, HandleSequence};
use crate::input::{PointerState, Viewport};
use crate::manager::SceneManager;
use crate::settings::BackdropSettings;
use crate::theme::{Theme, ThemePreference, ThemeStore};
use crate::utils::time::Instant;

/// Theme signal delivered into the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropEvent {
    SetTheme(Theme),
    ToggleTheme,
}

// ============================================================================
// Window scheduler
// ============================================================================

/// [`FrameScheduler`] backed by `Window::request_redraw`, which is
/// `requestAnimationFrame` on the web.
///
/// winit cannot retract a redraw request, so cancelling only clears the
/// pending handle; the redraw still arrives but carries no frame.
pub struct WindowScheduler {
    window: Arc<Window>,
    sequence: HandleSequence,
    pending: Option<FrameHandle>,
}

impl WindowScheduler {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            sequence: HandleSequence::default(),
            pending: None,
        }
    }

    /// Takes the frame due on this redraw, if any.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.sequence.next_handle();
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Pointer state for a cursor position, measured in logical pixels so the
/// parallax strength does not depend on the display's scale factor.
#[must_use]
pub fn pointer_from_cursor(
    position: PhysicalPosition<f64>,
    size: PhysicalSize<u32>,
    scale_factor: f64,
    divisor: f32,
) -> PointerState {
    let logical = position.to_logical::<f64>(scale_factor);
    let logical_size = size.to_logical::<u32>(scale_factor);
    PointerState::from_client(
        logical.x,
        logical.y,
        Viewport::new(logical_size.width, logical_size.height),
        divisor,
    )
}

pub type WindowSceneManager = SceneManager<WgpuBackend<Arc<Window>>, WindowScheduler>;

// ============================================================================
// Application
// ============================================================================

pub struct BackdropApp<S: ThemeStore> {
    title: String,
    settings: BackdropSettings,
    preference: ThemePreference<S>,

    window: Option<Arc<Window>>,
    manager: Option<WindowSceneManager>,

    /// WASM async initialization state
    #[cfg(target_arch = "wasm32")]
    pending_backend: std::rc::Rc<std::cell::RefCell<Option<Result<WgpuBackend<Arc<Window>>>>>>,
}

impl<S: ThemeStore + 'static> BackdropApp<S> {
    /// `default_theme` applies when the store holds no preference yet.
    pub fn new(settings: BackdropSettings, store: S, default_theme: Theme) -> Self {
        Self {
            title: "Backdrop".into(),
            settings,
            preference: ThemePreference::load(store, default_theme),
            window: None,
            manager: None,
            #[cfg(target_arch = "wasm32")]
            pending_backend: std::rc::Rc::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Runs the event loop until the window closes.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::<BackdropEvent>::with_user_event().build()?;
        // Frames are requested explicitly by the scheduler.
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    /// Spawns the event loop (WASM). Returns immediately; frames run via
    /// `requestAnimationFrame`.
    #[cfg(target_arch = "wasm32")]
    pub fn run(self) -> Result<()> {
        use winit::platform::web::EventLoopExtWebSys;

        let event_loop = EventLoop::<BackdropEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        web::install_proxy(event_loop.create_proxy());
        event_loop.spawn_app(self);
        Ok(())
    }

    /// Wraps a freshly opened backend into a running manager. A backend error
    /// disables the backdrop: logged once, surface hidden.
    fn install_backend(&mut self, backend: Result<WgpuBackend<Arc<Window>>>) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let backend = match backend {
            Ok(backend) => backend,
            Err(e) => {
                log::error!("Failed to initialize background renderer; 3D background disabled: {e}");
                window.hide();
                return;
            }
        };

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let mut manager = SceneManager::new(
            backend,
            WindowScheduler::new(window),
            self.settings.clone(),
            viewport,
        );
        manager.start(self.preference.current());
        manager.on_viewport_resize(viewport);
        self.manager = Some(manager);
    }

    fn apply_theme(&mut self, theme: Theme) {
        let theme = self.preference.set(theme);
        if let Some(manager) = &mut self.manager {
            manager.switch_theme(theme);
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.preference.toggle();
        if let Some(manager) = &mut self.manager {
            manager.switch_theme(theme);
        }
    }

    /// On WASM, checks whether async GPU initialization has completed.
    #[cfg(target_arch = "wasm32")]
    fn poll_pending_backend(&mut self) {
        if self.manager.is_some() {
            return;
        }
        let result = match self.pending_backend.try_borrow_mut() {
            Ok(mut slot) => slot.take(),
            Err(_) => return,
        };
        if let Some(backend) = result {
            self.install_backend(backend);
        }
    }
}

impl<S: ThemeStore + 'static> ApplicationHandler<BackdropEvent> for BackdropApp<S> {
    #[cfg(not(target_arch = "wasm32"))]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        log::info!("Initializing background renderer...");
        let backend = WgpuBackend::new_blocking(window, self.settings.renderer);
        self.install_backend(backend);
    }

    #[cfg(target_arch = "wasm32")]
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        use winit::platform::web::WindowAttributesExtWebSys;

        if self.window.is_some() {
            return;
        }

        let canvas = match web::find_canvas(&self.settings.surface_id) {
            Ok(canvas) => canvas,
            Err(e) => {
                log::error!("3D background disabled: {e}");
                return;
            }
        };

        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_canvas(Some(canvas));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("3D background disabled: {e}");
                return;
            }
        };
        self.window = Some(window.clone());

        log::info!("Initializing background renderer...");

        // requestAdapter is async on the web; park the result until the next
        // window event picks it up.
        let slot = self.pending_backend.clone();
        let settings = self.settings.renderer;
        wasm_bindgen_futures::spawn_local(async move {
            let backend = WgpuBackend::new(window.clone(), settings).await;
            *slot.borrow_mut() = Some(backend);
            window.request_redraw();
        });
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: BackdropEvent) {
        match event {
            BackdropEvent::SetTheme(theme) => self.apply_theme(theme),
            BackdropEvent::ToggleTheme => self.toggle_theme(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        self.poll_pending_backend();

        match event {
            WindowEvent::CloseRequested => {
                if let Some(manager) = &mut self.manager {
                    manager.shutdown();
                }
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::KeyT),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.toggle_theme(),
            _ => {}
        }

        let Some(manager) = &mut self.manager else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                manager.on_viewport_resize(Viewport::new(size.width, size.height));
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else {
                    return;
                };
                let pointer = pointer_from_cursor(
                    position,
                    window.inner_size(),
                    window.scale_factor(),
                    manager.settings().pointer_divisor,
                );
                manager.on_pointer_move(pointer.x, pointer.y);
            }
            WindowEvent::RedrawRequested => {
                if let Some(frame) = manager.scheduler_mut().take_pending() {
                    manager.on_frame(frame, Instant::now());
                }
            }
            _ => {}
        }
    }
}
