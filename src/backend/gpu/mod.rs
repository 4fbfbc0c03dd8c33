//! wgpu Backend
//!
//! [`WgpuBackend`] renders into any [`SurfaceSource`]: a winit window
//! natively, or the winit-managed canvas on the web. The [`GpuContext`] is
//! opened once; every [`WgpuRenderer`] gets a freshly created surface and its
//! own pipelines and buffers, all of which are released when it is disposed.

pub mod context;
pub mod pipeline;
pub mod renderer;

use std::sync::Arc;

pub use context::GpuContext;
pub use renderer::WgpuRenderer;

use crate::backend::RenderBackend;
use crate::errors::Result;
use crate::input::Viewport;
use crate::settings::RendererSettings;

/// A drawable output element.
pub trait SurfaceSource {
    /// A target for `wgpu::Instance::create_surface`. Called once per renderer.
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static>;

    /// Hides the element.
    fn hide(&self);
}

#[cfg(feature = "winit")]
impl SurfaceSource for Arc<winit::window::Window> {
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static> {
        wgpu::SurfaceTarget::from(self.clone())
    }

    fn hide(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;
            if let Some(canvas) = self.canvas()
                && canvas.style().set_property("display", "none").is_err()
            {
                log::warn!("Could not hide background canvas");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        self.set_visible(false);
    }
}

/// A bare canvas, for pages that drive the backend without winit.
#[cfg(target_arch = "wasm32")]
impl SurfaceSource for web_sys::HtmlCanvasElement {
    fn surface_target(&self) -> wgpu::SurfaceTarget<'static> {
        wgpu::SurfaceTarget::Canvas(self.clone())
    }

    fn hide(&self) {
        if self.style().set_property("display", "none").is_err() {
            log::warn!("Could not hide background canvas");
        }
    }
}

pub struct WgpuBackend<T: SurfaceSource> {
    gpu: Arc<GpuContext>,
    source: T,
    settings: RendererSettings,
}

impl<T: SurfaceSource> WgpuBackend<T> {
    /// Opens the GPU context for `source`.
    pub async fn new(source: T, settings: RendererSettings) -> Result<Self> {
        let gpu = GpuContext::new(&source, &settings).await?;
        Ok(Self {
            gpu: Arc::new(gpu),
            source,
            settings,
        })
    }

    /// Blocking variant of [`new`](Self::new) for native hosts.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_blocking(source: T, settings: RendererSettings) -> Result<Self> {
        pollster::block_on(Self::new(source, settings))
    }
}

impl<T: SurfaceSource> RenderBackend for WgpuBackend<T> {
    type Renderer = WgpuRenderer;

    fn create_renderer(&mut self, viewport: Viewport) -> Result<Self::Renderer> {
        let (surface, config) =
            self.gpu
                .configure_surface(&self.source, &self.settings, viewport.width, viewport.height)?;
        log::info!(
            "Renderer bound to surface ({}x{}, {:?})",
            config.width,
            config.height,
            config.format
        );
        Ok(WgpuRenderer::new(
            self.gpu.clone(),
            surface,
            config,
            self.settings.wgpu_clear_color(),
        ))
    }

    fn hide_surface(&mut self) {
        self.source.hide();
    }
}
