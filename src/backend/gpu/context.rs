//! wgpu Context
//!
//! The [`GpuContext`] holds the long-lived GPU handles shared by every
//! renderer the backend creates: instance, adapter, device and queue. It is
//! created once per page; surfaces, pipelines and buffers belong to the
//! individual renderers and die with them.

use crate::backend::gpu::SurfaceSource;
use crate::errors::{BackdropError, Result};
use crate::settings::RendererSettings;

pub struct GpuContext {
    /// Used to create a fresh surface for every renderer
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    /// The wgpu device for GPU operations
    pub device: wgpu::Device,
    /// The command queue for submitting work
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Requests an adapter able to present to `source` and opens a device on it.
    pub async fn new<T: SurfaceSource>(source: &T, settings: &RendererSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();

        // Probe surface: only used to pick a compatible adapter, then dropped
        // so the first renderer can bind the output surface itself.
        let probe = instance
            .create_surface(source.surface_target())
            .map_err(|e| BackdropError::CapabilityUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference.into(),
                compatible_surface: Some(&probe),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| BackdropError::CapabilityUnavailable(e.to_string()))?;

        drop(probe);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                ..Default::default()
            })
            .await?;

        log::info!("GPU adapter: {:?}", adapter.get_info().name);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Creates and configures a surface for `source`.
    pub fn configure_surface<T: SurfaceSource>(
        &self,
        source: &T,
        settings: &RendererSettings,
        width: u32,
        height: u32,
    ) -> Result<(wgpu::Surface<'static>, wgpu::SurfaceConfiguration)> {
        let surface = self
            .instance
            .create_surface(source.surface_target())
            .map_err(|e| BackdropError::CapabilityUnavailable(e.to_string()))?;

        let mut config = surface
            .get_default_config(&self.adapter, width.max(1), height.max(1))
            .ok_or_else(|| {
                BackdropError::CapabilityUnavailable("Surface not supported by adapter".to_string())
            })?;

        let caps = surface.get_capabilities(&self.adapter);
        if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
            config.alpha_mode = wgpu::CompositeAlphaMode::PreMultiplied;
        }

        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&self.device, &config);

        Ok((surface, config))
    }
}
