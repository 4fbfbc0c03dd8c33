use std::sync::Arc;

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::backend::SurfaceRenderer;
use crate::backend::gpu::context::GpuContext;
use crate::backend::gpu::pipeline::{DrawUniforms, PipelineCache, PipelineKey};
use crate::errors::{BackdropError, Result};
use crate::input::Viewport;
use crate::resources::{Geometry, GeometryId, MaterialId};
use crate::scene::{ObjectKind, SceneGraph, Viewpoint, VisualObject};

// ============================================================================
// GPU resource wrappers
// ============================================================================

/// GPU buffers backing one geometry.
struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    vertex_bytes: u64,
    vertex_count: u32,
    index_buffer: Option<(wgpu::Buffer, u32)>,
    /// Whether the index buffer holds wireframe edges rather than triangles
    wireframe: bool,
    version: u64,
}

impl GpuGeometry {
    fn destroy(self) {
        self.vertex_buffer.destroy();
        if let Some((buffer, _)) = self.index_buffer {
            buffer.destroy();
        }
    }
}

/// Uniform buffer and bind group backing one material.
struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn topology_for(object: &VisualObject) -> wgpu::PrimitiveTopology {
    match object.kind {
        ObjectKind::Points => wgpu::PrimitiveTopology::PointList,
        ObjectKind::Mesh if object.material.wireframe => wgpu::PrimitiveTopology::LineList,
        ObjectKind::Mesh => wgpu::PrimitiveTopology::TriangleList,
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders one scene graph into a window or canvas surface.
///
/// Owns its surface, pipelines and every per-geometry / per-material buffer.
/// The device and queue are shared with the backend.
pub struct WgpuRenderer {
    gpu: Arc<GpuContext>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    pipelines: PipelineCache,
    geometries: FxHashMap<GeometryId, GpuGeometry>,
    materials: FxHashMap<MaterialId, GpuMaterial>,
}

impl WgpuRenderer {
    pub(crate) fn new(
        gpu: Arc<GpuContext>,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        clear_color: wgpu::Color,
    ) -> Self {
        let pipelines = PipelineCache::new(&gpu.device, config.format);
        Self {
            gpu,
            surface,
            config,
            clear_color,
            pipelines,
            geometries: FxHashMap::default(),
            materials: FxHashMap::default(),
        }
    }

    fn upload_geometry(&mut self, geometry: &Geometry, wireframe: bool) {
        let device = &self.gpu.device;
        let bytes: &[u8] = bytemuck::cast_slice(geometry.positions());
        let vertex_count = geometry.vertex_count() as u32;

        if let Some(gpu_geometry) = self.geometries.get_mut(&geometry.id()) {
            let same_size = gpu_geometry.vertex_bytes == bytes.len() as u64;
            if gpu_geometry.wireframe == wireframe && same_size {
                if gpu_geometry.version != geometry.version() {
                    // Reuse the allocation; only the contents change.
                    self.gpu.queue.write_buffer(&gpu_geometry.vertex_buffer, 0, bytes);
                    gpu_geometry.version = geometry.version();
                }
                return;
            }
            if let Some(stale) = self.geometries.remove(&geometry.id()) {
                stale.destroy();
            }
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Vertex Buffer"),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let indices = if wireframe {
            Some(geometry.wireframe_indices())
        } else {
            geometry.indices().map(<[u32]>::to_vec)
        };
        let index_buffer = indices.filter(|i| !i.is_empty()).map(|indices| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Backdrop Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (buffer, indices.len() as u32)
        });

        self.geometries.insert(
            geometry.id(),
            GpuGeometry {
                vertex_buffer,
                vertex_bytes: bytes.len() as u64,
                vertex_count,
                index_buffer,
                wireframe,
                version: geometry.version(),
            },
        );
    }

    fn write_material(&mut self, object: &VisualObject, view_projection: glam::Mat4) {
        let uniforms = DrawUniforms {
            mvp: (view_projection * object.model_matrix()).to_cols_array_2d(),
            color: object.material.color.to_array(),
        };

        if let Some(gpu_material) = self.materials.get(&object.material.id()) {
            self.gpu
                .queue
                .write_buffer(&gpu_material.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            return;
        }

        let device = &self.gpu.device;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Draw Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Draw BindGroup"),
            layout: &self.pipelines.draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.materials.insert(
            object.material.id(),
            GpuMaterial {
                uniform_buffer,
                bind_group,
            },
        );
    }
}

impl SurfaceRenderer for WgpuRenderer {
    fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.config.width = viewport.width;
            self.config.height = viewport.height;
            self.surface.configure(&self.gpu.device, &self.config);
        }
    }

    fn render(&mut self, scene: &SceneGraph, viewpoint: &Viewpoint) -> Result<()> {
        // 1. Sync CPU-side data into GPU buffers
        let view_projection = viewpoint.view_projection_matrix();
        for object in scene.iter().filter(|o| o.visible) {
            let wireframe = object.kind == ObjectKind::Mesh && object.material.wireframe;
            self.upload_geometry(&object.geometry, wireframe);
            self.write_material(object, view_projection);
            self.pipelines.prepare(
                &self.gpu.device,
                PipelineKey {
                    topology: topology_for(object),
                    blending: object.material.blending,
                },
            );
        }

        // 2. Acquire the surface texture
        let output = match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                self.surface.configure(&self.gpu.device, &self.config);
                return Ok(());
            }
            e => return Err(BackdropError::Render(format!("{e:?}"))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // 3. Record the pass
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });

            for object in scene.iter().filter(|o| o.visible) {
                let key = PipelineKey {
                    topology: topology_for(object),
                    blending: object.material.blending,
                };
                let (Some(pipeline), Some(gpu_geometry), Some(gpu_material)) = (
                    self.pipelines.get(key),
                    self.geometries.get(&object.geometry.id()),
                    self.materials.get(&object.material.id()),
                ) else {
                    continue;
                };

                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &gpu_material.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu_geometry.vertex_buffer.slice(..));

                match (&gpu_geometry.index_buffer, object.kind) {
                    (Some((index_buffer, count)), ObjectKind::Mesh) => {
                        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    _ => pass.draw(0..gpu_geometry.vertex_count, 0..1),
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if let Some(gpu_geometry) = self.geometries.remove(&id) {
            gpu_geometry.destroy();
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        if let Some(gpu_material) = self.materials.remove(&id) {
            gpu_material.uniform_buffer.destroy();
        }
    }

    fn dispose(mut self) {
        if !self.geometries.is_empty() || !self.materials.is_empty() {
            log::warn!(
                "Disposing renderer with {} geometries and {} materials still resident",
                self.geometries.len(),
                self.materials.len()
            );
        }
        for (_, gpu_geometry) in self.geometries.drain() {
            gpu_geometry.destroy();
        }
        for (_, gpu_material) in self.materials.drain() {
            gpu_material.uniform_buffer.destroy();
        }
        // Surface, pipelines and shader module drop here.
        log::debug!("Renderer disposed ({}x{})", self.config.width, self.config.height);
    }
}
