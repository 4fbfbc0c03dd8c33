//! Graphics Capability
//!
//! The scene manager never talks to a graphics API directly. It goes through
//! two traits:
//!
//! - [`RenderBackend`]: the capability itself. Creates a renderer bound to the
//!   output surface and can hide that surface when the backdrop is disabled.
//! - [`SurfaceRenderer`]: draws a [`SceneGraph`] through a [`Viewpoint`].
//!   GPU allocations for geometries and materials are created lazily on first
//!   draw, keyed by id, and live until released explicitly.
//!
//! Implementations:
//!
//! - [`gpu::WgpuBackend`]: real GPU rendering into a window or canvas.
//! - [`headless::RecordingBackend`]: no GPU; counts every allocation and
//!   release in a shared [`headless::Ledger`].

pub mod headless;
pub mod gpu;

use crate::errors::Result;
use crate::input::Viewport;
use crate::resources::{GeometryId, MaterialId};
use crate::scene::{SceneGraph, Viewpoint};

/// Draws scene graphs into one output surface.
pub trait SurfaceRenderer {
    /// Matches the output surface to a new viewport. Empty viewports are
    /// ignored.
    fn resize(&mut self, viewport: Viewport);

    /// Renders one frame.
    fn render(&mut self, scene: &SceneGraph, viewpoint: &Viewpoint) -> Result<()>;

    /// Frees GPU buffers created for `id`. Unknown ids are ignored.
    fn release_geometry(&mut self, id: GeometryId);

    /// Frees GPU buffers and bind groups created for `id`. Unknown ids are
    /// ignored.
    fn release_material(&mut self, id: MaterialId);

    /// Releases the renderer's own GPU context (surface, pipelines, shared
    /// buffers). Consumes the renderer so nothing can draw with it afterwards.
    fn dispose(self);
}

/// The graphics capability the scene manager depends on.
pub trait RenderBackend {
    type Renderer: SurfaceRenderer;

    /// Binds a new renderer to the output surface.
    ///
    /// Fails with a capability error if no GPU or surface is available. Only
    /// one renderer per surface may be alive at a time.
    fn create_renderer(&mut self, viewport: Viewport) -> Result<Self::Renderer>;

    /// Hides the output surface so a disabled backdrop leaves no artefacts.
    fn hide_surface(&mut self);
}
