//! Headless recording backend.
//!
//! Behaves like a GPU backend from the manager's point of view (lazy
//! per-id allocations, explicit release, disposable renderers) but only
//! records what happens. Every renderer created by one backend reports into
//! the same [`Ledger`], which tests inspect through a [`LedgerHandle`].

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::backend::{RenderBackend, SurfaceRenderer};
use crate::errors::{BackdropError, Result};
use crate::frame::FrameHandle;
use crate::input::Viewport;
use crate::resources::{GeometryId, MaterialId};
use crate::scene::{SceneGraph, Viewpoint};

/// One recorded backend operation, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    RendererCreated(u32),
    Render(u32),
    Resize(u32, Viewport),
    GeometryReleased(u32, GeometryId),
    MaterialReleased(u32, MaterialId),
    RendererDisposed(u32),
    SurfaceHidden,
    /// Recorded by schedulers that share the ledger.
    FrameCancelled(FrameHandle),
}

/// GPU-side record for one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryRecord {
    /// Size in bytes of the (single) vertex buffer allocation.
    pub buffer_len: usize,
    /// Number of times data was written into that buffer.
    pub uploads: u32,
    /// Number of times the buffer had to be reallocated.
    pub reallocations: u32,
    pub version: u64,
}

#[derive(Debug, Default)]
pub struct Ledger {
    pub events: Vec<LedgerEvent>,
    pub renderers_created: u32,
    pub renderers_disposed: u32,
    pub max_live_renderers: u32,
    pub frames_rendered: u64,
    /// Allocations still held by a renderer when it was disposed.
    pub leaked_on_dispose: usize,
    pub surface_hidden: bool,
    pub last_viewport: Option<Viewport>,
    geometries: FxHashMap<(u32, GeometryId), GeometryRecord>,
    materials: FxHashSet<(u32, MaterialId)>,
}

impl Ledger {
    #[must_use]
    pub fn live_renderers(&self) -> u32 {
        self.renderers_created - self.renderers_disposed
    }

    #[must_use]
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    #[must_use]
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    /// Live allocations owned by renderer `serial`.
    #[must_use]
    pub fn allocations_of(&self, serial: u32) -> usize {
        self.geometries.keys().filter(|(s, _)| *s == serial).count()
            + self.materials.iter().filter(|(s, _)| *s == serial).count()
    }

    #[must_use]
    pub fn geometry(&self, serial: u32, id: GeometryId) -> Option<GeometryRecord> {
        self.geometries.get(&(serial, id)).copied()
    }

    /// Index of the first event matching `pred`.
    pub fn position<P>(&self, pred: P) -> Option<usize>
    where
        P: FnMut(&LedgerEvent) -> bool,
    {
        self.events.iter().position(pred)
    }
}

/// Shared read access to a backend's ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerHandle(Arc<Mutex<Ledger>>);

impl LedgerHandle {
    /// Runs `f` against the ledger.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.0.lock())
    }

    /// Appends an event from outside the backend, so host-side steps can be
    /// ordered against renderer events.
    pub fn record(&self, event: LedgerEvent) {
        self.write(|l| l.events.push(event));
    }

    fn write<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        f(&mut self.0.lock())
    }
}

// ============================================================================
// Backend
// ============================================================================

#[derive(Debug)]
pub struct RecordingBackend {
    ledger: LedgerHandle,
    available: bool,
    next_serial: u32,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ledger: LedgerHandle::default(),
            available: true,
            next_serial: 0,
        }
    }

    /// A backend whose graphics capability is missing: every
    /// `create_renderer` call fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    #[must_use]
    pub fn ledger(&self) -> LedgerHandle {
        self.ledger.clone()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for RecordingBackend {
    type Renderer = RecordingRenderer;

    fn create_renderer(&mut self, viewport: Viewport) -> Result<Self::Renderer> {
        if !self.available {
            return Err(BackdropError::CapabilityUnavailable(
                "recording backend configured without graphics capability".to_string(),
            ));
        }

        self.next_serial += 1;
        let serial = self.next_serial;
        self.ledger.write(|l| {
            l.renderers_created += 1;
            l.max_live_renderers = l.max_live_renderers.max(l.live_renderers());
            l.last_viewport = Some(viewport);
            l.events.push(LedgerEvent::RendererCreated(serial));
        });

        Ok(RecordingRenderer {
            serial,
            viewport,
            ledger: self.ledger.clone(),
        })
    }

    fn hide_surface(&mut self) {
        self.ledger.write(|l| {
            l.surface_hidden = true;
            l.events.push(LedgerEvent::SurfaceHidden);
        });
    }
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug)]
pub struct RecordingRenderer {
    serial: u32,
    viewport: Viewport,
    ledger: LedgerHandle,
}

impl RecordingRenderer {
    /// Identifies this renderer in [`LedgerEvent`]s.
    #[must_use]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl SurfaceRenderer for RecordingRenderer {
    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        let serial = self.serial;
        self.ledger.write(|l| {
            l.last_viewport = Some(viewport);
            l.events.push(LedgerEvent::Resize(serial, viewport));
        });
    }

    fn render(&mut self, scene: &SceneGraph, _viewpoint: &Viewpoint) -> Result<()> {
        let serial = self.serial;
        self.ledger.write(|l| {
            for object in scene.iter() {
                let geometry = &object.geometry;
                let len = std::mem::size_of_val(geometry.positions());
                let record = l
                    .geometries
                    .entry((serial, geometry.id()))
                    .or_insert(GeometryRecord {
                        buffer_len: len,
                        uploads: 1,
                        reallocations: 0,
                        version: geometry.version(),
                    });
                if record.version != geometry.version() {
                    if record.buffer_len != len {
                        record.buffer_len = len;
                        record.reallocations += 1;
                    }
                    record.uploads += 1;
                    record.version = geometry.version();
                }
                l.materials.insert((serial, object.material.id()));
            }
            l.frames_rendered += 1;
            l.events.push(LedgerEvent::Render(serial));
        });
        Ok(())
    }

    fn release_geometry(&mut self, id: GeometryId) {
        let serial = self.serial;
        self.ledger.write(|l| {
            if l.geometries.remove(&(serial, id)).is_some() {
                l.events.push(LedgerEvent::GeometryReleased(serial, id));
            }
        });
    }

    fn release_material(&mut self, id: MaterialId) {
        let serial = self.serial;
        self.ledger.write(|l| {
            if l.materials.remove(&(serial, id)) {
                l.events.push(LedgerEvent::MaterialReleased(serial, id));
            }
        });
    }

    fn dispose(self) {
        let serial = self.serial;
        self.ledger.write(|l| {
            let leaked = l.allocations_of(serial);
            if leaked > 0 {
                log::warn!("Renderer {serial} disposed with {leaked} live allocations");
                l.leaked_on_dispose += leaked;
                l.geometries.retain(|(s, _), _| *s != serial);
                l.materials.retain(|(s, _)| *s != serial);
            }
            l.renderers_disposed += 1;
            l.events.push(LedgerEvent::RendererDisposed(serial));
        });
    }
}
