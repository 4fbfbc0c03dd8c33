use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashSet;

/// Process-unique geometry identity. The renderer keys its GPU buffers by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_GEOMETRY_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_GEOMETRY_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Largest per-axis subdivision [`Geometry::new_plane`] accepts. Keeps every
/// vertex index and buffer length within `u32`.
pub const MAX_PLANE_SEGMENTS: u32 = 2048;

/// CPU-side shape data: a flat `[x, y, z, x, y, z, ...]` position buffer and
/// an optional triangle index list.
///
/// The position buffer can be edited in place through
/// [`update_positions`](Self::update_positions), which hands out a slice so
/// the allocation can never grow or move. Each edit bumps the version; the
/// renderer re-uploads into the existing GPU buffer when it sees a new one.
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    positions: Vec<f32>,
    indices: Option<Vec<u32>>,
    version: u64,
}

impl Geometry {
    /// A point cloud from flat xyz coordinates. Trailing components that do
    /// not form a whole vertex are dropped.
    #[must_use]
    pub fn from_positions(mut positions: Vec<f32>) -> Self {
        positions.truncate(positions.len() / 3 * 3);
        Self {
            id: GeometryId(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed)),
            positions,
            indices: None,
            version: next_version(),
        }
    }

    /// A flat plane in the XY plane centred on the origin, subdivided into
    /// `segments_x * segments_y` cells.
    ///
    /// Vertices are row-major starting at the top-left corner: x increases
    /// along a row, y decreases from row to row. Each cell is split into two
    /// triangles. Segment counts are clamped to `1..=MAX_PLANE_SEGMENTS`.
    #[must_use]
    pub fn new_plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let segments_x = segments_x.clamp(1, MAX_PLANE_SEGMENTS);
        let segments_y = segments_y.clamp(1, MAX_PLANE_SEGMENTS);
        let (cols, rows) = (segments_x + 1, segments_y + 1);

        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let seg_w = width / segments_x as f32;
        let seg_h = height / segments_y as f32;

        let mut positions = Vec::with_capacity(cols as usize * rows as usize * 3);
        for iy in 0..rows {
            let y = iy as f32 * seg_h - half_h;
            for ix in 0..cols {
                let x = ix as f32 * seg_w - half_w;
                positions.extend_from_slice(&[x, -y, 0.0]);
            }
        }

        let mut indices = Vec::with_capacity(segments_x as usize * segments_y as usize * 6);
        for iy in 0..segments_y {
            for ix in 0..segments_x {
                let a = ix + cols * iy;
                let b = ix + cols * (iy + 1);
                let c = (ix + 1) + cols * (iy + 1);
                let d = (ix + 1) + cols * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut geometry = Self::from_positions(positions);
        geometry.indices = Some(indices);
        geometry
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> GeometryId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Edits positions in place and marks the geometry dirty.
    pub fn update_positions<F>(&mut self, f: F)
    where
        F: FnOnce(&mut [f32]),
    {
        f(&mut self.positions);
        self.version = next_version();
    }

    /// Unique undirected edges of the triangle list, as a line-list index
    /// buffer. Point clouds have no edges.
    #[must_use]
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let Some(indices) = &self.indices else {
            return Vec::new();
        };

        let mut seen = FxHashSet::default();
        let mut lines = Vec::with_capacity(indices.len() * 2);
        for tri in indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.extend_from_slice(&[key.0, key.1]);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_vertex_layout_starts_top_left() {
        let plane = Geometry::new_plane(10.0, 10.0, 2, 2);
        assert_eq!(plane.vertex_count(), 9);
        assert_eq!(&plane.positions()[0..3], &[-5.0, 5.0, 0.0]);
        assert_eq!(&plane.positions()[24..27], &[5.0, -5.0, 0.0]);
    }

    #[test]
    fn single_cell_wireframe_has_five_edges() {
        let plane = Geometry::new_plane(1.0, 1.0, 1, 1);
        assert_eq!(plane.wireframe_indices().len(), 10);
    }

    #[test]
    fn zero_segments_build_one_cell() {
        let plane = Geometry::new_plane(2.0, 2.0, 0, 0);
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.indices().map(<[u32]>::len), Some(6));
    }

    #[test]
    fn ids_are_unique() {
        let a = Geometry::from_positions(vec![0.0; 3]);
        let b = Geometry::from_positions(vec![0.0; 3]);
        assert_ne!(a.id(), b.id());
    }
}
