//! Pointer and viewport state.
//!
//! Both types are plain data. The scene manager owns one [`PointerState`];
//! hosts translate their native events into these types before calling in.

/// Output surface dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height yields an aspect of `1.0` so a
    /// minimised window never produces a NaN projection.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Pointer offset from the viewport centre, in divided pixel units.
///
/// Single writer (pointer-move events), single reader per frame. A
/// multi-threaded host would need to wrap this in a lock or an atomic pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts a client-space cursor position into a centred offset,
    /// `(client - size / 2) / divisor`.
    #[must_use]
    pub fn from_client(client_x: f64, client_y: f64, viewport: Viewport, divisor: f32) -> Self {
        let divisor = if divisor.abs() < f32::EPSILON { 1.0 } else { divisor };
        let half_w = f64::from(viewport.width) / 2.0;
        let half_h = f64::from(viewport.height) / 2.0;
        Self {
            x: ((client_x - half_w) as f32) / divisor,
            y: ((client_y - half_h) as f32) / divisor,
        }
    }
}
