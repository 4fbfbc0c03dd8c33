#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backend;
pub mod errors;
pub mod frame;
pub mod input;
pub mod manager;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod theme;
pub mod utils;
pub mod variants;

#[cfg(feature = "winit")]
pub mod app;

pub use backend::headless::{LedgerHandle, RecordingBackend};
pub use backend::{RenderBackend, SurfaceRenderer};
pub use errors::{BackdropError, Result};
pub use frame::{FrameHandle, FrameScheduler, ManualScheduler};
pub use input::{PointerState, Viewport};
pub use manager::{SceneManager, SceneStatus};
pub use resources::{Geometry, Material};
pub use scene::{SceneGraph, Viewpoint, VisualObject};
pub use settings::BackdropSettings;
pub use theme::{Theme, ThemePreference, ThemeStore};
pub use variants::{SceneVariant, VariantKind};

#[cfg(feature = "winit")]
pub use app::{BackdropApp, BackdropEvent};
