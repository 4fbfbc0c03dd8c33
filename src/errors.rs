//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`BackdropError`] covers two families of failure:
//!
//! - *Capability* failures: no GPU adapter, no device, no output surface.
//! - *Construction* failures: anything that goes wrong while building a scene.
//!
//! Neither family is fatal to the host page. The scene manager catches both at
//! its construction entry point, logs them and hides the output surface.
//! Settings and preference-store errors are returned to the caller.

use thiserror::Error;

/// The main error type for the backdrop crate.
#[derive(Error, Debug)]
pub enum BackdropError {
    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// The graphics capability (adapter, surface support) is unavailable.
    #[error("Graphics capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The output surface element could not be found.
    #[error("Output surface '{0}' not found")]
    SurfaceMissing(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    // ========================================================================
    // Scene Errors
    // ========================================================================
    /// Building a scene variant failed.
    #[error("Scene construction failed: {0}")]
    Construction(String),

    /// A frame could not be rendered.
    #[error("Render error: {0}")]
    Render(String),

    // ========================================================================
    // Settings & Persistence Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl BackdropError {
    /// Returns `true` for failures caused by a missing graphics capability
    /// or output surface, as opposed to a failure while building a scene.
    #[must_use]
    pub fn is_capability(&self) -> bool {
        matches!(
            self,
            Self::CapabilityUnavailable(_) | Self::SurfaceMissing(_) | Self::DeviceCreateFailed(_)
        )
    }
}

/// Alias for `Result<T, BackdropError>`.
pub type Result<T> = std::result::Result<T, BackdropError>;
