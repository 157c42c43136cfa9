//! Crate error types.

use std::num::ParseFloatError;

/// Errors raised while configuring waves or setting up rendering
#[derive(Debug, thiserror::Error)]
pub enum WaterError {
    /// A wave parameter that cannot be evaluated (e.g. zero wavelength)
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// More waves requested than the shader has slots for
    #[error("at most 3 waves are supported, got {0}")]
    TooManyWaves(usize),

    /// Shader program rejected by the device
    #[error("failed to compile {label}: {message}")]
    ProgramCompilation { label: String, message: String },

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Surface texture could not be acquired for a frame
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to map readback buffer: {0}")]
    MapBuffer(#[from] wgpu::BufferAsyncError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    /// Frame capture could not be written
    #[error("failed to save screenshot {path}: {source}")]
    Capture {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

impl WaterError {
    pub(crate) fn invalid(
        name: &'static str,
        value: impl std::fmt::Debug,
        reason: &'static str,
    ) -> Self {
        WaterError::InvalidParameter {
            name,
            value: format!("{:?}", value),
            reason,
        }
    }
}

/// Errors parsing a `STEEPNESS,WAVELENGTH,DIR_X,DIR_Y` wave string
#[derive(Debug, thiserror::Error)]
pub enum ParseWaveError {
    #[error("expected STEEPNESS,WAVELENGTH,DIR_X,DIR_Y, got {0:?}")]
    Format(String),

    #[error("invalid {field}: {source}")]
    Number {
        field: &'static str,
        #[source]
        source: ParseFloatError,
    },
}
