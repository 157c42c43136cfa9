//! Gerstner water library - wave model, water program generation and the demo scene

pub mod camera;
pub mod cli;
pub mod clock;
pub mod error;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod water;
pub mod wave;

pub use error::WaterError;
