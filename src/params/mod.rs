//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable default of the demo lives here:
//! - Physical units (meters, seconds, radians, etc.)
//! - Documented ranges and meanings
//! - Command-line overrides are applied on top in [`crate::cli`]

mod camera;
mod render;
mod scene;

pub use camera::CameraConfig;
pub use render::{CaptureConfig, RenderConfig};
pub use scene::{LightConfig, SceneConfig, MAX_GROUND_SUBDIVISIONS};

use crate::wave::WaveSet;

/// Everything the application needs to start
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub waves: WaveSet,
    pub capture: Option<CaptureConfig>,
}
