//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::WaterError;
use crate::params::{AppConfig, CaptureConfig, MAX_GROUND_SUBDIVISIONS};
use crate::wave::{WaveParameters, WaveSet};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gerstner-water")]
#[command(about = "Gerstner-wave water surface demo", long_about = None)]
pub struct Args {
    /// Wave as STEEPNESS,WAVELENGTH,DIR_X,DIR_Y; repeat up to 3 times
    /// (primary first). Defaults to the three-wave demo configuration.
    #[arg(long = "wave", value_name = "S,L,DX,DY", allow_hyphen_values = true)]
    pub waves: Vec<WaveParameters>,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Ground grid subdivisions per side
    #[arg(long, value_name = "COUNT")]
    pub subdivisions: Option<u32>,

    /// Orbit the light around the vertical axis (radians per second)
    #[arg(long, value_name = "RAD_PER_S", allow_negative_numbers = true)]
    pub light_orbit: Option<f32>,

    /// Save one frame as PNG, then exit
    #[arg(long, value_name = "PATH")]
    pub screenshot: Option<PathBuf>,

    /// Elapsed time before the screenshot is taken
    #[arg(long, value_name = "SECONDS", default_value = "2.0")]
    pub screenshot_at: f32,

    /// Print the generated WGSL for both stages and exit
    #[arg(long)]
    pub dump_shader: bool,
}

impl Args {
    /// Apply overrides on top of the defaults
    pub fn into_config(self) -> Result<AppConfig, WaterError> {
        let mut config = AppConfig::default();

        if !self.waves.is_empty() {
            config.waves = WaveSet::from_slice(&self.waves)?;
        }
        if let Some(width) = self.width {
            config.render.window_width = width.max(1);
        }
        if let Some(height) = self.height {
            config.render.window_height = height.max(1);
        }
        if let Some(subdivisions) = self.subdivisions {
            if subdivisions == 0 {
                return Err(WaterError::invalid(
                    "subdivisions",
                    subdivisions,
                    "must be at least 1",
                ));
            }
            if subdivisions > MAX_GROUND_SUBDIVISIONS {
                return Err(WaterError::invalid(
                    "subdivisions",
                    subdivisions,
                    "ground buffers would exceed the GPU buffer size limit",
                ));
            }
            config.scene.ground_subdivisions = subdivisions;
        }
        if let Some(speed) = self.light_orbit {
            config.scene.light.orbit_speed_rad_per_s = speed;
        }
        config.capture = self
            .screenshot
            .map(|path| CaptureConfig::new(path, self.screenshot_at));

        Ok(config)
    }
}
