//! Orbit camera configuration.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Arc-rotate camera parameters (spherical coordinates around a target)
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Longitudinal angle around the Y axis (radians)
    /// -π/2 places the camera on the -Z side of the target
    pub alpha_rad: f32,

    /// Latitudinal angle from the +Y axis (radians)
    /// π/4 = looking down at 45°
    pub beta_rad: f32,

    /// Distance from the target (meters)
    pub radius_m: f32,

    /// Orbit center (meters)
    pub target: [f32; 3],

    /// Closest allowed zoom (meters)
    pub min_radius_m: f32,

    /// Farthest allowed zoom (meters)
    pub max_radius_m: f32,

    /// Mouse drag rotation (radians per pixel)
    pub rotate_rad_per_px: f32,

    /// Arrow-key rotation (radians per second)
    pub key_rotate_rad_per_s: f32,

    /// Fraction of the radius removed per wheel line
    pub zoom_per_line: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            alpha_rad: -FRAC_PI_2,
            beta_rad: FRAC_PI_4,
            radius_m: 3.0,
            target: [0.0, 0.0, 0.0],
            min_radius_m: 0.5,
            max_radius_m: 200.0,
            rotate_rad_per_px: 0.001,
            key_rotate_rad_per_s: 1.0,
            zoom_per_line: 0.1,
        }
    }
}
