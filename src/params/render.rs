//! Rendering and capture configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    /// 45.8° ≈ 0.8 rad, a moderate perspective for a close orbit camera
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    /// Covers the whole 100m ground from any orbit radius
    pub far_plane_m: f32,

    /// Background color (linear RGB)
    pub clear_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 45.8,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
            clear_color: [0.2, 0.2, 0.3],
        }
    }
}

/// Single-frame screenshot configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Output PNG path
    pub path: PathBuf,

    /// Elapsed time after which the next frame is captured (seconds)
    pub at_secs: f32,
}

impl CaptureConfig {
    pub fn new(path: impl Into<PathBuf>, at_secs: f32) -> Self {
        Self {
            path: path.into(),
            at_secs: at_secs.max(0.0),
        }
    }

    /// Whether a frame rendered at `elapsed_secs` should be captured
    pub fn is_due(&self, elapsed_secs: f32) -> bool {
        elapsed_secs >= self.at_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_due() {
        let capture = CaptureConfig::new("shot.png", 2.0);
        assert!(!capture.is_due(1.99));
        assert!(capture.is_due(2.0));

        let immediate = CaptureConfig::new("shot.png", -1.0);
        assert!(immediate.is_due(0.0));
    }
}
