//! Arc-rotate orbit camera driven by mouse drag, wheel and arrow keys.

use glam::{Mat4, Vec3};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::params::{CameraConfig, RenderConfig};

/// Keeps the camera off the poles, where the look-at basis degenerates
const BETA_EPSILON: f32 = 0.01;

/// Pixels of trackpad scroll treated as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Orbit camera in spherical coordinates around a target
pub struct ArcRotateCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3,
    config: CameraConfig,

    // Held arrow keys, as (left - right, up - down)
    key_alpha: f32,
    key_beta: f32,
}

impl ArcRotateCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            alpha: config.alpha_rad,
            beta: config.beta_rad,
            radius: config.radius_m,
            target: Vec3::from_array(config.target),
            config,
            key_alpha: 0.0,
            key_beta: 0.0,
        };
        camera.clamp();
        camera
    }

    /// Camera position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Projection × view for the given viewport aspect ratio
    pub fn view_proj(&self, aspect: f32, render_config: &RenderConfig) -> Mat4 {
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane_m,
            render_config.far_plane_m,
        );
        proj * self.view_matrix()
    }

    /// Orbit by the given angle deltas (radians)
    pub fn rotate(&mut self, d_alpha: f32, d_beta: f32) {
        self.alpha += d_alpha;
        self.beta += d_beta;
        self.clamp();
    }

    /// Mouse drag in pixels
    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        let rate = self.config.rotate_rad_per_px;
        self.rotate(-(dx as f32) * rate, -(dy as f32) * rate);
    }

    /// Wheel zoom; positive lines move toward the target
    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.zoom(lines);
    }

    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - self.config.zoom_per_line).powf(lines);
        self.radius *= factor;
        self.clamp();
    }

    /// Track arrow keys; returns whether the key was consumed
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed {
            1.0
        } else {
            0.0
        };
        match key {
            KeyCode::ArrowLeft => {
                self.key_alpha = amount;
                true
            }
            KeyCode::ArrowRight => {
                self.key_alpha = -amount;
                true
            }
            KeyCode::ArrowUp => {
                self.key_beta = -amount;
                true
            }
            KeyCode::ArrowDown => {
                self.key_beta = amount;
                true
            }
            _ => false,
        }
    }

    /// Apply held-key rotation for a frame of `dt_secs`
    pub fn update(&mut self, dt_secs: f32) {
        if self.key_alpha != 0.0 || self.key_beta != 0.0 {
            let step = self.config.key_rotate_rad_per_s * dt_secs;
            self.rotate(self.key_alpha * step, self.key_beta * step);
        }
    }

    fn clamp(&mut self) {
        self.beta = self
            .beta
            .clamp(BETA_EPSILON, std::f32::consts::PI - BETA_EPSILON);
        self.radius = self
            .radius
            .clamp(self.config.min_radius_m, self.config.max_radius_m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_position() {
        let camera = ArcRotateCamera::new(CameraConfig::default());
        let eye = camera.eye();

        // alpha = -π/2, beta = π/4, r = 3 → on the -Z side, 45° up
        let h = 3.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(eye.distance(Vec3::new(0.0, h, -h)) < 1e-5, "{:?}", eye);
    }

    #[test]
    fn test_eye_stays_at_radius() {
        let mut camera = ArcRotateCamera::new(CameraConfig::default());
        for i in 0..50 {
            camera.rotate(0.13, if i % 2 == 0 { 0.07 } else { -0.11 });
            let distance = camera.eye().distance(camera.target);
            assert!((distance - camera.radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_beta_clamped_off_poles() {
        let mut camera = ArcRotateCamera::new(CameraConfig::default());
        camera.rotate(0.0, -10.0);
        assert!(camera.beta >= BETA_EPSILON);
        camera.rotate(0.0, 20.0);
        assert!(camera.beta <= std::f32::consts::PI - BETA_EPSILON);
    }

    #[test]
    fn test_zoom_clamped() {
        let config = CameraConfig::default();
        let mut camera = ArcRotateCamera::new(config.clone());

        camera.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!(camera.radius < config.radius_m);

        camera.zoom(1000.0);
        assert_eq!(camera.radius, config.min_radius_m);
        camera.zoom(-1000.0);
        assert_eq!(camera.radius, config.max_radius_m);
    }

    #[test]
    fn test_arrow_keys_rotate_while_held() {
        let mut camera = ArcRotateCamera::new(CameraConfig::default());
        let alpha = camera.alpha;

        assert!(camera.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed));
        camera.update(0.5);
        assert!(camera.alpha > alpha);

        camera.process_keyboard(KeyCode::ArrowLeft, ElementState::Released);
        let held = camera.alpha;
        camera.update(0.5);
        assert_eq!(camera.alpha, held);

        assert!(!camera.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    }

    #[test]
    fn test_view_proj_is_valid() {
        let camera = ArcRotateCamera::new(CameraConfig::default());
        let view_proj = camera.view_proj(16.0 / 9.0, &RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.is_finite());

        // Target projects to the center of the screen
        let clip = view_proj * camera.target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
