//! Hemispheric light with an optional orbit around the vertical axis.

use glam::{Quat, Vec3};

use crate::params::LightConfig;

pub struct HemisphericLight {
    base_direction: Vec3,
    pub intensity: f32,
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    orbit_speed: f32,
}

impl HemisphericLight {
    pub fn new(config: &LightConfig) -> Self {
        Self {
            base_direction: Vec3::from_array(config.direction),
            intensity: config.intensity,
            sky_color: Vec3::from_array(config.sky_color),
            ground_color: Vec3::from_array(config.ground_color),
            orbit_speed: config.orbit_speed_rad_per_s,
        }
    }

    /// Light direction after `elapsed_secs` of orbiting (unnormalized, as configured)
    pub fn direction_at(&self, elapsed_secs: f32) -> Vec3 {
        if self.orbit_speed == 0.0 {
            return self.base_direction;
        }
        Quat::from_rotation_y(self.orbit_speed * elapsed_secs) * self.base_direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_light_keeps_direction() {
        let light = HemisphericLight::new(&LightConfig::default());
        assert_eq!(light.direction_at(0.0), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(light.direction_at(123.0), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_orbit_rotates_around_y() {
        let light = HemisphericLight::new(&LightConfig {
            orbit_speed_rad_per_s: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        });

        let start = light.direction_at(0.0);
        let quarter = light.direction_at(1.0);

        assert!((quarter.length() - start.length()).abs() < 1e-5);
        assert!((quarter.y - start.y).abs() < 1e-6);
        // +X rotated a quarter turn about +Y lands on -Z
        assert!(quarter.distance(Vec3::new(0.0, 1.0, -1.0)) < 1e-5, "{:?}", quarter);
    }
}
