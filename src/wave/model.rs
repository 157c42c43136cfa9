//! CPU reference evaluation of the Gerstner wave sum.
//!
//! Mirrors the vertex stage generated by [`super::shader`], so displacement and
//! normals can be inspected and tested without a GPU.

use glam::{Vec2, Vec3};

use super::params::WaveParameters;
use super::set::WaveSet;

/// Gravitational acceleration used by the dispersion relation (m/s²)
pub const GRAVITY: f32 = 9.8;

/// Displaced surface point and its normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Offset contributed by one wave, accumulating its tangent/binormal derivatives
fn gerstner_wave(
    wave: &WaveParameters,
    grid_point: Vec3,
    time: f32,
    tangent: &mut Vec3,
    binormal: &mut Vec3,
) -> Vec3 {
    let steepness = wave.steepness;
    let k = wave.wave_number();
    let c = (GRAVITY / k).sqrt();
    let d = wave.direction.normalize();
    let frequency = k * (d.dot(Vec2::new(grid_point.x, grid_point.z)) - c * time);
    let amplitude = steepness / k;

    let (sin_f, cos_f) = frequency.sin_cos();

    *tangent += Vec3::new(
        -d.x * d.x * (steepness * sin_f),
        d.x * (steepness * cos_f),
        -d.x * d.y * (steepness * sin_f),
    );
    *binormal += Vec3::new(
        -d.x * d.y * (steepness * sin_f),
        d.y * (steepness * cos_f),
        -d.y * d.y * (steepness * sin_f),
    );

    Vec3::new(
        d.x * (amplitude * cos_f),
        amplitude * sin_f,
        d.y * (amplitude * cos_f),
    )
}

/// Displace `grid_point` by every wave in `wave_set` at `time` seconds
pub fn displace(wave_set: &WaveSet, grid_point: Vec3, time: f32) -> Displacement {
    let mut tangent = Vec3::X;
    let mut binormal = Vec3::Z;
    let mut position = grid_point;

    for wave in wave_set.waves() {
        position += gerstner_wave(wave, grid_point, time, &mut tangent, &mut binormal);
    }

    Displacement {
        position,
        normal: binormal.cross(tangent).normalize(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::build_wave_set;

    const EPS: f32 = 1e-5;

    fn single(steepness: f32, wavelength: f32, direction: Vec2) -> WaveSet {
        build_wave_set(
            WaveParameters::new(steepness, wavelength, direction),
            [None, None],
        )
        .unwrap()
    }

    #[test]
    fn test_near_zero_wave_leaves_point_in_place() {
        let set = single(0.0001, 7.5, Vec2::new(1.0, 0.0));
        for point in [Vec3::ZERO, Vec3::new(3.0, 0.0, -2.0), Vec3::new(-40.0, 0.0, 17.5)] {
            let out = displace(&set, point, 0.0);
            assert!(
                out.position.distance(point) < 1e-3,
                "{:?} moved to {:?}",
                point,
                out.position
            );
        }
    }

    #[test]
    fn test_flat_normal_for_near_zero_waves() {
        let set = single(0.0001, 7.5, Vec2::new(1.0, 0.0));
        let out = displace(&set, Vec3::ZERO, 0.0);
        assert!(out.normal.distance(Vec3::Y) < 1e-3);
    }

    #[test]
    fn test_vertical_displacement_bounded_by_amplitude_sum() {
        let set = WaveSet::default();
        let bound = set.max_height();

        for t in 0..40 {
            let time = t as f32 * 0.37;
            for x in -10..10 {
                for z in -10..10 {
                    let point = Vec3::new(x as f32 * 1.3, 0.0, z as f32 * 0.9);
                    let dy = displace(&set, point, time).position.y - point.y;
                    assert!(
                        dy.abs() <= bound + EPS,
                        "dy {} exceeds bound {} at {:?}, t={}",
                        dy,
                        bound,
                        point,
                        time
                    );
                }
            }
        }
    }

    #[test]
    fn test_demo_waves_at_origin_baseline() {
        // Regression baseline for the three demo waves at t=0
        let set = WaveSet::default();
        let out = displace(&set, Vec3::ZERO, 0.0);

        let expected_position = Vec3::new(1.634_858_7, 0.0, 1.300_929_1);
        let expected_normal = Vec3::new(-0.642_344_1, 0.559_686_7, -0.523_588_4);

        assert!(
            out.position.distance(expected_position) < EPS,
            "position {:?}",
            out.position
        );
        assert!(
            out.normal.distance(expected_normal) < EPS,
            "normal {:?}",
            out.normal
        );
    }

    #[test]
    fn test_direction_is_normalized() {
        let unit = single(0.5, 10.5, Vec2::new(1.0, 0.0));
        let long = single(0.5, 10.5, Vec2::new(25.0, 0.0));
        let point = Vec3::new(2.0, 0.0, 3.0);

        let a = displace(&unit, point, 1.25);
        let b = displace(&long, point, 1.25);
        assert!(a.position.distance(b.position) < EPS);
        assert!(a.normal.distance(b.normal) < EPS);
    }

    #[test]
    fn test_wave_travels_along_direction() {
        // After a time shift of Δt the pattern moves c·Δt along d
        let set = single(0.5, 10.5, Vec2::new(1.0, 0.0));
        let wave = set.primary();
        let c = (GRAVITY / wave.wave_number()).sqrt();

        let dt = 0.8;
        let before = displace(&set, Vec3::ZERO, 0.0);
        let after = displace(&set, Vec3::new(c * dt, 0.0, 0.0), dt);

        assert!((before.position.y - after.position.y).abs() < 1e-4);
    }

    #[test]
    fn test_normal_is_unit_length() {
        let set = WaveSet::default();
        for t in 0..20 {
            let out = displace(&set, Vec3::new(t as f32, 0.0, -(t as f32) * 0.5), t as f32 * 0.1);
            assert!((out.normal.length() - 1.0).abs() < 1e-4);
            assert!(out.normal.y > 0.0);
        }
    }
}
