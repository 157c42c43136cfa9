//! Single-wave descriptor and its sanitization rules.

use std::str::FromStr;

use glam::Vec2;

use crate::error::{ParseWaveError, WaterError};

/// Offset applied to steepness/wavelength values that land exactly on an integer
pub const INTEGER_NUDGE: f32 = 0.0001;

/// One Gerstner wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParameters {
    /// Crest sharpness (dimensionless, meaningful range [0, 1])
    pub steepness: f32,

    /// Spatial period (meters)
    pub wavelength: f32,

    /// Horizontal propagation direction in the XZ plane (normalized at evaluation)
    pub direction: Vec2,
}

impl WaveParameters {
    /// Filler for unused shader slots; evaluates to a near-zero contribution
    pub const SENTINEL: WaveParameters = WaveParameters {
        steepness: 0.0001,
        wavelength: 0.0001,
        direction: Vec2::new(0.0001, 0.0001),
    };

    pub fn new(steepness: f32, wavelength: f32, direction: Vec2) -> Self {
        Self {
            steepness,
            wavelength,
            direction,
        }
    }

    /// Wave number k = 2π / λ (radians per meter)
    pub fn wave_number(&self) -> f32 {
        std::f32::consts::TAU / self.wavelength
    }

    /// Peak displacement a = steepness / k (meters)
    pub fn amplitude(&self) -> f32 {
        self.steepness / self.wave_number()
    }

    /// Pack as `[direction.x, direction.y, steepness, wavelength]`
    pub fn packed(&self) -> [f32; 4] {
        [
            self.direction.x,
            self.direction.y,
            self.steepness,
            self.wavelength,
        ]
    }

    pub fn from_packed(packed: [f32; 4]) -> Self {
        Self {
            direction: Vec2::new(packed[0], packed[1]),
            steepness: packed[2],
            wavelength: packed[3],
        }
    }
}

/// Return a shader-safe copy of `params`.
///
/// Steepness is clamped into [0, 1]; integer steepness and integer wavelength
/// are moved off the integer by [`INTEGER_NUDGE`]. Steepness 1 moves down so the
/// result stays inside [0, 1]: it becomes 0.9999, not the 1.0001 that blindly
/// adding the nudge would give. Values the wave formula cannot evaluate (zero,
/// negative or non-finite wavelength, NaN steepness, degenerate direction)
/// are rejected.
pub fn sanitize(params: WaveParameters) -> Result<WaveParameters, WaterError> {
    let WaveParameters {
        steepness,
        wavelength,
        direction,
    } = params;

    if steepness.is_nan() {
        return Err(WaterError::invalid("steepness", steepness, "must be a number"));
    }
    if !wavelength.is_finite() {
        return Err(WaterError::invalid("wavelength", wavelength, "must be finite"));
    }
    if wavelength <= 0.0 {
        return Err(WaterError::invalid(
            "wavelength",
            wavelength,
            "must be greater than zero",
        ));
    }
    if !direction.is_finite() || direction.length_squared() == 0.0 {
        return Err(WaterError::invalid(
            "direction",
            direction,
            "must be a finite, non-zero vector",
        ));
    }

    let mut steepness = steepness.clamp(0.0, 1.0);
    if steepness == 0.0 {
        steepness += INTEGER_NUDGE;
    } else if steepness == 1.0 {
        steepness -= INTEGER_NUDGE;
    }

    let wavelength = if wavelength.fract() == 0.0 {
        wavelength + INTEGER_NUDGE
    } else {
        wavelength
    };

    Ok(WaveParameters {
        steepness,
        wavelength,
        direction,
    })
}

impl FromStr for WaveParameters {
    type Err = ParseWaveError;

    /// Parse `STEEPNESS,WAVELENGTH,DIR_X,DIR_Y`. Values are not sanitized here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const FIELDS: [&str; 4] = ["steepness", "wavelength", "direction x", "direction y"];

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != FIELDS.len() {
            return Err(ParseWaveError::Format(s.to_string()));
        }

        let mut values = [0.0f32; 4];
        for ((value, part), field) in values.iter_mut().zip(&parts).zip(FIELDS) {
            *value = part
                .parse()
                .map_err(|source| ParseWaveError::Number { field, source })?;
        }

        Ok(Self::new(
            values[0],
            values[1],
            Vec2::new(values[2], values[3]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(steepness: f32, wavelength: f32) -> WaveParameters {
        WaveParameters::new(steepness, wavelength, Vec2::new(1.0, 0.0))
    }

    #[test]
    fn test_steepness_clamped_into_unit_range() {
        for i in -50..=50 {
            let steepness = i as f32 * 0.1;
            let sanitized = sanitize(wave(steepness, 7.5)).unwrap();
            assert!(
                (0.0..=1.0).contains(&sanitized.steepness),
                "steepness {} sanitized to {}",
                steepness,
                sanitized.steepness
            );
        }
    }

    #[test]
    fn test_integer_steepness_nudged() {
        let low = sanitize(wave(0.0, 7.5)).unwrap();
        assert!((low.steepness - 0.0001).abs() < 1e-7);

        // Steepness 1 moves down to 0.9999 rather than up past the range
        let high = sanitize(wave(1.0, 7.5)).unwrap();
        assert!(high.steepness < 1.0);
        assert!((1.0 - high.steepness - 0.0001).abs() < 1e-7);

        // Clamped values land on the bounds and are nudged too
        assert_eq!(sanitize(wave(-3.0, 7.5)).unwrap().steepness, low.steepness);
        assert_eq!(sanitize(wave(4.0, 7.5)).unwrap().steepness, high.steepness);
    }

    #[test]
    fn test_integer_wavelength_nudged() {
        for wavelength in [1.0f32, 3.0, 20.0, 100.0] {
            let sanitized = sanitize(wave(0.5, wavelength)).unwrap();
            assert!(
                (sanitized.wavelength - wavelength - 0.0001).abs() < 1e-5,
                "wavelength {} sanitized to {}",
                wavelength,
                sanitized.wavelength
            );
        }
    }

    #[test]
    fn test_non_integer_values_pass_through() {
        let params = WaveParameters::new(0.35, 12.25, Vec2::new(3.0, 4.0));
        assert_eq!(sanitize(params).unwrap(), params);
    }

    #[test]
    fn test_sanitize_does_not_touch_direction() {
        let params = WaveParameters::new(1.0, 4.0, Vec2::new(1.0, 0.3));
        assert_eq!(sanitize(params).unwrap().direction, Vec2::new(1.0, 0.3));
    }

    #[test]
    fn test_zero_wavelength_rejected() {
        let err = sanitize(wave(0.5, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            WaterError::InvalidParameter {
                name: "wavelength",
                ..
            }
        ));
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        assert!(sanitize(wave(0.5, -2.0)).is_err());
        assert!(sanitize(wave(0.5, f32::INFINITY)).is_err());
        assert!(sanitize(wave(f32::NAN, 2.5)).is_err());
        assert!(sanitize(WaveParameters::new(0.5, 2.5, Vec2::ZERO)).is_err());
        assert!(sanitize(WaveParameters::new(0.5, 2.5, Vec2::new(f32::NAN, 1.0))).is_err());
    }

    #[test]
    fn test_infinite_steepness_clamped() {
        let sanitized = sanitize(wave(f32::INFINITY, 2.5)).unwrap();
        assert!((sanitized.steepness - 0.9999).abs() < 1e-6);
    }

    #[test]
    fn test_sentinel_survives_sanitize() {
        assert_eq!(
            sanitize(WaveParameters::SENTINEL).unwrap(),
            WaveParameters::SENTINEL
        );
    }

    #[test]
    fn test_parse_wave() {
        let params: WaveParameters = "0.8, 3, 1, 1".parse().unwrap();
        assert_eq!(params, WaveParameters::new(0.8, 3.0, Vec2::new(1.0, 1.0)));

        assert!(matches!(
            "0.8,3,1".parse::<WaveParameters>(),
            Err(ParseWaveError::Format(_))
        ));
        assert!(matches!(
            "0.8,abc,1,1".parse::<WaveParameters>(),
            Err(ParseWaveError::Number {
                field: "wavelength",
                ..
            })
        ));
    }

    #[test]
    fn test_amplitude() {
        let params = wave(0.5, std::f32::consts::TAU);
        assert!((params.wave_number() - 1.0).abs() < 1e-6);
        assert!((params.amplitude() - 0.5).abs() < 1e-6);
    }
}
