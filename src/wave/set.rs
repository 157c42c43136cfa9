//! Fixed three-slot wave collection matching the shader interface.

use super::params::{sanitize, WaveParameters};
use crate::error::WaterError;

/// Number of wave slots in the water program
pub const WAVE_SLOTS: usize = 3;

/// Exactly three sanitized waves: primary, secondary, tertiary.
///
/// Unused slots hold [`WaveParameters::SENTINEL`] rather than being omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSet {
    waves: [WaveParameters; WAVE_SLOTS],
}

/// Sanitize the provided waves and fill empty optional slots with the sentinel
pub fn build_wave_set(
    primary: WaveParameters,
    extra: [Option<WaveParameters>; WAVE_SLOTS - 1],
) -> Result<WaveSet, WaterError> {
    let mut waves = [WaveParameters::SENTINEL; WAVE_SLOTS];
    waves[0] = sanitize(primary)?;
    for (slot, wave) in waves[1..].iter_mut().zip(extra) {
        if let Some(wave) = wave {
            *slot = sanitize(wave)?;
        }
    }
    Ok(WaveSet { waves })
}

impl WaveSet {
    /// Build from a list of one to three waves, in order
    pub fn from_slice(waves: &[WaveParameters]) -> Result<WaveSet, WaterError> {
        match waves {
            [] => Err(WaterError::InvalidParameter {
                name: "waves",
                value: "[]".to_string(),
                reason: "a primary wave is required",
            }),
            [primary, rest @ ..] if rest.len() < WAVE_SLOTS => {
                build_wave_set(*primary, [rest.first().copied(), rest.get(1).copied()])
            }
            _ => Err(WaterError::TooManyWaves(waves.len())),
        }
    }

    pub fn waves(&self) -> &[WaveParameters; WAVE_SLOTS] {
        &self.waves
    }

    pub fn primary(&self) -> &WaveParameters {
        &self.waves[0]
    }

    /// Upper bound on vertical displacement: Σ steepness / k
    pub fn max_height(&self) -> f32 {
        self.waves.iter().map(WaveParameters::amplitude).sum()
    }

    /// The three `waveA`/`waveB`/`waveC` uniform vectors
    pub fn packed(&self) -> [[f32; 4]; WAVE_SLOTS] {
        self.waves.map(|wave| wave.packed())
    }

    /// Rebuild from uniform vectors. No sanitization: packing is lossless.
    pub fn from_packed(packed: [[f32; 4]; WAVE_SLOTS]) -> WaveSet {
        WaveSet {
            waves: packed.map(WaveParameters::from_packed),
        }
    }
}

impl Default for WaveSet {
    /// The three-wave demo configuration
    fn default() -> Self {
        use glam::Vec2;

        // Literal values are already non-integral, so this is what sanitize would produce
        WaveSet {
            waves: [
                WaveParameters::new(0.5, 20.0001, Vec2::new(0.5, 0.4)),
                WaveParameters::new(0.8, 3.0001, Vec2::new(1.0, 1.0)),
                WaveParameters::new(0.2, 4.0001, Vec2::new(1.0, 0.3)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_primary_only_fills_sentinels() {
        let primary = WaveParameters::new(0.5, 20.0, Vec2::new(0.5, 0.4));
        let set = build_wave_set(primary, [None, None]).unwrap();
        let packed = set.packed();

        assert_eq!(packed.len(), 3);
        assert_eq!(packed[1], [0.0001, 0.0001, 0.0001, 0.0001]);
        assert_eq!(packed[2], [0.0001, 0.0001, 0.0001, 0.0001]);
    }

    #[test]
    fn test_slot_order_preserved() {
        let a = WaveParameters::new(0.5, 20.5, Vec2::new(0.5, 0.4));
        let c = WaveParameters::new(0.2, 4.5, Vec2::new(1.0, 0.3));
        let set = build_wave_set(a, [None, Some(c)]).unwrap();

        assert_eq!(set.waves()[0], a);
        assert_eq!(set.waves()[1], WaveParameters::SENTINEL);
        assert_eq!(set.waves()[2], c);
    }

    #[test]
    fn test_every_slot_sanitized() {
        let bad = WaveParameters::new(0.5, 0.0, Vec2::X);
        let good = WaveParameters::new(0.5, 2.5, Vec2::X);
        assert!(build_wave_set(good, [Some(good), Some(bad)]).is_err());

        let set = build_wave_set(good, [Some(WaveParameters::new(3.0, 2.5, Vec2::X)), None])
            .unwrap();
        assert!(set.waves()[1].steepness <= 1.0);
    }

    #[test]
    fn test_pack_round_trip() {
        let set = WaveSet::default();
        let unpacked = WaveSet::from_packed(set.packed());
        assert_eq!(unpacked, set);

        for (wave, packed) in set.waves().iter().zip(set.packed()) {
            assert_eq!(packed[0], wave.direction.x);
            assert_eq!(packed[1], wave.direction.y);
            assert_eq!(packed[2], wave.steepness);
            assert_eq!(packed[3], wave.wavelength);
        }
    }

    #[test]
    fn test_default_matches_sanitized_demo_waves() {
        let built = build_wave_set(
            WaveParameters::new(0.5, 20.0, Vec2::new(0.5, 0.4)),
            [
                Some(WaveParameters::new(0.8, 3.0, Vec2::new(1.0, 1.0))),
                Some(WaveParameters::new(0.2, 4.0, Vec2::new(1.0, 0.3))),
            ],
        )
        .unwrap();
        assert_eq!(built, WaveSet::default());
    }

    #[test]
    fn test_from_slice_arity() {
        let wave = WaveParameters::new(0.5, 2.5, Vec2::X);
        assert!(WaveSet::from_slice(&[]).is_err());
        assert!(WaveSet::from_slice(&[wave]).is_ok());
        assert!(WaveSet::from_slice(&[wave; 3]).is_ok());
        assert!(matches!(
            WaveSet::from_slice(&[wave; 4]),
            Err(WaterError::TooManyWaves(4))
        ));
    }
}
