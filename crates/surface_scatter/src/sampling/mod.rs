//! Random sources and the disc sample generator.
//!
//! All randomness flows through an explicit, owned generator so a seeded session
//! replays the exact same samples. Any [`rand::Rng`] is a [`RandomSource`].
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

pub mod samples;

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        rand01(self)
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let v = (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0);
    // u32 values near the top round up to 1.0 in f32.
    v.min(ONE_BELOW)
}

/// Largest f32 strictly below one.
const ONE_BELOW: f32 = 1.0 - f32::EPSILON / 2.0;

/// Point drawn uniformly over the area of the unit disc from two uniform draws.
///
/// Taking the square root of the radial draw keeps density constant per unit area
/// instead of clustering points around the center.
#[inline]
pub fn unit_disc_point(radial: f32, angular: f32) -> Vec2 {
    let r = radial.clamp(0.0, 1.0).sqrt();
    let theta = angular * TAU;
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::convert::Infallible;

    use rand::TryRng;

    use super::*;

    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl TryRng for FixedRng {
        type Error = Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Infallible> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Infallible> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Infallible> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    /// Replays a fixed list of draws, cycling when exhausted.
    pub(crate) struct SequenceRng {
        draws: Vec<f32>,
        cursor: usize,
    }

    impl SequenceRng {
        pub(crate) fn new(draws: &[f32]) -> Self {
            Self {
                draws: draws.to_vec(),
                cursor: 0,
            }
        }
    }

    impl TryRng for SequenceRng {
        type Error = Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Infallible> {
            let v = self.draws[self.cursor % self.draws.len()];
            self.cursor += 1;
            Ok((v as f64 * (u32::MAX as f64 + 1.0)) as u32)
        }

        fn try_next_u64(&mut self) -> Result<u64, Infallible> {
            Ok(self.next_u32() as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Infallible> {
            for b in dest.iter_mut() {
                *b = self.next_u32() as u8;
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rng.next_f32(), 0.0);
    }

    #[test]
    fn rand01_stays_below_one() {
        for value in [u32::MAX, u32::MAX - 1, u32::MAX - 64] {
            let mut rng = FixedRng { value };
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "{value} -> {v}");
        }
    }

    #[test]
    fn sequence_rng_replays_draws() {
        let mut rng = SequenceRng::new(&[0.25, 0.95]);
        assert!((rng.next_f32() - 0.25).abs() < 1e-6);
        assert!((rng.next_f32() - 0.95).abs() < 1e-6);
        assert!((rng.next_f32() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn disc_points_stay_inside_unit_disc() {
        for i in 0..32 {
            for j in 0..32 {
                let p = unit_disc_point(i as f32 / 32.0, j as f32 / 32.0);
                assert!(p.length() <= 1.0 + 1e-6);
            }
        }
        assert_eq!(unit_disc_point(0.0, 0.7), Vec2::ZERO);
    }

    #[test]
    fn disc_points_are_area_uniform() {
        // Half the radial draws must land outside radius 1/sqrt(2), which bounds half the area.
        let inner = (0..1000)
            .map(|i| unit_disc_point((i as f32 + 0.5) / 1000.0, 0.0))
            .filter(|p| p.length() < std::f32::consts::FRAC_1_SQRT_2)
            .count();
        assert_eq!(inner, 500);
    }
}
