//! Stable placement samples scattered over the unit disc.
//!
//! [`SampleGenerator`] keeps each sample at a fixed index until an explicit refresh, so
//! changing the spawn count never reshuffles points that are already on screen:
//! - growing only draws the new trailing samples;
//! - shrinking keeps the backing storage and just narrows the active prefix, so growing
//!   again revives the same samples;
//! - a forced refresh redraws everything.
use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use crate::brush::assets::AssetSet;
use crate::brush::selection::select_weighted;
use crate::sampling::{unit_disc_point, RandomSource};

/// One candidate placement in brush-local unit-disc coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSample {
    /// Position inside the unit disc (`length() <= 1`), scaled by the brush radius.
    pub disc: Vec2,
    /// Index into the active asset set, `None` when the set was empty.
    pub asset_index: Option<usize>,
    /// Spin about the placement's up axis, in radians within `[0, 2π)`.
    pub orientation_jitter: f32,
}

impl PlacementSample {
    /// Draws a sample. Consumes exactly four values from `rng`.
    pub fn draw<R: RandomSource + ?Sized>(assets: Option<&AssetSet>, rng: &mut R) -> Self {
        let radial = rng.next_f32();
        let angular = rng.next_f32();
        let asset_draw = rng.next_f32();
        let jitter_draw = rng.next_f32();

        Self {
            disc: unit_disc_point(radial, angular),
            asset_index: assets.and_then(|set| select_weighted(set, asset_draw)),
            orientation_jitter: jitter_draw * TAU,
        }
    }
}

/// Owns the sample array and its lazy resize policy.
#[derive(Debug, Clone, Default)]
pub struct SampleGenerator {
    samples: Vec<PlacementSample>,
    active: usize,
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes or regenerates the sample set and returns the `count` active samples.
    pub fn generate_or_resize<R: RandomSource + ?Sized>(
        &mut self,
        count: usize,
        force_refresh: bool,
        assets: Option<&AssetSet>,
        rng: &mut R,
    ) -> &[PlacementSample] {
        if force_refresh {
            debug!("Regenerating {} placement samples.", count);
            self.samples.clear();
            self.samples.reserve(count);
        }

        let existing = self.samples.len();
        if count > existing {
            self.samples
                .extend((existing..count).map(|_| PlacementSample::draw(assets, rng)));
        }

        self.active = count;
        self.samples()
    }

    /// The active samples, in stable index order.
    pub fn samples(&self) -> &[PlacementSample] {
        &self.samples[..self.active]
    }

    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Number of samples kept alive, including the ones hidden by a shrink.
    pub fn backing_len(&self) -> usize {
        self.samples.len()
    }

    /// Redraws only the asset index of every stored sample.
    ///
    /// Coordinates and jitter are untouched, so switching asset sets keeps the layout.
    pub fn reassign_assets<R: RandomSource + ?Sized>(
        &mut self,
        assets: Option<&AssetSet>,
        rng: &mut R,
    ) {
        for sample in &mut self.samples {
            let draw = rng.next_f32();
            sample.asset_index = assets.and_then(|set| select_weighted(set, draw));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::SequenceRng;

    fn assets() -> AssetSet {
        AssetSet::new("mix")
            .with_entry("a", 0.5)
            .with_entry("b", 0.3)
            .with_entry("c", 0.2)
    }

    #[test]
    fn refresh_produces_exact_count() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);
        let set = assets();
        let samples = generator.generate_or_resize(12, true, Some(&set), &mut rng);
        assert_eq!(samples.len(), 12);
        for s in samples {
            assert!(s.disc.length() <= 1.0 + 1e-6);
            assert!((0.0..TAU).contains(&s.orientation_jitter));
            assert!(s.asset_index.is_some_and(|i| i < 3));
        }
    }

    #[test]
    fn resize_to_same_count_is_idempotent() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let set = assets();
        generator.generate_or_resize(8, true, Some(&set), &mut rng);
        let first = generator.generate_or_resize(8, false, Some(&set), &mut rng).to_vec();
        let second = generator.generate_or_resize(8, false, Some(&set), &mut rng).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn growing_preserves_existing_prefix() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);
        let set = assets();
        let before = generator.generate_or_resize(5, true, Some(&set), &mut rng).to_vec();
        let after = generator.generate_or_resize(9, false, Some(&set), &mut rng).to_vec();
        assert_eq!(after.len(), 9);
        assert_eq!(&after[..5], &before[..]);
    }

    #[test]
    fn shrinking_is_lazy_and_revives_samples() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let full = generator.generate_or_resize(10, true, None, &mut rng).to_vec();

        let shrunk = generator.generate_or_resize(4, false, None, &mut rng).to_vec();
        assert_eq!(shrunk.len(), 4);
        assert_eq!(generator.backing_len(), 10);
        assert_eq!(&shrunk[..], &full[..4]);

        let revived = generator.generate_or_resize(10, false, None, &mut rng).to_vec();
        assert_eq!(revived, full);
    }

    #[test]
    fn refresh_discards_previous_samples() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(9);
        let old = generator.generate_or_resize(6, true, None, &mut rng).to_vec();
        let fresh = generator.generate_or_resize(6, true, None, &mut rng).to_vec();
        assert_ne!(old, fresh);
        assert_eq!(generator.backing_len(), 6);
    }

    #[test]
    fn same_seed_replays_same_samples() {
        let set = assets();
        let mut a = SampleGenerator::new();
        let mut b = SampleGenerator::new();
        let sa = a
            .generate_or_resize(16, true, Some(&set), &mut StdRng::seed_from_u64(42))
            .to_vec();
        let sb = b
            .generate_or_resize(16, true, Some(&set), &mut StdRng::seed_from_u64(42))
            .to_vec();
        assert_eq!(sa, sb);
    }

    #[test]
    fn draw_order_is_radius_angle_asset_jitter() {
        let set = assets();
        let mut rng = SequenceRng::new(&[0.25, 0.0, 0.95, 0.5]);
        let sample = PlacementSample::draw(Some(&set), &mut rng);
        assert!((sample.disc - Vec2::new(0.5, 0.0)).length() < 1e-4);
        assert_eq!(sample.asset_index, Some(2));
        assert!((sample.orientation_jitter - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn empty_asset_set_leaves_index_unset() {
        let mut generator = SampleGenerator::new();
        let empty = AssetSet::new("none");
        let samples = generator.generate_or_resize(
            3,
            true,
            Some(&empty),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(samples.iter().all(|s| s.asset_index.is_none()));
    }

    #[test]
    fn reassign_keeps_layout() {
        let mut generator = SampleGenerator::new();
        let mut rng = StdRng::seed_from_u64(21);
        let before = generator.generate_or_resize(6, true, None, &mut rng).to_vec();

        let single = AssetSet::new("one").with_entry("rock", 1.0);
        generator.reassign_assets(Some(&single), &mut rng);
        for (old, new) in before.iter().zip(generator.samples()) {
            assert_eq!(old.disc, new.disc);
            assert_eq!(old.orientation_jitter, new.orientation_jitter);
            assert_eq!(new.asset_index, Some(0));
        }
    }
}
