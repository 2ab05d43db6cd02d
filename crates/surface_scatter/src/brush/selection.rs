//! Weighted selection of an asset index from an [`AssetSet`].
//!
//! - [select_weighted]: walks the entries in order, subtracting each weight from the
//!   draw until the draw falls below an entry's weight.
//! - [renormalize]: rescales weights to sum to one after an edit.
//!
//! Draws come from [crate::sampling::RandomSource]; selection itself is pure so a
//! recorded draw always reproduces the same index.
use tracing::debug;

use crate::brush::assets::AssetSet;
use crate::error::{Error, Result};

/// Picks an entry index for a draw `r` in `[0, 1)`.
///
/// Returns `None` only for an empty set. If accumulated weights fall short of the draw
/// (weights summing to slightly less than one), the last entry is returned. A set whose
/// weights sum to zero is sampled uniformly.
pub fn select_weighted(set: &AssetSet, r: f32) -> Option<usize> {
    let n = set.entries.len();
    if n == 0 {
        return None;
    }

    let total = set.total_weight();
    if !(total > 0.0) || !total.is_finite() {
        let index = ((r.clamp(0.0, 1.0) * n as f32) as usize).min(n - 1);
        return Some(index);
    }

    let mut remaining = r;
    for (i, entry) in set.entries.iter().enumerate() {
        if remaining < entry.weight {
            return Some(i);
        }
        remaining -= entry.weight;
    }

    Some(n - 1)
}

/// Divides every weight by the current weight sum.
///
/// Fails with [`Error::InvalidWeights`] when the sum is zero or not finite; weights are
/// left untouched in that case.
pub fn renormalize(set: &mut AssetSet) -> Result<()> {
    let sum = set.total_weight();
    if !(sum > 0.0) || !sum.is_finite() {
        debug!("Cannot renormalize asset set '{}' (sum {}).", set.name, sum);
        return Err(Error::InvalidWeights { sum });
    }

    for entry in &mut set.entries {
        entry.weight /= sum;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(weights: &[f32]) -> AssetSet {
        weights
            .iter()
            .enumerate()
            .fold(AssetSet::new("test"), |s, (i, w)| s.with_entry(format!("a{i}"), *w))
    }

    #[test]
    fn walks_weights_in_order() {
        let s = set(&[0.5, 0.3, 0.2]);
        assert_eq!(select_weighted(&s, 0.95), Some(2));
        assert_eq!(select_weighted(&s, 0.4), Some(0));
        assert_eq!(select_weighted(&s, 0.0), Some(0));
        assert_eq!(select_weighted(&s, 0.5), Some(1));
        assert_eq!(select_weighted(&s, 0.79), Some(1));
    }

    #[test]
    fn drift_falls_back_to_last_entry() {
        let s = set(&[0.33, 0.33, 0.33]);
        assert_eq!(select_weighted(&s, 0.999), Some(2));
    }

    #[test]
    fn zero_weight_entries_are_never_chosen_when_others_exist() {
        let s = set(&[0.0, 1.0, 0.0]);
        for r in [0.0, 0.25, 0.5, 0.99] {
            assert_eq!(select_weighted(&s, r), Some(1));
        }
    }

    #[test]
    fn empty_set_selects_nothing() {
        assert_eq!(select_weighted(&AssetSet::new("empty"), 0.3), None);
    }

    #[test]
    fn renormalize_scales_to_unit_sum() {
        let mut s = set(&[1.0, 1.0, 0.5, 0.5]);
        renormalize(&mut s).expect("non-zero sum");
        assert!((s.total_weight() - 1.0).abs() < 1e-6);
        assert!((s.entries[0].weight - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn renormalize_zero_sum_fails_and_selection_goes_uniform() {
        let mut s = set(&[0.0, 0.0, 0.0]);
        let err = renormalize(&mut s).expect_err("zero sum");
        assert!(matches!(err, Error::InvalidWeights { sum } if sum == 0.0));

        assert_eq!(select_weighted(&s, 0.0), Some(0));
        assert_eq!(select_weighted(&s, 0.2), Some(0));
        assert_eq!(select_weighted(&s, 0.4), Some(1));
        assert_eq!(select_weighted(&s, 0.7), Some(2));
        assert_eq!(select_weighted(&s, 0.9999), Some(2));
    }

    #[test]
    fn uniform_fallback_covers_every_entry() {
        let s = set(&[0.0, 0.0, 0.0]);
        let mut hits = [0usize; 3];
        for i in 0..300 {
            let r = (i as f32 + 0.5) / 300.0;
            hits[select_weighted(&s, r).expect("non-empty")] += 1;
        }
        assert!(hits.iter().all(|&h| h == 100), "{hits:?}");
    }
}
