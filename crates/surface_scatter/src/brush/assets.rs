//! Weighted asset sets and the library of sets a brush can switch between.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Host-side identifier of a placeable asset (path, prefab name, handle key).
pub type AssetRef = String;

/// Weight given to entries added without an explicit weight.
pub const DEFAULT_ENTRY_WEIGHT: f32 = 1.0;

/// A placeable asset and its relative occurrence weight in `[0, 1]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
    pub asset: AssetRef,
    pub weight: f32,
}

impl AssetEntry {
    /// Creates an entry, clamping `weight` into `[0, 1]`.
    pub fn new(asset: impl Into<AssetRef>, weight: f32) -> Self {
        Self {
            asset: asset.into(),
            weight: clamp_weight(weight),
        }
    }
}

/// Ordered list of weighted assets. Weights need not sum to one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSet {
    pub name: String,
    pub entries: Vec<AssetEntry>,
}

impl Default for AssetSet {
    fn default() -> Self {
        Self::new("Unnamed")
    }
}

impl AssetSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds an entry and returns the set (builder style).
    pub fn with_entry(mut self, asset: impl Into<AssetRef>, weight: f32) -> Self {
        self.entries.push(AssetEntry::new(asset, weight));
        self
    }

    /// Appends an entry with [`DEFAULT_ENTRY_WEIGHT`] and returns its index.
    pub fn add_entry(&mut self, asset: impl Into<AssetRef>) -> usize {
        self.entries
            .push(AssetEntry::new(asset, DEFAULT_ENTRY_WEIGHT));
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<AssetEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&AssetEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Edits one weight and renormalizes the whole set.
    ///
    /// Changing one entry changes the relative probability of every other entry, so the
    /// set is rescaled to sum to one. The new weight is stored even when the rescale fails.
    pub fn set_weight(&mut self, index: usize, weight: f32) -> Result<()> {
        let Some(entry) = self.entries.get_mut(index) else {
            return Err(format!("asset index {index} out of range for set '{}'", self.name).into());
        };
        entry.weight = clamp_weight(weight);
        super::selection::renormalize(self)
    }
}

/// Named asset sets plus the one currently selected for painting.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetLibrary {
    pub sets: Vec<AssetSet>,
    pub selected: usize,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, set: AssetSet) -> Self {
        self.sets.push(set);
        self
    }

    /// The selected set, if the selection points at one.
    pub fn active(&self) -> Option<&AssetSet> {
        self.sets.get(self.selected)
    }

    pub fn active_mut(&mut self) -> Option<&mut AssetSet> {
        self.sets.get_mut(self.selected)
    }

    /// Appends an empty set named after its position and returns its index.
    pub fn add_set(&mut self) -> usize {
        let name = format!("Unnamed {}", self.sets.len() + 1);
        self.sets.push(AssetSet::new(name));
        self.sets.len() - 1
    }

    /// Removes a set, keeping the selection on the same set where possible.
    pub fn remove_set(&mut self, index: usize) -> Option<AssetSet> {
        if index >= self.sets.len() {
            return None;
        }
        let removed = self.sets.remove(index);
        if self.selected > index || self.selected >= self.sets.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        Some(removed)
    }

    /// Selects a set by index. Returns false and keeps the selection if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.sets.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|s| s.name.as_str())
    }
}

#[inline]
fn clamp_weight(weight: f32) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn entry_weight_is_clamped() {
        assert_eq!(AssetEntry::new("a", 1.5).weight, 1.0);
        assert_eq!(AssetEntry::new("a", -0.5).weight, 0.0);
        assert_eq!(AssetEntry::new("a", f32::NAN).weight, 0.0);
    }

    #[test]
    fn set_weight_renormalizes_other_entries() {
        let mut set = AssetSet::new("rocks")
            .with_entry("small", 1.0)
            .with_entry("large", 1.0);
        set.set_weight(0, 0.5).expect("renormalized");

        let weights: Vec<f32> = set.entries.iter().map(|e| e.weight).collect();
        assert!((weights[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((weights[1] - 2.0 / 3.0).abs() < 1e-6);
        assert!((set.total_weight() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_weight_to_zero_on_single_entry_fails() {
        let mut set = AssetSet::new("solo").with_entry("tree", 1.0);
        let err = set.set_weight(0, 0.0).expect_err("zero sum");
        assert!(matches!(err, Error::InvalidWeights { .. }));
        assert_eq!(set.entries[0].weight, 0.0);
    }

    #[test]
    fn set_weight_out_of_range_errors() {
        let mut set = AssetSet::new("empty");
        assert!(set.set_weight(3, 0.5).is_err());
    }

    #[test]
    fn add_entry_uses_default_weight() {
        let mut set = AssetSet::default();
        let idx = set.add_entry("bush");
        assert_eq!(idx, 0);
        assert_eq!(set.entries[0].weight, DEFAULT_ENTRY_WEIGHT);
        assert_eq!(set.remove_entry(0).map(|e| e.asset), Some("bush".to_owned()));
        assert!(set.remove_entry(0).is_none());
    }

    #[test]
    fn library_names_new_sets_by_position() {
        let mut library = AssetLibrary::new().with_set(AssetSet::new("trees"));
        let idx = library.add_set();
        assert_eq!(idx, 1);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["trees", "Unnamed 2"]);
    }

    #[test]
    fn library_selection_follows_removals() {
        let mut library = AssetLibrary::new()
            .with_set(AssetSet::new("a"))
            .with_set(AssetSet::new("b"))
            .with_set(AssetSet::new("c"));
        assert!(library.select(2));
        assert!(!library.select(7));

        library.remove_set(0);
        assert_eq!(library.active().map(|s| s.name.as_str()), Some("c"));

        library.remove_set(1);
        assert_eq!(library.active().map(|s| s.name.as_str()), Some("b"));

        library.remove_set(0);
        assert!(library.active().is_none());
        assert!(library.remove_set(0).is_none());
    }
}
