use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use serde::{Deserialize, Serialize};
use surface_scatter::brush::assets::{AssetSet, DEFAULT_ENTRY_WEIGHT};
use surface_scatter::brush::selection::renormalize;
use surface_scatter::brush::BrushConfig;

/// Asset describing a named brush set, optionally with the brush settings to use with it.
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct BrushAssetSet {
    pub name: String,
    pub entries: Vec<BrushEntryDef>,
    #[serde(default)]
    pub brush: Option<BrushConfig>,
}

/// Entry definition within a [`BrushAssetSet`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrushEntryDef {
    pub asset: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    DEFAULT_ENTRY_WEIGHT
}

impl From<&BrushAssetSet> for AssetSet {
    /// Weights are clamped to `[0, 1]` and then normalized to sum to one.
    fn from(def: &BrushAssetSet) -> Self {
        let mut set = def
            .entries
            .iter()
            .fold(AssetSet::new(def.name.clone()), |set, entry| {
                set.with_entry(entry.asset.clone(), entry.weight)
            });
        if renormalize(&mut set).is_err() && !set.is_empty() {
            warn!("Brush set {:?} has no positive weights; selection is uniform.", def.name);
        }
        set
    }
}

impl From<BrushAssetSet> for AssetSet {
    fn from(def: BrushAssetSet) -> Self {
        (&def).into()
    }
}

/// Asset loader for [`BrushAssetSet`] using RON files with `.brushset` extension.
#[derive(TypePath)]
pub struct BrushAssetSetLoader;

impl AssetLoader for BrushAssetSetLoader {
    type Asset = BrushAssetSet;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["brushset"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let asset: BrushAssetSet =
                ron::de::from_bytes(&bytes).map_err(|e| anyhow::anyhow!(e))?;
            if let Some(brush) = &asset.brush {
                brush.validate()?;
            }
            Ok(asset)
        })
    }
}

impl FromWorld for BrushAssetSetLoader {
    fn from_world(_: &mut World) -> Self {
        BrushAssetSetLoader
    }
}
