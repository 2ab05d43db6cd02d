#![forbid(unsafe_code)]

use glam::{Quat, Vec3};
use surface_scatter::prelude::{AssetRef, CycleReport, Instantiator, PlacementResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// A placed instance as recorded by [`LoggingInstantiator`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInstance {
    pub asset: AssetRef,
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<usize>,
}

/// Instantiator that keeps placements in memory and logs each one.
#[derive(Debug, Default)]
pub struct LoggingInstantiator {
    pub placed: Vec<PlacedInstance>,
}

impl LoggingInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placements per asset, in first-seen order.
    pub fn counts(&self) -> Vec<(AssetRef, usize)> {
        let mut counts: Vec<(AssetRef, usize)> = Vec::new();
        for instance in &self.placed {
            match counts.iter_mut().find(|(asset, _)| *asset == instance.asset) {
                Some((_, n)) => *n += 1,
                None => counts.push((instance.asset.clone(), 1)),
            }
        }
        counts
    }
}

impl Instantiator for LoggingInstantiator {
    type Handle = usize;

    fn instantiate(&mut self, asset: &AssetRef) -> usize {
        self.placed.push(PlacedInstance {
            asset: asset.clone(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
        });
        self.placed.len() - 1
    }

    fn set_transform(&mut self, handle: &usize, position: Vec3, rotation: Quat, parent: Option<&usize>) {
        if let Some(instance) = self.placed.get_mut(*handle) {
            instance.position = position;
            instance.rotation = rotation;
            instance.parent = parent.copied();
            info!(
                "placed {:<20} at ({:>7.3}, {:>7.3}, {:>7.3})",
                instance.asset, position.x, position.y, position.z
            );
        }
    }
}

/// Logs one line per projected sample.
pub fn log_results(results: &[PlacementResult]) {
    for result in results {
        match result.surface {
            Some(surface) => info!(
                "sample {:>3}: slope {:>5.1}°  tint {:.2}  {}",
                result.sample_index,
                surface.slope_degrees,
                surface.slope_tint(),
                if result.commit_eligible { "commit" } else { "steep" }
            ),
            None => info!("sample {:>3}: no surface", result.sample_index),
        }
    }
}

/// Logs the outcome of a cycle.
pub fn log_report<H>(label: &str, report: &CycleReport<H>) {
    info!(
        "{label}: state {:?}, committed {}, skipped {}",
        report.state,
        report.committed.len(),
        report.skipped
    );
}
