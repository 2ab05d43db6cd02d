//! Materializing committed placements through a host [`Instantiator`].
use glam::{Quat, Vec3};
use tracing::warn;

use crate::brush::assets::{AssetRef, AssetSet};
use crate::error::Error;
use crate::projection::PlacementResult;
use crate::sampling::samples::PlacementSample;
use crate::session::events::{EventSink, SessionEvent};

/// Host-side factory for placed instances.
pub trait Instantiator {
    type Handle;

    /// Creates a new instance of `asset`.
    fn instantiate(&mut self, asset: &AssetRef) -> Self::Handle;

    /// Places an instance in world space, optionally under a container.
    fn set_transform(
        &mut self,
        handle: &Self::Handle,
        position: Vec3,
        rotation: Quat,
        parent: Option<&Self::Handle>,
    );
}

/// An instantiator plus the optional container new instances are parented to.
pub struct CommitTarget<'a, I: Instantiator + ?Sized> {
    pub instantiator: &'a mut I,
    pub parent: Option<&'a I::Handle>,
}

impl<'a, I: Instantiator + ?Sized> CommitTarget<'a, I> {
    pub fn new(instantiator: &'a mut I) -> Self {
        Self {
            instantiator,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: &'a I::Handle) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A placement created by a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedInstance<H> {
    pub handle: H,
    pub sample_index: usize,
    pub asset: AssetRef,
    pub position: Vec3,
    pub rotation: Quat,
    pub slope_degrees: f32,
}

/// Places one instance per commit-eligible result.
///
/// Results whose sample has no resolvable asset are skipped with
/// [`Error::NoAssetAvailable`] reported as a warning; the rest proceed.
pub(crate) fn commit_results<I: Instantiator + ?Sized>(
    results: &[PlacementResult],
    samples: &[PlacementSample],
    assets: Option<&AssetSet>,
    target: &mut CommitTarget<'_, I>,
    sink: &mut dyn EventSink,
) -> (Vec<CommittedInstance<I::Handle>>, usize) {
    let mut placed = Vec::new();
    let mut skipped = 0;

    for result in results.iter().filter(|r| r.commit_eligible) {
        let Some(surface) = result.surface else {
            continue;
        };
        let asset = samples
            .get(result.sample_index)
            .and_then(|s| s.asset_index)
            .and_then(|i| assets.and_then(|set| set.get(i)));
        let Some(entry) = asset else {
            let err = Error::NoAssetAvailable {
                sample_index: result.sample_index,
            };
            warn!("Skipping placement: {}.", err);
            sink.send(SessionEvent::Warning {
                context: format!("sample:{}", result.sample_index),
                message: err.to_string(),
            });
            skipped += 1;
            continue;
        };

        let handle = target.instantiator.instantiate(&entry.asset);
        target.instantiator.set_transform(
            &handle,
            surface.position,
            surface.rotation,
            target.parent,
        );
        placed.push(CommittedInstance {
            handle,
            sample_index: result.sample_index,
            asset: entry.asset.clone(),
            position: surface.position,
            rotation: surface.rotation,
            slope_degrees: surface.slope_degrees,
        });
    }

    (placed, skipped)
}
