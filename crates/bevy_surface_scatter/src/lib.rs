//! Bevy plugin for surface_scatter providing the brush resource, mesh raycasting, entity
//! spawning, brush set assets and message types.
#![forbid(unsafe_code)]

pub use assets::{BrushAssetSet, BrushAssetSetLoader, BrushEntryDef};
use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;
pub use events::{MessageSink, ScatterBrushMessage};
pub use query::{pointer_input, MeshSurfaceQuery, SurfaceCategory};
pub use spawn::{EntityInstantiator, ScatterInstance, ScatterInstancePlaced};
use surface_scatter::brush::assets::{AssetLibrary, AssetSet};
use surface_scatter::brush::BrushConfig;
use surface_scatter::projection::SpatialQuery;
use surface_scatter::session::commit::CommitTarget;
use surface_scatter::session::events::EventSink;
use surface_scatter::session::{CycleReport, InputEvent, PlacementSession};

mod assets;
mod events;
mod query;
mod spawn;

/// Convenient re-exports for common types. Import with `use bevy_surface_scatter::prelude::*;`.
pub mod prelude {
    pub use surface_scatter::prelude::*;

    pub use crate::assets::{BrushAssetSet, BrushAssetSetLoader, BrushEntryDef};
    pub use crate::events::{MessageSink, ScatterBrushMessage};
    pub use crate::query::{pointer_input, MeshSurfaceQuery, SurfaceCategory};
    pub use crate::spawn::{EntityInstantiator, ScatterInstance, ScatterInstancePlaced};
    pub use crate::{ScatterBrush, ScatterBrushInput, SurfaceScatterPlugin};
}

/// Bevy plugin providing the brush resource, assets, message types, and systems.
pub struct SurfaceScatterPlugin;

/// The placement session driven by [`ScatterBrushInput`] messages.
#[derive(Resource)]
pub struct ScatterBrush {
    pub session: PlacementSession,
    /// Entity committed instances are parented to.
    pub container: Option<Entity>,
}

impl ScatterBrush {
    pub fn new(config: BrushConfig, library: AssetLibrary, seed: u64) -> Self {
        Self {
            session: PlacementSession::new(config, library, seed),
            container: None,
        }
    }

    pub fn with_container(mut self, container: Entity) -> Self {
        self.container = Some(container);
        self
    }

    /// Adds a loaded brush set to the library, replacing a set with the same name, and
    /// applies its brush settings if it carries any. Returns the set's index.
    pub fn install_set(&mut self, def: &BrushAssetSet) -> usize {
        let set = AssetSet::from(def);
        let library = self.session.library_mut();
        let index = match library.sets.iter().position(|s| s.name == set.name) {
            Some(index) => {
                library.sets[index] = set;
                index
            }
            None => {
                library.sets.push(set);
                library.sets.len() - 1
            }
        };
        if self.session.library().selected == index {
            self.session.select_asset_set(index);
        }
        if let Some(brush) = &def.brush {
            self.session.set_config(brush.clone());
        }
        index
    }
}

impl Default for ScatterBrush {
    fn default() -> Self {
        Self::new(
            BrushConfig::default(),
            AssetLibrary::new().with_set(AssetSet::default()),
            0,
        )
    }
}

/// Input for the brush. All messages written in a frame are handled as one cycle.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ScatterBrushInput(pub InputEvent);

impl Plugin for SurfaceScatterPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ScatterBrushInput>()
            .add_message::<ScatterBrushMessage>()
            .init_asset::<BrushAssetSet>()
            .init_asset_loader::<BrushAssetSetLoader>()
            .init_resource::<ScatterBrush>()
            .add_systems(Update, (install_loaded_brush_sets, run_scatter_brush).chain());
    }
}

fn install_loaded_brush_sets(
    mut asset_events: MessageReader<AssetEvent<BrushAssetSet>>,
    assets: Res<Assets<BrushAssetSet>>,
    mut brush: ResMut<ScatterBrush>,
) {
    for event in asset_events.read() {
        let (AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id }) = event
        else {
            continue;
        };
        let Some(def) = assets.get(*id) else {
            continue;
        };
        let index = brush.install_set(def);
        info!("Installed brush set {:?} at index {}.", def.name, index);
    }
}

fn run_scatter_brush(
    mut commands: Commands,
    mut brush: ResMut<ScatterBrush>,
    mut inputs: MessageReader<ScatterBrushInput>,
    mut messages: ResMut<Messages<ScatterBrushMessage>>,
    mut ray_cast: MeshRayCast,
    categories: Query<&SurfaceCategory>,
    transforms: Query<&GlobalTransform>,
) {
    let events: Vec<InputEvent> = inputs.read().map(|input| input.0).collect();
    let category_of = |entity: Entity| categories.get(entity).map(|c| c.0).unwrap_or(0);
    let mut query = MeshSurfaceQuery::new(&mut ray_cast, &category_of);

    let container_transform = match brush.container {
        Some(container) => match transforms.get(container) {
            Ok(transform) => *transform,
            Err(_) => {
                warn!("Scatter container {:?} has no GlobalTransform.", container);
                GlobalTransform::IDENTITY
            }
        },
        None => GlobalTransform::IDENTITY,
    };

    let mut sink = MessageSink {
        messages: &mut messages,
    };
    drive_brush(
        &mut commands,
        &mut brush,
        &events,
        &mut query,
        container_transform,
        &mut sink,
    );
}

/// Runs one brush cycle, spawning committed instances through `commands`.
pub fn drive_brush<Q: SpatialQuery + ?Sized>(
    commands: &mut Commands,
    brush: &mut ScatterBrush,
    events: &[InputEvent],
    query: &mut Q,
    container_transform: GlobalTransform,
    sink: &mut dyn EventSink,
) -> CycleReport<Entity> {
    let container = brush.container;
    let mut instantiator =
        EntityInstantiator::new(commands).with_container_transform(container_transform);
    let mut target = CommitTarget::new(&mut instantiator);
    if let Some(container) = container.as_ref() {
        target = target.with_parent(container);
    }

    let report = brush
        .session
        .update_with_events(events, query, &mut target, sink);
    if !report.committed.is_empty() {
        debug!(
            "Spawned {} scatter instances ({} skipped).",
            report.committed.len(),
            report.skipped
        );
    }
    report
}
