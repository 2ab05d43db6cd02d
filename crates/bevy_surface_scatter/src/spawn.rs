use bevy::prelude::*;
use surface_scatter::brush::assets::AssetRef;
use surface_scatter::session::commit::Instantiator;

/// Marker on every entity placed by the brush.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct ScatterInstance {
    /// Asset the instance was created from.
    pub asset: AssetRef,
}

/// [`EntityEvent`] triggered once a placed entity has its transform.
///
/// Observe it to attach scenes or meshes for `asset`.
#[derive(EntityEvent, Debug, Clone)]
pub struct ScatterInstancePlaced {
    /// The spawned entity.
    pub entity: Entity,
    pub asset: AssetRef,
    /// World-space position.
    pub position: Vec3,
    /// Container the entity was parented to.
    pub container: Option<Entity>,
}

/// [`Instantiator`] spawning one entity per placement through [`Commands`].
pub struct EntityInstantiator<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    container_transform: GlobalTransform,
    spawned: Option<(Entity, AssetRef)>,
}

impl<'a, 'w, 's> EntityInstantiator<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self {
            commands,
            container_transform: GlobalTransform::IDENTITY,
            spawned: None,
        }
    }

    /// World transform of the container passed as commit parent, used to convert
    /// placements into container-local transforms.
    pub fn with_container_transform(mut self, transform: GlobalTransform) -> Self {
        self.container_transform = transform;
        self
    }
}

impl Instantiator for EntityInstantiator<'_, '_, '_> {
    type Handle = Entity;

    fn instantiate(&mut self, asset: &AssetRef) -> Entity {
        let entity = self
            .commands
            .spawn((
                ScatterInstance {
                    asset: asset.clone(),
                },
                Name::new(asset.clone()),
            ))
            .id();
        self.spawned = Some((entity, asset.clone()));
        entity
    }

    fn set_transform(
        &mut self,
        handle: &Entity,
        position: Vec3,
        rotation: Quat,
        parent: Option<&Entity>,
    ) {
        let world = Transform::from_translation(position).with_rotation(rotation);
        let mut entity = self.commands.entity(*handle);
        match parent {
            Some(container) => {
                let local = GlobalTransform::from(world).reparented_to(&self.container_transform);
                entity.insert((local, ChildOf(*container)));
            }
            None => {
                entity.insert(world);
            }
        }

        let asset = match self.spawned.take() {
            Some((spawned, asset)) if spawned == *handle => asset,
            _ => String::new(),
        };
        self.commands.trigger(ScatterInstancePlaced {
            entity: *handle,
            asset,
            position,
            container: parent.copied(),
        });
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::world::CommandQueue;

    use super::*;

    #[derive(Resource, Default)]
    struct Placed(Vec<(Entity, String)>);

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<Placed>();
        world.add_observer(|placed: On<ScatterInstancePlaced>, mut log: ResMut<Placed>| {
            log.0.push((placed.entity, placed.asset.clone()));
        });
        world
    }

    #[test]
    fn spawns_instance_at_world_position() {
        let mut world = world();
        let mut queue = CommandQueue::default();
        let entity = {
            let mut commands = Commands::new(&mut queue, &world);
            let mut instantiator = EntityInstantiator::new(&mut commands);
            let entity = instantiator.instantiate(&"props/rock.glb".to_string());
            instantiator.set_transform(&entity, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, None);
            entity
        };
        queue.apply(&mut world);

        let instance = world.get::<ScatterInstance>(entity).unwrap();
        assert_eq!(instance.asset, "props/rock.glb");
        let transform = world.get::<Transform>(entity).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert!(world.get::<ChildOf>(entity).is_none());
        assert_eq!(
            world.resource::<Placed>().0,
            vec![(entity, "props/rock.glb".to_string())]
        );
    }

    #[test]
    fn parents_instance_under_container() {
        let mut world = world();
        let container_transform = GlobalTransform::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let container = world.spawn((Transform::default(), container_transform)).id();

        let mut queue = CommandQueue::default();
        let entity = {
            let mut commands = Commands::new(&mut queue, &world);
            let mut instantiator =
                EntityInstantiator::new(&mut commands).with_container_transform(container_transform);
            let entity = instantiator.instantiate(&"props/tree.glb".to_string());
            instantiator.set_transform(
                &entity,
                Vec3::new(12.0, 1.0, 0.0),
                Quat::IDENTITY,
                Some(&container),
            );
            entity
        };
        queue.apply(&mut world);

        assert_eq!(world.get::<ChildOf>(entity).unwrap().parent(), container);
        let local = world.get::<Transform>(entity).unwrap();
        assert!((local.translation - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
    }
}
