//! Component root tagging and the ancestor index.
//!
//! Picked mesh entities are usually leaves several levels below the entity
//! that matters for tethering (the wheel mesh inside a wheel assembly).
//! Rather than walking `ChildOf` chains on every pick, a flat index maps
//! each scene entity to its nearest tagged ancestor and is rebuilt only
//! when the hierarchy or the tags change.

use bevy::ecs::entity::{EntityHashMap, EntityHashSet};
use bevy::prelude::*;

/// Marks an entity as the root of an identifiable product component.
/// Snap points tether to these ids, not to raw entity ids, so tethers
/// survive scene reloads.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ComponentRoot {
    pub id: String,
}

impl ComponentRoot {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Flat lookup from any indexed scene entity to its nearest self-or-ancestor
/// [`ComponentRoot`] entity
#[derive(Resource, Default, Debug)]
pub struct ComponentAncestors {
    nearest: EntityHashMap<Entity>,
}

impl ComponentAncestors {
    /// The nearest tagged ancestor (or the entity itself when tagged).
    /// `None` when no ancestor up to the hierarchy root carries a tag.
    pub fn nearest_root(&self, entity: Entity) -> Option<Entity> {
        self.nearest.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.nearest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nearest.is_empty()
    }
}

/// Walk up the parent map until a tagged entity is found. Results are
/// memoized per entity so rebuilding a deep hierarchy stays linear.
fn nearest_tagged(
    entity: Entity,
    parents: &EntityHashMap<Entity>,
    tagged: &EntityHashSet,
    memo: &mut EntityHashMap<Option<Entity>>,
) -> Option<Entity> {
    if let Some(cached) = memo.get(&entity) {
        return *cached;
    }

    let result = if tagged.contains(&entity) {
        Some(entity)
    } else if let Some(parent) = parents.get(&entity) {
        nearest_tagged(*parent, parents, tagged, memo)
    } else {
        None
    };

    memo.insert(entity, result);
    result
}

/// Rebuild the ancestor index when the transform hierarchy or the set of
/// tagged components changes
pub(super) fn maintain_component_index(
    mut index: ResMut<ComponentAncestors>,
    changed: Query<(), Or<(Changed<ChildOf>, Changed<ComponentRoot>)>>,
    mut removed_children: RemovedComponents<ChildOf>,
    mut removed_roots: RemovedComponents<ComponentRoot>,
    scene: Query<(Entity, Option<&ChildOf>, Option<&ComponentRoot>), With<Transform>>,
) {
    let dirty = !changed.is_empty()
        || removed_children.read().next().is_some()
        || removed_roots.read().next().is_some();
    if !dirty {
        return;
    }

    let mut parents: EntityHashMap<Entity> = EntityHashMap::default();
    let mut tagged = EntityHashSet::default();
    for (entity, child_of, root) in &scene {
        if let Some(child_of) = child_of {
            parents.insert(entity, child_of.parent());
        }
        if root.is_some() {
            tagged.insert(entity);
        }
    }

    let mut memo: EntityHashMap<Option<Entity>> = EntityHashMap::default();
    let mut nearest: EntityHashMap<Entity> = EntityHashMap::default();
    for (entity, _, _) in &scene {
        if let Some(root) = nearest_tagged(entity, &parents, &tagged, &mut memo) {
            nearest.insert(entity, root);
        }
    }

    index.nearest = nearest;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn resolver_finds_nearest_tagged_ancestor() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let assembly = world.spawn_empty().id();
        let mesh = world.spawn_empty().id();
        let loose = world.spawn_empty().id();

        let mut parents = EntityHashMap::default();
        parents.insert(assembly, root);
        parents.insert(mesh, assembly);

        let mut tagged = EntityHashSet::default();
        tagged.insert(root);
        tagged.insert(assembly);

        let mut memo = EntityHashMap::default();
        // Nearest wins over the higher root
        assert_eq!(
            nearest_tagged(mesh, &parents, &tagged, &mut memo),
            Some(assembly)
        );
        assert_eq!(
            nearest_tagged(root, &parents, &tagged, &mut memo),
            Some(root)
        );
        assert_eq!(nearest_tagged(loose, &parents, &tagged, &mut memo), None);
    }

    #[test]
    fn tagged_entity_resolves_to_itself() {
        let mut world = World::new();
        let only = world.spawn_empty().id();

        let parents = EntityHashMap::default();
        let mut tagged = EntityHashSet::default();
        tagged.insert(only);

        let mut memo = EntityHashMap::default();
        assert_eq!(
            nearest_tagged(only, &parents, &tagged, &mut memo),
            Some(only)
        );
    }

    #[test]
    fn index_system_builds_full_lookup() {
        let mut world = World::new();
        world.init_resource::<ComponentAncestors>();

        let frame = world
            .spawn((Transform::default(), ComponentRoot::new("frame")))
            .id();
        let tube = world
            .spawn((Transform::default(), ChildOf(frame)))
            .id();
        let lug = world.spawn((Transform::default(), ChildOf(tube))).id();
        let untagged = world.spawn(Transform::default()).id();

        world
            .run_system_once(maintain_component_index)
            .unwrap();

        let index = world.resource::<ComponentAncestors>();
        assert_eq!(index.nearest_root(frame), Some(frame));
        assert_eq!(index.nearest_root(tube), Some(frame));
        assert_eq!(index.nearest_root(lug), Some(frame), "walk spans two levels");
        assert_eq!(index.nearest_root(untagged), None);
    }

    #[test]
    fn index_rebuilds_after_tag_removal() {
        let mut world = World::new();
        world.init_resource::<ComponentAncestors>();

        let handlebar = world
            .spawn((Transform::default(), ComponentRoot::new("handlebar")))
            .id();
        let grip = world
            .spawn((Transform::default(), ChildOf(handlebar)))
            .id();

        world
            .run_system_once(maintain_component_index)
            .unwrap();
        assert_eq!(
            world
                .resource::<ComponentAncestors>()
                .nearest_root(grip),
            Some(handlebar)
        );

        world.entity_mut(handlebar).remove::<ComponentRoot>();
        world
            .run_system_once(maintain_component_index)
            .unwrap();
        assert_eq!(
            world.resource::<ComponentAncestors>().nearest_root(grip),
            None,
            "untagging the ancestor empties the lookup for its subtree"
        );
    }
}
