//! Geometry picking: pointer rays, scene hits, frame conversions, and the
//! component ancestor index

mod ancestry;
mod pick;
mod space;

pub use ancestry::*;
pub use pick::*;
pub use space::*;

use bevy::prelude::*;

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ComponentRoot>()
            .init_resource::<ComponentAncestors>()
            // PreUpdate so click handlers in Update see a fresh index even
            // for hierarchies spawned earlier the same frame
            .add_systems(PreUpdate, maintain_component_index);
    }
}
