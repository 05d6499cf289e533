//! Placement mode: the click-to-place workflow for snap points

mod click;
mod mode;

pub use click::ClickCatcher;
pub use mode::*;

use bevy::prelude::*;

use click::{
    handle_placement_click, handle_placement_hotkeys, hide_click_catcher, reset_placement_state,
    show_click_catcher, spawn_click_catcher, tick_placement_cooldown,
};

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<PlacementMode>()
            .init_resource::<PlacementGuard>()
            .add_systems(Startup, spawn_click_catcher)
            .add_systems(
                Update,
                (
                    handle_placement_hotkeys,
                    tick_placement_cooldown,
                    handle_placement_click.run_if(in_state(PlacementMode::Active)),
                ),
            )
            .add_systems(OnEnter(PlacementMode::Active), show_click_catcher)
            .add_systems(
                OnExit(PlacementMode::Active),
                (hide_click_catcher, reset_placement_state),
            );
    }
}
