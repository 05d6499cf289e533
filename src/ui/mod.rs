mod notices;
mod panel;
mod settings;

pub use notices::*;
pub use panel::*;
pub use settings::*;

use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SettingsPlugin)
            .add_plugins(PanelPlugin)
            .add_plugins(NoticesPlugin);
    }
}
