use bevy::prelude::*;

mod game;
mod input;
mod narrative;
mod ui;

use bevy::window::WindowResolution;
use game::GamePlugin;
use input::InputPlugin;
use narrative::NarrativePlugin;
use ui::GalleryUiPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Galeria".into(),
            resolution: WindowResolution::new(1280, 720),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(GalleryUiPlugin)
    .add_plugins(InputPlugin)
    .add_plugins(NarrativePlugin)
    .add_plugins(GamePlugin);

    app.run();
}
