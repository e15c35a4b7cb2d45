use {
    bevy::prelude::*,
    notification_ui::NotificationUiPlugin,
    puzzle_components::PuzzleComponentsPlugin,
    puzzle_events::PuzzleEventsPlugin,
    puzzles::PuzzlesPlugin,
    save_load::SaveLoadPlugin,
    scene_resources::{GameSettings, SETTINGS_PATH},
    scenes::ScenesPlugin,
    script_assets::ScriptAssetsPlugin,
    states::GameState,
};

mod systems;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameSettings::load_or_default(SETTINGS_PATH))
            .init_state::<GameState>()
            .add_plugins((
                ScriptAssetsPlugin,
                PuzzleComponentsPlugin,
                PuzzleEventsPlugin,
                PuzzlesPlugin,
                ScenesPlugin,
                SaveLoadPlugin,
                NotificationUiPlugin,
            ))
            .add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Running), systems::log_running)
            .add_observer(systems::log_scene_entered);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
