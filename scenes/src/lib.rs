//! Scene lifecycle.
//!
//! Scene scripts are loaded from the configured folder while in
//! `GameState::Loading`. Entering `Running` switches to the entry scene. A
//! switch despawns every [`SceneMember`], spawns the target script's objects
//! and replaces the [`SceneRegistry`] wholesale.
//!
//! [`SceneMember`]: puzzle_components::SceneMember

mod interactions;
mod loading;
mod resources;
mod spawn;

pub use {
    interactions::WRONG_PASSWORD_MESSAGE,
    resources::SceneCatalog,
    spawn::spawn_scene,
};

use {
    bevy::prelude::*,
    scene_resources::{ClueRegistry, GameSettings, PlayerSpawn, PropRegistry, SceneRegistry},
    states::GameState,
};

pub struct ScenesPlugin;

impl Plugin for ScenesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneCatalog>()
            .init_resource::<GameSettings>()
            .init_resource::<SceneRegistry>()
            .init_resource::<PropRegistry>()
            .init_resource::<ClueRegistry>()
            .init_resource::<PlayerSpawn>()
            .add_systems(Startup, loading::load_scene_scripts)
            .add_systems(
                Update,
                loading::check_scripts_loaded.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::Running), loading::enter_entry_scene)
            .add_systems(Update, interactions::handle_scene_clicks)
            .add_observer(spawn::switch_scene)
            .add_observer(interactions::attempt_unlock)
            .add_observer(interactions::select_prop)
            .add_observer(interactions::despawn_collected_prop)
            .add_observer(interactions::despawn_collected_clue);
    }
}
