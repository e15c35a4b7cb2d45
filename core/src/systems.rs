use {
    bevy::prelude::*,
    puzzle_events::SceneEntered,
    scene_resources::{ClueRegistry, GameSettings, PlayerSpawn},
};

pub fn log_running(settings: Res<GameSettings>) {
    info!(
        entry_scene = %settings.entry_scene,
        save_dir = %settings.save_dir.display(),
        "game running"
    );
}

pub fn log_scene_entered(
    trigger: On<SceneEntered>,
    clues: Res<ClueRegistry>,
    spawn: Res<PlayerSpawn>,
) {
    info!(
        scene_id = %trigger.event().scene_id,
        clues_found = clues.found_count(),
        clues_total = clues.len(),
        position = ?spawn.position,
        "player entered scene"
    );
}
