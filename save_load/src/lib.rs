//! Persistence of player progress.
//!
//! Found clues, found props and unlocked lock ids are appended to a RON file
//! under the configured save directory, one file per game. Every time a scene
//! is entered the recorded ids are replayed with `is_restore = true`, so a
//! restored lock also re-runs the puzzles gated on it.

mod restore;
mod storage;

pub use storage::*;

use {
    bevy::prelude::*,
    puzzle_events::{ClueFound, LockUnlocked, PropFound},
    scene_resources::{ClueRegistry, GameSettings, PropRegistry, SceneRegistry},
    std::{io, path::PathBuf},
};

pub struct SaveLoadPlugin;

impl Plugin for SaveLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSettings>()
            .init_resource::<SceneRegistry>()
            .init_resource::<PropRegistry>()
            .init_resource::<ClueRegistry>()
            .add_systems(Startup, load_progress)
            .add_observer(record_clue)
            .add_observer(record_prop)
            .add_observer(record_lock)
            .add_observer(restore::restore_progress);
    }
}

/// The progress file and its in-memory copy.
#[derive(Resource, Debug)]
pub struct PersistentState {
    path: PathBuf,
    data: SaveData,
}

impl PersistentState {
    /// Reads `path`. A missing or corrupt file yields empty progress.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read(&path) {
            Ok(data) => {
                info!(
                    path = %path.display(),
                    clues = data.got_clues.len(),
                    props = data.got_props.len(),
                    locks = data.unlocked_locks.len(),
                    "loaded progress"
                );
                data
            }
            Err(SaveError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved progress");
                SaveData::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable progress");
                SaveData::default()
            }
        };
        Self { path, data }
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    fn update(&mut self, record: impl FnOnce(&mut SaveData) -> bool) {
        if !record(&mut self.data) {
            return;
        }
        match write(&self.path, &self.data) {
            Ok(()) => debug!(path = %self.path.display(), "progress saved"),
            Err(e) => error!(path = %self.path.display(), error = %e, "failed to save progress"),
        }
    }
}

fn load_progress(mut commands: Commands, settings: Res<GameSettings>) {
    let path = save_path(&settings.save_dir, &settings.entry_scene);
    commands.insert_resource(PersistentState::open(path));
}

fn record_clue(trigger: On<ClueFound>, state: Option<ResMut<PersistentState>>) {
    let event = trigger.event();
    if let Some(mut state) = state.filter(|_| !event.is_restore) {
        state.update(|data| data.record_clue(&event.clue_id));
    }
}

fn record_prop(trigger: On<PropFound>, state: Option<ResMut<PersistentState>>) {
    let event = trigger.event();
    if let Some(mut state) = state.filter(|_| !event.is_restore) {
        state.update(|data| data.record_prop(&event.prop_id));
    }
}

fn record_lock(trigger: On<LockUnlocked>, state: Option<ResMut<PersistentState>>) {
    let event = trigger.event();
    if let Some(mut state) = state.filter(|_| !event.is_restore) {
        state.update(|data| data.record_lock(&event.lock_id));
    }
}
