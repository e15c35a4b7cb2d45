use bevy::prelude::*;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Scene scripts are being read from disk.
    #[default]
    Loading,
    Running,
}
