use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::{fs, io, path::{Path, PathBuf}},
    thiserror::Error,
};

/// Default location of the settings file, relative to the working directory.
pub const SETTINGS_PATH: &str = "assets/settings.ron";

/// Runtime configuration, read once at startup.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameSettings {
    /// Scene entered when loading finishes.
    pub entry_scene: String,
    /// Asset folder holding the `*.script.json` files.
    pub scenes_folder: String,
    /// Directory for persisted progress.
    pub save_dir: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            entry_scene: "main".to_string(),
            scenes_folder: "scenes".to_string(),
            save_dir: PathBuf::from("saves"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl GameSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Reads the settings file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default settings");
                Self::default()
            }
        }
    }
}
