use {
    serde::{Deserialize, Serialize},
    std::{
        fs, io,
        path::{Path, PathBuf},
    },
    thiserror::Error,
};

/// Persisted progress of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    pub got_clues: Vec<String>,
    pub got_props: Vec<String>,
    pub unlocked_locks: Vec<String>,
}

impl SaveData {
    /// Returns true if `clue_id` was not recorded yet.
    pub fn record_clue(&mut self, clue_id: &str) -> bool {
        record(&mut self.got_clues, clue_id)
    }

    pub fn record_prop(&mut self, prop_id: &str) -> bool {
        record(&mut self.got_props, prop_id)
    }

    pub fn record_lock(&mut self, lock_id: &str) -> bool {
        record(&mut self.unlocked_locks, lock_id)
    }
}

fn record(ids: &mut Vec<String>, id: &str) -> bool {
    if ids.iter().any(|known| known == id) {
        return false;
    }
    ids.push(id.to_string());
    true
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file io: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt save file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize save data: {0}")]
    Serialize(#[from] ron::Error),
}

/// Save file of the game entered through `entry_scene`.
pub fn save_path(save_dir: &Path, entry_scene: &str) -> PathBuf {
    save_dir.join(format!("{entry_scene}.save.ron"))
}

pub fn read(path: &Path) -> Result<SaveData, SaveError> {
    let text = fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}

pub fn write(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let text = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_deduplicated() {
        let mut data = SaveData::default();

        assert!(data.record_clue("note"));
        assert!(!data.record_clue("note"));
        assert!(data.record_prop("key"));
        assert!(data.record_lock("safe"));
        assert!(!data.record_lock("safe"));

        assert_eq!(data.got_clues, vec!["note"]);
        assert_eq!(data.unlocked_locks, vec!["safe"]);
    }

    #[test]
    fn written_data_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_path(&dir.path().join("nested"), "lab");
        let data = SaveData {
            got_clues: vec!["note".into()],
            got_props: vec!["key".into(), "map".into()],
            unlocked_locks: vec![],
        };

        write(&path, &data).unwrap();

        assert_eq!(read(&path).unwrap(), data);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let data: SaveData = ron::from_str(r#"(gotProps: ["key"])"#).unwrap();

        assert_eq!(data.got_props, vec!["key"]);
        assert!(data.got_clues.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.save.ron");
        std::fs::write(&path, "{ not ron").unwrap();

        assert!(matches!(read(&path), Err(SaveError::Parse(_))));
        assert!(matches!(
            read(&dir.path().join("absent.save.ron")),
            Err(SaveError::Io(_))
        ));
    }
}
