use {
    bevy::{asset::LoadedFolder, prelude::*},
    script_assets::SceneScript,
    std::collections::HashMap,
};

#[derive(Debug, Resource)]
pub(crate) struct ScenesFolderHandle(pub Handle<LoadedFolder>);

/// Every loaded scene script, by scene id.
#[derive(Resource, Debug, Default)]
pub struct SceneCatalog {
    scripts: HashMap<String, Handle<SceneScript>>,
}

impl SceneCatalog {
    /// Returns the previous handle when `scene_id` was already known.
    pub fn insert(
        &mut self,
        scene_id: impl Into<String>,
        handle: Handle<SceneScript>,
    ) -> Option<Handle<SceneScript>> {
        self.scripts.insert(scene_id.into(), handle)
    }

    pub fn get(&self, scene_id: &str) -> Option<&Handle<SceneScript>> {
        self.scripts.get(scene_id)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
