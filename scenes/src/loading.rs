use {
    crate::resources::{SceneCatalog, ScenesFolderHandle},
    bevy::{
        asset::{LoadState, LoadedFolder, RecursiveDependencyLoadState},
        prelude::*,
    },
    puzzle_events::SwitchSceneRequest,
    scene_resources::GameSettings,
    script_assets::SceneScript,
    states::GameState,
};

pub(crate) fn load_scene_scripts(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<GameSettings>,
) {
    info!(folder = %settings.scenes_folder, "started loading scene scripts");
    let handle = asset_server.load_folder(settings.scenes_folder.clone());
    commands.insert_resource(ScenesFolderHandle(handle));
}

/// Fills the [`SceneCatalog`] once every file of the scene folder has either
/// loaded or failed.
///
/// Scripts that fail to load are logged and left out of the catalog; the game
/// still enters `Running` with the rest.
pub(crate) fn check_scripts_loaded(
    mut next_state: ResMut<NextState<GameState>>,
    mut catalog: ResMut<SceneCatalog>,
    asset_server: Res<AssetServer>,
    folder_handle: Res<ScenesFolderHandle>,
    folders: Res<Assets<LoadedFolder>>,
    scripts: Res<Assets<SceneScript>>,
    settings: Res<GameSettings>,
) {
    let folder_id = folder_handle.0.id();
    match asset_server.get_recursive_dependency_load_state(folder_id) {
        Some(RecursiveDependencyLoadState::Loaded | RecursiveDependencyLoadState::Failed(_)) => {}
        _ => return,
    }

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(folder_id) {
        error!(folder = %settings.scenes_folder, %err, "scene folder failed to load");
        info!("no scene scripts loaded, entering Running state");
        next_state.set(GameState::Running);
        return;
    }

    let Some(folder) = folders.get(folder_id) else {
        return;
    };

    // a failed dependency is reported before its siblings finish
    let settled = folder.handles.iter().all(|handle| {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Failed(_)) => true,
            Some(LoadState::Loaded) => handle
                .clone()
                .try_typed::<SceneScript>()
                .map_or(true, |typed| scripts.contains(&typed)),
            _ => false,
        }
    });
    if !settled {
        return;
    }

    for untyped_handle in folder.handles.iter().cloned() {
        let path = asset_server.get_path(untyped_handle.id());
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(untyped_handle.id()) {
            error!(?path, %err, "scene script failed to load, skipping it");
            continue;
        }
        let Ok(handle) = untyped_handle.try_typed::<SceneScript>() else {
            debug!(?path, "skipping non-script asset in scene folder");
            continue;
        };
        let Some(script) = scripts.get(&handle) else {
            continue;
        };

        debug!(scene_id = %script.id, ?path, models = script.models.len(), "scene script ready");
        if catalog.insert(script.id.clone(), handle).is_some() {
            warn!(scene_id = %script.id, "duplicate scene id, the last script wins");
        }
    }

    if catalog.get(&settings.entry_scene).is_none() {
        error!(entry_scene = %settings.entry_scene, "entry scene has no script");
    }

    info!(scenes = catalog.len(), "scene scripts loaded, entering Running state");
    next_state.set(GameState::Running);
}

pub(crate) fn enter_entry_scene(mut commands: Commands, settings: Res<GameSettings>) {
    commands.trigger(SwitchSceneRequest {
        scene_id: settings.entry_scene.clone(),
        position: Vec3::ZERO,
        rotation: Vec2::ZERO,
    });
}
