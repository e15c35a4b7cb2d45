//! Scene (re)building from a [`SceneScript`].

use {
    crate::resources::SceneCatalog,
    bevy::prelude::*,
    puzzle_components::*,
    puzzle_events::{SceneEntered, SwitchSceneRequest},
    scene_resources::{ClueRegistry, PlayerSpawn, PropRegistry, SceneRegistry},
    script_assets::{ModelDef, SceneScript},
};

/// Tears down the active scene and spawns the requested one.
///
/// An unknown target leaves the current scene untouched.
pub fn switch_scene(
    trigger: On<SwitchSceneRequest>,
    mut commands: Commands,
    catalog: Res<SceneCatalog>,
    scripts: Res<Assets<SceneScript>>,
    members: Query<Entity, With<SceneMember>>,
    mut registry: ResMut<SceneRegistry>,
    mut props: ResMut<PropRegistry>,
    mut clues: ResMut<ClueRegistry>,
    mut player_spawn: ResMut<PlayerSpawn>,
) {
    let request = trigger.event();
    let Some(script) = catalog.get(&request.scene_id).and_then(|h| scripts.get(h)) else {
        error!(scene_id = %request.scene_id, "no script for scene, staying in current scene");
        return;
    };

    let previous = registry.scene_id.clone();
    let mut despawned = 0;
    for entity in &members {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    debug!(%previous, despawned, "left scene");

    *registry = spawn_scene(&mut commands, script, &mut props, &mut clues);
    *player_spawn = PlayerSpawn {
        position: request.position,
        rotation: request.rotation,
    };

    info!(scene_id = %script.id, "entered scene");
    commands.trigger(SceneEntered {
        scene_id: script.id.clone(),
    });
}

/// Spawns every object of `script` and returns the registry indexing them.
///
/// Props and clues are registered in the cross-scene inventory; pickups are
/// only spawned for items not yet possessed.
pub fn spawn_scene(
    commands: &mut Commands,
    script: &SceneScript,
    props: &mut PropRegistry,
    clues: &mut ClueRegistry,
) -> SceneRegistry {
    let mut registry = SceneRegistry::new(script.id.clone());
    let member = || SceneMember {
        scene_id: script.id.clone(),
    };

    for def in &script.models {
        let entity = spawn_model(commands, def, member());
        if registry.models.insert(def.id.clone(), entity).is_some() {
            warn!(model_id = %def.id, "duplicate model id in scene script");
        }
    }

    for def in &script.locks {
        let entity = commands
            .spawn((
                Name::new(format!("lock {}", def.id)),
                Lock {
                    id: def.id.clone(),
                    password: def.password.clone(),
                    tip: def.tip.clone(),
                    unlocked: false,
                },
                member(),
            ))
            .id();
        registry.locks.insert(def.id.clone(), entity);
    }

    for def in &script.particles {
        let entity = commands
            .spawn((
                Name::new(format!("particle {}", def.id)),
                Particle { id: def.id.clone() },
                member(),
            ))
            .id();
        for name in std::iter::once(&def.id).chain(&def.nodes) {
            registry.particles.entry(name.clone()).or_insert(entity);
        }
    }

    for def in &script.props {
        props.register(&def.id);
        if props.has(&def.id) {
            continue;
        }
        commands.spawn((
            Name::new(format!("prop {}", def.id)),
            PropPickup { id: def.id.clone() },
            member(),
        ));
    }

    for def in &script.clues {
        clues.register(&def.id);
        if clues.is_found(&def.id) {
            continue;
        }
        commands.spawn((
            Name::new(format!("clue {}", def.id)),
            CluePickup {
                id: def.id.clone(),
                disable_hit: def.disable_hit,
            },
            member(),
        ));
    }

    registry
}

fn spawn_model(commands: &mut Commands, def: &ModelDef, member: SceneMember) -> Entity {
    let mut entity = commands.spawn((
        Name::new(format!("model {}", def.id)),
        Model {
            id: def.id.clone(),
            state: def.initial_state.clone(),
        },
        ModelAnimations(def.animation.state_machine.clone()),
        member,
    ));

    if !def.animation.state_machine.is_empty() {
        entity.insert(Animator);
    }
    if !def.puzzle_triggers.is_empty() {
        entity.insert(Puzzles(def.puzzle_triggers.clone()));
    }
    if def.has_lock_puzzle() {
        entity.insert(LockRelated);
    }
    if let Some(portal) = &def.portal_trigger {
        entity.insert(PortalLink(portal.clone()));
    }

    entity.id()
}
