use {
    bevy::prelude::*,
    puzzle_components::*,
    puzzle_events::*,
    puzzles::PuzzlesPlugin,
    scene_resources::{ClueRegistry, PlayerSpawn, PropRegistry, SceneRegistry},
    scenes::{SceneCatalog, ScenesPlugin, WRONG_PASSWORD_MESSAGE},
    script_assets::SceneScript,
};

const LAB: &str = r#"{
    "id": "lab",
    "models": [{
        "id": "box",
        "initialState": "closed",
        "animation": { "stateMachine": { "open": {} } },
        "puzzleTriggers": [{
            "colliderId": ["key"],
            "precondition": [{ "type": 1, "modelState": ["box", "closed"], "onFailure": [] }],
            "onSuccess": [{ "modelId": "box", "state": "open", "clue": "note" }]
        }]
    }, {
        "id": "safe",
        "initialState": "closed",
        "animation": { "stateMachine": { "open": {} } },
        "puzzleTriggers": [{
            "colliderId": ["safe"],
            "precondition": [{ "type": 4, "lockId": "safe", "unlocked": true,
                               "onFailure": [{ "tip": "safe.locked" }] }],
            "onSuccess": [{ "modelId": "safe", "state": "open" }]
        }]
    }, {
        "id": "door",
        "initialState": "default",
        "portalTrigger": { "sceneId": "hall", "position": { "x": 1, "y": 0, "z": 2 }, "rotation": { "x": 0, "y": 90 } }
    }],
    "clues": [{ "id": "note", "disableHit": true }, { "id": "poster" }],
    "props": [{ "id": "key" }],
    "particles": [{ "id": "smoke", "nodes": ["smoke_fx", "smoke_glow"] }],
    "locks": [{ "id": "safe", "password": "1234" }]
}"#;

const HALL: &str = r#"{
    "id": "hall",
    "models": [{
        "id": "exit",
        "initialState": "default",
        "portalTrigger": { "sceneId": "lab" }
    }],
    "props": [{ "id": "lamp" }]
}"#;

#[derive(Resource, Default)]
struct Fired {
    entered: Vec<String>,
    messages: Vec<String>,
    unlocked: Vec<String>,
    rejected: Vec<String>,
    props: Vec<String>,
    clues: Vec<String>,
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AssetPlugin::default())
        .init_asset::<SceneScript>()
        .add_plugins((
            PuzzleComponentsPlugin,
            PuzzleEventsPlugin,
            PuzzlesPlugin,
            ScenesPlugin,
        ))
        .init_resource::<Fired>()
        .add_observer(|t: On<SceneEntered>, mut f: ResMut<Fired>| {
            f.entered.push(t.event().scene_id.clone());
        })
        .add_observer(|t: On<ShowMessage>, mut f: ResMut<Fired>| {
            f.messages.push(t.event().content.clone());
        })
        .add_observer(|t: On<LockUnlocked>, mut f: ResMut<Fired>| {
            f.unlocked.push(t.event().lock_id.clone());
        })
        .add_observer(|t: On<LockRejected>, mut f: ResMut<Fired>| {
            f.rejected.push(t.event().lock_id.clone());
        })
        .add_observer(|t: On<PropFound>, mut f: ResMut<Fired>| {
            f.props.push(t.event().prop_id.clone());
        })
        .add_observer(|t: On<ClueFound>, mut f: ResMut<Fired>| {
            f.clues.push(t.event().clue_id.clone());
        });

    for json in [LAB, HALL] {
        let script: SceneScript = serde_json::from_str(json).unwrap();
        let id = script.id.clone();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<SceneScript>>()
            .add(script);
        app.world_mut().resource_mut::<SceneCatalog>().insert(id, handle);
    }

    app.update();
    app
}

fn enter(app: &mut App, scene_id: &str) {
    app.world_mut().trigger(SwitchSceneRequest {
        scene_id: scene_id.into(),
        position: Vec3::ZERO,
        rotation: Vec2::ZERO,
    });
    app.update();
}

fn click(app: &mut App, entity: Entity, collider: &str) {
    app.world_mut().write_message(ColliderClicked {
        entity,
        collider: collider.into(),
    });
    app.update();
}

fn model(app: &App, model_id: &str) -> Entity {
    app.world().resource::<SceneRegistry>().model(model_id).unwrap()
}

fn prop_pickup(app: &mut App, prop_id: &str) -> Option<Entity> {
    let mut query = app.world_mut().query::<(Entity, &PropPickup)>();
    query
        .iter(app.world())
        .find(|(_, p)| p.id == prop_id)
        .map(|(e, _)| e)
}

fn clue_pickup(app: &mut App, clue_id: &str) -> Option<Entity> {
    let mut query = app.world_mut().query::<(Entity, &CluePickup)>();
    query
        .iter(app.world())
        .find(|(_, c)| c.id == clue_id)
        .map(|(e, _)| e)
}

#[test]
fn entering_a_scene_spawns_its_objects() {
    let mut app = app();
    enter(&mut app, "lab");

    let registry = app.world().resource::<SceneRegistry>();
    assert_eq!(registry.scene_id, "lab");
    assert_eq!(registry.models.len(), 3);
    assert!(registry.lock("safe").is_some());
    let smoke = registry.particles.get("smoke").copied();
    assert!(smoke.is_some());
    assert_eq!(registry.particles.get("smoke_fx").copied(), smoke);
    assert_eq!(registry.particles.get("smoke_glow").copied(), smoke);

    let bx = model(&app, "box");
    let safe = model(&app, "safe");
    let door = model(&app, "door");
    assert_eq!(app.world().get::<Model>(bx).unwrap().state, "closed");
    assert!(app.world().get::<Animator>(bx).is_some());
    assert!(app.world().get::<Animator>(door).is_none());
    assert_eq!(app.world().get::<PuzzleStatus>(bx), Some(&PuzzleStatus::Idle));
    assert!(app.world().get::<LockRelated>(safe).is_some());
    assert!(app.world().get::<LockRelated>(bx).is_none());
    assert!(app.world().get::<PortalLink>(door).is_some());
    assert!(app.world().get::<Puzzles>(door).is_none());

    assert!(prop_pickup(&mut app, "key").is_some());
    assert!(clue_pickup(&mut app, "note").is_some());
    assert!(clue_pickup(&mut app, "poster").is_some());
    assert!(app.world().resource::<PropRegistry>().entry("key").is_some());
    assert_eq!(app.world().resource::<ClueRegistry>().len(), 2);
    assert_eq!(app.world().resource::<Fired>().entered, vec!["lab"]);
}

#[test]
fn portal_switches_scene_and_keeps_inventory() {
    let mut app = app();
    enter(&mut app, "lab");

    let key = prop_pickup(&mut app, "key").unwrap();
    click(&mut app, key, "key");
    assert!(app.world().resource::<PropRegistry>().has("key"));
    assert!(prop_pickup(&mut app, "key").is_none());

    let door = model(&app, "door");
    click(&mut app, door, "door_1");

    let registry = app.world().resource::<SceneRegistry>();
    assert_eq!(registry.scene_id, "hall");
    assert!(registry.model("box").is_none());
    assert!(app.world().get_entity(door).is_err());

    let mut members = app.world_mut().query::<&SceneMember>();
    assert!(members.iter(app.world()).all(|m| m.scene_id == "hall"));

    let spawn = app.world().resource::<PlayerSpawn>();
    assert_eq!(spawn.position, Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(spawn.rotation, Vec2::new(0.0, 90.0));

    assert!(app.world().resource::<PropRegistry>().has("key"));
    assert_eq!(app.world().resource::<Fired>().entered, vec!["lab", "hall"]);

    // coming back does not respawn the collected key
    let exit = model(&app, "exit");
    click(&mut app, exit, "exit");
    assert_eq!(app.world().resource::<SceneRegistry>().scene_id, "lab");
    assert!(prop_pickup(&mut app, "key").is_none());
}

#[test]
fn unknown_scene_keeps_the_current_one() {
    let mut app = app();
    enter(&mut app, "lab");
    let bx = model(&app, "box");

    enter(&mut app, "attic");

    assert_eq!(app.world().resource::<SceneRegistry>().scene_id, "lab");
    assert!(app.world().get_entity(bx).is_ok());
    assert_eq!(app.world().resource::<Fired>().entered, vec!["lab"]);
}

#[test]
fn wrong_password_is_rejected() {
    let mut app = app();
    enter(&mut app, "lab");

    app.world_mut().trigger(UnlockAttempt {
        lock_id: "safe".into(),
        password: "0000".into(),
    });
    app.update();

    let lock = app.world().resource::<SceneRegistry>().lock("safe").unwrap();
    assert!(!app.world().get::<Lock>(lock).unwrap().unlocked);
    let fired = app.world().resource::<Fired>();
    assert_eq!(fired.messages, vec![WRONG_PASSWORD_MESSAGE]);
    assert_eq!(fired.rejected, vec!["safe"]);
    assert!(fired.unlocked.is_empty());
}

#[test]
fn right_password_opens_the_lock_and_its_puzzles() {
    let mut app = app();
    enter(&mut app, "lab");
    let safe = model(&app, "safe");

    click(&mut app, safe, "safe");
    assert_eq!(app.world().resource::<Fired>().messages, vec!["safe.locked"]);

    app.world_mut().trigger(UnlockAttempt {
        lock_id: "safe".into(),
        password: "1234".into(),
    });
    app.update();

    assert_eq!(app.world().resource::<Fired>().unlocked, vec!["safe"]);
    assert_eq!(app.world().get::<Model>(safe).unwrap().state, "open");

    // a second correct attempt does nothing
    app.world_mut().trigger(UnlockAttempt {
        lock_id: "safe".into(),
        password: "1234".into(),
    });
    app.update();
    assert_eq!(app.world().resource::<Fired>().unlocked.len(), 1);
}

#[test]
fn hit_disabled_clue_is_only_granted_by_puzzles() {
    let mut app = app();
    enter(&mut app, "lab");

    let note = clue_pickup(&mut app, "note").unwrap();
    click(&mut app, note, "note");
    assert!(!app.world().resource::<ClueRegistry>().is_found("note"));
    assert!(clue_pickup(&mut app, "note").is_some());

    let poster = clue_pickup(&mut app, "poster").unwrap();
    click(&mut app, poster, "poster");
    assert!(app.world().resource::<ClueRegistry>().is_found("poster"));

    let bx = model(&app, "box");
    click(&mut app, bx, "key_1");

    assert!(app.world().resource::<ClueRegistry>().is_found("note"));
    assert!(clue_pickup(&mut app, "note").is_none());
    assert_eq!(app.world().resource::<Fired>().clues, vec!["poster", "note"]);
}

#[test]
fn only_possessed_props_can_be_selected() {
    let mut app = app();
    enter(&mut app, "lab");

    app.world_mut().trigger(SelectProp {
        prop_id: Some("key".into()),
    });
    assert_eq!(app.world().resource::<PropRegistry>().selected(), None);

    let key = prop_pickup(&mut app, "key").unwrap();
    click(&mut app, key, "key");
    assert_eq!(app.world().resource::<Fired>().props, vec!["key"]);

    app.world_mut().trigger(SelectProp {
        prop_id: Some("key".into()),
    });
    assert_eq!(app.world().resource::<PropRegistry>().selected(), Some("key"));

    app.world_mut().trigger(SelectProp { prop_id: None });
    assert_eq!(app.world().resource::<PropRegistry>().selected(), None);
}
