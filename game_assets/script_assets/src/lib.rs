//! Declarative scene scripts.
//!
//! A scene script describes every interactive object of one scene: models with
//! their state machine and puzzle triggers, locks, particles, and the props and
//! clues the player can collect. Scripts are authored as `*.script.json` and
//! are assumed to be validated upstream; the only check performed here is tag
//! resolution of preconditions, see [`PreconditionDef::resolve`].

mod precondition;

pub use precondition::*;

use {
    bevy::prelude::*,
    bevy_common_assets::json::JsonAssetPlugin,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

pub struct ScriptAssetsPlugin;

impl Plugin for ScriptAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<SceneScript>::new(&["script.json"]));
    }
}

/// The top-level asset for one scene.
#[derive(Asset, TypePath, Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneScript {
    /// Authoring format version, kept for diagnostics only.
    #[serde(default)]
    pub version: String,
    /// Scene id used by portals (e.g. "lab").
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelDef>,
    #[serde(default)]
    pub clues: Vec<ClueDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
    #[serde(default)]
    pub particles: Vec<ParticleDef>,
    #[serde(default)]
    pub locks: Vec<LockDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDef {
    pub id: String,
    /// Scene-graph node names backing this model.
    #[serde(default)]
    pub nodes: Vec<String>,
    pub initial_state: String,
    #[serde(default)]
    pub animation: AnimationDef,
    #[serde(default)]
    pub puzzle_triggers: Vec<PuzzleTrigger>,
    #[serde(default)]
    pub portal_trigger: Option<PortalTrigger>,
}

impl ModelDef {
    /// True when any puzzle of this model is gated on a lock.
    pub fn has_lock_puzzle(&self) -> bool {
        self.puzzle_triggers.iter().any(PuzzleTrigger::is_lock_related)
    }
}

/// The model state machine: every state the model may enter besides `"default"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDef {
    #[serde(default)]
    pub state_machine: HashMap<String, AnimationState>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnimationState {
    #[serde(default)]
    pub sound: Option<Sound>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Sound {
    pub url: String,
    /// 0.0 - 1.0
    #[serde(default = "full_volume")]
    pub volume: f32,
}

fn full_volume() -> f32 {
    1.0
}

/// Target of a scene switch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalTrigger {
    pub scene_id: String,
    #[serde(default)]
    pub position: PortalPosition,
    #[serde(default)]
    pub rotation: PortalRotation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct PortalPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<PortalPosition> for Vec3 {
    fn from(p: PortalPosition) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Initial camera pitch (`x`) and yaw (`y`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct PortalRotation {
    pub x: f32,
    pub y: f32,
}

impl From<PortalRotation> for Vec2 {
    fn from(r: PortalRotation) -> Self {
        Vec2::new(r.x, r.y)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    /// The clue cannot be picked up by clicking it; it is only granted by puzzles.
    #[serde(default)]
    pub disable_hit: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticleDef {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockDef {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    pub password: String,
    /// Localized hint shown by the password prompt.
    #[serde(default)]
    pub tip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAB: &str = r#"{
        "version": "4",
        "id": "lab",
        "name": "Lab",
        "models": [{
            "id": "box",
            "nodes": ["box_1"],
            "initialState": "closed",
            "animation": { "stateMachine": { "open": { "sound": { "url": "open.mp3" } } } },
            "puzzleTriggers": [{
                "colliderId": ["key"],
                "precondition": [
                    { "type": 1, "modelState": ["box", "closed"], "onFailure": [] },
                    { "type": 4, "lockId": "safe", "unlocked": true,
                      "onFailure": [{ "tip": "lock.safe.locked", "duration": 200 }] }
                ],
                "onSuccess": [{ "modelId": "box", "state": "open", "duration": 500, "clue": "note" }]
            }]
        }, {
            "id": "door",
            "initialState": "default",
            "portalTrigger": { "sceneId": "hall", "position": { "x": 1, "y": 2, "z": 3 }, "rotation": { "x": 0, "y": 90 } }
        }],
        "clues": [{ "id": "note", "name": "Note", "disableHit": true }],
        "props": [{ "id": "key", "name": "Key" }],
        "particles": [{ "id": "smoke" }],
        "locks": [{ "id": "safe", "password": "1234" }]
    }"#;

    #[test]
    fn parses_authored_scene_script() {
        let script: SceneScript = serde_json::from_str(LAB).unwrap();

        assert_eq!(script.id, "lab");
        assert_eq!(script.models.len(), 2);

        let bx = &script.models[0];
        assert_eq!(bx.initial_state, "closed");
        assert!(bx.animation.state_machine.contains_key("open"));
        assert_eq!(
            bx.animation.state_machine["open"].sound.as_ref().map(|s| s.volume),
            Some(1.0)
        );
        assert!(bx.has_lock_puzzle());

        let trigger = &bx.puzzle_triggers[0];
        assert_eq!(trigger.colliders, vec!["key".to_string()]);
        assert_eq!(trigger.preconditions.len(), 2);
        assert_eq!(trigger.preconditions[1].on_failure[0].duration, Some(200));
        assert_eq!(trigger.on_success[0].clue.as_deref(), Some("note"));

        let door = &script.models[1];
        assert!(!door.has_lock_puzzle());
        let portal = door.portal_trigger.as_ref().unwrap();
        assert_eq!(Vec3::from(portal.position), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec2::from(portal.rotation), Vec2::new(0.0, 90.0));

        assert!(script.clues[0].disable_hit);
        assert_eq!(script.locks[0].tip, None);
    }

    #[test]
    fn shipped_scenes_resolve() {
        let shipped = [
            include_str!("../../../assets/scenes/study.script.json"),
            include_str!("../../../assets/scenes/cellar.script.json"),
        ];
        for json in shipped {
            let script: SceneScript = serde_json::from_str(json).unwrap();
            let preconditions = script
                .models
                .iter()
                .flat_map(|m| &m.puzzle_triggers)
                .flat_map(|t| &t.preconditions);
            for precondition in preconditions {
                assert!(precondition.resolve().is_ok(), "{}: {precondition:?}", script.id);
            }
        }
    }
}
