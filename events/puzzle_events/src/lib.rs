use {bevy::prelude::*, script_assets::{PortalTrigger, Sound}};

pub struct PuzzleEventsPlugin;

impl Plugin for PuzzleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ColliderClicked>();
    }
}

/// Returns the collider group of a collider name: everything before the first `_`.
///
/// `cauldron_1` and `cauldron_2` both belong to `cauldron`.
pub fn collider_group(collider: &str) -> &str {
    collider.split('_').next().unwrap_or(collider)
}

// ============================================================================
// Interaction bus
// ============================================================================

/// A click on one of the colliders of an interactive entity.
///
/// Written by whatever frontend owns pointer input; read by the puzzle
/// dispatcher and by the scene pickups.
#[derive(Message, Debug, Clone)]
pub struct ColliderClicked {
    pub entity: Entity,
    /// Raw collider name, e.g. `cauldron_1`.
    pub collider: String,
}

impl ColliderClicked {
    pub fn group(&self) -> &str {
        collider_group(&self.collider)
    }
}

// ============================================================================
// Scene state changes
// ============================================================================

/// A lock was opened, either by the player or while restoring a save.
#[derive(Event, Debug, Clone)]
pub struct LockUnlocked {
    pub lock_id: String,
    pub is_restore: bool,
}

/// A clue became possessed.
#[derive(Event, Debug, Clone)]
pub struct ClueFound {
    pub clue_id: String,
    pub is_restore: bool,
}

/// A prop became possessed.
#[derive(Event, Debug, Clone)]
pub struct PropFound {
    pub prop_id: String,
    pub is_restore: bool,
}

/// A model entered a new state.
#[derive(Event, Debug, Clone)]
pub struct ModelStateChanged {
    pub entity: Entity,
    pub model_id: String,
    pub state: String,
}

/// Request for the animator of `entity` to play `state`, with its optional sound.
#[derive(Event, Debug, Clone)]
pub struct PlayAnimation {
    pub entity: Entity,
    pub state: String,
    pub sound: Option<Sound>,
}

/// Fired once a scene has been spawned and its registry is in place.
#[derive(Event, Debug, Clone)]
pub struct SceneEntered {
    pub scene_id: String,
}

// ============================================================================
// Requests
// ============================================================================

/// Tear down the current scene and enter another one.
#[derive(Event, Debug, Clone)]
pub struct SwitchSceneRequest {
    pub scene_id: String,
    pub position: Vec3,
    /// Camera pitch (`x`) and yaw (`y`).
    pub rotation: Vec2,
}

impl From<&PortalTrigger> for SwitchSceneRequest {
    fn from(portal: &PortalTrigger) -> Self {
        Self {
            scene_id: portal.scene_id.clone(),
            position: portal.position.into(),
            rotation: portal.rotation.into(),
        }
    }
}

/// Show a transient notification. `content` is a localized message key.
#[derive(Event, Debug, Clone)]
pub struct ShowMessage {
    pub content: String,
}

/// Select a possessed prop, or clear the selection with `None`.
#[derive(Event, Debug, Clone)]
pub struct SelectProp {
    pub prop_id: Option<String>,
}

/// A password entered for a lock.
#[derive(Event, Debug, Clone)]
pub struct UnlockAttempt {
    pub lock_id: String,
    pub password: String,
}

/// A password attempt did not match.
#[derive(Event, Debug, Clone)]
pub struct LockRejected {
    pub lock_id: String,
}
