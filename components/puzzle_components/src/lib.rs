use {
    bevy::prelude::*,
    script_assets::{AnimationState, PortalTrigger, PuzzleTrigger},
    std::{collections::{HashMap, VecDeque}, time::Duration},
};

/// State a model may always return to without an animation.
pub const DEFAULT_MODEL_STATE: &str = "default";

pub struct PuzzleComponentsPlugin;

impl Plugin for PuzzleComponentsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Model>()
            .register_type::<PuzzleStatus>()
            .register_type::<Lock>()
            .register_type::<SceneMember>();
    }
}

/// An interactive scene object with a named current state.
///
/// The state drives the model's animation and sound. It is only changed by
/// puzzle effects, see `puzzles::sequencer`.
#[derive(Component, Reflect, Debug, Clone, PartialEq, Eq)]
#[reflect(Component)]
pub struct Model {
    pub id: String,
    pub state: String,
}

/// The state machine of a model: every state it may enter besides [`DEFAULT_MODEL_STATE`].
#[derive(Component, Debug, Clone, Default, Deref)]
pub struct ModelAnimations(pub HashMap<String, AnimationState>);

/// Marker: the model's node carries an animator that can play its states.
#[derive(Component, Debug, Default)]
pub struct Animator;

/// Puzzle rules attached to an interactive object.
#[derive(Component, Debug, Clone, Default, Deref)]
#[require(PuzzleStatus)]
pub struct Puzzles(pub Vec<PuzzleTrigger>);

/// Whether an evaluation is in flight for a puzzle-bearing entity.
///
/// Set to `Evaluating` when an evaluation produces effects and back to `Idle`
/// when its [`EffectSequence`] completes. Triggers arriving while `Evaluating`
/// are dropped.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub enum PuzzleStatus {
    #[default]
    Idle,
    Evaluating,
}

/// Marker: the entity has at least one puzzle gated on a lock and re-evaluates
/// whenever any lock is unlocked.
#[derive(Component, Debug, Default)]
pub struct LockRelated;

/// Clicking this object moves the player to another scene.
#[derive(Component, Debug, Clone, Deref)]
pub struct PortalLink(pub PortalTrigger);

/// A password-protected binary gate.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Lock {
    pub id: String,
    pub password: String,
    pub tip: Option<String>,
    pub unlocked: bool,
}

/// A particle node that puzzles may remove.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub id: String,
}

/// A prop lying in the scene, waiting to be collected.
#[derive(Component, Debug, Clone)]
pub struct PropPickup {
    pub id: String,
}

/// A clue lying in the scene, waiting to be collected.
#[derive(Component, Debug, Clone)]
pub struct CluePickup {
    pub id: String,
    /// Only puzzles may grant this clue.
    pub disable_hit: bool,
}

/// Tags every entity spawned for a scene so the scene can be torn down as a whole.
#[derive(Component, Reflect, Debug, Clone, PartialEq, Eq)]
#[reflect(Component)]
pub struct SceneMember {
    pub scene_id: String,
}

/// One step of a running effect sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectStep {
    ChangeModelState { model_id: String, state: String },
    HideParticle(String),
    GrantClue(String),
    SwitchScene(PortalTrigger),
    ShowMessage(String),
    Wait(Duration),
}

/// The effects produced by one evaluation, applied strictly in order.
///
/// Lives on its own entity rather than on the evaluated object: a sequence
/// always runs to completion even if its owner is despawned midway.
#[derive(Component, Debug)]
pub struct EffectSequence {
    /// The puzzle-bearing entity that is `Evaluating` until this sequence ends.
    pub owner: Entity,
    pub steps: VecDeque<EffectStep>,
    /// Pending delay; no further step runs until it finishes.
    pub wait: Option<Timer>,
}

impl EffectSequence {
    pub fn new(owner: Entity, steps: impl IntoIterator<Item = EffectStep>) -> Self {
        Self {
            owner,
            steps: steps.into_iter().collect(),
            wait: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.wait.is_none() && self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_finishes_only_without_steps_or_wait() {
        let mut sequence = EffectSequence::new(
            Entity::PLACEHOLDER,
            [EffectStep::ShowMessage("tip".into())],
        );
        assert!(!sequence.is_finished());

        sequence.steps.clear();
        sequence.wait = Some(Timer::from_seconds(1.0, TimerMode::Once));
        assert!(!sequence.is_finished());

        sequence.wait = None;
        assert!(sequence.is_finished());
    }

    #[test]
    fn puzzles_require_idle_status() {
        let mut world = World::new();
        let entity = world.spawn(Puzzles::default()).id();

        assert_eq!(
            world.get::<PuzzleStatus>(entity),
            Some(&PuzzleStatus::Idle)
        );
    }
}
