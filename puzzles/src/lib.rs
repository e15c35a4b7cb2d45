//! Puzzle rule evaluation.
//!
//! A click on a collider of an interactive object (or the opening of any lock)
//! evaluates the object's puzzles against the scene registries. Satisfied
//! puzzles contribute their success effects, unmet preconditions their failure
//! effects, and the result runs as an [`EffectSequence`] that keeps the object
//! `Evaluating` until its last delay has elapsed.
//!
//! [`EffectSequence`]: puzzle_components::EffectSequence

pub mod evaluator;
pub mod sequencer;
pub mod systems;


pub use evaluator::{Evaluation, EvaluationError, PuzzleContext, evaluate};

use {
    bevy::prelude::*,
    scene_resources::{ClueRegistry, PropRegistry, SceneRegistry},
};

pub struct PuzzlesPlugin;

impl Plugin for PuzzlesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneRegistry>()
            .init_resource::<PropRegistry>()
            .init_resource::<ClueRegistry>()
            .add_systems(
                Update,
                (
                    systems::dispatch_collider_clicks,
                    sequencer::advance_effect_sequences,
                )
                    .chain(),
            )
            .add_observer(systems::on_lock_unlocked);
    }
}
