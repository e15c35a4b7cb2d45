//! Matches puzzle preconditions against the current scene state.

use {
    bevy::prelude::*,
    script_assets::{FailureEffect, Precondition, PuzzleTrigger, ScriptError, SuccessEffect},
    thiserror::Error,
};

/// Read access to the scene registries a precondition can refer to.
pub trait PuzzleContext {
    /// The prop the player currently holds in hand, if any.
    fn selected_prop(&self) -> Option<&str>;
    fn has_prop(&self, prop_id: &str) -> bool;
    /// `None` when the model is not part of the active scene.
    fn model_state(&self, model_id: &str) -> Option<&str>;
    /// `None` when the lock is not part of the active scene.
    fn lock_unlocked(&self, lock_id: &str) -> Option<bool>;
}

/// Effects collected by one evaluation, in application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub successes: Vec<SuccessEffect>,
    pub failures: Vec<FailureEffect>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("puzzle #{puzzle}: {source}")]
    InvalidPrecondition {
        puzzle: usize,
        #[source]
        source: ScriptError,
    },
}

/// Evaluates the puzzles of one object for a trigger.
///
/// Candidates are the puzzles listing `collider_group`, or with
/// `only_lock_related` every puzzle that has a `Lock` precondition regardless
/// of collider and of which lock changed. Every precondition of a candidate is
/// checked; each unmet one contributes its failure effects, and candidates
/// whose preconditions all hold contribute their success effects.
///
/// An unknown precondition tag aborts the whole evaluation.
pub fn evaluate(
    collider_group: &str,
    puzzles: &[PuzzleTrigger],
    ctx: &impl PuzzleContext,
    only_lock_related: bool,
) -> Result<Evaluation, EvaluationError> {
    let candidates: Vec<(usize, &PuzzleTrigger)> = puzzles
        .iter()
        .enumerate()
        .filter(|(_, puzzle)| {
            if only_lock_related {
                puzzle.is_lock_related()
            } else {
                puzzle.is_triggered_by(collider_group)
            }
        })
        .collect();

    debug!(
        %collider_group,
        only_lock_related,
        candidates = candidates.len(),
        "evaluating puzzles"
    );

    let mut evaluation = Evaluation::default();
    for (index, puzzle) in candidates {
        let mut met = true;
        for def in &puzzle.preconditions {
            let precondition = def
                .resolve()
                .map_err(|source| EvaluationError::InvalidPrecondition {
                    puzzle: index,
                    source,
                })?;

            if !is_met(&precondition, ctx) {
                met = false;
                evaluation.failures.extend(def.on_failure.iter().cloned());
            }
        }

        if met {
            evaluation.successes.extend(puzzle.on_success.iter().cloned());
        }
    }

    Ok(evaluation)
}

fn is_met(precondition: &Precondition, ctx: &impl PuzzleContext) -> bool {
    match precondition {
        Precondition::UseProp(prop_id) => {
            let met = ctx.selected_prop() == Some(prop_id.as_str());
            if !met {
                debug!(%prop_id, "prop must be in use");
            }
            met
        }
        Precondition::HasProps(prop_ids) => {
            let met = prop_ids.iter().all(|id| ctx.has_prop(id));
            if !met {
                debug!(?prop_ids, "props must be possessed");
            }
            met
        }
        Precondition::ModelState { model_id, state } => match ctx.model_state(model_id) {
            None => {
                error!(%model_id, "model not found, check the scene script");
                false
            }
            Some(current) => {
                trace!(%model_id, %current, expected = %state, "checking model state");
                current == state
            }
        },
        Precondition::Lock { lock_id, unlocked } => match ctx.lock_unlocked(lock_id) {
            None => {
                error!(%lock_id, "lock not found, check the scene script");
                false
            }
            Some(current) => {
                if current != *unlocked {
                    debug!(%lock_id, expected_unlocked = unlocked, "lock is in the wrong state");
                }
                current == *unlocked
            }
        },
    }
}
