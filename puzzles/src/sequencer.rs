//! Applies evaluated effects as a linear list of timed steps.

use {
    crate::evaluator::Evaluation,
    bevy::{ecs::system::SystemParam, prelude::*},
    puzzle_components::*,
    puzzle_events::{ClueFound, ModelStateChanged, PlayAnimation, ShowMessage, SwitchSceneRequest},
    scene_resources::{ClueRegistry, SceneRegistry},
    script_assets::Sound,
    std::time::Duration,
};

/// Flattens an evaluation into steps: all success effects first, then all
/// failure effects.
///
/// A success effect changes its model, hides its particle, grants its clue,
/// waits, and only then switches scene. A failure effect changes its model,
/// shows its message, then waits.
pub fn plan_steps(evaluation: Evaluation) -> Vec<EffectStep> {
    let mut steps = Vec::new();

    for success in evaluation.successes {
        push_state_change(&mut steps, success.model_id, success.state);
        if let Some(particle) = success.hide_particle {
            steps.push(EffectStep::HideParticle(particle));
        }
        if let Some(clue) = success.clue {
            steps.push(EffectStep::GrantClue(clue));
        }
        push_wait(&mut steps, success.duration);
        if let Some(portal) = success.portal {
            steps.push(EffectStep::SwitchScene(portal));
        }
    }

    for failure in evaluation.failures {
        push_state_change(&mut steps, failure.model_id, failure.state);
        if let Some(tip) = failure.tip {
            steps.push(EffectStep::ShowMessage(tip));
        }
        push_wait(&mut steps, failure.duration);
    }

    steps
}

fn push_state_change(steps: &mut Vec<EffectStep>, model_id: Option<String>, state: Option<String>) {
    match (model_id, state) {
        (Some(model_id), Some(state)) => {
            steps.push(EffectStep::ChangeModelState { model_id, state })
        }
        (Some(model_id), None) => warn!(%model_id, "effect names a model but no state"),
        (None, Some(state)) => warn!(%state, "effect names a state but no model"),
        (None, None) => {}
    }
}

fn push_wait(steps: &mut Vec<EffectStep>, duration: Option<u64>) {
    if let Some(ms) = duration.filter(|ms| *ms > 0) {
        steps.push(EffectStep::Wait(Duration::from_millis(ms)));
    }
}

/// Outcome of [`change_model_state`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// The state is declared; its animation (and sound) should play.
    Animated(Option<Sound>),
    /// Moved to the default state, nothing to play.
    Stored,
    /// The state is not part of the model's state machine; the model is unchanged.
    Undefined,
}

pub fn change_model_state(
    model: &mut Model,
    animations: &ModelAnimations,
    state: &str,
) -> StateChange {
    if state == DEFAULT_MODEL_STATE {
        model.state = state.to_string();
        return StateChange::Stored;
    }

    match animations.get(state) {
        Some(animation) => {
            model.state = state.to_string();
            StateChange::Animated(animation.sound.clone())
        }
        None => StateChange::Undefined,
    }
}

/// Everything an effect step may touch.
#[derive(SystemParam)]
pub struct EffectTargets<'w, 's> {
    commands: Commands<'w, 's>,
    registry: ResMut<'w, SceneRegistry>,
    clues: ResMut<'w, ClueRegistry>,
    models: Query<'w, 's, (&'static mut Model, &'static ModelAnimations, Has<Animator>)>,
    particles: Query<'w, 's, (), With<Particle>>,
}

impl EffectTargets<'_, '_> {
    fn apply(&mut self, step: &EffectStep) {
        match step {
            EffectStep::ChangeModelState { model_id, state } => {
                self.change_model_state(model_id, state);
            }
            EffectStep::HideParticle(name) => match self.registry.take_particle(name) {
                Some(entity) if self.particles.contains(entity) => {
                    debug!(particle = %name, "hiding particle");
                    self.commands.entity(entity).despawn();
                }
                _ => error!(particle = %name, "can not hide particle, not existed"),
            },
            EffectStep::GrantClue(clue_id) => match self.clues.mark_found(clue_id) {
                None => error!(%clue_id, "invalid clue, check the scene script"),
                Some(false) => debug!(%clue_id, "clue already found"),
                Some(true) => {
                    info!(%clue_id, "clue granted by puzzle");
                    self.commands.trigger(ClueFound {
                        clue_id: clue_id.clone(),
                        is_restore: false,
                    });
                }
            },
            EffectStep::SwitchScene(portal) => {
                info!(scene_id = %portal.scene_id, "puzzle requests scene switch");
                self.commands.trigger(SwitchSceneRequest::from(portal));
            }
            EffectStep::ShowMessage(content) => {
                self.commands.trigger(ShowMessage {
                    content: content.clone(),
                });
            }
            EffectStep::Wait(_) => {}
        }
    }

    fn change_model_state(&mut self, model_id: &str, state: &str) {
        let Some(entity) = self.registry.model(model_id) else {
            error!(%model_id, "model not found, check the scene script");
            return;
        };
        let Ok((mut model, animations, has_animator)) = self.models.get_mut(entity) else {
            error!(%model_id, ?entity, "model entity no longer exists");
            return;
        };

        let sound = match change_model_state(&mut model, animations, state) {
            StateChange::Undefined => {
                error!(%model_id, %state, "model has no animation for state");
                return;
            }
            StateChange::Stored => None,
            StateChange::Animated(sound) => Some(sound),
        };

        debug!(%model_id, %state, "model state changed");
        self.commands.trigger(ModelStateChanged {
            entity,
            model_id: model_id.to_string(),
            state: state.to_string(),
        });

        if let Some(sound) = sound {
            if has_animator {
                self.commands.trigger(PlayAnimation {
                    entity,
                    state: state.to_string(),
                    sound,
                });
            } else {
                error!(%model_id, "there is no animator on the model");
            }
        }
    }
}

/// Advances every running effect sequence.
///
/// Steps run back to back within a frame until a `Wait` step parks the
/// sequence; the wait is ticked from `Time` on the following frames. A
/// finished sequence releases its owner back to `Idle`.
pub fn advance_effect_sequences(
    time: Res<Time>,
    mut sequences: Query<(Entity, &mut EffectSequence)>,
    mut statuses: Query<&mut PuzzleStatus>,
    mut targets: EffectTargets,
) {
    for (entity, mut sequence) in &mut sequences {
        if let Some(timer) = sequence.wait.as_mut() {
            timer.tick(time.delta());
            if !timer.is_finished() {
                continue;
            }
            sequence.wait = None;
        }

        while let Some(step) = sequence.steps.pop_front() {
            if let EffectStep::Wait(duration) = step {
                trace!(owner = ?sequence.owner, ?duration, "effect sequence waiting");
                sequence.wait = Some(Timer::new(duration, TimerMode::Once));
                break;
            }
            targets.apply(&step);
        }

        if sequence.is_finished() {
            trace!(owner = ?sequence.owner, "effect sequence finished");
            targets.commands.entity(entity).despawn();
            if let Ok(mut status) = statuses.get_mut(sequence.owner) {
                *status = PuzzleStatus::Idle;
            }
        }
    }
}
