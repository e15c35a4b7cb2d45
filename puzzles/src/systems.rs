use {
    crate::{
        evaluator::{PuzzleContext, evaluate},
        sequencer::plan_steps,
    },
    bevy::{ecs::system::SystemParam, prelude::*},
    puzzle_components::*,
    puzzle_events::{ColliderClicked, LockUnlocked},
    scene_resources::{PropRegistry, SceneRegistry},
};

/// ECS view of the registries, used as the evaluation context.
#[derive(SystemParam)]
pub struct SceneContext<'w, 's> {
    registry: Res<'w, SceneRegistry>,
    props: Res<'w, PropRegistry>,
    models: Query<'w, 's, &'static Model>,
    locks: Query<'w, 's, &'static Lock>,
}

impl PuzzleContext for SceneContext<'_, '_> {
    fn selected_prop(&self) -> Option<&str> {
        self.props.selected()
    }

    fn has_prop(&self, prop_id: &str) -> bool {
        self.props.has(prop_id)
    }

    fn model_state(&self, model_id: &str) -> Option<&str> {
        let entity = self.registry.model(model_id)?;
        self.models.get(entity).ok().map(|m| m.state.as_str())
    }

    fn lock_unlocked(&self, lock_id: &str) -> Option<bool> {
        let entity = self.registry.lock(lock_id)?;
        self.locks.get(entity).ok().map(|l| l.unlocked)
    }
}

/// Evaluates the puzzles of `owner` and starts the resulting effect sequence.
///
/// Dropped silently while `owner` is already evaluating.
fn start_evaluation(
    commands: &mut Commands,
    owner: Entity,
    status: &mut PuzzleStatus,
    puzzles: &Puzzles,
    collider_group: &str,
    only_lock_related: bool,
    ctx: &SceneContext,
) {
    if *status == PuzzleStatus::Evaluating {
        debug!(?owner, "already puzzling, trigger dropped");
        return;
    }

    let evaluation = match evaluate(collider_group, puzzles, ctx, only_lock_related) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            error!(?owner, error = %e, "puzzle evaluation aborted, corrupt scene script");
            return;
        }
    };

    let steps = plan_steps(evaluation);
    if steps.is_empty() {
        trace!(?owner, "evaluation produced no effects");
        return;
    }

    debug!(?owner, steps = steps.len(), "starting effect sequence");
    *status = PuzzleStatus::Evaluating;
    commands.spawn(EffectSequence::new(owner, steps));
}

/// Reads collider clicks from the interaction bus and evaluates the clicked object.
pub fn dispatch_collider_clicks(
    mut commands: Commands,
    mut clicks: MessageReader<ColliderClicked>,
    mut puzzles: Query<(&Puzzles, &mut PuzzleStatus)>,
    ctx: SceneContext,
) {
    for click in clicks.read() {
        let Ok((rules, mut status)) = puzzles.get_mut(click.entity) else {
            continue;
        };

        trace!(entity = ?click.entity, collider = %click.collider, "collider clicked");
        start_evaluation(
            &mut commands,
            click.entity,
            &mut status,
            rules,
            click.group(),
            false,
            &ctx,
        );
    }
}

/// Re-evaluates every lock-gated object when any lock opens.
pub fn on_lock_unlocked(
    trigger: On<LockUnlocked>,
    mut commands: Commands,
    mut puzzles: Query<(Entity, &Puzzles, &mut PuzzleStatus), With<LockRelated>>,
    ctx: SceneContext,
) {
    let event = trigger.event();
    debug!(lock_id = %event.lock_id, is_restore = event.is_restore, "handling unlocked lock");

    for (owner, rules, mut status) in &mut puzzles {
        start_evaluation(
            &mut commands,
            owner,
            &mut status,
            rules,
            &event.lock_id,
            true,
            &ctx,
        );
    }
}
