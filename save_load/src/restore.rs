use {
    crate::PersistentState,
    bevy::prelude::*,
    puzzle_components::Lock,
    puzzle_events::{ClueFound, LockUnlocked, PropFound, SceneEntered},
    scene_resources::{ClueRegistry, PropRegistry, SceneRegistry},
};

/// Replays recorded progress into the scene that was just entered.
///
/// Clues and props are global and become possessed even before the scene
/// containing them is visited. Locks are only restored while their scene is
/// active.
pub(crate) fn restore_progress(
    trigger: On<SceneEntered>,
    mut commands: Commands,
    state: Option<Res<PersistentState>>,
    mut props: ResMut<PropRegistry>,
    mut clues: ResMut<ClueRegistry>,
    registry: Res<SceneRegistry>,
    mut locks: Query<&mut Lock>,
) {
    let Some(state) = state else {
        return;
    };
    let data = state.data();
    debug!(scene_id = %trigger.event().scene_id, "restoring progress");

    for clue_id in &data.got_clues {
        clues.register(clue_id);
        if clues.mark_found(clue_id) == Some(true) {
            trace!(%clue_id, "clue restored");
            commands.trigger(ClueFound {
                clue_id: clue_id.clone(),
                is_restore: true,
            });
        }
    }

    for prop_id in &data.got_props {
        props.register(prop_id);
        if props.mark_found(prop_id) == Some(true) {
            trace!(%prop_id, "prop restored");
            commands.trigger(PropFound {
                prop_id: prop_id.clone(),
                is_restore: true,
            });
        }
    }

    for lock_id in &data.unlocked_locks {
        let Some(entity) = registry.lock(lock_id) else {
            trace!(%lock_id, "lock belongs to another scene");
            continue;
        };
        let Ok(mut lock) = locks.get_mut(entity) else {
            warn!(%lock_id, "registered lock has no entity");
            continue;
        };
        if lock.unlocked {
            continue;
        }

        lock.unlocked = true;
        trace!(%lock_id, "lock restored");
        commands.trigger(LockUnlocked {
            lock_id: lock_id.clone(),
            is_restore: true,
        });
    }
}
