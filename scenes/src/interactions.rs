use {
    bevy::prelude::*,
    puzzle_components::{CluePickup, Lock, PortalLink, PropPickup},
    puzzle_events::*,
    scene_resources::{ClueRegistry, PropRegistry, SceneRegistry},
};

/// Message key shown when a password does not match.
pub const WRONG_PASSWORD_MESSAGE: &str = "dialog.password.message.wrong";

/// Handles clicks on portals and pickups. Puzzle rules are dispatched separately.
pub fn handle_scene_clicks(
    mut commands: Commands,
    mut clicks: MessageReader<ColliderClicked>,
    portals: Query<&PortalLink>,
    prop_pickups: Query<&PropPickup>,
    clue_pickups: Query<&CluePickup>,
    mut props: ResMut<PropRegistry>,
    mut clues: ResMut<ClueRegistry>,
) {
    for click in clicks.read() {
        if let Ok(PortalLink(portal)) = portals.get(click.entity) {
            info!(scene_id = %portal.scene_id, "portal clicked");
            commands.trigger(SwitchSceneRequest::from(portal));
        }

        if let Ok(pickup) = prop_pickups.get(click.entity) {
            match props.mark_found(&pickup.id) {
                Some(true) => {
                    info!(prop_id = %pickup.id, "prop collected");
                    commands.trigger(PropFound {
                        prop_id: pickup.id.clone(),
                        is_restore: false,
                    });
                }
                Some(false) => debug!(prop_id = %pickup.id, "prop already collected"),
                None => error!(prop_id = %pickup.id, "pickup for unregistered prop"),
            }
        }

        if let Ok(pickup) = clue_pickups.get(click.entity) {
            if pickup.disable_hit {
                trace!(clue_id = %pickup.id, "clue can not be picked up directly");
                continue;
            }
            match clues.mark_found(&pickup.id) {
                Some(true) => {
                    info!(clue_id = %pickup.id, "clue collected");
                    commands.trigger(ClueFound {
                        clue_id: pickup.id.clone(),
                        is_restore: false,
                    });
                }
                Some(false) => debug!(clue_id = %pickup.id, "clue already collected"),
                None => error!(clue_id = %pickup.id, "pickup for unregistered clue"),
            }
        }
    }
}

/// Removes the pickup of a possessed prop, however it was obtained.
pub fn despawn_collected_prop(
    trigger: On<PropFound>,
    mut commands: Commands,
    pickups: Query<(Entity, &PropPickup)>,
) {
    let prop_id = &trigger.event().prop_id;
    for (entity, _) in pickups.iter().filter(|(_, p)| &p.id == prop_id) {
        commands.entity(entity).despawn();
    }
}

/// Removes the pickup of a possessed clue, however it was obtained.
pub fn despawn_collected_clue(
    trigger: On<ClueFound>,
    mut commands: Commands,
    pickups: Query<(Entity, &CluePickup)>,
) {
    let clue_id = &trigger.event().clue_id;
    for (entity, _) in pickups.iter().filter(|(_, p)| &p.id == clue_id) {
        commands.entity(entity).despawn();
    }
}

pub fn attempt_unlock(
    trigger: On<UnlockAttempt>,
    mut commands: Commands,
    registry: Res<SceneRegistry>,
    mut locks: Query<&mut Lock>,
) {
    let attempt = trigger.event();
    let Some(mut lock) = registry.lock(&attempt.lock_id).and_then(|e| locks.get_mut(e).ok()) else {
        error!(lock_id = %attempt.lock_id, "no such lock in the current scene");
        return;
    };

    if lock.unlocked {
        debug!(lock_id = %attempt.lock_id, "lock already open");
        return;
    }

    if lock.password != attempt.password {
        debug!(lock_id = %attempt.lock_id, "wrong password");
        commands.trigger(LockRejected {
            lock_id: attempt.lock_id.clone(),
        });
        commands.trigger(ShowMessage {
            content: WRONG_PASSWORD_MESSAGE.to_string(),
        });
        return;
    }

    lock.unlocked = true;
    info!(lock_id = %attempt.lock_id, "lock opened");
    commands.trigger(LockUnlocked {
        lock_id: attempt.lock_id.clone(),
        is_restore: false,
    });
}

pub fn select_prop(trigger: On<SelectProp>, mut props: ResMut<PropRegistry>) {
    let prop_id = trigger.event().prop_id.as_deref();
    if props.select(prop_id) {
        debug!(?prop_id, "prop selection changed");
    } else {
        warn!(?prop_id, "can not select a prop that is not possessed");
    }
}
