//! Toast notifications.
//!
//! Messages emitted by puzzles and locks, and newly collected clues or props,
//! are shown as toasts in a column at the top of the screen. Message keys are
//! displayed verbatim.

use {
    bevy::prelude::*,
    puzzle_events::{ClueFound, PropFound, ShowMessage},
    states::GameState,
    std::collections::VecDeque,
};

/// Seconds a toast stays on screen.
const TOAST_DURATION: f32 = 3.0;
/// Toasts beyond this wait in the queue.
pub const MAX_TOASTS: usize = 4;

const TEXT_COLOR: Color = Color::srgb(0.92, 0.92, 0.9);

pub struct NotificationUiPlugin;

impl Plugin for NotificationUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToastQueue>()
            .add_observer(on_show_message)
            .add_observer(on_clue_found)
            .add_observer(on_prop_found)
            .add_systems(Startup, spawn_toast_stack)
            .add_systems(
                Update,
                (show_pending_toasts, expire_toasts)
                    .chain()
                    .run_if(in_state(GameState::Running)),
            );
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Message,
    Clue,
    Prop,
}

impl ToastKind {
    fn background(self) -> Color {
        match self {
            ToastKind::Message => Color::srgba(0.08, 0.08, 0.1, 0.9),
            ToastKind::Clue => Color::srgba(0.12, 0.1, 0.04, 0.9),
            ToastKind::Prop => Color::srgba(0.05, 0.1, 0.12, 0.9),
        }
    }

    fn border(self) -> Color {
        match self {
            ToastKind::Message => Color::srgb(0.45, 0.45, 0.5),
            ToastKind::Clue => Color::srgb(0.85, 0.7, 0.3),
            ToastKind::Prop => Color::srgb(0.3, 0.65, 0.8),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastData {
    pub text: String,
    pub kind: ToastKind,
}

/// Toasts waiting for room on screen, oldest first.
#[derive(Resource, Default, Debug, Deref)]
pub struct ToastQueue(VecDeque<ToastData>);

impl ToastQueue {
    pub fn push(&mut self, data: ToastData) {
        self.0.push_back(data);
    }
}

/// Column node the toasts are laid out in; the newest toast is at the bottom.
#[derive(Component)]
struct ToastStack;

#[derive(Component)]
struct Toast {
    timer: Timer,
}

fn on_show_message(trigger: On<ShowMessage>, mut queue: ResMut<ToastQueue>) {
    queue.push(ToastData {
        text: trigger.event().content.clone(),
        kind: ToastKind::Message,
    });
}

fn on_clue_found(trigger: On<ClueFound>, mut queue: ResMut<ToastQueue>) {
    let event = trigger.event();
    if !event.is_restore {
        queue.push(ToastData {
            text: format!("Clue found: {}", event.clue_id),
            kind: ToastKind::Clue,
        });
    }
}

fn on_prop_found(trigger: On<PropFound>, mut queue: ResMut<ToastQueue>) {
    let event = trigger.event();
    if !event.is_restore {
        queue.push(ToastData {
            text: format!("Picked up: {}", event.prop_id),
            kind: ToastKind::Prop,
        });
    }
}

fn spawn_toast_stack(mut commands: Commands) {
    commands.spawn((
        Name::new("toast stack"),
        ToastStack,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Percent(25.0),
            right: Val::Percent(25.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        },
    ));
}

fn show_pending_toasts(
    mut commands: Commands,
    mut queue: ResMut<ToastQueue>,
    stack: Single<(Entity, Option<&Children>), With<ToastStack>>,
) {
    let (stack, children) = stack.into_inner();
    let mut shown = children.map_or(0, |c| c.len());
    while shown < MAX_TOASTS {
        let Some(data) = queue.0.pop_front() else {
            break;
        };
        debug!(text = %data.text, kind = ?data.kind, "showing toast");
        commands.spawn((toast(&data), ChildOf(stack)));
        shown += 1;
    }
}

fn expire_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toasts: Query<(Entity, &mut Toast)>,
) {
    for (entity, mut toast) in &mut toasts {
        if toast.timer.tick(time.delta()).is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

fn toast(data: &ToastData) -> impl Bundle {
    (
        Text::new(data.text.clone()),
        Node {
            width: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(10.0)),
            border: UiRect::all(Val::Px(2.0)),
            justify_content: JustifyContent::Center,
            border_radius: BorderRadius::all(Val::Px(6.0)),
            ..default()
        },
        TextColor(TEXT_COLOR),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        BackgroundColor(data.kind.background()),
        BorderColor::all(data.kind.border()),
        Toast {
            timer: Timer::from_seconds(TOAST_DURATION, TimerMode::Once),
        },
    )
}
