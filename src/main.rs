use {
    bevy::{log::LogPlugin, prelude::*},
    escape_core::CorePlugin,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins.set(LogPlugin {
                filter: "error,escape_core=info,\
                    scenes=debug,\
                    puzzles=debug,\
                    save_load=debug,\
                    notification_ui=info"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            }),
        )
        .add_plugins(CorePlugin)
        .run();
}
