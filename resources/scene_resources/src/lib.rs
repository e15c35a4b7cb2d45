mod settings;

pub use settings::*;

use bevy::{platform::collections::HashMap, prelude::*};

/// Id lookups for the objects of the active scene.
///
/// Rebuilt from scratch whenever a scene is entered and swapped in as a whole;
/// entries never outlive their scene.
#[derive(Resource, Default, Debug)]
pub struct SceneRegistry {
    pub scene_id: String,
    pub models: HashMap<String, Entity>,
    pub locks: HashMap<String, Entity>,
    pub particles: HashMap<String, Entity>,
}

impl SceneRegistry {
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
            ..default()
        }
    }

    pub fn model(&self, model_id: &str) -> Option<Entity> {
        self.models.get(model_id).copied()
    }

    pub fn lock(&self, lock_id: &str) -> Option<Entity> {
        self.locks.get(lock_id).copied()
    }

    /// Removes a particle from the registry, returning its entity.
    ///
    /// A particle is registered under its id and each of its node names; taking
    /// it by any of them drops every key.
    pub fn take_particle(&mut self, name: &str) -> Option<Entity> {
        let entity = self.particles.get(name).copied()?;
        self.particles.retain(|_, e| *e != entity);
        Some(entity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropEntry {
    pub id: String,
    pub got: bool,
    pub selected: bool,
}

/// Every prop of every scene visited so far, in discovery order.
///
/// At most one possessed prop is selected at a time.
#[derive(Resource, Default, Debug)]
pub struct PropRegistry {
    entries: Vec<PropEntry>,
}

impl PropRegistry {
    /// Adds a prop if it is not known yet.
    pub fn register(&mut self, prop_id: &str) {
        if self.entry(prop_id).is_none() {
            self.entries.push(PropEntry {
                id: prop_id.to_string(),
                got: false,
                selected: false,
            });
        }
    }

    pub fn entry(&self, prop_id: &str) -> Option<&PropEntry> {
        self.entries.iter().find(|e| e.id == prop_id)
    }

    pub fn has(&self, prop_id: &str) -> bool {
        self.entry(prop_id).is_some_and(|e| e.got)
    }

    pub fn selected(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.selected)
            .map(|e| e.id.as_str())
    }

    /// Marks a prop as possessed. `None` if the prop is unknown, otherwise
    /// whether it was newly found.
    pub fn mark_found(&mut self, prop_id: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == prop_id)?;
        let newly = !entry.got;
        entry.got = true;
        Some(newly)
    }

    /// Selects a possessed prop, or clears the selection with `None`.
    /// Returns false and keeps the current selection if the prop is not possessed.
    pub fn select(&mut self, prop_id: Option<&str>) -> bool {
        if let Some(id) = prop_id
            && !self.has(id)
        {
            return false;
        }
        for entry in &mut self.entries {
            entry.selected = prop_id == Some(entry.id.as_str());
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClueEntry {
    pub id: String,
    pub got: bool,
}

/// Every clue of every scene visited so far, in discovery order.
#[derive(Resource, Default, Debug)]
pub struct ClueRegistry {
    entries: Vec<ClueEntry>,
}

impl ClueRegistry {
    pub fn register(&mut self, clue_id: &str) {
        if self.entry(clue_id).is_none() {
            self.entries.push(ClueEntry {
                id: clue_id.to_string(),
                got: false,
            });
        }
    }

    pub fn entry(&self, clue_id: &str) -> Option<&ClueEntry> {
        self.entries.iter().find(|e| e.id == clue_id)
    }

    pub fn is_found(&self, clue_id: &str) -> bool {
        self.entry(clue_id).is_some_and(|e| e.got)
    }

    /// `None` if the clue is unknown, otherwise whether it was newly found.
    pub fn mark_found(&mut self, clue_id: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == clue_id)?;
        let newly = !entry.got;
        entry.got = true;
        Some(newly)
    }

    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|e| e.got).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the player stands after entering the current scene.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct PlayerSpawn {
    pub position: Vec3,
    /// Camera pitch (`x`) and yaw (`y`).
    pub rotation: Vec2,
}
