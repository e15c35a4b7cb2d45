use {
    crate::PortalTrigger,
    serde::{Deserialize, Deserializer, Serialize, de::Error as _},
    thiserror::Error,
};

/// Numeric precondition tags of the authoring format. Tag `2` was retired.
pub const TAG_USE_PROP: u8 = 0;
pub const TAG_MODEL_STATE: u8 = 1;
pub const TAG_HAS_PROPS: u8 = 3;
pub const TAG_LOCK: u8 = 4;

/// A rule binding trigger colliders to preconditions and resulting effects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleTrigger {
    /// Collider groups that start this puzzle (`cauldron_1` belongs to `cauldron`).
    #[serde(rename = "colliderId", default)]
    pub colliders: Vec<String>,
    /// All must hold for `on_success` to run.
    #[serde(rename = "precondition", default)]
    pub preconditions: Vec<PreconditionDef>,
    #[serde(default)]
    pub on_success: Vec<SuccessEffect>,
}

impl PuzzleTrigger {
    pub fn is_triggered_by(&self, collider_group: &str) -> bool {
        self.colliders.iter().any(|c| c == collider_group)
    }

    pub fn is_lock_related(&self) -> bool {
        self.preconditions.iter().any(PreconditionDef::is_lock)
    }
}

/// A precondition as authored: a numeric tag plus the fields of every variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreconditionDef {
    #[serde(rename = "type")]
    pub tag: u8,
    #[serde(default)]
    pub use_prop: Option<String>,
    #[serde(default)]
    pub has_props: Option<Vec<String>>,
    /// `[modelId, state]`
    #[serde(default)]
    pub model_state: Option<Vec<String>>,
    #[serde(default)]
    pub lock_id: Option<String>,
    #[serde(default)]
    pub unlocked: Option<bool>,
    #[serde(default)]
    pub on_failure: Vec<FailureEffect>,
}

impl PreconditionDef {
    pub fn is_lock(&self) -> bool {
        self.tag == TAG_LOCK
    }

    /// Turns the authored tag into a typed [`Precondition`].
    pub fn resolve(&self) -> Result<Precondition, ScriptError> {
        match self.tag {
            TAG_USE_PROP => {
                let prop_id = self.use_prop.clone().ok_or(ScriptError::MissingField {
                    tag: self.tag,
                    field: "useProp",
                })?;
                Ok(Precondition::UseProp(prop_id))
            }
            TAG_MODEL_STATE => match self.model_state.as_deref() {
                Some([model_id, state]) => Ok(Precondition::ModelState {
                    model_id: model_id.clone(),
                    state: state.clone(),
                }),
                Some(other) => Err(ScriptError::MalformedModelState(other.len())),
                None => Err(ScriptError::MissingField {
                    tag: self.tag,
                    field: "modelState",
                }),
            },
            TAG_HAS_PROPS => Ok(Precondition::HasProps(
                self.has_props.clone().unwrap_or_default(),
            )),
            TAG_LOCK => {
                let lock_id = self.lock_id.clone().ok_or(ScriptError::MissingField {
                    tag: self.tag,
                    field: "lockId",
                })?;
                let unlocked = self.unlocked.ok_or(ScriptError::MissingField {
                    tag: self.tag,
                    field: "unlocked",
                })?;
                Ok(Precondition::Lock { lock_id, unlocked })
            }
            other => Err(ScriptError::UnknownPrecondition(other)),
        }
    }
}

/// A boolean gate checked before a puzzle's success effects may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// The currently selected prop must be this one.
    UseProp(String),
    /// Every listed prop must be possessed. An empty list always holds.
    HasProps(Vec<String>),
    /// The model must currently be in `state`.
    ModelState { model_id: String, state: String },
    /// The lock's unlocked flag must equal `unlocked`.
    Lock { lock_id: String, unlocked: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEffect {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Milliseconds to wait before the next effect.
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub duration: Option<u64>,
    /// Name of a particle node to remove from the scene.
    #[serde(default)]
    pub hide_particle: Option<String>,
    #[serde(default)]
    pub portal: Option<PortalTrigger>,
    #[serde(default)]
    pub clue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureEffect {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Milliseconds to wait before the next effect.
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub duration: Option<u64>,
    /// Localized message key shown to the player.
    #[serde(default)]
    pub tip: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown precondition type {0}")]
    UnknownPrecondition(u8),
    #[error("precondition type {tag} is missing `{field}`")]
    MissingField { tag: u8, field: &'static str },
    #[error("modelState must be [modelId, state], got {0} entries")]
    MalformedModelState(usize),
}

/// Authored delays may carry a fraction of a millisecond; they are rounded.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(ms) if !ms.is_finite() || ms < 0.0 => {
            Err(D::Error::custom(format!("invalid duration {ms}ms")))
        }
        ms => Ok(ms.map(|ms| ms.round() as u64)),
    }
}
