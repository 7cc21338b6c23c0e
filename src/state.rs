//! Narrative game state
//!
//! Everything that goes into a save slot lives here. The field set is fixed;
//! mutation goes through [`Variable`], one typed variant per field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::START_PASSAGE;
use crate::error::VariableError;

/// Complete narrative state (serialized as-is into save slots)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GameState {
    /// Relationship metric, unbounded
    pub trust: i64,
    /// Relationship metric, unbounded
    pub romance: i64,
    /// Relationship metric, unbounded
    pub suspicion: i64,
    /// Narrative node the player is on
    pub current_passage: String,
    /// Unlocked gallery entries in unlock order
    pub unlocked_gallery: Vec<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            trust: 50,
            romance: 0,
            suspicion: 10,
            current_passage: START_PASSAGE.to_string(),
            unlocked_gallery: Vec::new(),
        }
    }
}

impl GameState {
    /// Overwrite one field
    pub fn apply(&mut self, variable: Variable) {
        match variable {
            Variable::Trust(v) => self.trust = v,
            Variable::Romance(v) => self.romance = v,
            Variable::Suspicion(v) => self.suspicion = v,
            Variable::CurrentPassage(v) => self.current_passage = v,
            Variable::UnlockedGallery(v) => self.unlocked_gallery = v,
        }
    }

    /// Read one field as a tagged value
    pub fn get(&self, name: VariableName) -> Variable {
        match name {
            VariableName::Trust => Variable::Trust(self.trust),
            VariableName::Romance => Variable::Romance(self.romance),
            VariableName::Suspicion => Variable::Suspicion(self.suspicion),
            VariableName::CurrentPassage => Variable::CurrentPassage(self.current_passage.clone()),
            VariableName::UnlockedGallery => {
                Variable::UnlockedGallery(self.unlocked_gallery.clone())
            }
        }
    }

    /// Append a gallery entry unless it is already unlocked.
    /// Returns true if the entry was new.
    pub fn unlock_gallery(&mut self, id: &str) -> bool {
        if self.unlocked_gallery.iter().any(|e| e == id) {
            return false;
        }
        self.unlocked_gallery.push(id.to_string());
        true
    }
}

/// Names of the known game state variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableName {
    Trust,
    Romance,
    Suspicion,
    CurrentPassage,
    UnlockedGallery,
}

impl VariableName {
    pub const ALL: [VariableName; 5] = [
        VariableName::Trust,
        VariableName::Romance,
        VariableName::Suspicion,
        VariableName::CurrentPassage,
        VariableName::UnlockedGallery,
    ];

    /// Name as stored in snapshots and used by page scripts
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableName::Trust => "trust",
            VariableName::Romance => "romance",
            VariableName::Suspicion => "suspicion",
            VariableName::CurrentPassage => "currentPassage",
            VariableName::UnlockedGallery => "unlockedGallery",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.as_str() == s)
    }

    fn expected(&self) -> &'static str {
        match self {
            VariableName::Trust | VariableName::Romance | VariableName::Suspicion => "an integer",
            VariableName::CurrentPassage => "a string",
            VariableName::UnlockedGallery => "an array of strings",
        }
    }
}

/// A typed value for one known variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    Trust(i64),
    Romance(i64),
    Suspicion(i64),
    CurrentPassage(String),
    UnlockedGallery(Vec<String>),
}

impl Variable {
    pub fn name(&self) -> VariableName {
        match self {
            Variable::Trust(_) => VariableName::Trust,
            Variable::Romance(_) => VariableName::Romance,
            Variable::Suspicion(_) => VariableName::Suspicion,
            Variable::CurrentPassage(_) => VariableName::CurrentPassage,
            Variable::UnlockedGallery(_) => VariableName::UnlockedGallery,
        }
    }

    /// Build a typed variable from a name and an untyped JSON value
    pub fn from_json(name: &str, value: Value) -> Result<Self, VariableError> {
        let name = VariableName::from_name(name)
            .ok_or_else(|| VariableError::Unknown(name.to_string()))?;
        let mismatch = || VariableError::TypeMismatch {
            name: name.as_str(),
            expected: name.expected(),
        };

        let variable = match name {
            VariableName::Trust => Variable::Trust(value.as_i64().ok_or_else(mismatch)?),
            VariableName::Romance => Variable::Romance(value.as_i64().ok_or_else(mismatch)?),
            VariableName::Suspicion => Variable::Suspicion(value.as_i64().ok_or_else(mismatch)?),
            VariableName::CurrentPassage => match value {
                Value::String(s) => Variable::CurrentPassage(s),
                _ => return Err(mismatch()),
            },
            VariableName::UnlockedGallery => {
                Variable::UnlockedGallery(serde_json::from_value(value).map_err(|_| mismatch())?)
            }
        };
        Ok(variable)
    }

    /// Build a typed variable from JSON text; `None` means the value had
    /// no JSON form at all
    pub fn from_json_text(name: &str, json: Option<&str>) -> Result<Self, VariableError> {
        let parsed = json.and_then(|text| serde_json::from_str::<Value>(text).ok());
        match parsed {
            Some(value) => Self::from_json(name, value),
            None => {
                let name = VariableName::from_name(name)
                    .ok_or_else(|| VariableError::Unknown(name.to_string()))?;
                Err(VariableError::TypeMismatch {
                    name: name.as_str(),
                    expected: name.expected(),
                })
            }
        }
    }

    /// Untyped JSON form, for page scripts
    pub fn to_json(&self) -> Value {
        match self {
            Variable::Trust(v) | Variable::Romance(v) | Variable::Suspicion(v) => Value::from(*v),
            Variable::CurrentPassage(s) => Value::from(s.as_str()),
            Variable::UnlockedGallery(ids) => Value::from(ids.clone()),
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name().as_str(), self.to_json())
    }
}
