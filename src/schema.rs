//! Versioned JSON persistence for action lists.

use crate::action::Action;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Newest document version this crate reads and the one it writes.
pub const SCHEMA_VERSION: u32 = 1;

fn default_version() -> u32 {
    1
}

/// An action list as stored on disk.
///
/// Documents written before versioning have no `version` key and read as version 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub actions: Vec<Action>,
}

impl ActionDocument {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            actions,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)?;
        if document.version > SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found: document.version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(document)
    }
}

/// Serializes `actions` as a current-version document.
pub fn to_json(actions: &[Action]) -> Result<String> {
    ActionDocument::new(actions.to_vec()).to_json()
}

/// Reads the actions of a document of this or an older version.
pub fn from_json(text: &str) -> Result<Vec<Action>> {
    Ok(ActionDocument::from_json(text)?.actions)
}
