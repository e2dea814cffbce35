//! Generator configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming and formatting of generated modules.
///
/// Missing keys in a TOML file fall back to [`GeneratorConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the program module. Also the file stem of the written `.mod` file.
    pub module_name: String,
    /// Name of the procedure holding the instructions.
    pub procedure_name: String,
    /// Name of the system module with tool and work object data.
    pub base_module_name: String,
    /// Decimal places for lengths and angles.
    pub decimals: usize,
    /// Comment written below the module header.
    pub provenance: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_name: "MainModule".to_string(),
            procedure_name: "main".to_string(),
            base_module_name: "BASE".to_string(),
            decimals: 3,
            provenance: format!(
                "This RAPID code was generated with {} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
