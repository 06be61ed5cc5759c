use serde::{Deserialize, Serialize};

use crate::ModelResult;

/// Tunables for a [`Model`](crate::Model)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    /// Text inserted before a block that needs parenthesizing
    pub open_paren: String,

    /// Text inserted after a block that needs parenthesizing
    pub close_paren: String,

    /// Re-validate the touched token list after every structural mutation
    pub verify_mutations: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            open_paren: "(".to_string(),
            close_paren: ")".to_string(),
            verify_mutations: cfg!(debug_assertions),
        }
    }
}

impl ModelConfig {
    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json(source: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}
