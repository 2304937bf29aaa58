//! Static reference resources served to the calling agent.

use serde::Serialize;
use std::path::Path;

use crate::config::SchemaConfig;
use crate::error::{MenuError, Result};

/// URI of the schema resource.
pub const SCHEMA_URI: &str = "schema://menu";

const BUILTIN_SCHEMA: &str = include_str!("../assets/menu_schema.md");

/// The schema document describing the menu table.
///
/// The text is served exactly as loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaResource {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(skip)]
    pub text: String,
}

impl SchemaResource {
    /// Loads the configured schema document, or the built-in one when none is set.
    pub fn load(config: &SchemaConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Returns the built-in schema document.
    pub fn builtin() -> Self {
        Self::with_text(BUILTIN_SCHEMA.to_string())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MenuError::config(format!(
                "Failed to read schema document {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::with_text(text))
    }

    fn with_text(text: String) -> Self {
        Self {
            uri: SCHEMA_URI.to_string(),
            name: "menu_schema".to_string(),
            description: "Tables, columns and query guidance for the menu database".to_string(),
            mime_type: "text/markdown".to_string(),
            text,
        }
    }
}
