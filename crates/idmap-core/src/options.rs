//! Configuration options for idmap.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::ID_SPACE;
use crate::error::{IdMapError, Result};

/// Name of the id buffer when none is configured.
pub const DEFAULT_BUFFER_NAME: &str = "_IdMapTexture";

/// Configuration options for an id map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdMapOptions {
    /// Name of the id buffer the renderer draws into.
    pub buffer_name: String,

    /// Whether registration covers the object's descendants by default.
    pub include_children: bool,

    /// First id handed out by the allocator (id 0 is the background).
    pub first_id: u32,

    /// Whether to flip the sampled row (buffer origin opposite to input origin).
    pub flip_y: bool,
}

impl Default for IdMapOptions {
    fn default() -> Self {
        Self {
            buffer_name: DEFAULT_BUFFER_NAME.to_string(),
            include_children: true,
            first_id: 1,
            flip_y: false,
        }
    }
}

impl IdMapOptions {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.first_id == 0 || self.first_id >= ID_SPACE {
            return Err(IdMapError::InvalidOption(format!(
                "first_id must be in 1..{ID_SPACE}, got {}",
                self.first_id
            )));
        }
        if self.buffer_name.is_empty() {
            return Err(IdMapError::InvalidOption(
                "buffer_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
