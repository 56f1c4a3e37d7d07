//! Runtime configuration, read from a TOML file.
//!
//! Every field has a default, so an empty or partial file is valid:
//!
//! ```toml
//! [persistence]
//! path = "UserData/Wayfinder_Waypoints.cfg"
//!
//! [naming]
//! max_name_length = 48
//!
//! [location]
//! keywords = ["room", "shop", "bar"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NavigationError, Result};

/// Top-level configuration for the navigation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NavigationConfig {
    pub persistence: PersistenceConfig,
    pub naming: NamingConfig,
    pub location: LocationConfig,
    pub announcements: AnnouncementConfig,
}

/// Where waypoints are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Preference file holding the waypoint entry.
    pub path: PathBuf,
    /// Table inside the preference file.
    pub category: String,
    /// Key inside the table whose value is the JSON waypoint array.
    pub entry: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("UserData/Wayfinder_Waypoints.cfg"),
            category: "Wayfinder_Waypoints".to_string(),
            entry: "Waypoints".to_string(),
        }
    }
}

/// Waypoint naming limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Characters typed beyond this many are dropped.
    pub max_name_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_name_length: 64,
        }
    }
}

/// Word lists driving location-key derivation.
///
/// Names are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// How many ancestors above the player are inspected.
    pub max_depth: usize,
    /// Key used when the scene cannot be determined at all.
    pub sentinel_key: String,
    /// Ancestor names that never describe a place.
    pub generic_names: Vec<String>,
    /// Ancestor name prefixes that never describe a place.
    pub generic_prefixes: Vec<String>,
    /// Substrings marking an ancestor as a place.
    pub keywords: Vec<String>,
    /// Suffixes marking an ancestor as a place.
    pub suffixes: Vec<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            sentinel_key: "UnknownScene".to_string(),
            generic_names: to_strings(&[
                "root",
                "game",
                "scene",
                "characters",
                "character",
                "player",
                "harry",
                "armature",
                "skeleton",
                "hips",
            ]),
            generic_prefixes: to_strings(&["char_", "animation"]),
            keywords: to_strings(&[
                "interior",
                "exterior",
                "room",
                "shop",
                "store",
                "book",
                "whirling",
                "church",
                "kitchen",
                "office",
                "station",
                "dock",
                "apartment",
                "basement",
                "yard",
                "hall",
                "gallery",
            ]),
            suffixes: to_strings(&["_int", "_ext"]),
        }
    }
}

/// Longest accepted deferred announcement delay: one hour.
pub const MAX_DEFERRED_DELAY_MS: u64 = 3_600_000;

/// Timing of spoken output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementConfig {
    /// Default delay for deferred announcements, in milliseconds.
    pub deferred_delay_ms: u64,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            deferred_delay_ms: 100,
        }
    }
}

impl NavigationConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: NavigationConfig =
            toml::from_str(text).map_err(|e| NavigationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded navigation config");
        Ok(config)
    }

    /// Reject settings the core cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.persistence.category.trim().is_empty() || self.persistence.entry.trim().is_empty()
        {
            return Err(NavigationError::Config(
                "persistence category and entry must not be empty".to_string(),
            ));
        }
        if self.naming.max_name_length == 0 {
            return Err(NavigationError::Config(
                "naming.max_name_length must be at least 1".to_string(),
            ));
        }
        if self.location.sentinel_key.is_empty() {
            return Err(NavigationError::Config(
                "location.sentinel_key must not be empty".to_string(),
            ));
        }
        if self.announcements.deferred_delay_ms > MAX_DEFERRED_DELAY_MS {
            return Err(NavigationError::Config(format!(
                "announcements.deferred_delay_ms must be at most {MAX_DEFERRED_DELAY_MS}"
            )));
        }
        Ok(())
    }

    /// Default delay for deferred announcements.
    pub fn deferred_delay(&self) -> chrono::Duration {
        let ms = self.announcements.deferred_delay_ms.min(MAX_DEFERRED_DELAY_MS);
        chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
