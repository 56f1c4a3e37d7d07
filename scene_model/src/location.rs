//! Location keys and the scene information they are derived from.

use serde::{Deserialize, Serialize};

/// Opaque key scoping a set of waypoints and one selection cursor.
///
/// Typically a scene path, optionally followed by `|` and a sub-location hint,
/// e.g. `"scene/path|Whirling_int"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LocationKey(pub String);

impl LocationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Combine a scene path with a sub-location hint.
    pub fn with_hint(base: &str, hint: &str) -> Self {
        Self(format!("{base}|{hint}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for LocationKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LocationKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the world can tell us about where the player currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Stable path of the active scene, if known.
    pub scene_path: Option<String>,
    /// Scene name, used when the path is unavailable.
    pub scene_name: Option<String>,
    /// Names of the player's ancestors in the scene hierarchy, nearest parent first.
    #[serde(default)]
    pub player_ancestors: Vec<String>,
}

impl SceneSnapshot {
    pub fn new(scene_path: impl Into<String>) -> Self {
        Self {
            scene_path: Some(scene_path.into()),
            ..Default::default()
        }
    }

    /// Add the player's ancestor names, nearest parent first.
    pub fn with_ancestors<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    /// The scene path if present, otherwise the scene name. Blank values are skipped.
    pub fn base_key(&self) -> Option<&str> {
        [self.scene_path.as_deref(), self.scene_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_with_hint() {
        let key = LocationKey::with_hint("Scenes/Martinaise", "Whirling_int");
        assert_eq!(key.as_str(), "Scenes/Martinaise|Whirling_int");
    }

    #[test]
    fn test_base_key_prefers_path() {
        let snapshot = SceneSnapshot {
            scene_path: Some("Scenes/Martinaise.unity".into()),
            scene_name: Some("Martinaise".into()),
            player_ancestors: vec![],
        };
        assert_eq!(snapshot.base_key(), Some("Scenes/Martinaise.unity"));
    }

    #[test]
    fn test_base_key_falls_back_to_name() {
        let snapshot = SceneSnapshot {
            scene_path: Some("  ".into()),
            scene_name: Some("Martinaise".into()),
            player_ancestors: vec![],
        };
        assert_eq!(snapshot.base_key(), Some("Martinaise"));
        assert_eq!(SceneSnapshot::default().base_key(), None);
    }
}
