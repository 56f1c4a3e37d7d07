//! Deriving the location key that scopes waypoints.
//!
//! One scene file can hold several rooms, so the scene path alone is too
//! coarse. The player's ancestors in the scene hierarchy usually include a
//! container named after the room they are in; the first such name found is
//! appended as a hint: `"Scenes/Martinaise.unity|Whirling_int"`.

use scene_model::{LocationKey, SceneSnapshot};

use crate::config::LocationConfig;

/// Turns scene snapshots into location keys using configurable word lists.
#[derive(Debug, Clone)]
pub struct LocationKeyResolver {
    max_depth: usize,
    sentinel: String,
    generic_names: Vec<String>,
    generic_prefixes: Vec<String>,
    keywords: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for LocationKeyResolver {
    fn default() -> Self {
        Self::new(&LocationConfig::default())
    }
}

impl LocationKeyResolver {
    pub fn new(config: &LocationConfig) -> Self {
        let lower = |words: &[String]| words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>();
        Self {
            max_depth: config.max_depth,
            sentinel: config.sentinel_key.clone(),
            generic_names: lower(&config.generic_names),
            generic_prefixes: lower(&config.generic_prefixes),
            keywords: lower(&config.keywords),
            suffixes: lower(&config.suffixes),
        }
    }

    /// The key for wherever `scene` says the player is.
    pub fn resolve(&self, scene: Option<&SceneSnapshot>) -> LocationKey {
        let Some(scene) = scene else {
            return LocationKey::new(self.sentinel.clone());
        };

        let base = scene.base_key();
        let hint = self.location_hint(&scene.player_ancestors);

        match (base, hint) {
            (Some(base), Some(hint)) => LocationKey::with_hint(base, &hint),
            (None, Some(hint)) => LocationKey::new(hint),
            (Some(base), None) => LocationKey::from(base),
            (None, None) => LocationKey::new(self.sentinel.clone()),
        }
    }

    /// The most room-like ancestor name, nearest first.
    ///
    /// Ancestors matching a location keyword win; otherwise the first
    /// non-generic ancestor is used.
    pub fn location_hint(&self, ancestors: &[String]) -> Option<String> {
        let mut fallback: Option<&str> = None;

        for name in ancestors.iter().take(self.max_depth) {
            if name.trim().is_empty() || self.is_generic(name) {
                continue;
            }
            if self.is_location_name(name) {
                return Some(name.clone());
            }
            fallback.get_or_insert(name.as_str());
        }

        fallback.map(str::to_string)
    }

    /// Hierarchy names that say nothing about the place (rigs, roots, the player).
    pub fn is_generic(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.generic_names.iter().any(|g| *g == lower)
            || self.generic_prefixes.iter().any(|p| lower.starts_with(p.as_str()))
    }

    /// Hierarchy names that look like a room or area.
    pub fn is_location_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
            || self.suffixes.iter().any(|s| lower.ends_with(s.as_str()))
    }
}
