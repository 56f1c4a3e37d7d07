//! Saved waypoints.

use chrono::{DateTime, Utc};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::location::LocationKey;

/// Identity of a waypoint within one run.
///
/// Waypoints have no persisted identifier; a fresh ID is minted whenever a
/// waypoint is created or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub Uuid);

impl WaypointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named position the player saved in a particular place.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Vec3,
    pub name: String,
    pub location_key: LocationKey,
    pub created_at: DateTime<Utc>,
}

impl Waypoint {
    /// Create a waypoint stamped with the given creation time.
    pub fn new(
        position: Vec3,
        name: impl Into<String>,
        location_key: LocationKey,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: WaypointId::new(),
            position,
            name: name.into(),
            location_key,
            created_at,
        }
    }

    /// Replace the name. Blank names are ignored; the new name is trimmed.
    ///
    /// Returns whether the name changed.
    pub fn rename(&mut self, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.name = trimmed.to_string();
        true
    }

    /// Whether this waypoint belongs to `key`.
    pub fn is_in(&self, key: &LocationKey) -> bool {
        self.location_key == *key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Waypoint {
        Waypoint::new(
            Vec3::new(3.0, 0.0, -4.0),
            "Stairs",
            LocationKey::from("Martinaise"),
            Utc::now(),
        )
    }

    #[test]
    fn test_rename_trims() {
        let mut waypoint = sample();
        assert!(waypoint.rename("  Back door "));
        assert_eq!(waypoint.name, "Back door");
    }

    #[test]
    fn test_rename_ignores_blank() {
        let mut waypoint = sample();
        assert!(!waypoint.rename("   "));
        assert_eq!(waypoint.name, "Stairs");
    }

    #[test]
    fn test_waypoints_have_distinct_ids() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id, b.id);
        assert!(a.is_in(&LocationKey::from("Martinaise")));
        assert!(!a.is_in(&LocationKey::from("Elsewhere")));
    }
}
