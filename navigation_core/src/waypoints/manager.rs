//! In-memory waypoint collection with one selection cursor per location.

use scene_model::{LocationKey, Vec3, Waypoint, WaypointId};
use std::collections::HashMap;

use super::persistence::{decode_waypoints, encode_waypoints, WaypointStore};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// The selected waypoint of a location and where it sits in that location's list.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointSelection {
    pub waypoint: Waypoint,
    /// Zero-based position in creation order.
    pub index: usize,
    pub total: usize,
}

/// Owns every saved waypoint and the per-location cursors.
///
/// Within a location, waypoints are ordered by creation time; cursor values
/// index into that ordering, not into the backing list. Every mutation is
/// written through to the store immediately.
pub struct WaypointManager {
    store: Box<dyn WaypointStore>,
    clock: Box<dyn Clock>,
    waypoints: Vec<Waypoint>,
    cursors: HashMap<LocationKey, usize>,
}

impl WaypointManager {
    /// Load waypoints from `store`, stamping new ones with wall-clock time.
    pub fn new(store: impl WaypointStore + 'static) -> Self {
        Self::with_clock(store, SystemClock)
    }

    /// Load waypoints from `store` using `clock` for timestamps.
    ///
    /// Unreadable or malformed data is logged and treated as an empty list.
    pub fn with_clock(store: impl WaypointStore + 'static, clock: impl Clock + 'static) -> Self {
        let waypoints = match Self::load(&store, clock.now()) {
            Ok(waypoints) => waypoints,
            Err(e) => {
                tracing::error!(error = %e, "failed to load saved waypoints, starting empty");
                Vec::new()
            }
        };
        if !waypoints.is_empty() {
            tracing::info!(count = waypoints.len(), "loaded saved waypoints");
        }

        Self {
            store: Box::new(store),
            clock: Box::new(clock),
            waypoints,
            cursors: HashMap::new(),
        }
    }

    fn load(store: &dyn WaypointStore, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<Waypoint>> {
        match store.read_blob()? {
            Some(blob) => decode_waypoints(&blob, now),
            None => Ok(Vec::new()),
        }
    }

    /// Every waypoint, in the order they were added or loaded.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn has_any_waypoints(&self) -> bool {
        !self.waypoints.is_empty()
    }

    /// Waypoints of one location, oldest first.
    pub fn waypoints_in_location(&self, key: &LocationKey) -> Vec<&Waypoint> {
        let mut ordered: Vec<&Waypoint> = self.waypoints.iter().filter(|w| w.is_in(key)).collect();
        ordered.sort_by_key(|w| w.created_at);
        ordered
    }

    pub fn has_waypoints_in_location(&self, key: &LocationKey) -> bool {
        self.waypoints.iter().any(|w| w.is_in(key))
    }

    /// Suggested name for the next waypoint in `key`, e.g. `"Waypoint 3"`.
    pub fn default_name(&self, key: &LocationKey) -> String {
        let existing = self.waypoints.iter().filter(|w| w.is_in(key)).count();
        format!("Waypoint {}", existing + 1)
    }

    /// Raw stored cursor for `key`, without normalizing it.
    pub fn cursor(&self, key: &LocationKey) -> Option<usize> {
        self.cursors.get(key).copied()
    }

    /// Save a new waypoint and select it.
    pub fn add_waypoint(&mut self, position: Vec3, name: impl Into<String>, key: LocationKey) -> Waypoint {
        let waypoint = Waypoint::new(position, name, key.clone(), self.clock.now());
        let id = waypoint.id;
        self.waypoints.push(waypoint.clone());

        if let Some(index) = self.ordered_ids(&key).iter().position(|w| *w == id) {
            self.cursors.insert(key.clone(), index);
        }

        tracing::info!(name = %waypoint.name, location = %key, "added waypoint");
        self.persist();
        waypoint
    }

    /// Delete `waypoint` and repair the cursor of `key`.
    ///
    /// The cursor stays on the slot the removed waypoint occupied, clamped to
    /// the shorter list, and disappears when the location becomes empty.
    /// Returns false, without writing anything, if the waypoint is unknown.
    pub fn remove_waypoint(&mut self, key: &LocationKey, waypoint: &Waypoint) -> bool {
        let Some(backing_index) = self.waypoints.iter().position(|w| w.id == waypoint.id) else {
            return false;
        };

        let removed_slot = self.ordered_ids(key).iter().position(|id| *id == waypoint.id);
        let previous_cursor = self.cursors.get(key).copied();

        let removed = self.waypoints.remove(backing_index);

        let remaining = self.ordered_ids(key).len();
        if remaining == 0 {
            self.cursors.remove(key);
        } else {
            let slot = removed_slot.or(previous_cursor).unwrap_or(0);
            self.cursors.insert(key.clone(), slot.min(remaining - 1));
        }
        if removed.location_key != *key {
            self.ensure_selection(&removed.location_key);
        }

        tracing::info!(name = %removed.name, location = %removed.location_key, "removed waypoint");
        self.persist();
        true
    }

    /// Rename a waypoint. Blank names are rejected.
    pub fn rename_waypoint(&mut self, id: WaypointId, new_name: &str) -> bool {
        let Some(waypoint) = self.waypoints.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        if !waypoint.rename(new_name) {
            return false;
        }
        tracing::info!(name = %waypoint.name, "renamed waypoint");
        self.persist();
        true
    }

    /// Advance the cursor of `key`, wrapping to the first waypoint.
    pub fn select_next(&mut self, key: &LocationKey) {
        let total = self.ordered_ids(key).len();
        if total == 0 {
            return;
        }
        let index = self.normalized_cursor(key, total);
        self.cursors.insert(key.clone(), (index + 1) % total);
    }

    /// Move the cursor of `key` back, wrapping to the last waypoint.
    pub fn select_previous(&mut self, key: &LocationKey) {
        let total = self.ordered_ids(key).len();
        if total == 0 {
            return;
        }
        let index = self.normalized_cursor(key, total);
        self.cursors.insert(key.clone(), (index + total - 1) % total);
    }

    /// Clamp the cursor of `key` into range, or drop it if the location is empty.
    pub fn ensure_selection(&mut self, key: &LocationKey) {
        let total = self.ordered_ids(key).len();
        if total == 0 {
            self.cursors.remove(key);
            return;
        }
        let index = self.normalized_cursor(key, total);
        self.cursors.insert(key.clone(), index);
    }

    /// The selected waypoint of `key`, or `None` if the location has no waypoints.
    pub fn try_selection(&mut self, key: &LocationKey) -> Option<WaypointSelection> {
        self.ensure_selection(key);
        let index = *self.cursors.get(key)?;
        let ordered = self.waypoints_in_location(key);
        let total = ordered.len();
        let waypoint = (*ordered.get(index)?).clone();
        Some(WaypointSelection {
            waypoint,
            index,
            total,
        })
    }

    /// Write the full list to the store, reporting failure to the caller.
    pub fn save_all(&mut self) -> Result<()> {
        let blob = encode_waypoints(&self.waypoints)?;
        self.store.write_blob(&blob)
    }

    /// Write-through after a mutation. Failures leave memory authoritative
    /// until the next successful save.
    fn persist(&mut self) {
        match self.save_all() {
            Ok(()) => tracing::debug!(count = self.waypoints.len(), "saved waypoints"),
            Err(e) => tracing::error!(error = %e, "failed to save waypoints"),
        }
    }

    fn ordered_ids(&self, key: &LocationKey) -> Vec<WaypointId> {
        self.waypoints_in_location(key).into_iter().map(|w| w.id).collect()
    }

    fn normalized_cursor(&self, key: &LocationKey, total: usize) -> usize {
        self.cursors
            .get(key)
            .copied()
            .unwrap_or(0)
            .min(total.saturating_sub(1))
    }
}

impl std::fmt::Debug for WaypointManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointManager")
            .field("waypoints", &self.waypoints)
            .field("cursors", &self.cursors)
            .finish_non_exhaustive()
    }
}
