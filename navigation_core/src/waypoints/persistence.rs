//! Durable storage for the waypoint list.
//!
//! The whole list is stored as one JSON array inside a single string entry of
//! a TOML preference file:
//!
//! ```toml
//! [Wayfinder_Waypoints]
//! Waypoints = '[{"x":1.0,"y":0.0,"z":2.0,"name":"Door","locationKey":"A","createdAt":"..."}]'
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use scene_model::{LocationKey, Vec3, Waypoint};
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::PersistenceConfig;
use crate::error::{NavigationError, Result};

/// Name given to loaded waypoints whose saved name is blank.
pub const FALLBACK_WAYPOINT_NAME: &str = "Waypoint";

/// Backing storage for waypoints.
pub trait WaypointStore {
    /// Read the serialized waypoint array. `Ok(None)` means nothing was ever saved.
    fn read_blob(&self) -> Result<Option<String>>;

    /// Replace the serialized waypoint array.
    fn write_blob(&mut self, blob: &str) -> Result<()>;
}

/// One waypoint as it appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointRecord {
    #[serde(default = "origin_coordinate", deserialize_with = "lenient_coordinate")]
    pub x: Option<f32>,
    #[serde(default = "origin_coordinate", deserialize_with = "lenient_coordinate")]
    pub y: Option<f32>,
    #[serde(default = "origin_coordinate", deserialize_with = "lenient_coordinate")]
    pub z: Option<f32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "sceneName")]
    pub location_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl WaypointRecord {
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            x: Some(waypoint.position.x),
            y: Some(waypoint.position.y),
            z: Some(waypoint.position.z),
            name: Some(waypoint.name.clone()),
            location_key: Some(waypoint.location_key.0.clone()),
            created_at: Some(waypoint.created_at),
        }
    }

    /// Build a waypoint, filling blank or missing fields with defaults.
    ///
    /// Returns `None` when a coordinate is present but unreadable, e.g. `null`
    /// or non-finite.
    pub fn into_waypoint(self, now: DateTime<Utc>) -> Option<Waypoint> {
        let position = match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Vec3::new(x, y, z),
            _ => return None,
        };
        if !position.is_finite() {
            return None;
        }
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => FALLBACK_WAYPOINT_NAME.to_string(),
        };
        let created_at = self
            .created_at
            .filter(|ts| ts.timestamp() > 0)
            .unwrap_or(now);

        Some(Waypoint::new(
            position,
            name,
            LocationKey(self.location_key.unwrap_or_default()),
            created_at,
        ))
    }
}

fn origin_coordinate() -> Option<f32> {
    Some(0.0)
}

/// Reads a coordinate, turning `null` or non-numeric values into `None` so a
/// single bad record cannot fail the whole list.
fn lenient_coordinate<'de, D>(deserializer: D) -> std::result::Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_f64).map(|v| v as f32))
}

/// Accepts RFC 3339, or a naive date-time taken as UTC. Anything else reads as missing
/// instead of failing the whole list.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive)))
}

/// Serialize the full waypoint list.
pub fn encode_waypoints(waypoints: &[Waypoint]) -> Result<String> {
    let records: Vec<WaypointRecord> = waypoints.iter().map(WaypointRecord::from_waypoint).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parse a waypoint list. Blank input is an empty list.
pub fn decode_waypoints(blob: &str, now: DateTime<Utc>) -> Result<Vec<Waypoint>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Option<Vec<WaypointRecord>> = serde_json::from_str(blob)?;
    let records = records.unwrap_or_default();
    let total = records.len();
    let waypoints: Vec<Waypoint> = records
        .into_iter()
        .filter_map(|record| record.into_waypoint(now))
        .collect();
    if waypoints.len() < total {
        tracing::warn!(
            skipped = total - waypoints.len(),
            "skipped saved waypoints with unreadable positions"
        );
    }
    Ok(waypoints)
}

/// Stores the waypoint array in a TOML preference file on disk.
///
/// Other tables and keys in the same file are preserved on save.
#[derive(Debug, Clone)]
pub struct PreferenceFileStore {
    path: PathBuf,
    category: String,
    entry: String,
}

impl PreferenceFileStore {
    pub fn new(path: impl AsRef<Path>, category: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            category: category.into(),
            entry: entry.into(),
        }
    }

    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self::new(&config.path, config.category.clone(), config.entry.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(text.parse::<toml::Table>()?)
    }
}

impl WaypointStore for PreferenceFileStore {
    fn read_blob(&self) -> Result<Option<String>> {
        let table = self.read_table()?;
        let Some(section) = table.get(&self.category).and_then(|v| v.as_table()) else {
            return Ok(None);
        };
        match section.get(&self.entry) {
            None => Ok(None),
            Some(toml::Value::String(blob)) => Ok(Some(blob.clone())),
            Some(_) => Err(NavigationError::PreferenceEntryType {
                category: self.category.clone(),
                entry: self.entry.clone(),
            }),
        }
    }

    fn write_blob(&mut self, blob: &str) -> Result<()> {
        // An unreadable file is replaced rather than blocking every future save.
        let mut table = self.read_table().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "overwriting unreadable preference file");
            toml::Table::new()
        });

        if !table.get(&self.category).is_some_and(toml::Value::is_table) {
            table.insert(self.category.clone(), toml::Value::Table(toml::Table::new()));
        }
        if let Some(toml::Value::Table(section)) = table.get_mut(&self.category) {
            section.insert(self.entry.clone(), toml::Value::String(blob.to_string()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(&table)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    blob: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-process store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing serialized array.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::default();
        store.state.borrow_mut().blob = Some(blob.into());
        store
    }

    /// Current serialized array, if any.
    pub fn blob(&self) -> Option<String> {
        self.state.borrow().blob.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    /// Make subsequent writes fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl WaypointStore for MemoryStore {
    fn read_blob(&self) -> Result<Option<String>> {
        Ok(self.state.borrow().blob.clone())
    }

    fn write_blob(&mut self, blob: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(NavigationError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory store rejected write",
            )));
        }
        state.blob = Some(blob.to_string());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, hour, 15, 0).unwrap()
    }

    #[test]
    fn test_save_then_load_preserves_waypoints() {
        let waypoints = vec![
            Waypoint::new(Vec3::new(1.5, 0.0, -2.0), "Door", LocationKey::from("A"), at(8)),
            Waypoint::new(Vec3::new(9.0, 1.0, 4.0), "Bed", LocationKey::from("A|room"), at(9)),
        ];

        let blob = encode_waypoints(&waypoints).unwrap();
        let loaded = decode_waypoints(&blob, at(23)).unwrap();

        assert_eq!(loaded.len(), 2);
        for (original, restored) in waypoints.iter().zip(&loaded) {
            assert_eq!(restored.position, original.position);
            assert_eq!(restored.name, original.name);
            assert_eq!(restored.location_key, original.location_key);
            assert_eq!(restored.created_at, original.created_at);
        }
    }

    #[test]
    fn test_encoded_records_use_camel_case() {
        let waypoint = Waypoint::new(Vec3::ZERO, "Door", LocationKey::from("A"), at(8));
        let blob = encode_waypoints(&[waypoint]).unwrap();
        assert!(blob.contains("\"locationKey\":\"A\""));
        assert!(blob.contains("\"createdAt\":\"2024-03-09T08:15:00Z\""));
    }

    #[test]
    fn test_defaults_applied_on_load() {
        let blob = r#"[
            {"x": 1, "y": 2, "z": 3, "name": "   ", "locationKey": null},
            {"x": 0, "y": 0, "z": 0, "name": " Bar ", "locationKey": "B", "createdAt": "0001-01-01T00:00:00"},
            {"x": 0, "y": 0, "z": 0, "name": "Old", "sceneName": "C", "createdAt": "not a date"}
        ]"#;

        let loaded = decode_waypoints(blob, at(12)).unwrap();

        assert_eq!(loaded[0].name, FALLBACK_WAYPOINT_NAME);
        assert_eq!(loaded[0].location_key, LocationKey::default());
        assert_eq!(loaded[0].created_at, at(12));
        assert_eq!(loaded[0].position, Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(loaded[1].name, "Bar");
        assert_eq!(loaded[1].created_at, at(12));

        assert_eq!(loaded[2].location_key, LocationKey::from("C"));
        assert_eq!(loaded[2].created_at, at(12));
    }

    #[test]
    fn test_unreadable_position_skips_only_that_record() {
        let blob = r#"[
            {"x": 1, "y": 2, "z": 3, "name": "Good", "locationKey": "A"},
            {"x": null, "y": 0, "z": 0, "name": "Bad", "locationKey": "A"},
            {"x": "east", "y": 0, "z": 0, "name": "Worse", "locationKey": "A"},
            {"name": "Origin", "locationKey": "A"}
        ]"#;

        let loaded = decode_waypoints(blob, at(12)).unwrap();

        let names: Vec<_> = loaded.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Origin"]);
        assert_eq!(loaded[1].position, Vec3::ZERO);
    }

    #[test]
    fn test_non_finite_position_does_not_poison_saved_list() {
        let waypoints = vec![
            Waypoint::new(Vec3::new(1.0, 2.0, 3.0), "Good", LocationKey::from("A"), at(8)),
            Waypoint::new(Vec3::new(f32::INFINITY, 0.0, 0.0), "Bad", LocationKey::from("A"), at(9)),
        ];

        let blob = encode_waypoints(&waypoints).unwrap();
        let loaded = decode_waypoints(&blob, at(23)).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Good");
    }

    #[test]
    fn test_naive_timestamp_read_as_utc() {
        let blob = r#"[{"name": "A", "locationKey": "K", "createdAt": "2023-11-02T10:20:30.5"}]"#;
        let loaded = decode_waypoints(blob, at(12)).unwrap();
        assert_eq!(
            loaded[0].created_at,
            Utc.with_ymd_and_hms(2023, 11, 2, 10, 20, 30).unwrap() + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn test_blank_and_null_blobs_are_empty() {
        assert!(decode_waypoints("", at(1)).unwrap().is_empty());
        assert!(decode_waypoints("  ", at(1)).unwrap().is_empty());
        assert!(decode_waypoints("null", at(1)).unwrap().is_empty());
        assert!(decode_waypoints("[]", at(1)).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_blob_is_error() {
        assert!(decode_waypoints("{not json", at(1)).is_err());
        assert!(decode_waypoints("{\"x\": 1}", at(1)).is_err());
    }

    #[test]
    fn test_preference_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UserData").join("waypoints.cfg");
        let mut store = PreferenceFileStore::new(&path, "Wayfinder_Waypoints", "Waypoints");

        assert_eq!(store.read_blob().unwrap(), None);

        store.write_blob("[{\"name\":\"A\"}]").unwrap();

        assert_eq!(store.read_blob().unwrap().as_deref(), Some("[{\"name\":\"A\"}]"));
    }

    #[test]
    fn test_preference_file_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.cfg");
        std::fs::write(&path, "[Speech]\nInterrupt = true\n").unwrap();

        let mut store = PreferenceFileStore::new(&path, "Wayfinder_Waypoints", "Waypoints");
        store.write_blob("[]").unwrap();

        let table: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["Speech"]["Interrupt"].as_bool(), Some(true));
        assert_eq!(table["Wayfinder_Waypoints"]["Waypoints"].as_str(), Some("[]"));
    }

    #[test]
    fn test_preference_file_rejects_non_string_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.cfg");
        std::fs::write(&path, "[Wayfinder_Waypoints]\nWaypoints = 3\n").unwrap();

        let store = PreferenceFileStore::new(&path, "Wayfinder_Waypoints", "Waypoints");
        assert!(matches!(
            store.read_blob(),
            Err(NavigationError::PreferenceEntryType { .. })
        ));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        let mut handle = store.clone();

        handle.write_blob("[]").unwrap();
        store.set_fail_writes(true);
        assert!(handle.write_blob("[1]").is_err());

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.blob().as_deref(), Some("[]"));
    }
}
