//! Text spoken back to the player.

use scene_model::{cardinal_direction, distance, Candidate, CandidateId, Category, SortingMode, Vec3};

use crate::selection::NavigationInfo;
use crate::waypoints::WaypointSelection;

pub const NAMING_IN_PROGRESS: &str =
    "Finish naming your waypoint first. Press Enter to save or Escape to cancel.";
pub const ALREADY_NAMING: &str =
    "Already naming a waypoint. Press Enter to confirm or Escape to cancel.";
pub const NO_OBJECTS_AVAILABLE: &str = "No objects available for selection.";
pub const NO_OBJECTS_IN_SCENE: &str = "No objects found in scene.";
pub const NO_PLAYER_POSITION: &str = "Could not find player position.";
pub const NO_WAYPOINT_POSITION: &str = "Could not capture player position for waypoint.";
pub const NO_WAYPOINTS_YET: &str =
    "No waypoints saved yet. Press Alt plus Left Bracket to create one.";
pub const NO_WAYPOINTS_HERE: &str =
    "No waypoints saved for this area. Press Alt plus Left Bracket to create one here.";
pub const FOCUS_WAYPOINTS_FIRST: &str =
    "Focus waypoints first with Ctrl plus Left Bracket, then press Alt plus Right Bracket to delete.";
pub const NO_OBJECTS_IN_CATEGORY: &str = "No objects in current category. Press [ for NPCs, ] for locations, \\ for containers, = for everything, or Ctrl plus [ for waypoints.";
pub const NO_OBJECT_SELECTED: &str =
    "No object selected. Select a category first, then use period to cycle.";
pub const SORTING_NOT_FOR_WAYPOINTS: &str = "Sorting only applies to object categories. Press [ to switch back to NPCs or Ctrl plus [ for waypoints.";
pub const WAYPOINT_CREATION_CANCELLED: &str = "Waypoint creation cancelled.";
pub const DELETE_FAILED: &str = "Could not delete waypoint.";
pub const NOTHING_TO_REPEAT: &str = "Nothing to repeat.";

const WAYPOINT_CONTROLS: &str = "Press period to cycle, comma to navigate, Alt plus Right Bracket to delete.";

/// What was last said and selected, kept for repeats and change detection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementContext {
    pub last_announced: Option<String>,
    pub last_selected: Option<CandidateId>,
}

impl AnnouncementContext {
    pub fn record_announcement(&mut self, text: &str) {
        self.last_announced = Some(text.to_string());
    }

    pub fn record_selection(&mut self, id: Option<CandidateId>) {
        self.last_selected = id;
    }
}

/// Advisory for a location without waypoints.
pub fn no_waypoints(has_any_elsewhere: bool) -> &'static str {
    if has_any_elsewhere {
        NO_WAYPOINTS_HERE
    } else {
        NO_WAYPOINTS_YET
    }
}

pub fn naming_prompt(default_name: &str) -> String {
    format!(
        "Creating waypoint. Type a name, then press Enter to save. Press Escape to cancel. Default is {default_name}."
    )
}

pub fn waypoint_saved(name: &str) -> String {
    format!("Waypoint {name} saved.")
}

pub fn waypoint_deleted(name: &str) -> String {
    format!("Deleted waypoint {name}.")
}

pub fn waypoint_deleted_last(name: &str) -> String {
    format!("Deleted waypoint {name}. No waypoints saved for this area.")
}

/// `"Waypoints: Saved. Pier 12 meters east, 2 of 3. Press period ..."`.
///
/// Distance and direction are left out when the player position is unknown.
pub fn waypoint_selection(
    selection: &WaypointSelection,
    player_position: Option<Vec3>,
    include_intro: bool,
    prefix: Option<&str>,
) -> String {
    let waypoint = &selection.waypoint;
    let place = match player_position {
        Some(player) => format!(
            "{} {:.0} meters {}",
            waypoint.name,
            distance(player, waypoint.position),
            cardinal_direction(player, waypoint.position)
        ),
        None => waypoint.name.clone(),
    };

    let mut text = format!(
        "{place}, {} of {}. {WAYPOINT_CONTROLS}",
        selection.index + 1,
        selection.total
    );
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        text = format!("{prefix} {text}");
    }
    if include_intro {
        text = format!("Waypoints: {text}");
    }
    text
}

/// Summary after selecting a category.
pub fn category_summary(category: Category, current: Option<&NavigationInfo>) -> String {
    match current {
        Some(info) => format!("{category}: {}", info.format_announcement()),
        None => format!("{category}: no objects in this category."),
    }
}

/// Object announcement when the player position is unknown.
pub fn object_without_position(name: &str, index: usize, total: usize) -> String {
    format!("{name}, {} of {total}", index + 1)
}

pub fn calculating_path(label: &str) -> String {
    format!("Calculating path to {label}...")
}

pub fn sorting_changed(mode: SortingMode) -> String {
    format!("Sorting mode changed to {}", mode.label())
}

/// Spoken form of a failure caught at the command boundary.
pub fn command_failed(action: &str, error: &dyn std::fmt::Display) -> String {
    format!("{action} failed: {error}")
}

/// A distance band of the scene scan.
struct ScanBand {
    label: &'static str,
    max_distance: f32,
    listed: usize,
}

const SCAN_BANDS: [ScanBand; 4] = [
    ScanBand {
        label: "Right here",
        max_distance: 5.0,
        listed: 5,
    },
    ScanBand {
        label: "Nearby",
        max_distance: 15.0,
        listed: 8,
    },
    ScanBand {
        label: "Short walk",
        max_distance: 30.0,
        listed: 5,
    },
    ScanBand {
        label: "Medium distance",
        max_distance: 50.0,
        listed: 3,
    },
];

/// Group every candidate into distance bands and describe the scene.
pub fn scan_report(player_position: Vec3, candidates: &[Candidate]) -> String {
    let mut bands: Vec<Vec<String>> = vec![Vec::new(); SCAN_BANDS.len()];
    let mut distant = 0usize;

    for candidate in candidates {
        let d = distance(player_position, candidate.position);
        match SCAN_BANDS.iter().position(|band| d <= band.max_distance) {
            Some(slot) => bands[slot].push(format!("{} ({:.0}m)", candidate.name, d)),
            None => distant += 1,
        }
    }

    let mut report = format!("Scene scan: {} objects found.", candidates.len());
    for (band, names) in SCAN_BANDS.iter().zip(&bands) {
        if names.is_empty() {
            continue;
        }
        let shown: Vec<&str> = names.iter().take(band.listed).map(String::as_str).collect();
        report.push_str(&format!(" {}: {}", band.label, shown.join(", ")));
        if names.len() > band.listed {
            report.push_str(&format!(" and {} more.", names.len() - band.listed));
        } else {
            report.push('.');
        }
    }
    if distant > 0 {
        report.push_str(&format!(" {distant} distant objects beyond 50 meters."));
    }
    report
}
