//! Commands an input layer can bind to keys.

use scene_model::Category;
use serde::{Deserialize, Serialize};

/// One discrete request to the navigation orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum NavigationCommand {
    SelectCategory { category: Category },
    FocusWaypoints,
    StartWaypointCreation,
    HandleWaypointNamingInput { characters: String },
    ConfirmWaypointNaming,
    CancelWaypointNaming,
    DeleteCurrentWaypoint,
    CycleWithinCategory { backward: bool },
    NavigateToSelectedObject,
    StopMovement,
    ToggleSortingMode,
    ScanSceneByDistance,
    RepeatLastAnnouncement,
}

impl NavigationCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationCommand::SelectCategory { .. } => "select_category",
            NavigationCommand::FocusWaypoints => "focus_waypoints",
            NavigationCommand::StartWaypointCreation => "start_waypoint_creation",
            NavigationCommand::HandleWaypointNamingInput { .. } => "handle_waypoint_naming_input",
            NavigationCommand::ConfirmWaypointNaming => "confirm_waypoint_naming",
            NavigationCommand::CancelWaypointNaming => "cancel_waypoint_naming",
            NavigationCommand::DeleteCurrentWaypoint => "delete_current_waypoint",
            NavigationCommand::CycleWithinCategory { .. } => "cycle_within_category",
            NavigationCommand::NavigateToSelectedObject => "navigate_to_selected_object",
            NavigationCommand::StopMovement => "stop_movement",
            NavigationCommand::ToggleSortingMode => "toggle_sorting_mode",
            NavigationCommand::ScanSceneByDistance => "scan_scene_by_distance",
            NavigationCommand::RepeatLastAnnouncement => "repeat_last_announcement",
        }
    }
}
