//! Navigation orchestrator - the command surface an input layer drives.
//!
//! Every command runs to completion on the caller's tick:
//! 1. **Guard**: while a waypoint is being named, only naming commands run
//! 2. **Query**: player position, candidates, and scene come from [`WorldQuery`]
//! 3. **Mutate**: selection and waypoints change only after every fallible
//!    query has succeeded
//! 4. **Announce**: the outcome is handed to the [`NarrationSink`]
//!
//! Errors never leave a command. They are logged and spoken instead.

pub mod announcements;
mod collaborators;
mod deferred;
mod location_key;


pub use announcements::AnnouncementContext;
pub use collaborators::*;
pub use deferred::*;
pub use location_key::*;

use chrono::Duration;
use scene_model::{Candidate, Category, Focus, LocationKey, Vec3};

use crate::clock::{Clock, SystemClock};
use crate::commands::NavigationCommand;
use crate::config::NavigationConfig;
use crate::error::Result;
use crate::selection::ObjectSelectionState;
use crate::waypoints::{NamingOutcome, NamingSession, PreferenceFileStore, WaypointManager};

/// Owns all navigation state and turns commands into announcements.
pub struct NavigationOrchestrator {
    world: Box<dyn WorldQuery>,
    classifier: Box<dyn Classifier>,
    movement: Box<dyn MovementController>,
    narrator: Box<dyn NarrationSink>,
    clock: Box<dyn Clock>,
    waypoints: WaypointManager,
    selection: ObjectSelectionState,
    focus: Focus,
    naming: Option<NamingSession>,
    context: AnnouncementContext,
    deferred: DeferredQueue,
    resolver: LocationKeyResolver,
    max_name_length: usize,
    deferred_delay: Duration,
}

impl NavigationOrchestrator {
    pub fn new(config: &NavigationConfig, collaborators: Collaborators, waypoints: WaypointManager) -> Self {
        Self::with_clock(config, collaborators, waypoints, SystemClock)
    }

    /// Build an orchestrator whose deferred announcements follow `clock`.
    pub fn with_clock(
        config: &NavigationConfig,
        collaborators: Collaborators,
        waypoints: WaypointManager,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            world: collaborators.world,
            classifier: collaborators.classifier,
            movement: collaborators.movement,
            narrator: collaborators.narrator,
            clock: Box::new(clock),
            waypoints,
            selection: ObjectSelectionState::new(),
            focus: Focus::default(),
            naming: None,
            context: AnnouncementContext::default(),
            deferred: DeferredQueue::new(),
            resolver: LocationKeyResolver::new(&config.location),
            max_name_length: config.naming.max_name_length,
            deferred_delay: config.deferred_delay(),
        }
    }

    /// Build an orchestrator backed by the preference file named in `config`.
    pub fn from_config(config: &NavigationConfig, collaborators: Collaborators) -> Self {
        let store = PreferenceFileStore::from_config(&config.persistence);
        Self::new(config, collaborators, WaypointManager::new(store))
    }

    /// Run one command value.
    pub fn dispatch(&mut self, command: NavigationCommand) {
        tracing::debug!(command = command.name(), "dispatching navigation command");
        match command {
            NavigationCommand::SelectCategory { category } => self.select_category(category),
            NavigationCommand::FocusWaypoints => self.focus_waypoints(),
            NavigationCommand::StartWaypointCreation => self.start_waypoint_creation(),
            NavigationCommand::HandleWaypointNamingInput { characters } => {
                self.handle_waypoint_naming_input(&characters)
            }
            NavigationCommand::ConfirmWaypointNaming => self.confirm_waypoint_naming(),
            NavigationCommand::CancelWaypointNaming => self.cancel_waypoint_naming(),
            NavigationCommand::DeleteCurrentWaypoint => self.delete_current_waypoint(),
            NavigationCommand::CycleWithinCategory { backward } => self.cycle_within_category(backward),
            NavigationCommand::NavigateToSelectedObject => self.navigate_to_selected_object(),
            NavigationCommand::StopMovement => self.stop_movement(),
            NavigationCommand::ToggleSortingMode => self.toggle_sorting_mode(),
            NavigationCommand::ScanSceneByDistance => self.scan_scene_by_distance(),
            NavigationCommand::RepeatLastAnnouncement => self.repeat_last_announcement(),
        }
    }

    /// Switch to object categories and rank the objects of `category`.
    pub fn select_category(&mut self, category: Category) {
        if self.reject_while_naming() {
            return;
        }
        let result = self.try_select_category(category);
        self.finish("Category selection", result);
    }

    fn try_select_category(&mut self, category: Category) -> Result<()> {
        let Some(player) = self.player_position() else {
            self.say(announcements::NO_PLAYER_POSITION);
            return Ok(());
        };
        let candidates = self.world.candidates()?;
        let scene_empty = candidates.is_empty();

        self.focus = Focus::ObjectCategories;
        self.rank(player, category, candidates);

        let text = if scene_empty {
            announcements::NO_OBJECTS_AVAILABLE.to_string()
        } else {
            let info = self.selection.navigation_info(player);
            announcements::category_summary(category, info.as_ref())
        };
        tracing::info!(category = %category, count = self.selection.len(), "selected category");
        self.say(&text);
        Ok(())
    }

    /// Switch to waypoints and announce the selected one for this location.
    pub fn focus_waypoints(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        self.focus = Focus::Waypoints;

        let key = self.current_location_key();
        if !self.waypoints.has_waypoints_in_location(&key) {
            let text = announcements::no_waypoints(self.waypoints.has_any_waypoints());
            self.say(text);
            return;
        }
        self.announce_waypoint_selection(&key, true, None);
    }

    /// Begin naming a waypoint at the player's current position.
    pub fn start_waypoint_creation(&mut self) {
        if self.is_naming_active() {
            self.say(announcements::ALREADY_NAMING);
            return;
        }
        let Some(position) = self.player_position() else {
            self.say(announcements::NO_WAYPOINT_POSITION);
            return;
        };

        let key = self.current_location_key();
        let default_name = self.waypoints.default_name(&key);
        tracing::info!(location = %key, default_name = %default_name, "started waypoint naming");

        self.naming = Some(
            NamingSession::new(position, default_name.clone(), key).with_max_length(self.max_name_length),
        );
        self.say(&announcements::naming_prompt(&default_name));
    }

    /// Feed typed characters to the active naming session.
    pub fn handle_waypoint_naming_input(&mut self, characters: &str) {
        let outcome = self
            .naming
            .as_mut()
            .and_then(|session| session.handle_input(characters));
        if let Some(outcome) = outcome {
            self.finish_naming(outcome);
        }
    }

    pub fn confirm_waypoint_naming(&mut self) {
        let outcome = self.naming.as_mut().and_then(NamingSession::confirm);
        if let Some(outcome) = outcome {
            self.finish_naming(outcome);
        }
    }

    pub fn cancel_waypoint_naming(&mut self) {
        let outcome = self.naming.as_mut().and_then(NamingSession::cancel);
        if let Some(outcome) = outcome {
            self.finish_naming(outcome);
        }
    }

    fn finish_naming(&mut self, outcome: NamingOutcome) {
        self.naming = None;
        match outcome {
            NamingOutcome::Confirmed(completion) => {
                let waypoint = self.waypoints.add_waypoint(
                    completion.position,
                    completion.final_name,
                    completion.location_key.clone(),
                );
                self.focus = Focus::Waypoints;
                let prefix = announcements::waypoint_saved(&waypoint.name);
                self.announce_waypoint_selection(&completion.location_key, true, Some(&prefix));
            }
            NamingOutcome::Cancelled => {
                tracing::info!("waypoint naming cancelled");
                self.say(announcements::WAYPOINT_CREATION_CANCELLED);
            }
        }
    }

    /// Delete the selected waypoint of the current location.
    pub fn delete_current_waypoint(&mut self) {
        if self.reject_while_naming() {
            return;
        }

        if self.focus != Focus::Waypoints {
            let text = if self.waypoints.has_any_waypoints() {
                announcements::FOCUS_WAYPOINTS_FIRST
            } else {
                announcements::NO_WAYPOINTS_YET
            };
            self.say(text);
            return;
        }

        let key = self.current_location_key();
        let Some(selection) = self.waypoints.try_selection(&key) else {
            let text = announcements::no_waypoints(self.waypoints.has_any_waypoints());
            self.say(text);
            return;
        };

        let name = selection.waypoint.name.clone();
        if !self.waypoints.remove_waypoint(&key, &selection.waypoint) {
            tracing::error!(name = %name, location = %key, "failed to delete waypoint");
            self.say(announcements::DELETE_FAILED);
            return;
        }

        if !self.waypoints.has_waypoints_in_location(&key) {
            self.say(&announcements::waypoint_deleted_last(&name));
            return;
        }
        let prefix = announcements::waypoint_deleted(&name);
        self.announce_waypoint_selection(&key, true, Some(&prefix));
    }

    /// Move to the next (or previous) waypoint or object, depending on focus.
    pub fn cycle_within_category(&mut self, backward: bool) {
        if self.reject_while_naming() {
            return;
        }

        if self.focus == Focus::Waypoints {
            let key = self.current_location_key();
            if !self.waypoints.has_waypoints_in_location(&key) {
                let text = announcements::no_waypoints(self.waypoints.has_any_waypoints());
                self.say(text);
                return;
            }
            if backward {
                self.waypoints.select_previous(&key);
            } else {
                self.waypoints.select_next(&key);
            }
            self.announce_waypoint_selection(&key, false, None);
            return;
        }

        if !self.selection.has_selection() {
            self.say(announcements::NO_OBJECTS_IN_CATEGORY);
            return;
        }
        if backward {
            self.selection.cycle_previous();
        } else {
            self.selection.cycle_next();
        }
        self.context
            .record_selection(self.selection.current_object().map(|entry| entry.candidate.id));

        let text = match self.player_position() {
            Some(player) => self
                .selection
                .navigation_info(player)
                .map(|info| info.format_announcement()),
            None => self.selection.current_object().map(|entry| {
                announcements::object_without_position(
                    &entry.candidate.name,
                    self.selection.current_index().unwrap_or(0),
                    self.selection.len(),
                )
            }),
        };
        if let Some(text) = text {
            self.say(&text);
        }
    }

    /// Ask the movement collaborator to walk to the selected waypoint or object.
    pub fn navigate_to_selected_object(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        let result = self.try_navigate_to_selected_object();
        self.finish("Navigation", result);
    }

    fn try_navigate_to_selected_object(&mut self) -> Result<()> {
        let (destination, label) = if self.focus == Focus::Waypoints {
            let key = self.current_location_key();
            let Some(selection) = self.waypoints.try_selection(&key) else {
                let text = announcements::no_waypoints(self.waypoints.has_any_waypoints());
                self.say(text);
                return Ok(());
            };
            (
                selection.waypoint.position,
                format!("waypoint {}", selection.waypoint.name),
            )
        } else {
            let Some(entry) = self.selection.current_object() else {
                self.say(announcements::NO_OBJECT_SELECTED);
                return Ok(());
            };
            (entry.candidate.position, entry.candidate.name.clone())
        };

        tracing::info!(target_name = %label, "navigating");
        self.say(&announcements::calculating_path(&label));
        self.movement.request_navigate_to(destination, &label)
    }

    pub fn stop_movement(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        self.movement.stop_movement();
    }

    /// Flip between distance and directional ranking and re-rank the current category.
    pub fn toggle_sorting_mode(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        let result = self.try_toggle_sorting_mode();
        self.finish("Sorting change", result);
    }

    fn try_toggle_sorting_mode(&mut self) -> Result<()> {
        if self.focus == Focus::Waypoints {
            self.say(announcements::SORTING_NOT_FOR_WAYPOINTS);
            return Ok(());
        }

        let refresh = match self.player_position() {
            Some(player) if self.selection.has_selection() => Some((player, self.world.candidates()?)),
            _ => None,
        };

        let mode = self.selection.toggle_sorting_mode();
        if let Some((player, candidates)) = refresh {
            let category = self.selection.current_category();
            self.rank(player, category, candidates);
        }

        tracing::info!(mode = ?mode, "changed sorting mode");
        self.say(&announcements::sorting_changed(mode));
        Ok(())
    }

    /// Describe everything in the scene, grouped by distance. Changes nothing.
    pub fn scan_scene_by_distance(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        let result = self.try_scan_scene_by_distance();
        self.finish("Distance scan", result);
    }

    fn try_scan_scene_by_distance(&mut self) -> Result<()> {
        let Some(player) = self.player_position() else {
            self.say(announcements::NO_PLAYER_POSITION);
            return Ok(());
        };
        let candidates = self.world.candidates()?;
        if candidates.is_empty() {
            self.say(announcements::NO_OBJECTS_IN_SCENE);
            return Ok(());
        }
        let report = announcements::scan_report(player, &candidates);
        tracing::debug!(count = candidates.len(), "scanned scene");
        self.say(&report);
        Ok(())
    }

    /// Speak the previous announcement again.
    pub fn repeat_last_announcement(&mut self) {
        if self.reject_while_naming() {
            return;
        }
        match self.context.last_announced.clone() {
            Some(text) => self.narrator.announce(&text, true),
            None => self.narrator.announce(announcements::NOTHING_TO_REPEAT, true),
        }
    }

    /// Poll movement progress, then fire deferred actions that have come due.
    pub fn tick(&mut self) {
        self.movement.poll_progress();

        for action in self.deferred.take_due(self.clock.now()) {
            match action {
                DeferredAction::Announce { text, interrupt } => {
                    self.narrator.announce(&text, interrupt);
                    self.context.record_announcement(&text);
                }
            }
        }
    }

    /// Speak `text` after the configured deferred delay.
    pub fn schedule_announcement(&mut self, text: impl Into<String>, interrupt: bool) {
        self.schedule_announcement_after(self.deferred_delay, text, interrupt);
    }

    /// Speak `text` on the first tick at least `delay` from now.
    pub fn schedule_announcement_after(&mut self, delay: Duration, text: impl Into<String>, interrupt: bool) {
        let Some(due_at) = self.clock.now().checked_add_signed(delay) else {
            tracing::warn!(delay_ms = delay.num_milliseconds(), "announcement delay out of range, dropped");
            return;
        };
        self.deferred.schedule(
            due_at,
            DeferredAction::Announce {
                text: text.into(),
                interrupt,
            },
        );
    }

    /// The key scoping waypoints to where the player stands now.
    pub fn current_location_key(&self) -> LocationKey {
        self.resolver.resolve(self.world.current_scene().as_ref())
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_naming_active(&self) -> bool {
        self.naming.as_ref().is_some_and(NamingSession::is_active)
    }

    pub fn naming_session(&self) -> Option<&NamingSession> {
        self.naming.as_ref()
    }

    pub fn selection(&self) -> &ObjectSelectionState {
        &self.selection
    }

    pub fn waypoints(&self) -> &WaypointManager {
        &self.waypoints
    }

    pub fn waypoints_mut(&mut self) -> &mut WaypointManager {
        &mut self.waypoints
    }

    pub fn context(&self) -> &AnnouncementContext {
        &self.context
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Flush every waypoint to the store, e.g. on host shutdown.
    pub fn save_all(&mut self) -> Result<()> {
        self.waypoints.save_all()
    }

    /// The player's position, treating non-finite coordinates as unknown.
    fn player_position(&self) -> Option<Vec3> {
        self.world.player_position().filter(|position| position.is_finite())
    }

    fn rank(&mut self, player: Vec3, category: Category, candidates: Vec<Candidate>) {
        let classifier = &self.classifier;
        self.selection
            .update_category(player, category, candidates, |candidate| classifier.classify(candidate));
        self.context
            .record_selection(self.selection.current_object().map(|entry| entry.candidate.id));
    }

    fn announce_waypoint_selection(&mut self, key: &LocationKey, include_intro: bool, prefix: Option<&str>) {
        let Some(selection) = self.waypoints.try_selection(key) else {
            let text = announcements::no_waypoints(self.waypoints.has_any_waypoints());
            self.say(text);
            return;
        };
        let player = self.player_position();
        let text = announcements::waypoint_selection(&selection, player, include_intro, prefix);
        tracing::info!(location = %key, "{text}");
        self.say(&text);
    }

    /// Speak the guard advisory and report whether the command must stop.
    fn reject_while_naming(&mut self) -> bool {
        if !self.is_naming_active() {
            return false;
        }
        tracing::debug!("command rejected while naming a waypoint");
        self.say(announcements::NAMING_IN_PROGRESS);
        true
    }

    fn finish(&mut self, action: &str, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!(action, error = %e, "navigation command failed");
            let text = announcements::command_failed(action, &e);
            self.say(&text);
        }
    }

    fn say(&mut self, text: &str) {
        self.narrator.announce(text, true);
        self.context.record_announcement(text);
    }
}

impl std::fmt::Debug for NavigationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationOrchestrator")
            .field("focus", &self.focus)
            .field("naming", &self.naming)
            .field("selection", &self.selection)
            .field("waypoints", &self.waypoints)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
