//! Text entry for naming a new waypoint.

use scene_model::{LocationKey, Vec3};

/// Default cap on typed name length, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;

const BACKSPACE: char = '\u{8}';

/// Lifecycle of a naming session. Both non-active states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingState {
    Active,
    Confirmed,
    Cancelled,
}

/// Everything needed to create the waypoint once a name is settled.
#[derive(Debug, Clone, PartialEq)]
pub struct NamingCompletion {
    pub final_name: String,
    pub position: Vec3,
    pub location_key: LocationKey,
    /// True when nothing was typed and the default name was taken.
    pub used_default: bool,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NamingOutcome {
    Confirmed(NamingCompletion),
    Cancelled,
}

type CompletedCallback = Box<dyn FnOnce(&NamingCompletion)>;
type CancelledCallback = Box<dyn FnOnce()>;

/// Collects a waypoint name one keystroke at a time.
///
/// The position and location are captured when the session starts, so the
/// waypoint lands where the player stood when they asked for it.
pub struct NamingSession {
    position: Vec3,
    default_name: String,
    location_key: LocationKey,
    input: String,
    state: NamingState,
    max_length: usize,
    on_completed: Option<CompletedCallback>,
    on_cancelled: Option<CancelledCallback>,
}

impl NamingSession {
    pub fn new(position: Vec3, default_name: impl Into<String>, location_key: LocationKey) -> Self {
        Self {
            position,
            default_name: default_name.into(),
            location_key,
            input: String::new(),
            state: NamingState::Active,
            max_length: DEFAULT_MAX_NAME_LENGTH,
            on_completed: None,
            on_cancelled: None,
        }
    }

    /// Override the name length cap.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Called once when the session is confirmed.
    pub fn on_completed(mut self, callback: impl FnOnce(&NamingCompletion) + 'static) -> Self {
        self.on_completed = Some(Box::new(callback));
        self
    }

    /// Called once when the session is cancelled.
    pub fn on_cancelled(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_cancelled = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> NamingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == NamingState::Active
    }

    pub fn current_input(&self) -> &str {
        &self.input
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn location_key(&self) -> &LocationKey {
        &self.location_key
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Feed typed characters.
    ///
    /// Backspace deletes, carriage return or newline confirms (anything after
    /// it is ignored), other control characters are skipped, and printable
    /// characters are appended until the length cap is reached.
    pub fn handle_input(&mut self, characters: &str) -> Option<NamingOutcome> {
        for character in characters.chars() {
            if !self.is_active() {
                break;
            }
            match character {
                BACKSPACE => {
                    self.input.pop();
                }
                '\r' | '\n' => return self.confirm(),
                c if c.is_control() => {}
                c => {
                    if self.input.chars().count() < self.max_length {
                        self.input.push(c);
                    }
                }
            }
        }
        None
    }

    /// Settle the name. No-op unless active.
    pub fn confirm(&mut self) -> Option<NamingOutcome> {
        if !self.is_active() {
            return None;
        }
        self.state = NamingState::Confirmed;

        let trimmed = self.input.trim();
        let used_default = trimmed.is_empty();
        let final_name = if used_default {
            self.default_name.clone()
        } else {
            trimmed.to_string()
        };
        let completion = NamingCompletion {
            final_name,
            position: self.position,
            location_key: self.location_key.clone(),
            used_default,
        };

        if let Some(callback) = self.on_completed.take() {
            callback(&completion);
        }
        Some(NamingOutcome::Confirmed(completion))
    }

    /// Abandon the session. No-op unless active.
    pub fn cancel(&mut self) -> Option<NamingOutcome> {
        if !self.is_active() {
            return None;
        }
        self.state = NamingState::Cancelled;

        if let Some(callback) = self.on_cancelled.take() {
            callback();
        }
        Some(NamingOutcome::Cancelled)
    }
}

impl std::fmt::Debug for NamingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingSession")
            .field("position", &self.position)
            .field("default_name", &self.default_name)
            .field("location_key", &self.location_key)
            .field("input", &self.input)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(default_name: &str) -> NamingSession {
        NamingSession::new(Vec3::new(1.0, 0.0, 1.0), default_name, LocationKey::from("A"))
    }

    fn confirmed(outcome: Option<NamingOutcome>) -> NamingCompletion {
        match outcome {
            Some(NamingOutcome::Confirmed(completion)) => completion,
            other => panic!("expected confirmation, got {other:?}"),
        }
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let mut naming = session("Waypoint 3");

        assert!(naming.handle_input("He").is_none());
        assert!(naming.handle_input("\u{8}").is_none());
        assert!(naming.handle_input("y").is_none());
        let completion = confirmed(naming.confirm());

        assert_eq!(completion.final_name, "Hy");
        assert!(!completion.used_default);
        assert_eq!(naming.state(), NamingState::Confirmed);
    }

    #[test]
    fn test_confirm_without_input_uses_default() {
        let mut naming = session("Waypoint 3");
        let completion = confirmed(naming.confirm());

        assert_eq!(completion.final_name, "Waypoint 3");
        assert!(completion.used_default);
        assert_eq!(completion.location_key, LocationKey::from("A"));
        assert_eq!(completion.position, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_whitespace_only_input_uses_default() {
        let mut naming = session("Waypoint 1");
        naming.handle_input("   ");
        assert!(confirmed(naming.confirm()).used_default);
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut naming = session("Waypoint 1");
        naming.handle_input("  Pier  ");
        assert_eq!(confirmed(naming.confirm()).final_name, "Pier");
    }

    #[test]
    fn test_newline_confirms_and_ignores_rest() {
        let mut naming = session("Waypoint 1");
        let completion = confirmed(naming.handle_input("Dock\nExtra"));

        assert_eq!(completion.final_name, "Dock");
        assert_eq!(naming.current_input(), "Dock");
        assert!(naming.handle_input("more").is_none());
    }

    #[test]
    fn test_carriage_return_confirms() {
        let mut naming = session("Waypoint 1");
        assert_eq!(confirmed(naming.handle_input("Bar\r")).final_name, "Bar");
    }

    #[test]
    fn test_backspace_on_empty_buffer_is_harmless() {
        let mut naming = session("Waypoint 1");
        naming.handle_input("\u{8}\u{8}a");
        assert_eq!(naming.current_input(), "a");
    }

    #[test]
    fn test_control_characters_skipped() {
        let mut naming = session("Waypoint 1");
        naming.handle_input("a\tb\u{1b}c");
        assert_eq!(naming.current_input(), "abc");
    }

    #[test]
    fn test_length_cap() {
        let mut naming = session("Waypoint 1");
        naming.handle_input(&"x".repeat(70));
        assert_eq!(naming.current_input().chars().count(), DEFAULT_MAX_NAME_LENGTH);

        let mut short = session("Waypoint 1").with_max_length(3);
        short.handle_input("abcdef");
        assert_eq!(short.current_input(), "abc");
    }

    #[test]
    fn test_length_cap_counts_characters() {
        let mut naming = session("Waypoint 1").with_max_length(2);
        naming.handle_input("äöü");
        assert_eq!(naming.current_input(), "äö");
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut naming = session("Waypoint 1");
        naming.handle_input("abc");

        assert_eq!(naming.cancel(), Some(NamingOutcome::Cancelled));
        assert_eq!(naming.state(), NamingState::Cancelled);
        assert!(naming.confirm().is_none());
        assert!(naming.cancel().is_none());
        assert!(naming.handle_input("d").is_none());
        assert_eq!(naming.current_input(), "abc");
    }

    #[test]
    fn test_confirm_is_terminal() {
        let mut naming = session("Waypoint 1");
        assert!(naming.confirm().is_some());
        assert!(naming.confirm().is_none());
        assert!(naming.cancel().is_none());
        assert_eq!(naming.state(), NamingState::Confirmed);
    }

    #[test]
    fn test_callbacks_fire_once() {
        let completions = Rc::new(RefCell::new(Vec::new()));
        let cancellations = Rc::new(RefCell::new(0));

        let sink = completions.clone();
        let cancel_count = cancellations.clone();
        let mut naming = session("Waypoint 2")
            .on_completed(move |c| sink.borrow_mut().push(c.final_name.clone()))
            .on_cancelled(move || *cancel_count.borrow_mut() += 1);

        naming.handle_input("Gate\n");
        naming.confirm();
        naming.cancel();

        assert_eq!(*completions.borrow(), vec!["Gate".to_string()]);
        assert_eq!(*cancellations.borrow(), 0);
    }

    #[test]
    fn test_cancel_callback() {
        let cancelled = Rc::new(RefCell::new(false));
        let flag = cancelled.clone();
        let mut naming = session("Waypoint 2").on_cancelled(move || *flag.borrow_mut() = true);

        naming.cancel();

        assert!(*cancelled.borrow());
    }
}
