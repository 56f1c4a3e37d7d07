//! Host-provided services the orchestrator drives.

use scene_model::{Candidate, Category, SceneSnapshot, Vec3};

use crate::error::Result;

/// Read-only view of the running scene.
pub trait WorldQuery {
    /// Where the player stands, if a player exists.
    fn player_position(&self) -> Option<Vec3>;

    /// Every object currently registered as selectable.
    fn candidates(&self) -> Result<Vec<Candidate>>;

    /// The active scene and the player's place in its hierarchy.
    fn current_scene(&self) -> Option<SceneSnapshot>;
}

/// Decides which category a candidate belongs to.
pub trait Classifier {
    /// `None` keeps the candidate out of every category.
    fn classify(&self, candidate: &Candidate) -> Option<Category>;
}

impl<F> Classifier for F
where
    F: Fn(&Candidate) -> Option<Category>,
{
    fn classify(&self, candidate: &Candidate) -> Option<Category> {
        self(candidate)
    }
}

/// Walks the player somewhere. Path finding lives entirely on the host side.
pub trait MovementController {
    /// Begin moving toward `destination`; `label` names it in progress reports.
    fn request_navigate_to(&mut self, destination: Vec3, label: &str) -> Result<()>;

    fn stop_movement(&mut self);

    /// Advance or report on an in-flight movement. Called once per tick.
    fn poll_progress(&mut self);
}

/// Speaks or brailles text.
pub trait NarrationSink {
    /// `interrupt` cuts off whatever is currently being spoken.
    fn announce(&mut self, text: &str, interrupt: bool);
}

/// The collaborator set handed to the orchestrator.
pub struct Collaborators {
    pub world: Box<dyn WorldQuery>,
    pub classifier: Box<dyn Classifier>,
    pub movement: Box<dyn MovementController>,
    pub narrator: Box<dyn NarrationSink>,
}

impl Collaborators {
    pub fn new(
        world: impl WorldQuery + 'static,
        classifier: impl Classifier + 'static,
        movement: impl MovementController + 'static,
        narrator: impl NarrationSink + 'static,
    ) -> Self {
        Self {
            world: Box::new(world),
            classifier: Box::new(classifier),
            movement: Box::new(movement),
            narrator: Box::new(narrator),
        }
    }
}
