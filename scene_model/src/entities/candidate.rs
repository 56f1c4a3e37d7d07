//! Candidate objects reported by the world each time a category is selected.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a candidate object, assigned by whoever reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub Uuid);

impl CandidateId {
    /// Create a new random candidate ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a candidate ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scene object that may be selected and walked to.
///
/// Candidates are transient: they live only as long as the category selection
/// that ranked them.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    /// Display name, already cleaned up by the reporting side.
    pub name: String,
    pub position: Vec3,
}

impl Candidate {
    /// Create a candidate with a fresh identity.
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: CandidateId::new(),
            name: name.into(),
            position,
        }
    }

    /// Use a specific identity.
    pub fn with_id(mut self, id: CandidateId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate() {
        let candidate = Candidate::new("Kim Kitsuragi", Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(candidate.name, "Kim Kitsuragi");
        assert_eq!(candidate.position, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_candidate_identity() {
        let id = CandidateId::from_uuid(Uuid::nil());
        let candidate = Candidate::new("Door", Vec3::ZERO).with_id(id);
        assert_eq!(candidate.id, id);
        assert_ne!(CandidateId::new(), CandidateId::new());
    }
}
