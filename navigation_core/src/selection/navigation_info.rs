//! Snapshot of the selected object for spoken output.

use scene_model::{cardinal_direction, distance, Candidate, CandidateId, Vec3};

/// Where the selected object is, seen from the player.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationInfo {
    pub id: CandidateId,
    pub name: String,
    pub distance: f32,
    pub direction: &'static str,
    /// Zero-based position in the ranked sequence.
    pub index: usize,
    pub total: usize,
}

impl NavigationInfo {
    pub fn new(candidate: &Candidate, player_position: Vec3, index: usize, total: usize) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name.clone(),
            distance: distance(player_position, candidate.position),
            direction: cardinal_direction(player_position, candidate.position),
            index,
            total,
        }
    }

    /// `"Kim, 4 meters north, 1 of 3"`.
    pub fn format_announcement(&self) -> String {
        format!(
            "{}, {:.0} meters {}, {} of {}",
            self.name,
            self.distance,
            self.direction,
            self.index + 1,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_announcement() {
        let candidate = Candidate::new("Kim", Vec3::new(0.0, 0.0, 4.2));
        let info = NavigationInfo::new(&candidate, Vec3::ZERO, 0, 3);

        assert_eq!(info.format_announcement(), "Kim, 4 meters north, 1 of 3");
        assert_eq!(info.id, candidate.id);
    }
}
