//! Object selection - ranks the candidates of one category and cycles through them.
//!
//! Ranking works as follows:
//! 1. **Classify**: keep candidates the classifier places in the category
//! 2. **Measure**: compute distance and clockwise bearing from the player
//! 3. **Sort**: by distance, or by bearing with distance breaking ties
//! 4. **Select**: reset the cursor to the first entry

mod navigation_info;

pub use navigation_info::*;

use scene_model::{clockwise_bearing, distance, Candidate, Category, SortingMode, Vec3};

/// A candidate together with its measurements at ranking time.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    /// Distance from the player when ranked.
    pub distance: f32,
    /// Clockwise bearing from north, in degrees, when ranked.
    pub bearing: f32,
}

/// The current category's ranked candidates and cursor.
#[derive(Debug, Clone, Default)]
pub struct ObjectSelectionState {
    category: Category,
    sorting_mode: SortingMode,
    ranked: Vec<RankedCandidate>,
    cursor: usize,
}

impl ObjectSelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current sequence with the members of `category`, ranked
    /// by the active sorting mode, and select the first one.
    ///
    /// Candidates the classifier rejects (returns `None` for) never appear.
    pub fn update_category<I, F>(&mut self, player_position: Vec3, category: Category, candidates: I, classify: F)
    where
        I: IntoIterator<Item = Candidate>,
        F: Fn(&Candidate) -> Option<Category>,
    {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .filter(|candidate| classify(candidate).is_some_and(|c| category.admits(c)))
            .map(|candidate| RankedCandidate {
                distance: distance(player_position, candidate.position),
                bearing: clockwise_bearing(player_position, candidate.position),
                candidate,
            })
            .collect();

        match self.sorting_mode {
            SortingMode::Distance => ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance)),
            SortingMode::Directional => ranked.sort_by(|a, b| {
                a.bearing
                    .total_cmp(&b.bearing)
                    .then_with(|| a.distance.total_cmp(&b.distance))
            }),
        }

        tracing::debug!(
            category = %category,
            mode = ?self.sorting_mode,
            count = ranked.len(),
            "ranked category"
        );

        self.category = category;
        self.ranked = ranked;
        self.cursor = 0;
    }

    /// Select the next entry, wrapping to the first.
    pub fn cycle_next(&mut self) {
        if self.ranked.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.ranked.len();
    }

    /// Select the previous entry, wrapping to the last.
    pub fn cycle_previous(&mut self) {
        if self.ranked.is_empty() {
            return;
        }
        let len = self.ranked.len();
        self.cursor = (self.cursor + len - 1) % len;
    }

    /// Flip the sorting preference. Takes effect on the next `update_category`.
    pub fn toggle_sorting_mode(&mut self) -> SortingMode {
        self.sorting_mode = self.sorting_mode.toggled();
        self.sorting_mode
    }

    pub fn has_selection(&self) -> bool {
        !self.ranked.is_empty()
    }

    pub fn current_category(&self) -> Category {
        self.category
    }

    pub fn current_sorting_mode(&self) -> SortingMode {
        self.sorting_mode
    }

    pub fn current_object(&self) -> Option<&RankedCandidate> {
        self.ranked.get(self.cursor)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.has_selection().then_some(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// The ranked sequence, in order.
    pub fn entries(&self) -> &[RankedCandidate] {
        &self.ranked
    }

    /// Describe the current object relative to where the player stands now.
    pub fn navigation_info(&self, player_position: Vec3) -> Option<NavigationInfo> {
        let current = self.current_object()?;
        Some(NavigationInfo::new(
            &current.candidate,
            player_position,
            self.cursor,
            self.ranked.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_by_prefix(candidate: &Candidate) -> Option<Category> {
        match candidate.name.split(':').next() {
            Some("npc") => Some(Category::Npcs),
            Some("loc") => Some(Category::Locations),
            Some("loot") => Some(Category::Loot),
            _ => None,
        }
    }

    fn scene() -> Vec<Candidate> {
        vec![
            Candidate::new("npc:far", Vec3::new(0.0, 0.0, 30.0)),
            Candidate::new("npc:near", Vec3::new(2.0, 0.0, 0.0)),
            Candidate::new("loc:door", Vec3::new(-5.0, 0.0, 0.0)),
            Candidate::new("npc:mid", Vec3::new(0.0, 0.0, -10.0)),
            Candidate::new("loot:box", Vec3::new(3.0, 0.0, 3.0)),
            Candidate::new("ignored", Vec3::new(1.0, 0.0, 0.0)),
        ]
    }

    fn names(state: &ObjectSelectionState) -> Vec<&str> {
        state.entries().iter().map(|e| e.candidate.name.as_str()).collect()
    }

    #[test]
    fn test_distance_sort_filters_category() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Npcs, scene(), classify_by_prefix);

        assert_eq!(names(&state), vec!["npc:near", "npc:mid", "npc:far"]);
        assert_eq!(state.current_category(), Category::Npcs);
        assert_eq!(state.current_object().unwrap().candidate.name, "npc:near");
    }

    #[test]
    fn test_everything_excludes_unclassified() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Everything, scene(), classify_by_prefix);

        assert_eq!(state.len(), 5);
        assert!(!names(&state).contains(&"ignored"));
        assert_eq!(names(&state)[0], "npc:near");
    }

    #[test]
    fn test_directional_sort_clockwise_from_north() {
        let mut state = ObjectSelectionState::new();
        state.toggle_sorting_mode();
        state.update_category(Vec3::ZERO, Category::Everything, scene(), classify_by_prefix);

        // north (0), northeast (45), east (90), south (180), west (270)
        assert_eq!(
            names(&state),
            vec!["npc:far", "loot:box", "npc:near", "npc:mid", "loc:door"]
        );
    }

    #[test]
    fn test_directional_ties_broken_by_distance() {
        let candidates = vec![
            Candidate::new("npc:outer", Vec3::new(0.0, 0.0, 20.0)),
            Candidate::new("npc:inner", Vec3::new(0.0, 0.0, 4.0)),
            Candidate::new("npc:middle", Vec3::new(0.0, 5.0, 10.0)),
        ];
        let mut state = ObjectSelectionState::new();
        state.toggle_sorting_mode();
        state.update_category(Vec3::ZERO, Category::Npcs, candidates, classify_by_prefix);

        assert_eq!(names(&state), vec!["npc:inner", "npc:middle", "npc:outer"]);
    }

    #[test]
    fn test_sorting_is_relative_to_player() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::new(0.0, 0.0, 28.0), Category::Npcs, scene(), classify_by_prefix);
        assert_eq!(names(&state)[0], "npc:far");
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Npcs, scene(), classify_by_prefix);

        state.cycle_previous();
        assert_eq!(state.current_index(), Some(2));
        state.cycle_next();
        assert_eq!(state.current_index(), Some(0));
        state.cycle_next();
        state.cycle_next();
        state.cycle_next();
        assert_eq!(state.current_index(), Some(0));
    }

    #[test]
    fn test_update_resets_cursor() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Npcs, scene(), classify_by_prefix);
        state.cycle_next();

        state.update_category(Vec3::ZERO, Category::Npcs, scene(), classify_by_prefix);

        assert_eq!(state.current_index(), Some(0));
    }

    #[test]
    fn test_empty_category() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Loot, Vec::new(), classify_by_prefix);

        assert!(!state.has_selection());
        assert!(state.current_object().is_none());
        assert_eq!(state.current_index(), None);
        state.cycle_next();
        state.cycle_previous();
        assert!(state.navigation_info(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_toggle_does_not_resort() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Npcs, scene(), classify_by_prefix);
        let before: Vec<String> = names(&state).iter().map(|s| s.to_string()).collect();

        assert_eq!(state.toggle_sorting_mode(), SortingMode::Directional);

        assert_eq!(names(&state), before);
        assert_eq!(state.current_sorting_mode(), SortingMode::Directional);
    }

    #[test]
    fn test_ranked_measurements() {
        let mut state = ObjectSelectionState::new();
        state.update_category(Vec3::ZERO, Category::Loot, scene(), classify_by_prefix);

        let entry = state.current_object().unwrap();
        assert!((entry.distance - 18f32.sqrt()).abs() < 1e-4);
        assert!((entry.bearing - 45.0).abs() < 1e-4);
    }
}
