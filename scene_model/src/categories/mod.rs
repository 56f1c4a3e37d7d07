//! Navigation categories, sorting modes, and focus.

use serde::{Deserialize, Serialize};

/// Buckets a classifier can place a candidate object in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// People the player can talk to.
    #[default]
    Npcs,
    /// Doors, exits, and other places to walk to.
    Locations,
    /// Containers and pickups.
    Loot,
    /// Every classified object, regardless of bucket.
    Everything,
}

impl Category {
    /// Whether an object classified as `classified` belongs to this category.
    pub fn admits(&self, classified: Category) -> bool {
        match self {
            Category::Everything => true,
            other => *other == classified,
        }
    }

    /// Name used in spoken output.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Npcs => "NPCs",
            Category::Locations => "Locations",
            Category::Loot => "Loot",
            Category::Everything => "Everything",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How the objects of a category are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortingMode {
    /// Nearest first.
    #[default]
    Distance,
    /// Clockwise from north, nearest first on equal bearings.
    Directional,
}

impl SortingMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            SortingMode::Distance => SortingMode::Directional,
            SortingMode::Directional => SortingMode::Distance,
        }
    }

    /// Name used in spoken output.
    pub fn label(&self) -> &'static str {
        match self {
            SortingMode::Distance => "distance",
            SortingMode::Directional => "directional (clockwise)",
        }
    }
}

/// Which list the cycle and navigate commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Focus {
    #[default]
    ObjectCategories,
    Waypoints,
}
