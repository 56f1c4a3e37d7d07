//! Objects the player can be navigated to.

mod candidate;
mod waypoint;

pub use candidate::*;
pub use waypoint::*;
