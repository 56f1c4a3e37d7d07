//! Waypoints - durable named positions scoped to a location.
//!
//! - **manager**: the collection and per-location selection cursors
//! - **persistence**: the on-disk format and storage backends
//! - **naming**: the text-entry session that names a new waypoint

mod manager;
mod naming;
mod persistence;

pub use manager::*;
pub use naming::*;
pub use persistence::*;
