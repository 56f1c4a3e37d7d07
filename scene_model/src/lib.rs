//! # Scene Model
//!
//! Plain data describing what the navigation core works with: candidate objects
//! reported by the world, saved waypoints, the keys that scope waypoints to a
//! physical place, and the geometry used to rank and describe them.
//! This crate holds no navigation state and performs no I/O.

pub mod categories;
pub mod entities;
pub mod geometry;
pub mod location;

pub use categories::*;
pub use entities::*;
pub use geometry::*;
pub use location::*;
