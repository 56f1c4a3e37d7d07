//! # Navigation Core (Wayfinder)
//!
//! Lets a player who cannot see the screen explore a 3D scene by category,
//! cycle through ranked results, walk to them, and keep named waypoints per
//! physical location. Speech output, movement, and world queries are supplied
//! by the host through the traits in [`orchestrator`].
//!
//! ## Core Components
//!
//! - **waypoints**: Durable named positions, per-location cursors, and the
//!   text-entry session used to name a new waypoint
//! - **selection**: Category filtering and distance/directional ranking of
//!   candidate objects with a circular cursor
//! - **orchestrator**: The command surface, location-key derivation, and
//!   announcement text
//! - **commands**: Serializable command values for input dispatch
//!
//! ## Design Philosophy
//!
//! - **Tick-Driven**: Every command runs to completion on the host's frame
//! - **No Ambient State**: The orchestrator owns every piece of mutable state
//! - **Never Fatal**: Failures become spoken advisories and log events

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod selection;
pub mod waypoints;

pub use clock::*;
pub use commands::*;
pub use config::*;
pub use error::*;
pub use orchestrator::*;
pub use selection::*;
pub use waypoints::*;
