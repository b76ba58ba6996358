//! Navigation constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! These are also the defaults of [`crate::config::NavConfig`].

mod collision;
mod dungeon;
mod pathfinding;

pub use collision::*;
pub use dungeon::*;
pub use pathfinding::*;
