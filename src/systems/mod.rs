//! Systems that run over the ECS world once per tick.
//!
//! - `separation`: agent overlap resolution and landing windows

pub mod separation;

pub use separation::{resolve_overlaps, resolve_overlaps_with, tick_landing_grace};
