//! Collision and walkability constants.

/// Fraction of the nominal radius used for kinematic-vs-dynamic overlap (matches the rendered silhouette)
pub const COLLISION_VISUAL_RADIUS_SCALE: f32 = 0.6;
/// A kinematic body higher than this passes over dynamic bodies
pub const COLLISION_JUMP_OVER_HEIGHT: f32 = 20.0;
/// Share of the overlap applied to the dynamic body when a kinematic body pushes it
pub const COLLISION_DYNAMIC_PUSH_SHARE: f32 = 0.2;
/// Distances below this are treated as coincident
pub const COLLISION_MIN_SEPARATION: f32 = 1e-4;
/// Default sampling step for line-of-sight checks
pub const WALK_LOS_STEP: f32 = 10.0;
/// Step between candidate rings when searching for the nearest walkable point
pub const WALK_SEARCH_STEP: f32 = 5.0;
/// Number of rings searched before falling back to the nearest room center
pub const WALK_SEARCH_RINGS: usize = 64;
/// Largest offset used to look at the floor on each side of a rectangle corner
pub const WALK_CORNER_OFFSET: f32 = 0.01;
