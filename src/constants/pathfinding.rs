//! Flow field constants.

/// Traversal weight of an open floor cell
pub const FLOW_BASE_CELL_COST: f32 = 1.0;
/// Traversal weight of a floor cell with at least one wall among its 8 neighbours
pub const FLOW_WALL_PROXIMITY_PENALTY: f32 = 2.5;
/// Cost multiplier of a diagonal step (sqrt(2))
pub const FLOW_DIAGONAL_COST: f32 = 1.414;
/// How far (in cells) to search for a walkable seed when the target sits in a wall
pub const FLOW_SEED_SEARCH_RADIUS: i32 = 5;
/// Gradients shorter than this are treated as flat
pub const FLOW_GRADIENT_EPSILON: f32 = 1e-4;
