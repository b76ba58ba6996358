//! Dungeon generation constants. Distances are in world units.

/// Empty margin kept between a BSP leaf's edge and the room carved inside it
pub const DUNGEON_ROOM_PADDING: f32 = 20.0;
/// Rooms narrower or shorter than this are dropped after collection (too small to spawn enemies in)
pub const DUNGEON_MIN_USABLE_ROOM_SIZE: f32 = 30.0;
/// Width of every carved corridor
pub const DUNGEON_CORRIDOR_WIDTH: f32 = 50.0;
/// Corridors narrower than this are dropped after collection
pub const DUNGEON_MIN_CORRIDOR_WIDTH: f32 = 50.0;
/// Size of one walkability grid cell
pub const DUNGEON_CELL_SIZE: f32 = 20.0;
/// Ratio at which a node is considered elongated and always split across its long axis
pub const DUNGEON_SPLIT_ASPECT_RATIO: f32 = 1.25;
/// Maximum number of corridors the connectivity repair pass may add
pub const DUNGEON_REPAIR_ATTEMPTS: usize = 32;
/// Rectangles closer than this are treated as touching
pub const DUNGEON_ADJACENCY_TOLERANCE: f32 = 0.5;
/// Rooms with fewer corridors than this get an extra entrance when the level has 3+ rooms
pub const DUNGEON_MIN_ENTRANCES: usize = 2;
/// Default level width
pub const DUNGEON_DEFAULT_WIDTH: f32 = 1000.0;
/// Default level height
pub const DUNGEON_DEFAULT_HEIGHT: f32 = 1000.0;
/// Default minimum partition size
pub const DUNGEON_DEFAULT_MIN_ROOM_SIZE: f32 = 100.0;
/// Default BSP recursion depth
pub const DUNGEON_DEFAULT_MAX_DEPTH: u32 = 4;
