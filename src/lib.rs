//! Navigation core for a top-down action game: BSP dungeon generation, flow
//! field pursuit, walkability queries and agent overlap resolution.

pub mod collision;
pub mod components;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod dungeon_gen;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod level;
pub mod pathfinding;
pub mod steering;
pub mod systems;
pub mod walkability;

pub use collision::{resolve_dynamic_overlap, resolve_kinematic_overlap};
pub use components::{Body, Dynamic, Kinematic};
pub use config::{CollisionConfig, FlowConfig, GeneratorConfig, NavConfig};
pub use connectivity::validate_room_connectivity;
pub use dungeon_gen::{generate_bsp_dungeon, DungeonGenerator};
pub use error::{NavError, Result};
pub use geometry::Rect;
pub use grid::{generate_wall_influence_map, Grid, InfluenceMap};
pub use layout::DungeonLayout;
pub use level::{Level, LevelParams};
pub use pathfinding::{generate_flow_field, FlowField};
pub use steering::get_flow_direction;
pub use walkability::{find_nearest_walkable, has_line_of_sight, is_point_walkable};
