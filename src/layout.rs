use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::geometry::Rect;
use crate::grid::{Grid, InfluenceMap};

/// Result of dungeon generation. Owned by the level for its whole lifetime and
/// replaced wholesale when the level is regenerated.
#[derive(Debug, Clone, Serialize)]
pub struct DungeonLayout {
    pub rooms: Vec<Rect>,
    pub corridors: Vec<Rect>,
    pub grid: Grid,
    /// Traversal cost per cell, infinite on walls
    pub wall_influence: InfluenceMap,
    pub cell_size: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl DungeonLayout {
    pub fn grid_width(&self) -> usize {
        self.grid.width
    }

    pub fn grid_height(&self) -> usize {
        self.grid.height
    }

    /// The whole world as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_width, self.world_height)
    }

    /// Rooms followed by corridors.
    pub fn walkable_rects(&self) -> impl Iterator<Item = &Rect> {
        self.rooms.iter().chain(self.corridors.iter())
    }

    /// Grid cell containing a world position. May be out of bounds.
    pub fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// World position of a cell's center.
    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// The room the player starts in.
    pub fn starting_room(&self) -> Option<Rect> {
        self.rooms.first().copied()
    }

    /// Centers of every room except the starting room, used to place enemies.
    pub fn spawn_points(&self) -> Vec<Vec2> {
        self.rooms.iter().skip(1).map(Rect::center).collect()
    }

    /// A uniformly random point inside a random room, keeping `margin` from the walls where possible.
    pub fn random_point_in_room(&self, rng: &mut impl Rng, margin: f32) -> Option<Vec2> {
        if self.rooms.is_empty() {
            return None;
        }
        let room = self.rooms[rng.gen_range(0..self.rooms.len())];
        let raw = Vec2::new(
            rng.gen_range(room.x..=room.right()),
            rng.gen_range(room.y..=room.bottom()),
        );
        Some(room.clamp_point(raw, margin))
    }
}

/// ASCII map: `#` wall, `.` floor, one character per grid cell.
impl fmt::Display for DungeonLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height as i32 {
            for x in 0..self.grid.width as i32 {
                let c = if self.grid.is_walkable(x, y) { '.' } else { '#' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
