use serde::Serialize;

use crate::constants::{FLOW_BASE_CELL_COST, FLOW_WALL_PROXIMITY_PENALTY};
use crate::error::{NavError, Result};
use crate::geometry::Rect;

/// Cell value for walkable floor
pub const FLOOR: u8 = 1;
/// Cell value for wall
pub const WALL: u8 = 0;

/// Row-major walkability grid. Every cell is [`FLOOR`] or [`WALL`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// A grid of the given size filled with walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WALL; width * height],
        }
    }

    /// Build a grid from nested rows, as produced by external tooling or deserialization.
    /// Rejects empty, ragged and non-binary input.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(NavError::invalid_grid("grid has no rows"));
        };
        let width = first.len();
        if width == 0 {
            return Err(NavError::invalid_grid("row 0 is empty"));
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(NavError::invalid_grid(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
            if let Some(x) = row.iter().position(|&c| c != FLOOR && c != WALL) {
                return Err(NavError::invalid_grid(format!(
                    "cell ({x}, {y}) holds {}, expected 0 or 1",
                    row[x]
                )));
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Stamp rooms and corridors into a grid covering the world. A cell is floor
    /// iff its center lies inside at least one rectangle.
    pub fn rasterize<'a>(
        rects: impl IntoIterator<Item = &'a Rect>,
        world_width: f32,
        world_height: f32,
        cell_size: f32,
    ) -> Self {
        let width = (world_width / cell_size).ceil().max(0.0) as usize;
        let height = (world_height / cell_size).ceil().max(0.0) as usize;
        let mut grid = Self::new(width, height);

        for rect in rects {
            // Candidate cell range, then the exact center test
            let x0 = (rect.x / cell_size).floor().max(0.0) as usize;
            let y0 = (rect.y / cell_size).floor().max(0.0) as usize;
            let x1 = ((rect.right() / cell_size).ceil().max(0.0) as usize).min(width);
            let y1 = ((rect.bottom() / cell_size).ceil().max(0.0) as usize).min(height);
            for y in y0..y1 {
                for x in x0..x1 {
                    let cx = (x as f32 + 0.5) * cell_size;
                    let cy = (y as f32 + 0.5) * cell_size;
                    if rect.contains(cx, cy) {
                        grid.cells[y * width + x] = FLOOR;
                    }
                }
            }
        }
        grid
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Out of bounds counts as wall.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(FLOOR)
    }

    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == FLOOR).count()
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.width.max(1)).map(|r| r.to_vec()).collect()
    }

    /// True if any of the 8 neighbours is a wall or off the grid.
    pub fn touches_wall(&self, x: i32, y: i32) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx != 0 || dy != 0) && !self.is_walkable(x + dx, y + dy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Per-cell traversal cost. `f32::INFINITY` exactly where the grid is a wall.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfluenceMap {
    pub width: usize,
    pub height: usize,
    costs: Vec<f32>,
}

impl InfluenceMap {
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return f32::INFINITY;
        }
        self.costs[y as usize * self.width + x as usize]
    }
}

/// Traversal cost map with the default weights. Returns `None` for an empty grid.
pub fn generate_wall_influence_map(grid: &Grid) -> Option<InfluenceMap> {
    wall_influence_map_with(grid, FLOW_BASE_CELL_COST, FLOW_WALL_PROXIMITY_PENALTY)
}

/// Floor cells cost `base_cost`, multiplied by `penalty` when a wall sits among
/// their 8 neighbours. Walls are infinite.
pub fn wall_influence_map_with(grid: &Grid, base_cost: f32, penalty: f32) -> Option<InfluenceMap> {
    if grid.is_empty() {
        return None;
    }

    let mut costs = vec![f32::INFINITY; grid.width * grid.height];
    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            if !grid.is_walkable(x, y) {
                continue;
            }
            let cost = if grid.touches_wall(x, y) {
                base_cost * penalty
            } else {
                base_cost
            };
            costs[y as usize * grid.width + x as usize] = cost;
        }
    }

    Some(InfluenceMap {
        width: grid.width,
        height: grid.height,
        costs,
    })
}
