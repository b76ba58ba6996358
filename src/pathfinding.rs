//! Flow field (Dijkstra map) construction.
//!
//! One field is built per frame from the pursuit target. Every agent then reads
//! its steering direction from the same field instead of running its own search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FlowConfig;
use crate::error::{NavError, Result};
use crate::grid::{wall_influence_map_with, Grid};

/// Per-cell accumulated cost to the target. `f32::INFINITY` marks walls and
/// cells that cannot reach the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowField {
    distances: Vec<f32>,
    /// World units per cell
    pub cell_size: f32,
    pub grid_w: usize,
    pub grid_h: usize,
    /// Cell the search was seeded from (the target cell or its nearest walkable substitute)
    pub target_cell: (i32, i32),
}

impl FlowField {
    /// Distance at a cell, infinite outside the grid.
    pub fn distance(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.grid_w as i32 || y >= self.grid_h as i32 {
            return f32::INFINITY;
        }
        self.distances[y as usize * self.grid_w + x as usize]
    }

    pub fn is_reachable(&self, x: i32, y: i32) -> bool {
        self.distance(x, y).is_finite()
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.grid_w as i32 && y < self.grid_h as i32
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }
}

#[derive(Clone, Copy, PartialEq)]
struct QueuedCell {
    cost: f32,
    index: usize,
}

impl Eq for QueuedCell {}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for QueuedCell {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for QueuedCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONALS: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Build a flow field toward the world point `(target_x, target_y)` with the
/// default weights.
///
/// Returns `Ok(None)` when no walkable cell lies within the seed search radius
/// of the target. Callers should fall back to direct movement for that frame.
pub fn generate_flow_field(
    target_x: f32,
    target_y: f32,
    grid: &Grid,
    cell_size: f32,
) -> Result<Option<FlowField>> {
    generate_flow_field_with(target_x, target_y, grid, cell_size, &FlowConfig::default())
}

/// Same as [`generate_flow_field`] for grids arriving as nested rows from
/// outside the crate. Malformed rows fail with [`NavError::InvalidGrid`].
pub fn generate_flow_field_from_rows(
    target_x: f32,
    target_y: f32,
    rows: &[Vec<u8>],
    cell_size: f32,
) -> Result<Option<FlowField>> {
    let grid = Grid::from_rows(rows).inspect_err(|e| warn!(error = %e, "Rejected flow field grid"))?;
    generate_flow_field(target_x, target_y, &grid, cell_size)
}

pub fn generate_flow_field_with(
    target_x: f32,
    target_y: f32,
    grid: &Grid,
    cell_size: f32,
    config: &FlowConfig,
) -> Result<Option<FlowField>> {
    puffin::profile_function!();

    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(NavError::InvalidCellSize(cell_size));
    }
    let Some(costs) =
        wall_influence_map_with(grid, config.base_cell_cost, config.wall_proximity_penalty)
    else {
        warn!(width = grid.width, height = grid.height, "Flow field requested on an empty grid");
        return Err(NavError::invalid_grid(format!(
            "grid is {}x{}",
            grid.width, grid.height
        )));
    };

    let target = (
        (target_x / cell_size).floor() as i32,
        (target_y / cell_size).floor() as i32,
    );
    let Some(seed) = find_seed(grid, target, config.seed_search_radius) else {
        debug!(?target, "No walkable cell near flow field target");
        return Ok(None);
    };
    if seed != target {
        debug!(?target, ?seed, "Relocated flow field seed to nearest walkable cell");
    }

    let (w, h) = (grid.width, grid.height);
    let mut distances = vec![f32::INFINITY; w * h];
    let mut open = BinaryHeap::new();

    let seed_index = seed.1 as usize * w + seed.0 as usize;
    distances[seed_index] = 0.0;
    open.push(QueuedCell {
        cost: 0.0,
        index: seed_index,
    });

    while let Some(QueuedCell { cost, index }) = open.pop() {
        // A shorter route reached this cell after it was queued
        if cost > distances[index] {
            continue;
        }
        let x = (index % w) as i32;
        let y = (index / w) as i32;

        let steps = CARDINALS
            .iter()
            .map(|&d| (d, 1.0))
            .chain(DIAGONALS.iter().map(|&d| (d, config.diagonal_cost)));
        for ((dx, dy), multiplier) in steps {
            let (nx, ny) = (x + dx, y + dy);
            if !grid.is_walkable(nx, ny) {
                continue;
            }
            // No squeezing between two walls that meet at a corner
            if dx != 0 && dy != 0 && !(grid.is_walkable(x + dx, y) && grid.is_walkable(x, y + dy)) {
                continue;
            }

            let next = nx as usize + ny as usize * w;
            let candidate = cost + multiplier * costs.get(nx, ny);
            if candidate < distances[next] {
                distances[next] = candidate;
                open.push(QueuedCell {
                    cost: candidate,
                    index: next,
                });
            }
        }
    }

    Ok(Some(FlowField {
        distances,
        cell_size,
        grid_w: w,
        grid_h: h,
        target_cell: seed,
    }))
}

/// The target cell if walkable, otherwise the closest walkable cell on the
/// first ring (Chebyshev radius 1..=max_radius) that has one.
fn find_seed(grid: &Grid, target: (i32, i32), max_radius: i32) -> Option<(i32, i32)> {
    if grid.is_walkable(target.0, target.1) {
        return Some(target);
    }

    for radius in 1..=max_radius {
        let mut best: Option<((i32, i32), i32)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue; // interior, already searched
                }
                let cell = (target.0 + dx, target.1 + dy);
                if !grid.is_walkable(cell.0, cell.1) {
                    continue;
                }
                let dist = dx * dx + dy * dy;
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((cell, dist));
                }
            }
        }
        if let Some((cell, _)) = best {
            return Some(cell);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FLOW_DIAGONAL_COST, FLOW_WALL_PROXIMITY_PENALTY};

    fn grid(rows: &[&[u8]]) -> Grid {
        let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_open_3x3_target_at_center() {
        let g = grid(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]);
        let field = generate_flow_field(15.0, 15.0, &g, 10.0).unwrap().unwrap();
        assert_eq!(field.grid_w, 3);
        assert_eq!(field.grid_h, 3);
        assert_eq!(field.target_cell, (1, 1));
        assert_eq!(field.distance(1, 1), 0.0);

        // Every cell touches the grid edge, so all carry the wall penalty
        let cardinal = FLOW_WALL_PROXIMITY_PENALTY;
        let diagonal = FLOW_DIAGONAL_COST * FLOW_WALL_PROXIMITY_PENALTY;
        assert!((field.distance(1, 0) - cardinal).abs() < 1e-5);
        assert!((field.distance(0, 0) - diagonal).abs() < 1e-5);
    }

    #[test]
    fn test_fully_walled_grid_returns_none() {
        let g = grid(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
        assert!(generate_flow_field(15.0, 15.0, &g, 10.0).unwrap().is_none());
    }

    #[test]
    fn test_no_corner_cutting() {
        let g = grid(&[&[1, 0, 1], &[0, 1, 0], &[1, 0, 1]]);
        let field = generate_flow_field(15.0, 15.0, &g, 10.0).unwrap().unwrap();
        assert_eq!(field.distance(1, 1), 0.0);
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert!(field.distance(x, y).is_infinite(), "corner ({x}, {y}) was reached");
        }
        assert_eq!(field.reachable_count(), 1);
    }

    #[test]
    fn test_walls_are_infinite_and_distances_non_negative() {
        let g = grid(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 0, 1],
            &[0, 0, 1, 1, 1],
        ]);
        let field = generate_flow_field(5.0, 5.0, &g, 10.0).unwrap().unwrap();
        for y in 0..4 {
            for x in 0..5 {
                let d = field.distance(x, y);
                if g.is_walkable(x, y) {
                    assert!(d.is_finite() && d >= 0.0, "({x}, {y}) = {d}");
                } else {
                    assert!(d.is_infinite());
                }
            }
        }
    }

    #[test]
    fn test_distance_grows_along_corridor() {
        let g = grid(&[&[1, 1, 1, 1, 1, 1]]);
        let field = generate_flow_field(5.0, 5.0, &g, 10.0).unwrap().unwrap();
        for x in 1..6 {
            assert!(field.distance(x, 0) > field.distance(x - 1, 0));
        }
    }

    #[test]
    fn test_disconnected_pocket_is_unreachable() {
        let g = grid(&[&[1, 1, 0, 1, 1]]);
        let field = generate_flow_field(5.0, 5.0, &g, 10.0).unwrap().unwrap();
        assert!(field.is_reachable(1, 0));
        assert!(!field.is_reachable(3, 0));
        assert!(!field.is_reachable(4, 0));
    }

    #[test]
    fn test_target_in_wall_seeds_nearest_floor() {
        let g = grid(&[&[0, 0, 0, 0], &[0, 0, 0, 1], &[0, 0, 0, 1]]);
        let field = generate_flow_field(5.0, 5.0, &g, 10.0).unwrap().unwrap();
        assert_eq!(field.target_cell, (3, 1));
        assert_eq!(field.distance(3, 1), 0.0);
    }

    #[test]
    fn test_target_out_of_bounds_within_radius() {
        let g = grid(&[&[1, 1], &[1, 1]]);
        let field = generate_flow_field(-15.0, 5.0, &g, 10.0).unwrap().unwrap();
        assert_eq!(field.target_cell, (0, 0));
        assert!(generate_flow_field(1000.0, 1000.0, &g, 10.0).unwrap().is_none());
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let err = generate_flow_field(0.0, 0.0, &Grid::new(0, 0), 10.0).unwrap_err();
        assert!(err.is_invalid_grid());

        let g = grid(&[&[1]]);
        assert!(matches!(
            generate_flow_field(0.0, 0.0, &g, 0.0),
            Err(NavError::InvalidCellSize(_))
        ));

        let ragged = vec![vec![1, 1, 1], vec![1, 1]];
        let err = generate_flow_field_from_rows(0.0, 0.0, &ragged, 10.0).unwrap_err();
        assert!(err.is_invalid_grid());
    }

    #[test]
    fn test_heap_orders_lowest_cost_first() {
        let mut heap = BinaryHeap::new();
        heap.push(QueuedCell { cost: 3.0, index: 0 });
        heap.push(QueuedCell { cost: 1.0, index: 1 });
        heap.push(QueuedCell { cost: 2.0, index: 2 });
        assert_eq!(heap.pop().map(|c| c.index), Some(1));
        assert_eq!(heap.pop().map(|c| c.index), Some(2));
    }
}
