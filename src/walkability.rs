//! Point, disc and segment tests against the rooms and corridors of a layout.
//!
//! These work on the exact rectangles rather than the rasterized grid, so they
//! agree with the geometry the generator carved even where cells only
//! partially cover it.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

use crate::constants::{
    WALK_CORNER_OFFSET, WALK_LOS_STEP, WALK_SEARCH_RINGS, WALK_SEARCH_STEP,
};
use crate::geometry::Rect;
use crate::layout::DungeonLayout;

/// Unit offsets of the center and the 8 compass points on a disc rim.
const DISC_SAMPLES: [(f32, f32); 9] = [
    (0.0, 0.0),
    (1.0, 0.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (0.0, 1.0),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-1.0, 0.0),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

fn point_on_floor(x: f32, y: f32, layout: &DungeonLayout) -> bool {
    layout.bounds().contains(x, y) && layout.walkable_rects().any(|r| r.contains(x, y))
}

/// True if a wall corner pokes into the open disc.
///
/// Every corner of the floor outline sits where a vertical edge of one
/// rectangle meets a horizontal edge of another (or the same) rectangle, so
/// each such crossing strictly inside the disc is checked for floor on all
/// four sides.
fn wall_corner_inside(center: Vec2, radius: f32, layout: &DungeonLayout) -> bool {
    let reach = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
    let nearby: Vec<Rect> = layout
        .walkable_rects()
        .filter(|r| r.touches(&reach, 0.0))
        .copied()
        .chain(std::iter::once(layout.bounds()))
        .collect();
    let xs: Vec<f32> = nearby.iter().flat_map(|r| [r.x, r.right()]).collect();
    let ys: Vec<f32> = nearby.iter().flat_map(|r| [r.y, r.bottom()]).collect();

    xs.iter().any(|&cx| {
        ys.iter().any(|&cy| {
            let dist = center.distance(Vec2::new(cx, cy));
            if dist >= radius {
                return false;
            }
            // keep the side samples inside the disc
            let offset = ((radius - dist) * 0.25).min(WALK_CORNER_OFFSET);
            [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)]
                .iter()
                .any(|&(sx, sy)| !point_on_floor(cx + sx * offset, cy + sy * offset, layout))
        })
    })
}

/// True if a disc of `radius` centered at `(x, y)` lies on rooms and corridors.
/// The disc may straddle several rectangles (e.g. a room and the corridor leaving it).
///
/// Straight walls are caught by the center and compass samples; wall corners
/// between the samples are checked separately.
pub fn is_point_walkable(x: f32, y: f32, layout: &DungeonLayout, radius: f32) -> bool {
    if !x.is_finite() || !y.is_finite() {
        return false;
    }
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let sampled = DISC_SAMPLES
        .iter()
        .all(|&(dx, dy)| point_on_floor(x + dx * radius, y + dy * radius, layout));
    sampled && (radius == 0.0 || !wall_corner_inside(Vec2::new(x, y), radius, layout))
}

/// Closest point to `(x, y)` where a disc of `radius` is walkable.
///
/// Tries the point itself, then the point clamped into each room and corridor,
/// then expanding rings around the point. If all of that fails it returns the
/// nearest room center, and the input point only when the layout has no rooms.
pub fn find_nearest_walkable(x: f32, y: f32, layout: &DungeonLayout, radius: f32) -> Vec2 {
    puffin::profile_function!();
    let origin = Vec2::new(x, y);
    if is_point_walkable(x, y, layout, radius) {
        return origin;
    }
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    // Clamp a non-finite query onto the world so the searches below have a finite origin
    let origin = if origin.is_finite() {
        origin
    } else {
        layout.bounds().center()
    };

    let clamped = layout
        .walkable_rects()
        .map(|rect| rect.clamp_point(origin, radius))
        .filter(|p| is_point_walkable(p.x, p.y, layout, radius))
        .min_by(|a, b| origin.distance_squared(*a).total_cmp(&origin.distance_squared(*b)));
    if let Some(point) = clamped {
        return point;
    }

    for ring in 1..=WALK_SEARCH_RINGS {
        let distance = ring as f32 * WALK_SEARCH_STEP;
        let samples = 8 * ring;
        for i in 0..samples {
            let angle = i as f32 / samples as f32 * std::f32::consts::TAU;
            let p = origin + Vec2::from_angle(angle) * distance;
            if is_point_walkable(p.x, p.y, layout, radius) {
                return p;
            }
        }
    }

    layout
        .rooms
        .iter()
        .map(|room| room.center())
        .min_by(|a, b| origin.distance_squared(*a).total_cmp(&origin.distance_squared(*b)))
        .unwrap_or(origin)
}

/// True if every sample along the segment, endpoints included, is on the floor.
/// Samples are `step` apart; a non-positive step uses the default spacing.
pub fn has_line_of_sight(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    layout: &DungeonLayout,
    step: f32,
) -> bool {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        WALK_LOS_STEP
    };
    let from = Vec2::new(x1, y1);
    let to = Vec2::new(x2, y2);
    let length = from.distance(to);
    if !length.is_finite() {
        return false;
    }

    let samples = (length / step).ceil().max(1.0) as usize;
    (0..=samples).all(|i| {
        let p = from.lerp(to, i as f32 / samples as f32);
        is_point_walkable(p.x, p.y, layout, 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{generate_wall_influence_map, Grid};
    use crate::layout::tests::two_room_layout;

    /// A 100x100 room with a corridor leaving its east wall.
    fn junction_layout(corridor: Rect) -> DungeonLayout {
        let rooms = vec![Rect::new(0.0, 0.0, 100.0, 100.0)];
        let corridors = vec![corridor];
        let grid = Grid::rasterize(rooms.iter().chain(corridors.iter()), 200.0, 100.0, 10.0);
        let wall_influence = generate_wall_influence_map(&grid).unwrap();
        DungeonLayout {
            rooms,
            corridors,
            grid,
            wall_influence,
            cell_size: 10.0,
            world_width: 200.0,
            world_height: 100.0,
        }
    }

    #[test]
    fn test_point_in_room_is_walkable() {
        let layout = two_room_layout();
        assert!(is_point_walkable(40.0, 40.0, &layout, 5.0));
        assert!(is_point_walkable(10.0, 10.0, &layout, 0.0));
    }

    #[test]
    fn test_radius_must_fit_the_corridor() {
        let layout = two_room_layout();
        // corridor spans y 30..50
        assert!(is_point_walkable(100.0, 40.0, &layout, 5.0));
        assert!(!is_point_walkable(100.0, 40.0, &layout, 15.0));
    }

    #[test]
    fn test_walls_and_outside_are_not_walkable() {
        let layout = two_room_layout();
        assert!(!is_point_walkable(100.0, 70.0, &layout, 0.0));
        assert!(!is_point_walkable(-5.0, 40.0, &layout, 0.0));
        assert!(!is_point_walkable(f32::NAN, 40.0, &layout, 0.0));
    }

    #[test]
    fn test_disc_may_span_room_and_corridor() {
        let layout = two_room_layout();
        // right edge of room 0 is x = 70, the corridor continues east
        assert!(is_point_walkable(70.0, 40.0, &layout, 8.0));
    }

    #[test]
    fn test_wall_corner_at_junction_blocks_disc() {
        let layout = junction_layout(Rect::new(100.0, 40.0, 100.0, 20.0));
        // the corridor's corner at (100, 60) is 11.2 from the center, and the
        // wall just beyond it lies between two rim samples
        assert!(!is_point_walkable(95.0, 50.0, &layout, 12.0));
        assert!(!is_point_walkable(95.0, 50.0, &layout, 11.5));
        assert!(is_point_walkable(95.0, 50.0, &layout, 10.0));
        assert!(is_point_walkable(90.0, 50.0, &layout, 9.0));
    }

    #[test]
    fn test_wall_corner_from_overlapping_rects_blocks_disc() {
        // the corridor starts inside the room, so the outline corner at
        // (100, 60) is not a corner of either rectangle
        let layout = junction_layout(Rect::new(50.0, 40.0, 150.0, 20.0));
        assert!(!is_point_walkable(95.0, 50.0, &layout, 12.0));
        assert!(is_point_walkable(95.0, 50.0, &layout, 10.0));
    }

    #[test]
    fn test_nearest_walkable_clears_wall_corner() {
        let layout = junction_layout(Rect::new(100.0, 40.0, 100.0, 20.0));
        let p = find_nearest_walkable(95.0, 50.0, &layout, 12.0);
        assert!(is_point_walkable(p.x, p.y, &layout, 12.0));
        assert!(Vec2::new(100.5, 60.5).distance(p) >= 12.0);
    }

    #[test]
    fn test_nearest_walkable_keeps_walkable_point() {
        let layout = two_room_layout();
        assert_eq!(find_nearest_walkable(40.0, 40.0, &layout, 5.0), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_nearest_walkable_prefers_closest_rect() {
        let layout = two_room_layout();
        let p = find_nearest_walkable(100.0, 70.0, &layout, 5.0);
        assert_eq!(p, Vec2::new(100.0, 45.0));
        assert!(is_point_walkable(p.x, p.y, &layout, 5.0));
    }

    #[test]
    fn test_nearest_walkable_from_outside_world() {
        let layout = two_room_layout();
        let p = find_nearest_walkable(-50.0, -50.0, &layout, 5.0);
        assert_eq!(p, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn test_nearest_walkable_for_oversized_radius_uses_room_center() {
        let layout = two_room_layout();
        let p = find_nearest_walkable(100.0, 90.0, &layout, 500.0);
        assert!(layout.rooms.iter().any(|r| r.center() == p));
    }

    #[test]
    fn test_line_of_sight_through_corridor() {
        let layout = two_room_layout();
        assert!(has_line_of_sight(40.0, 40.0, 160.0, 40.0, &layout, 10.0));
        assert!(!has_line_of_sight(40.0, 20.0, 160.0, 20.0, &layout, 10.0));
    }

    #[test]
    fn test_line_of_sight_default_step_and_degenerate_segment() {
        let layout = two_room_layout();
        assert!(has_line_of_sight(40.0, 40.0, 160.0, 40.0, &layout, 0.0));
        assert!(has_line_of_sight(40.0, 40.0, 40.0, 40.0, &layout, 10.0));
        assert!(!has_line_of_sight(100.0, 70.0, 100.0, 70.0, &layout, 10.0));
    }
}
