//! Steering vectors sampled from a [`FlowField`].

use glam::Vec2;

use crate::constants::FLOW_GRADIENT_EPSILON;
use crate::pathfinding::FlowField;

const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Unit direction of travel toward the field's target at world position `(x, y)`.
///
/// Zero when there is no field, the point is outside the grid, or the point sits
/// on the target plateau with no lower neighbour to move to.
pub fn get_flow_direction(x: f32, y: f32, field: Option<&FlowField>) -> Vec2 {
    flow_direction_with(x, y, field, FLOW_GRADIENT_EPSILON)
}

pub fn flow_direction_with(x: f32, y: f32, field: Option<&FlowField>, epsilon: f32) -> Vec2 {
    let Some(field) = field else {
        return Vec2::ZERO;
    };
    if !x.is_finite() || !y.is_finite() {
        return Vec2::ZERO;
    }

    let fx = x / field.cell_size;
    let fy = y / field.cell_size;
    let cx = fx.floor() as i32;
    let cy = fy.floor() as i32;
    if !field.in_bounds(cx, cy) {
        return Vec2::ZERO;
    }

    let here = field.distance(cx, cy);
    if here.is_infinite() {
        // Inside a wall or a cut-off pocket: head for any reachable neighbour
        return lowest_cardinal(field, cx, cy, f32::INFINITY);
    }

    let direction = -interpolated_gradient(field, fx, fy, (cx, cy));
    if direction.length() < epsilon {
        return lowest_cardinal(field, cx, cy, here);
    }
    direction.normalize()
}

/// Bilinear blend of the cell gradients at the four cell centers around the
/// sample point. Corners that are walls or unreachable borrow the gradient of
/// the containing cell.
fn interpolated_gradient(field: &FlowField, fx: f32, fy: f32, containing: (i32, i32)) -> Vec2 {
    // Shift so integer coordinates land on cell centers
    let gx = fx - 0.5;
    let gy = fy - 0.5;
    let x0 = gx.floor() as i32;
    let y0 = gy.floor() as i32;
    let tx = gx - x0 as f32;
    let ty = gy - y0 as f32;

    let fallback = cell_gradient(field, containing.0, containing.1);
    let corner = |x: i32, y: i32| {
        if field.is_reachable(x, y) {
            cell_gradient(field, x, y)
        } else {
            fallback
        }
    };

    let top = corner(x0, y0).lerp(corner(x0 + 1, y0), tx);
    let bottom = corner(x0, y0 + 1).lerp(corner(x0 + 1, y0 + 1), tx);
    top.lerp(bottom, ty)
}

/// Central-difference gradient at a cell. Neighbours without a finite distance
/// take the cell's own value.
fn cell_gradient(field: &FlowField, x: i32, y: i32) -> Vec2 {
    let center = field.distance(x, y);
    let sample = |sx: i32, sy: i32| {
        let d = field.distance(sx, sy);
        if d.is_finite() {
            d
        } else {
            center
        }
    };
    Vec2::new(
        (sample(x + 1, y) - sample(x - 1, y)) * 0.5,
        (sample(x, y + 1) - sample(x, y - 1)) * 0.5,
    )
}

/// Direction to the cardinal neighbour with the lowest finite distance strictly below `below`.
fn lowest_cardinal(field: &FlowField, x: i32, y: i32, below: f32) -> Vec2 {
    let mut best: Option<(f32, (i32, i32))> = None;
    for (dx, dy) in CARDINALS {
        let d = field.distance(x + dx, y + dy);
        if d.is_finite() && d < below && best.map_or(true, |(b, _)| d < b) {
            best = Some((d, (dx, dy)));
        }
    }
    best.map_or(Vec2::ZERO, |(_, (dx, dy))| Vec2::new(dx as f32, dy as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::pathfinding::generate_flow_field;

    fn field(rows: &[&[u8]], target: (f32, f32)) -> FlowField {
        let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
        let grid = Grid::from_rows(&rows).unwrap();
        generate_flow_field(target.0, target.1, &grid, 10.0).unwrap().unwrap()
    }

    fn open_5x5() -> FlowField {
        let row: &[u8] = &[1, 1, 1, 1, 1];
        field(&[row, row, row, row, row], (25.0, 25.0))
    }

    fn assert_unit(v: Vec2) {
        assert!((v.length() - 1.0).abs() < 1e-4, "{v:?} is not unit length");
    }

    #[test]
    fn test_no_field_is_zero() {
        assert_eq!(get_flow_direction(5.0, 5.0, None), Vec2::ZERO);
    }

    #[test]
    fn test_out_of_bounds_is_zero() {
        let f = open_5x5();
        assert_eq!(get_flow_direction(-1.0, 5.0, Some(&f)), Vec2::ZERO);
        assert_eq!(get_flow_direction(5.0, 50.0, Some(&f)), Vec2::ZERO);
        assert_eq!(get_flow_direction(f32::NAN, 5.0, Some(&f)), Vec2::ZERO);
    }

    #[test]
    fn test_points_toward_target() {
        let f = open_5x5();
        let left = get_flow_direction(5.0, 25.0, Some(&f));
        assert_unit(left);
        assert!(left.x > 0.9);

        let below = get_flow_direction(25.0, 45.0, Some(&f));
        assert_unit(below);
        assert!(below.y < -0.9);

        let corner = get_flow_direction(5.0, 5.0, Some(&f));
        assert_unit(corner);
        assert!(corner.x > 0.5 && corner.y > 0.5);
    }

    #[test]
    fn test_interpolates_between_cells() {
        let f = open_5x5();
        let d = get_flow_direction(12.0, 37.0, Some(&f));
        assert_unit(d);
        assert!(d.x > 0.0 && d.y < 0.0);
    }

    #[test]
    fn test_zero_on_target_plateau() {
        let f = open_5x5();
        assert_eq!(get_flow_direction(25.0, 25.0, Some(&f)), Vec2::ZERO);
    }

    #[test]
    fn test_wall_cell_steers_to_lowest_neighbour() {
        let f = field(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]], (5.0, 15.0));
        // (1,1) is a wall and its left neighbour is the target cell
        let d = get_flow_direction(15.0, 15.0, Some(&f));
        assert_eq!(d, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_wall_without_reachable_neighbour_is_zero() {
        let f = field(&[&[1, 0, 0], &[0, 0, 0], &[0, 0, 0]], (5.0, 5.0));
        assert_eq!(get_flow_direction(25.0, 25.0, Some(&f)), Vec2::ZERO);
    }

    #[test]
    fn test_steers_around_wall() {
        // Target bottom-left, wall blocks the direct route from the top-left
        let f = field(
            &[
                &[1, 1, 1, 1],
                &[0, 0, 0, 1],
                &[1, 1, 1, 1],
            ],
            (5.0, 25.0),
        );
        let d = get_flow_direction(5.0, 5.0, Some(&f));
        assert_unit(d);
        assert!(d.x > 0.0, "expected to head east around the wall, got {d:?}");
    }
}
