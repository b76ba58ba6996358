//! Circle-circle overlap resolution between agents.
//!
//! A kinematic body (the player) shoves dynamic bodies (enemies) and only moves
//! itself where the floor allows. Dynamic pairs split the overlap evenly and
//! leave wall handling to the movement step of the next tick.

use glam::Vec2;
use tracing::trace;

use crate::components::Body;
use crate::config::CollisionConfig;
use crate::constants::COLLISION_MIN_SEPARATION;
use crate::geometry::Rect;
use crate::layout::DungeonLayout;
use crate::walkability::{find_nearest_walkable, is_point_walkable};

/// Separation normal pointing from `b` to `a`, plus the distance between them.
/// Coincident bodies separate along +X.
fn separation(a: Vec2, b: Vec2) -> (Vec2, f32) {
    let delta = a - b;
    let dist = delta.length();
    if dist < COLLISION_MIN_SEPARATION {
        (Vec2::X, dist)
    } else {
        (delta / dist, dist)
    }
}

/// Push a dynamic body out of a kinematic one. Returns true if they overlapped,
/// whether or not the kinematic body could actually move.
pub fn resolve_kinematic_overlap(
    kinematic: &mut Body,
    dynamic: &mut Body,
    bounds: &Rect,
    layout: &DungeonLayout,
) -> bool {
    resolve_kinematic_overlap_with(kinematic, dynamic, bounds, layout, &CollisionConfig::default())
}

pub fn resolve_kinematic_overlap_with(
    kinematic: &mut Body,
    dynamic: &mut Body,
    bounds: &Rect,
    layout: &DungeonLayout,
    config: &CollisionConfig,
) -> bool {
    // Just landed, or high enough to pass over
    if kinematic.landing_grace > 0.0 || kinematic.z > config.jump_over_height {
        return false;
    }

    let reach = (kinematic.radius + dynamic.radius) * config.visual_radius_scale;
    let (normal, dist) = separation(kinematic.position, dynamic.position);
    if dist >= reach {
        return false;
    }
    let overlap = reach - dist;
    let push = normal * overlap;

    let radius = kinematic.radius;
    let walkable = |p: Vec2| is_point_walkable(p.x, p.y, layout, radius);
    let start = kinematic.position;
    let candidates = [
        start + push,
        start + Vec2::new(push.x, 0.0),
        start + Vec2::new(0.0, push.y),
    ];
    if let Some(&moved) = candidates.iter().find(|&&p| walkable(p)) {
        kinematic.position = moved;
    }

    dynamic.position = bounds.clamp_point(
        dynamic.position - push * config.dynamic_push_share,
        dynamic.radius,
    );

    if !walkable(kinematic.position) {
        let snapped =
            find_nearest_walkable(kinematic.position.x, kinematic.position.y, layout, radius);
        trace!(from = ?kinematic.position, to = ?snapped, "Snapped kinematic body back onto the floor");
        kinematic.position = snapped;
    }

    true
}

/// Split the overlap of two dynamic bodies evenly, using their full radii.
/// Both end up inside `bounds`. Returns true if they overlapped.
pub fn resolve_dynamic_overlap(a: &mut Body, b: &mut Body, bounds: &Rect) -> bool {
    let reach = a.radius + b.radius;
    let (normal, dist) = separation(a.position, b.position);
    if dist >= reach {
        return false;
    }

    let half = normal * ((reach - dist) * 0.5);
    a.position = bounds.clamp_point(a.position + half, a.radius);
    b.position = bounds.clamp_point(b.position - half, b.radius);
    true
}
