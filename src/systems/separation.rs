//! Per-tick overlap resolution over every body in the world.

use hecs::{Entity, World};

use crate::components::{Body, Dynamic, Kinematic};
use crate::config::CollisionConfig;
use crate::collision::{resolve_dynamic_overlap, resolve_kinematic_overlap_with};
use crate::layout::DungeonLayout;

/// Resolve kinematic-vs-dynamic overlaps, then dynamic-vs-dynamic overlaps.
/// Returns the dynamic entities a kinematic body touched this tick, each once.
pub fn resolve_overlaps(world: &mut World, layout: &DungeonLayout) -> Vec<Entity> {
    resolve_overlaps_with(world, layout, &CollisionConfig::default())
}

pub fn resolve_overlaps_with(
    world: &mut World,
    layout: &DungeonLayout,
    config: &CollisionConfig,
) -> Vec<Entity> {
    puffin::profile_function!();

    let mut kinematic: Vec<(Entity, Body)> = world
        .query_mut::<(&Body, &Kinematic)>()
        .into_iter()
        .map(|(id, (body, _))| (id, *body))
        .collect();
    let mut dynamic: Vec<(Entity, Body)> = world
        .query_mut::<(&Body, &Dynamic)>()
        .into_iter()
        .map(|(id, (body, _))| (id, *body))
        .collect();

    let bounds = layout.bounds();
    let mut touched = Vec::new();

    for (_, kin) in kinematic.iter_mut() {
        for (id, other) in dynamic.iter_mut() {
            if resolve_kinematic_overlap_with(kin, other, &bounds, layout, config)
                && !touched.contains(id)
            {
                touched.push(*id);
            }
        }
    }

    for i in 0..dynamic.len() {
        let (head, tail) = dynamic.split_at_mut(i + 1);
        let a = &mut head[i].1;
        for (_, b) in tail.iter_mut() {
            resolve_dynamic_overlap(a, b, &bounds);
        }
    }

    for (id, body) in kinematic.into_iter().chain(dynamic) {
        if let Ok(mut stored) = world.get::<&mut Body>(id) {
            *stored = body;
        }
    }

    touched
}

/// Count down landing windows.
pub fn tick_landing_grace(world: &mut World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Body>() {
        body.tick_grace(dt);
    }
}
