//! The current level: its generated layout and this frame's flow field.

use glam::Vec2;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::NavConfig;
use crate::constants::{
    DUNGEON_DEFAULT_HEIGHT, DUNGEON_DEFAULT_MAX_DEPTH, DUNGEON_DEFAULT_MIN_ROOM_SIZE,
    DUNGEON_DEFAULT_WIDTH,
};
use crate::dungeon_gen::DungeonGenerator;
use crate::error::{NavError, Result};
use crate::layout::DungeonLayout;
use crate::pathfinding::{generate_flow_field_with, FlowField};
use crate::steering::flow_direction_with;
use crate::systems::separation::resolve_overlaps_with;
use crate::walkability::{find_nearest_walkable, has_line_of_sight, is_point_walkable};

/// Size and partition limits of a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    pub width: f32,
    pub height: f32,
    pub min_room_size: f32,
    pub max_depth: u32,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            min_room_size: DUNGEON_DEFAULT_MIN_ROOM_SIZE,
            max_depth: DUNGEON_DEFAULT_MAX_DEPTH,
        }
    }
}

/// Owns the layout for the lifetime of the level and the flow field for the
/// current frame. Regeneration replaces both.
#[derive(Debug)]
pub struct Level {
    config: NavConfig,
    params: LevelParams,
    seed: u64,
    layout: DungeonLayout,
    flow_field: Option<FlowField>,
}

impl Level {
    /// Generate a level. Fails only on a bad config or world size; everything
    /// the generator runs into after that is repaired internally.
    pub fn generate(config: NavConfig, params: LevelParams, seed: u64) -> Result<Self> {
        config.validate()?;
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(params.width) || !valid(params.height) {
            return Err(NavError::InvalidDimensions {
                width: params.width,
                height: params.height,
            });
        }

        let layout = build_layout(&config, &params, seed);
        Ok(Self {
            config,
            params,
            seed,
            layout,
            flow_field: None,
        })
    }

    /// Replace the layout with a fresh one from `seed`. The flow field is dropped
    /// until the next [`Level::update_flow_field`].
    pub fn regenerate(&mut self, seed: u64) {
        info!(seed, "Regenerating level");
        self.seed = seed;
        self.layout = build_layout(&self.config, &self.params, seed);
        self.flow_field = None;
    }

    /// Rebuild the flow field toward `target`. Every consumer this frame reads
    /// the same field. Returns whether the target was reachable.
    pub fn update_flow_field(&mut self, target: Vec2) -> Result<bool> {
        self.flow_field = generate_flow_field_with(
            target.x,
            target.y,
            &self.layout.grid,
            self.layout.cell_size,
            &self.config.flow,
        )?;
        if self.flow_field.is_none() {
            debug!(?target, "Flow field target unreachable, agents fall back to direct movement");
        }
        Ok(self.flow_field.is_some())
    }

    /// Steering direction at `pos`, zero if there is no field this frame.
    pub fn flow_direction(&self, pos: Vec2) -> Vec2 {
        flow_direction_with(
            pos.x,
            pos.y,
            self.flow_field.as_ref(),
            self.config.flow.gradient_epsilon,
        )
    }

    pub fn is_walkable(&self, pos: Vec2, radius: f32) -> bool {
        is_point_walkable(pos.x, pos.y, &self.layout, radius)
    }

    pub fn nearest_walkable(&self, pos: Vec2, radius: f32) -> Vec2 {
        find_nearest_walkable(pos.x, pos.y, &self.layout, radius)
    }

    pub fn line_of_sight(&self, from: Vec2, to: Vec2, step: f32) -> bool {
        has_line_of_sight(from.x, from.y, to.x, to.y, &self.layout, step)
    }

    /// Run overlap resolution over the world with this level's geometry.
    pub fn resolve_overlaps(&self, world: &mut World) -> Vec<Entity> {
        resolve_overlaps_with(world, &self.layout, &self.config.collision)
    }

    pub fn layout(&self) -> &DungeonLayout {
        &self.layout
    }

    pub fn flow_field(&self) -> Option<&FlowField> {
        self.flow_field.as_ref()
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn build_layout(config: &NavConfig, params: &LevelParams, seed: u64) -> DungeonLayout {
    let mut rng = StdRng::seed_from_u64(seed);
    DungeonGenerator::new(config.generator).generate(
        params.width,
        params.height,
        params.min_room_size,
        params.max_depth,
        &mut rng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(seed: u64) -> Level {
        Level::generate(NavConfig::default(), LevelParams::default(), seed).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let params = LevelParams {
            width: 0.0,
            ..LevelParams::default()
        };
        let err = Level::generate(NavConfig::default(), params, 1).unwrap_err();
        assert!(matches!(err, NavError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = NavConfig::default();
        config.generator.cell_size = -1.0;
        assert!(Level::generate(config, LevelParams::default(), 1).is_err());
    }

    #[test]
    fn test_no_field_until_updated() {
        let level = level(3);
        assert!(level.flow_field().is_none());
        let start = level.layout().rooms[0].center();
        assert_eq!(level.flow_direction(start), Vec2::ZERO);
    }

    #[test]
    fn test_flow_field_steers_between_rooms() {
        let mut level = level(4);
        let layout = level.layout().clone();
        let target = layout.rooms[0].center();
        assert!(level.update_flow_field(target).unwrap());

        let field = level.flow_field().unwrap();
        let (tx, ty) = layout.world_to_cell(target);
        assert_eq!(field.distance(tx, ty), 0.0);

        if let Some(other) = layout.rooms.get(1) {
            let dir = level.flow_direction(other.center());
            assert!((dir.length() - 1.0).abs() < 1e-4 || dir == Vec2::ZERO);
        }
    }

    #[test]
    fn test_regenerate_replaces_layout_and_clears_field() {
        let mut level = level(5);
        let before = level.layout().rooms.clone();
        let target = before[0].center();
        level.update_flow_field(target).unwrap();

        level.regenerate(6);
        assert_eq!(level.seed(), 6);
        assert!(level.flow_field().is_none());
        assert_ne!(level.layout().rooms, before);
    }

    #[test]
    fn test_walkability_helpers_use_layout() {
        let level = level(7);
        let room = level.layout().rooms[0];
        assert!(level.is_walkable(room.center(), 5.0));
        assert!(level.line_of_sight(room.center(), room.center() + Vec2::new(1.0, 1.0), 0.0));
        let snapped = level.nearest_walkable(Vec2::new(-100.0, -100.0), 5.0);
        assert!(level.is_walkable(snapped, 5.0));
    }
}
