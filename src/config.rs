//! Runtime-tunable configuration.
//!
//! Every field defaults to the matching constant in [`crate::constants`], so a
//! JSON file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{NavError, Result};

/// Parameters for BSP dungeon generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub room_padding: f32,
    pub min_usable_room_size: f32,
    pub corridor_width: f32,
    pub min_corridor_width: f32,
    pub cell_size: f32,
    pub split_aspect_ratio: f32,
    pub repair_attempts: usize,
    pub min_entrances: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_padding: DUNGEON_ROOM_PADDING,
            min_usable_room_size: DUNGEON_MIN_USABLE_ROOM_SIZE,
            corridor_width: DUNGEON_CORRIDOR_WIDTH,
            min_corridor_width: DUNGEON_MIN_CORRIDOR_WIDTH,
            cell_size: DUNGEON_CELL_SIZE,
            split_aspect_ratio: DUNGEON_SPLIT_ASPECT_RATIO,
            repair_attempts: DUNGEON_REPAIR_ATTEMPTS,
            min_entrances: DUNGEON_MIN_ENTRANCES,
        }
    }
}

/// Parameters for flow field construction and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub base_cell_cost: f32,
    pub wall_proximity_penalty: f32,
    pub diagonal_cost: f32,
    pub seed_search_radius: i32,
    pub gradient_epsilon: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_cell_cost: FLOW_BASE_CELL_COST,
            wall_proximity_penalty: FLOW_WALL_PROXIMITY_PENALTY,
            diagonal_cost: FLOW_DIAGONAL_COST,
            seed_search_radius: FLOW_SEED_SEARCH_RADIUS,
            gradient_epsilon: FLOW_GRADIENT_EPSILON,
        }
    }
}

/// Parameters for overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub visual_radius_scale: f32,
    pub jump_over_height: f32,
    pub dynamic_push_share: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            visual_radius_scale: COLLISION_VISUAL_RADIUS_SCALE,
            jump_over_height: COLLISION_JUMP_OVER_HEIGHT,
            dynamic_push_share: COLLISION_DYNAMIC_PUSH_SHARE,
        }
    }
}

/// Top-level configuration, one section per subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub generator: GeneratorConfig,
    pub flow: FlowConfig,
    pub collision: CollisionConfig,
}

impl NavConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: NavConfig =
            serde_json::from_str(json).map_err(|e| NavError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the algorithms cannot work with.
    pub fn validate(&self) -> Result<()> {
        let g = &self.generator;
        positive("generator.cell_size", g.cell_size)?;
        positive("generator.corridor_width", g.corridor_width)?;
        positive("generator.min_usable_room_size", g.min_usable_room_size)?;
        non_negative("generator.room_padding", g.room_padding)?;
        non_negative("generator.min_corridor_width", g.min_corridor_width)?;
        if g.split_aspect_ratio < 1.0 {
            return Err(NavError::Config(format!(
                "generator.split_aspect_ratio must be >= 1, got {}",
                g.split_aspect_ratio
            )));
        }
        if g.corridor_width < g.min_corridor_width {
            return Err(NavError::Config(
                "generator.corridor_width is below generator.min_corridor_width".into(),
            ));
        }

        let f = &self.flow;
        positive("flow.base_cell_cost", f.base_cell_cost)?;
        positive("flow.wall_proximity_penalty", f.wall_proximity_penalty)?;
        positive("flow.diagonal_cost", f.diagonal_cost)?;
        positive("flow.gradient_epsilon", f.gradient_epsilon)?;
        if f.seed_search_radius < 0 {
            return Err(NavError::Config("flow.seed_search_radius must be >= 0".into()));
        }

        let c = &self.collision;
        positive("collision.visual_radius_scale", c.visual_radius_scale)?;
        non_negative("collision.jump_over_height", c.jump_over_height)?;
        if !(0.0..=1.0).contains(&c.dynamic_push_share) {
            return Err(NavError::Config(
                "collision.dynamic_push_share must be within 0..=1".into(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavError::Config(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NavError::Config(format!("{name} must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(NavConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = NavConfig::from_json_str(r#"{ "generator": { "cell_size": 10.0 } }"#).unwrap();
        assert_eq!(config.generator.cell_size, 10.0);
        assert_eq!(config.generator.corridor_width, DUNGEON_CORRIDOR_WIDTH);
        assert_eq!(config.flow, FlowConfig::default());
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let err = NavConfig::from_json_str(r#"{ "generator": { "cell_size": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, NavError::Config(_)));
    }

    #[test]
    fn test_rejects_push_share_above_one() {
        let err =
            NavConfig::from_json_str(r#"{ "collision": { "dynamic_push_share": 1.5 } }"#).unwrap_err();
        assert!(err.to_string().contains("dynamic_push_share"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(NavConfig::from_json_str("{ not json").is_err());
    }
}
