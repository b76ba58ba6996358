use glam::Vec2;

/// Circular footprint of an agent, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub radius: f32,
    /// Height above the floor, 0 when grounded
    pub z: f32,
    /// Seconds left in the post-landing window during which the body does not collide
    pub landing_grace: f32,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            z: 0.0,
            landing_grace: 0.0,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_landing_grace(mut self, seconds: f32) -> Self {
        self.landing_grace = seconds;
        self
    }

    /// Count down the landing window.
    pub fn tick_grace(&mut self, dt: f32) {
        self.landing_grace = (self.landing_grace - dt).max(0.0);
    }
}

/// Marker for the agent that moves itself (the player) and pushes others aside
#[derive(Debug, Clone, Copy)]
pub struct Kinematic;

/// Marker for agents that get pushed (enemies, props)
#[derive(Debug, Clone, Copy)]
pub struct Dynamic;
