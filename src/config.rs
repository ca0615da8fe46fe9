//! Controller configuration components.
//!
//! This module defines the per-character tunables (speeds, forces, jump
//! count, wall-slide factors, probe sizes) and the probe anchor offsets.
//! Configuration is immutable for the lifetime of a character; it can be
//! built in code through presets and builders or loaded from a RON document.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::Facing;

/// Configuration parameters for the platformer controller.
///
/// The two jump direction vectors are normalized whenever the config is
/// constructed through [`PlatformerConfig::new`], a builder, or
/// [`PlatformerConfig::from_ron_str`]. A zero-length direction normalizes to
/// zero, which turns the corresponding wall jump into a no-op.
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[serde(default)]
pub struct PlatformerConfig {
    // === Movement ===
    /// Horizontal speed while grounded (units/second).
    pub movement_speed: f32,

    /// Whether horizontal input also overwrites velocity while airborne.
    ///
    /// Off by default: in the air, horizontal motion is whatever impulses and
    /// momentum left behind. Turning it on gives full air control.
    pub air_control: bool,

    // === Jumping ===
    /// Vertical velocity set by a regular jump.
    pub jump_force: f32,

    /// Number of jumps available before landing again (2 = double jump).
    pub max_jump_count: u32,

    /// Multiplier applied to vertical velocity when the jump key is released.
    pub variable_jump_cancel_factor: f32,

    // === Wall interaction ===
    /// Per-physics-tick vertical velocity multiplier while wall-sliding.
    pub wall_slide_speed_factor: f32,

    /// Extra multiplier on `wall_slide_speed_factor` while dropping off a wall.
    pub fast_wall_slide_factor: f32,

    /// Direction of the wall-jump impulse for a wall on the character's right.
    pub wall_jump_direction: Vec2,

    /// Direction of the wall-hop impulse for a wall on the character's right.
    pub wall_hop_direction: Vec2,

    /// Magnitude of the wall-jump impulse.
    pub wall_jump_force: f32,

    /// Magnitude of the wall-hop impulse.
    pub wall_hop_force: f32,

    // === Probes ===
    /// Radius of the ground overlap circle.
    pub ground_probe_radius: f32,

    /// Length of the wall ray.
    pub wall_probe_distance: f32,

    /// Collision group bits that count as obstacles (ground and walls).
    pub obstacle_mask: u32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            // Movement
            movement_speed: 5.0,
            air_control: false,

            // Jumping
            jump_force: 15.0,
            max_jump_count: 2,
            variable_jump_cancel_factor: 0.5,

            // Wall interaction
            wall_slide_speed_factor: 0.1,
            fast_wall_slide_factor: 8.5,
            wall_jump_direction: Vec2::new(1.0, 2.0).normalize(),
            wall_hop_direction: Vec2::new(1.0, 0.5).normalize(),
            wall_jump_force: 20.0,
            wall_hop_force: 10.0,

            // Probes
            ground_probe_radius: 0.3,
            wall_probe_distance: 0.4,
            obstacle_mask: u32::MAX,
        }
    }
}

impl PlatformerConfig {
    /// Create a config with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for the earlier, simpler controller: single jump,
    /// full air control.
    pub fn simple() -> Self {
        Self {
            max_jump_count: 1,
            air_control: true,
            ..default()
        }
    }

    /// Create a config scaled for pixel-unit worlds.
    ///
    /// Multiplies every distance and speed by `pixels_per_unit`. Impulse
    /// magnitudes are scaled too, which keeps the resulting velocity change
    /// proportional for bodies whose mass is independent of the scale.
    pub fn scaled(pixels_per_unit: f32) -> Self {
        let base = Self::default();
        Self {
            movement_speed: base.movement_speed * pixels_per_unit,
            jump_force: base.jump_force * pixels_per_unit,
            wall_jump_force: base.wall_jump_force * pixels_per_unit,
            wall_hop_force: base.wall_hop_force * pixels_per_unit,
            ground_probe_radius: base.ground_probe_radius * pixels_per_unit,
            wall_probe_distance: base.wall_probe_distance * pixels_per_unit,
            ..base
        }
    }

    /// Parse a config from a RON document.
    ///
    /// Missing fields take their default values. Direction vectors are
    /// normalized after parsing.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        Ok(config.normalized())
    }

    /// Read and parse a config from a RON file.
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Return a copy with both jump direction vectors normalized.
    pub fn normalized(mut self) -> Self {
        self.wall_jump_direction = self.wall_jump_direction.normalize_or_zero();
        self.wall_hop_direction = self.wall_hop_direction.normalize_or_zero();
        self
    }

    /// Impulse for a wall jump, pointing away from the wall the character
    /// is facing.
    #[inline]
    pub fn wall_jump_impulse(&self, facing: Facing) -> Vec2 {
        Self::away_from_wall(self.wall_jump_direction * self.wall_jump_force, facing)
    }

    /// Impulse for a wall hop, pointing away from the wall the character
    /// is facing.
    #[inline]
    pub fn wall_hop_impulse(&self, facing: Facing) -> Vec2 {
        Self::away_from_wall(self.wall_hop_direction * self.wall_hop_force, facing)
    }

    fn away_from_wall(impulse: Vec2, facing: Facing) -> Vec2 {
        Vec2::new(impulse.x * -facing.sign(), impulse.y)
    }

    /// Vertical velocity multiplier applied each physics tick while sliding.
    #[inline]
    pub fn wall_slide_multiplier(&self, can_wall_slide: bool) -> f32 {
        if can_wall_slide {
            self.wall_slide_speed_factor
        } else {
            self.wall_slide_speed_factor * self.fast_wall_slide_factor
        }
    }

    /// Builder: set movement speed.
    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Builder: enable or disable air control.
    pub fn with_air_control(mut self, enabled: bool) -> Self {
        self.air_control = enabled;
        self
    }

    /// Builder: set jump force.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set the number of jumps available before landing.
    pub fn with_max_jump_count(mut self, count: u32) -> Self {
        self.max_jump_count = count;
        self
    }

    /// Builder: set the variable jump cancel factor.
    pub fn with_jump_cancel_factor(mut self, factor: f32) -> Self {
        self.variable_jump_cancel_factor = factor;
        self
    }

    /// Builder: set wall-slide factors (normal and fast-descent multiplier).
    pub fn with_wall_slide(mut self, speed_factor: f32, fast_factor: f32) -> Self {
        self.wall_slide_speed_factor = speed_factor;
        self.fast_wall_slide_factor = fast_factor;
        self
    }

    /// Builder: set the wall-jump direction (normalized) and force.
    pub fn with_wall_jump(mut self, direction: Vec2, force: f32) -> Self {
        self.wall_jump_direction = direction.normalize_or_zero();
        self.wall_jump_force = force;
        self
    }

    /// Builder: set the wall-hop direction (normalized) and force.
    pub fn with_wall_hop(mut self, direction: Vec2, force: f32) -> Self {
        self.wall_hop_direction = direction.normalize_or_zero();
        self.wall_hop_force = force;
        self
    }

    /// Builder: set probe sizes.
    pub fn with_probes(mut self, ground_radius: f32, wall_distance: f32) -> Self {
        self.ground_probe_radius = ground_radius;
        self.wall_probe_distance = wall_distance;
        self
    }

    /// Builder: set the obstacle collision mask.
    pub fn with_obstacle_mask(mut self, mask: u32) -> Self {
        self.obstacle_mask = mask;
        self
    }
}

/// Local offsets of the probe anchors relative to the body origin.
///
/// Offsets are authored for a character facing right. The x component
/// mirrors when the character faces left, so a wall anchor placed at the
/// front of the body stays at the front after a flip.
///
/// Anchors coincident with the body origin are allowed.
#[derive(Component, Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[serde(default)]
pub struct ProbeAnchors {
    /// Center of the ground overlap circle.
    pub ground_offset: Vec2,
    /// Origin of the wall ray.
    pub wall_offset: Vec2,
}

impl Default for ProbeAnchors {
    fn default() -> Self {
        Self {
            ground_offset: Vec2::new(0.0, -0.5),
            wall_offset: Vec2::new(0.25, 0.0),
        }
    }
}

impl ProbeAnchors {
    /// Create anchors with the given offsets.
    pub fn new(ground_offset: Vec2, wall_offset: Vec2) -> Self {
        Self {
            ground_offset,
            wall_offset,
        }
    }

    /// Anchors placed at the edges of a box with the given half extents.
    pub fn for_box(half_extents: Vec2) -> Self {
        Self::new(
            Vec2::new(0.0, -half_extents.y),
            Vec2::new(half_extents.x, 0.0),
        )
    }

    /// World position of the ground anchor.
    #[inline]
    pub fn ground_anchor(&self, position: Vec2, facing: Facing) -> Vec2 {
        position + Self::mirrored(self.ground_offset, facing)
    }

    /// World position of the wall anchor.
    #[inline]
    pub fn wall_anchor(&self, position: Vec2, facing: Facing) -> Vec2 {
        position + Self::mirrored(self.wall_offset, facing)
    }

    fn mirrored(offset: Vec2, facing: Facing) -> Vec2 {
        Vec2::new(offset.x * facing.sign(), offset.y)
    }
}
