//! Controller state and state marker components.
//!
//! [`PlatformerState`] is the single source of truth for the movement state
//! machine. The marker components ([`Grounded`], [`Airborne`],
//! [`WallSliding`]) mirror it for use as query filters and are kept in sync
//! by the controller after every decision tick.

use bevy::prelude::*;

use crate::config::PlatformerConfig;

/// Direction the character is facing.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// `+1.0` for right, `-1.0` for left.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Unit vector pointing the way the character faces.
    #[inline]
    pub fn direction(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    /// The opposite facing.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    /// Whether a horizontal input points against this facing.
    #[inline]
    pub fn opposes(self, horizontal: f32) -> bool {
        match self {
            Facing::Right => horizontal < 0.0,
            Facing::Left => horizontal > 0.0,
        }
    }
}

/// Movement state of a platformer character.
///
/// Owned and mutated only by the controller systems. Body velocity is not
/// part of this state: it lives in the physics backend and is read and
/// overwritten through a [`BodyHandle`](crate::backend::BodyHandle).
///
/// # Invariants
///
/// After every decision tick:
/// - `current_jump_count <= max_jump_count`
/// - `is_wall_sliding` implies `!is_grounded`
/// - `can_jump` implies `current_jump_count > 0`
/// - `can_wall_slide` is true whenever `is_grounded` is true
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct PlatformerState {
    /// Raw horizontal axis from the latest decision tick.
    pub horizontal_input: f32,
    /// Facing direction; changes only through a flip.
    pub facing: Facing,
    /// Whether there is horizontal input.
    pub is_walking: bool,
    /// Ground contact as of the latest swapped probe sample.
    pub is_grounded: bool,
    /// Wall contact as of the latest swapped probe sample.
    pub is_wall_detected: bool,
    /// Airborne, against a wall and not ascending.
    pub is_wall_sliding: bool,
    /// False while the down key is held during a wall slide.
    pub can_wall_slide: bool,
    /// Jumps left before landing.
    pub current_jump_count: u32,
    /// Whether a regular jump is available.
    pub can_jump: bool,
}

impl Default for PlatformerState {
    fn default() -> Self {
        Self::new(&PlatformerConfig::default())
    }
}

impl PlatformerState {
    /// Create the spawn-time state for a character with the given config.
    pub fn new(config: &PlatformerConfig) -> Self {
        Self {
            horizontal_input: 0.0,
            facing: Facing::Right,
            is_walking: false,
            is_grounded: false,
            is_wall_detected: false,
            is_wall_sliding: false,
            can_wall_slide: true,
            current_jump_count: config.max_jump_count,
            can_jump: config.max_jump_count > 0,
        }
    }

    /// Builder: start facing the given direction.
    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Whether the character is facing right.
    #[inline]
    pub fn is_facing_right(&self) -> bool {
        self.facing == Facing::Right
    }
}

/// Marker component indicating the character is grounded.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the character is sliding down a wall.
///
/// Contains the side of the wall relative to the character.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct WallSliding {
    /// Which way the wall is (the character faces the wall while sliding).
    pub wall_side: Facing,
}

impl WallSliding {
    /// Create a wall-slide marker for a wall on the given side.
    pub fn new(wall_side: Facing) -> Self {
        Self { wall_side }
    }

    /// Check if the wall is on the left side.
    pub fn is_left(&self) -> bool {
        self.wall_side == Facing::Left
    }

    /// Check if the wall is on the right side.
    pub fn is_right(&self) -> bool {
        self.wall_side == Facing::Right
    }
}
