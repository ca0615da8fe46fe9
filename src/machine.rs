//! Movement state machine.
//!
//! The decision tick ([`PlatformerState::decide`]) runs once per rendered
//! frame and derives, in a fixed order, the jump/cancel actions, wall-slide
//! permission, facing, walking flag, jump count and wall-slide flag. The
//! physics tick ([`PlatformerState::apply_wall_slide`] and
//! [`PlatformerState::apply_horizontal_movement`]) runs at the fixed rate
//! and turns the derived state into velocity overwrites.
//!
//! Input-driven actions are evaluated against the flags derived in the
//! previous decision tick. Together with the double-buffered probe this
//! gives the controller its one-tick lag, which is part of its feel.

use bevy::prelude::*;

use crate::backend::BodyHandle;
use crate::config::PlatformerConfig;
use crate::input::InputSnapshot;
use crate::probe::ProbeSample;
use crate::state::PlatformerState;

/// Vertical speed below which the body counts as not ascending.
pub const ASCENT_EPSILON: f32 = 0.01;

/// Jump behavior fired by a jump press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpAction {
    /// Regular jump while grounded.
    Ground,
    /// Regular jump while airborne (consumes one extra jump).
    Air,
    /// Impulse away from the wall while pushing away from it.
    WallJump { impulse: Vec2 },
    /// Impulse off the wall with no directional input.
    WallHop { impulse: Vec2 },
}

/// What a decision tick did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecisionOutcome {
    /// The jump that fired, if a press was not absorbed.
    pub jump: Option<JumpAction>,
    /// Vertical velocity was cut by a jump release.
    pub jump_cancelled: bool,
    /// The character turned around.
    pub flipped: bool,
    /// Wall-slide state changed this tick.
    pub wall_slide_changed: bool,
}

impl PlatformerState {
    /// Run one decision tick.
    ///
    /// `sample` is the probe result swapped in for this tick. Velocity reads
    /// and writes go through `body`, so a jump resolved early in the tick is
    /// seen by the jump-count and wall-slide checks that follow it.
    pub fn decide(
        &mut self,
        config: &PlatformerConfig,
        sample: ProbeSample,
        input: &InputSnapshot,
        body: &mut impl BodyHandle,
    ) -> DecisionOutcome {
        let mut outcome = DecisionOutcome::default();

        self.horizontal_input = input.horizontal;
        self.is_grounded = sample.grounded;
        self.is_wall_detected = sample.wall_detected;
        // Config may have shrunk since the count was last reset.
        self.current_jump_count = self.current_jump_count.min(config.max_jump_count);

        // Input actions see the flags derived by the previous tick.
        if input.jump_pressed {
            outcome.jump = self.resolve_jump(config, body);
        }
        if input.jump_released {
            self.cancel_jump(config, body);
            outcome.jump_cancelled = true;
        }
        self.update_wall_slide_permission(input.down_held);

        outcome.flipped = self.check_flip();
        self.is_walking = self.horizontal_input.abs() > 0.0;
        self.refresh_jump_count(config, body.vertical_speed());

        let was_wall_sliding = self.is_wall_sliding;
        self.refresh_wall_slide(body.vertical_speed());
        outcome.wall_slide_changed = was_wall_sliding != self.is_wall_sliding;

        outcome
    }

    /// Resolve a jump press into one of the four jump behaviors.
    fn resolve_jump(
        &mut self,
        config: &PlatformerConfig,
        body: &mut impl BodyHandle,
    ) -> Option<JumpAction> {
        if self.can_jump {
            // Overwrite, not add: jump height is independent of fall speed.
            body.set_vertical_speed(config.jump_force);
            self.current_jump_count = self.current_jump_count.saturating_sub(1);
            Some(if self.is_grounded {
                JumpAction::Ground
            } else {
                JumpAction::Air
            })
        } else if self.is_wall_sliding
            && self.horizontal_input != 0.0
            && self.horizontal_input.signum() != self.facing.sign()
        {
            let impulse = config.wall_jump_impulse(self.facing);
            body.apply_impulse(impulse);
            Some(JumpAction::WallJump { impulse })
        } else if self.is_wall_sliding && self.horizontal_input == 0.0 {
            let impulse = config.wall_hop_impulse(self.facing);
            body.apply_impulse(impulse);
            Some(JumpAction::WallHop { impulse })
        } else {
            None
        }
    }

    /// Cut the current vertical velocity for a short hop.
    fn cancel_jump(&self, config: &PlatformerConfig, body: &mut impl BodyHandle) {
        let speed = body.vertical_speed();
        body.set_vertical_speed(speed * config.variable_jump_cancel_factor);
    }

    fn update_wall_slide_permission(&mut self, down_held: bool) {
        if self.is_wall_sliding {
            self.can_wall_slide = !down_held;
        }
        if self.is_grounded {
            self.can_wall_slide = true;
        }
    }

    /// Turn around when input opposes facing, except while pinned to a wall.
    fn check_flip(&mut self) -> bool {
        if self.facing.opposes(self.horizontal_input) && !self.is_wall_sliding {
            self.facing = self.facing.flipped();
            true
        } else {
            false
        }
    }

    fn refresh_jump_count(&mut self, config: &PlatformerConfig, vertical_speed: f32) {
        if self.is_grounded && vertical_speed < ASCENT_EPSILON {
            self.current_jump_count = config.max_jump_count;
        }
        self.can_jump = self.current_jump_count > 0 && !self.is_wall_sliding;
    }

    fn refresh_wall_slide(&mut self, vertical_speed: f32) {
        self.is_wall_sliding =
            self.is_wall_detected && !self.is_grounded && vertical_speed < ASCENT_EPSILON;
    }

    /// Physics tick: damp vertical velocity while wall-sliding.
    ///
    /// Uses the fast multiplier when the player is dropping off the wall.
    pub fn apply_wall_slide(&self, config: &PlatformerConfig, body: &mut impl BodyHandle) {
        if !self.is_wall_sliding {
            return;
        }
        let speed = body.vertical_speed();
        body.set_vertical_speed(speed * config.wall_slide_multiplier(self.can_wall_slide));
    }

    /// Physics tick: overwrite horizontal velocity from input.
    ///
    /// Only while `grounded` unless the config enables air control; in the
    /// air, horizontal motion is left to momentum and wall impulses.
    pub fn apply_horizontal_movement(
        &self,
        config: &PlatformerConfig,
        grounded: bool,
        body: &mut impl BodyHandle,
    ) {
        if grounded || config.air_control {
            body.set_horizontal_speed(self.horizontal_input * config.movement_speed);
        }
    }
}
