//! Animation telemetry.
//!
//! After every decision tick the controller projects its state into a
//! [`PlatformerTelemetry`] and publishes it to any [`AnimationSink`] on the
//! character. Telemetry never feeds back into the state machine.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::state::PlatformerState;

/// Parameter key for the walking flag.
pub const IS_WALKING: &str = "isWalking";
/// Parameter key for the grounded flag.
pub const IS_GROUNDED: &str = "isGrounded";
/// Parameter key for the wall-slide flag.
pub const IS_WALL_SLIDING: &str = "isWallSliding";
/// Parameter key for the vertical velocity.
pub const Y_VELOCITY: &str = "yVelocity";

/// Receiver of named animation parameters.
pub trait AnimationSink {
    fn set_bool(&mut self, key: &str, value: bool);
    fn set_float(&mut self, key: &str, value: f32);
}

/// Snapshot of the animation-relevant controller state.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct PlatformerTelemetry {
    pub is_walking: bool,
    pub is_grounded: bool,
    pub is_wall_sliding: bool,
    /// Body vertical velocity at the end of the decision tick.
    pub y_velocity: f32,
}

impl PlatformerTelemetry {
    /// Project controller state and the current vertical velocity.
    pub fn capture(state: &PlatformerState, y_velocity: f32) -> Self {
        Self {
            is_walking: state.is_walking,
            is_grounded: state.is_grounded,
            is_wall_sliding: state.is_wall_sliding,
            y_velocity,
        }
    }

    /// Write every parameter to the sink.
    pub fn publish(&self, sink: &mut impl AnimationSink) {
        sink.set_bool(IS_WALKING, self.is_walking);
        sink.set_bool(IS_GROUNDED, self.is_grounded);
        sink.set_bool(IS_WALL_SLIDING, self.is_wall_sliding);
        sink.set_float(Y_VELOCITY, self.y_velocity);
    }
}

/// Parameter table an animation system can read from.
///
/// Add it to a character to receive the controller's telemetry each frame.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimatorParameters {
    bools: HashMap<String, bool>,
    floats: HashMap<String, f32>,
}

impl AnimatorParameters {
    /// Create an empty parameter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a bool parameter. Unset keys read as `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.bools.get(key).copied()
    }

    /// Look up a float parameter. Unset keys read as `None`.
    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }
}

impl AnimationSink for AnimatorParameters {
    fn set_bool(&mut self, key: &str, value: bool) {
        match self.bools.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.bools.insert(key.to_owned(), value);
            }
        }
    }

    fn set_float(&mut self, key: &str, value: f32) {
        match self.floats.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.floats.insert(key.to_owned(), value);
            }
        }
    }
}
