//! Input intent and per-tick input snapshots.
//!
//! Input sources (keyboard, gamepad, AI, tests) write the horizontal axis and
//! the down level into a [`PlatformerIntent`], and report jump key-down and
//! key-up events. Events latch until the next decision tick consumes them, so
//! a tap that starts and ends between two ticks still registers.

use bevy::prelude::*;

/// Desired input for a platformer character.
///
/// # Example
///
/// ```rust
/// use platformer_controller::prelude::*;
///
/// let mut intent = PlatformerIntent::new();
/// intent.set_horizontal(-1.0);
/// intent.press_jump();
///
/// let snapshot = intent.take_snapshot();
/// assert_eq!(snapshot.horizontal, -1.0);
/// assert!(snapshot.jump_pressed);
///
/// // The press is an edge: holding the key does not repeat it.
/// let snapshot = intent.take_snapshot();
/// assert!(!snapshot.jump_pressed);
///
/// intent.release_jump();
/// assert!(intent.take_snapshot().jump_released);
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct PlatformerIntent {
    /// Horizontal axis (-1.0 = left, 1.0 = right). No deadzone is applied.
    pub horizontal: f32,
    /// Whether the jump key is currently held.
    pub jump_held: bool,
    /// Whether the down/crouch key is currently held.
    pub down_held: bool,
    /// Key-down event waiting for the next snapshot.
    pub(crate) jump_pressed: bool,
    /// Key-up event waiting for the next snapshot.
    pub(crate) jump_released: bool,
}

impl PlatformerIntent {
    /// Create a new idle intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis, clamped to [-1, 1].
    pub fn set_horizontal(&mut self, direction: f32) {
        self.horizontal = direction.clamp(-1.0, 1.0);
    }

    /// Set the jump key level.
    ///
    /// For sources that only know the current key state. A change of level
    /// is reported as a press or release; repeating the same level is not.
    pub fn set_jump_held(&mut self, held: bool) {
        if held && !self.jump_held {
            self.press_jump();
        } else if !held && self.jump_held {
            self.release_jump();
        }
    }

    /// Set the down/crouch key level.
    pub fn set_down_held(&mut self, held: bool) {
        self.down_held = held;
    }

    /// Report a jump key-down event.
    pub fn press_jump(&mut self) {
        self.jump_held = true;
        self.jump_pressed = true;
    }

    /// Report a jump key-up event.
    ///
    /// Ignored unless the key is held or a press is still pending.
    pub fn release_jump(&mut self) {
        if self.jump_held || self.jump_pressed {
            self.jump_held = false;
            self.jump_released = true;
        }
    }

    /// Clear all input levels.
    ///
    /// A held jump key released this way still produces a release edge on
    /// the next snapshot.
    pub fn clear(&mut self) {
        self.horizontal = 0.0;
        self.release_jump();
        self.down_held = false;
    }

    /// Sample the intent for one decision tick, consuming pending jump
    /// events.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            horizontal: self.horizontal,
            jump_pressed: std::mem::take(&mut self.jump_pressed),
            jump_released: std::mem::take(&mut self.jump_released),
            down_held: self.down_held,
        }
    }
}

/// Input sampled for a single decision tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Raw horizontal axis.
    pub horizontal: f32,
    /// Jump key went down since the previous tick.
    pub jump_pressed: bool,
    /// Jump key went up since the previous tick.
    pub jump_released: bool,
    /// Down/crouch key is held.
    pub down_held: bool,
}

impl InputSnapshot {
    /// Snapshot with only a horizontal axis.
    pub fn axis(horizontal: f32) -> Self {
        Self {
            horizontal,
            ..default()
        }
    }

    /// Builder: add a jump press edge.
    pub fn with_jump_pressed(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    /// Builder: add a jump release edge.
    pub fn with_jump_released(mut self) -> Self {
        self.jump_released = true;
        self
    }

    /// Builder: hold the down key.
    pub fn with_down_held(mut self) -> Self {
        self.down_held = true;
        self
    }
}
