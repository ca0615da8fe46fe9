//! Keyboard input source.
//!
//! Maps keyboard state into [`PlatformerIntent`] on entities marked with
//! [`KeyboardControlled`]. Jump is fed from key-down and key-up events.
//!
//! ## Default controls
//! - **A/D** or **Left/Right**: Move horizontally
//! - **Space**: Jump (release early for a short hop)
//! - **S/Down** (hold): Drop off a wall faster

use bevy::prelude::*;

use crate::PlatformerSet;
use crate::input::PlatformerIntent;

/// Marker for characters driven by the keyboard.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct KeyboardControlled;

/// Key bindings for [`KeyboardInputPlugin`].
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    /// Keys that move left.
    pub left: Vec<KeyCode>,
    /// Keys that move right.
    pub right: Vec<KeyCode>,
    /// Keys that jump.
    pub jump: Vec<KeyCode>,
    /// Keys that speed up a wall slide.
    pub down: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            jump: vec![KeyCode::Space],
            down: vec![KeyCode::KeyS, KeyCode::ArrowDown],
        }
    }
}

impl KeyBindings {
    /// Horizontal axis from the current key state. Opposing keys cancel.
    pub fn axis(&self, keyboard: &ButtonInput<KeyCode>) -> f32 {
        let mut horizontal = 0.0;
        if keyboard.any_pressed(self.left.iter().copied()) {
            horizontal -= 1.0;
        }
        if keyboard.any_pressed(self.right.iter().copied()) {
            horizontal += 1.0;
        }
        horizontal
    }
}

/// Plugin that feeds keyboard input into the controller.
///
/// Requires `ButtonInput<KeyCode>`, which `DefaultPlugins` provides.
#[derive(Default)]
pub struct KeyboardInputPlugin;

impl Plugin for KeyboardInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<KeyboardControlled>();
        app.init_resource::<KeyBindings>();
        app.add_systems(Update, read_keyboard.in_set(PlatformerSet::Input));
    }
}

/// Write the axis and down level into the intent, and report jump
/// key events.
fn read_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut query: Query<&mut PlatformerIntent, With<KeyboardControlled>>,
) {
    let horizontal = bindings.axis(&keyboard);
    let jump_down = keyboard.any_just_pressed(bindings.jump.iter().copied());
    let jump_up = keyboard.any_just_released(bindings.jump.iter().copied());
    let down = keyboard.any_pressed(bindings.down.iter().copied());

    for mut intent in &mut query {
        intent.set_horizontal(horizontal);
        // Press first so a tap inside one frame reads as press then release.
        if jump_down {
            intent.press_jump();
        }
        if jump_up {
            intent.release_jump();
        }
        intent.set_down_held(down);
    }
}
