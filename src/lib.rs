//! # `platformer_controller`
//!
//! A 2D platformer character controller with physics backend abstraction.
//!
//! This crate provides a compact, tuneable controller that:
//! - Walks with direct velocity control while grounded
//! - Supports multi-jump with variable height (releasing jump cuts the ascent)
//! - Slides down walls, with a faster drop while holding down
//! - Wall-jumps away from a wall, or wall-hops off it with no input
//! - Publishes animation parameters each frame
//! - Abstracts physics backend for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! The controller runs on two clocks:
//! 1. The **physics tick** (`FixedUpdate`) applies wall-slide damping and
//!    horizontal movement, then probes for ground and walls.
//! 2. The **decision tick** (`Update`) swaps in the latest probe result,
//!    samples input and advances the movement state machine.
//!
//! Probe results are double buffered, so the state machine always works from
//! the environment as it was one physics tick ago.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use platformer_controller::prelude::*;
//!
//! // Tune a character and build its controller components
//! let config = PlatformerConfig::default()
//!     .with_max_jump_count(3)
//!     .with_jump_force(12.0);
//! let bundle = PlatformerBundle::new(config);
//! assert_eq!(bundle.state.current_jump_count, 3);
//!
//! // These can be spawned together with physics components
//! ```

use bevy::prelude::*;

use config::PlatformerConfig;
use state::PlatformerState;

pub mod backend;
pub mod config;
pub mod debug;
pub mod error;
pub mod input;
pub mod keyboard;
pub mod machine;
pub mod probe;
pub mod state;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{BodyHandle, PlatformerPhysicsBackend};
    pub use crate::config::{PlatformerConfig, ProbeAnchors};
    pub use crate::debug::PlatformerDebugPlugin;
    pub use crate::error::ConfigError;
    pub use crate::input::{InputSnapshot, PlatformerIntent};
    pub use crate::keyboard::{KeyBindings, KeyboardControlled, KeyboardInputPlugin};
    pub use crate::machine::{DecisionOutcome, JumpAction};
    pub use crate::probe::{EnvironmentProbe, ProbeSample, SpatialQueries};
    pub use crate::state::{Airborne, Facing, Grounded, PlatformerState, WallSliding};
    pub use crate::telemetry::{AnimationSink, AnimatorParameters, PlatformerTelemetry};
    pub use crate::{PlatformerBundle, PlatformerControllerPlugin, PlatformerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dPlatformerBundle};
}

/// System sets for the controller, in execution order per schedule.
///
/// In `Update`: `Input` → `Decision` → `Telemetry`.
/// In `FixedUpdate`: `Movement` → `Probe`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerSet {
    /// Input sources write [`PlatformerIntent`](input::PlatformerIntent).
    Input,
    /// The state machine decision tick and marker sync.
    Decision,
    /// Animation parameters and sprite facing.
    Telemetry,
    /// Wall-slide damping and horizontal movement.
    Movement,
    /// Backend environment probes.
    Probe,
}

/// Controller components for a platformer character.
///
/// Physics components (body, velocity, collider) come from the backend.
#[derive(Bundle, Default)]
pub struct PlatformerBundle {
    /// Tunables, normalized by [`PlatformerBundle::new`].
    pub config: PlatformerConfig,
    /// Probe offsets from the body position.
    pub anchors: config::ProbeAnchors,
    /// State machine flags.
    pub state: PlatformerState,
    /// Input written by the character's input source.
    pub intent: input::PlatformerIntent,
    /// Double-buffered probe results.
    pub probe: probe::EnvironmentProbe,
    /// Parameters published after each decision tick.
    pub telemetry: telemetry::PlatformerTelemetry,
}

impl PlatformerBundle {
    /// Create the components for a character with the given config.
    ///
    /// The config's jump direction vectors are normalized here, so a config
    /// written as a struct literal behaves like one built through the
    /// presets.
    pub fn new(config: PlatformerConfig) -> Self {
        let config = config.normalized();
        Self {
            config,
            state: PlatformerState::new(&config),
            ..default()
        }
    }

    /// Set the probe anchors.
    pub fn with_anchors(mut self, anchors: config::ProbeAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// Set the initial facing.
    pub fn facing(mut self, facing: state::Facing) -> Self {
        self.state = self.state.facing(facing);
        self
    }
}

/// Main plugin for the platformer controller.
///
/// This plugin is generic over a physics backend `B` which provides the
/// body operations and environment probing.
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::PlatformerPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PlatformerPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::PlatformerConfig>();
        app.register_type::<config::ProbeAnchors>();
        app.register_type::<input::PlatformerIntent>();
        app.register_type::<probe::EnvironmentProbe>();
        app.register_type::<state::PlatformerState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::WallSliding>();
        app.register_type::<telemetry::PlatformerTelemetry>();

        app.configure_sets(
            Update,
            (
                PlatformerSet::Input,
                PlatformerSet::Decision,
                PlatformerSet::Telemetry,
            )
                .chain(),
        );
        app.configure_sets(
            FixedUpdate,
            (PlatformerSet::Movement, PlatformerSet::Probe).chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Physics tick: damping before horizontal movement
        app.add_systems(
            FixedUpdate,
            (
                systems::apply_wall_slide::<B>,
                systems::apply_horizontal_movement::<B>,
            )
                .chain()
                .in_set(PlatformerSet::Movement),
        );

        // Decision tick once per frame
        app.add_systems(
            Update,
            (systems::run_decision_tick::<B>, systems::sync_state_markers)
                .chain()
                .in_set(PlatformerSet::Decision),
        );
        app.add_systems(
            Update,
            (
                systems::publish_animation_params,
                systems::sync_sprite_facing,
            )
                .in_set(PlatformerSet::Telemetry),
        );
    }
}
