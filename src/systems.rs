//! Core controller systems.
//!
//! Systems that touch the body run exclusively on `&mut World` and are
//! generic over the physics backend, so the state machine can read and write
//! velocity through a [`BackendBody`] without holding a query borrow.

use bevy::prelude::*;

use crate::backend::{BackendBody, PlatformerPhysicsBackend};
use crate::config::PlatformerConfig;
use crate::input::PlatformerIntent;
use crate::machine::{DecisionOutcome, JumpAction};
use crate::probe::{EnvironmentProbe, ProbeSample};
use crate::state::{Airborne, Grounded, PlatformerState, WallSliding};
use crate::telemetry::{AnimatorParameters, PlatformerTelemetry};

/// Decision tick, once per rendered frame.
///
/// Swaps the probe buffer, snapshots input, runs the state machine and
/// captures telemetry.
pub fn run_decision_tick<B: PlatformerPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, PlatformerConfig)> = world
        .query_filtered::<
            (Entity, &PlatformerConfig),
            (With<PlatformerState>, With<PlatformerIntent>),
        >()
        .iter(world)
        .map(|(e, config)| (e, *config))
        .collect();

    for (entity, config) in entities {
        let Some(input) = world
            .get_mut::<PlatformerIntent>(entity)
            .map(|mut intent| intent.take_snapshot())
        else {
            continue;
        };

        // No probe component means nothing is ever detected.
        let sample = match world.get_mut::<EnvironmentProbe>(entity) {
            Some(mut probe) => probe.swap(),
            None => ProbeSample::default(),
        };

        let Some(mut state) = world.get::<PlatformerState>(entity).copied() else {
            continue;
        };

        let outcome = {
            let mut body = BackendBody::<B>::new(world, entity);
            state.decide(&config, sample, &input, &mut body)
        };
        log_outcome(entity, &state, &outcome);

        if let Some(mut stored) = world.get_mut::<PlatformerState>(entity) {
            *stored = state;
        }

        let y_velocity = B::get_velocity(world, entity).y;
        if let Some(mut telemetry) = world.get_mut::<PlatformerTelemetry>(entity) {
            *telemetry = PlatformerTelemetry::capture(&state, y_velocity);
        }
    }
}

fn log_outcome(entity: Entity, state: &PlatformerState, outcome: &DecisionOutcome) {
    match outcome.jump {
        Some(JumpAction::Ground) => {
            debug!("{entity:?} ground jump, {} jumps left", state.current_jump_count)
        }
        Some(JumpAction::Air) => {
            debug!("{entity:?} air jump, {} jumps left", state.current_jump_count)
        }
        Some(JumpAction::WallJump { impulse }) => {
            debug!("{entity:?} wall jump, impulse {impulse}")
        }
        Some(JumpAction::WallHop { impulse }) => {
            debug!("{entity:?} wall hop, impulse {impulse}")
        }
        None => {}
    }
    if outcome.jump_cancelled {
        trace!("{entity:?} jump cancelled");
    }
    if outcome.flipped {
        trace!("{entity:?} now facing {:?}", state.facing);
    }
    if outcome.wall_slide_changed {
        debug!("{entity:?} wall sliding: {}", state.is_wall_sliding);
    }
}

/// Physics tick: wall-slide damping.
pub fn apply_wall_slide<B: PlatformerPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, PlatformerConfig, PlatformerState)> = world
        .query::<(Entity, &PlatformerConfig, &PlatformerState)>()
        .iter(world)
        .filter(|(_, _, state)| state.is_wall_sliding)
        .map(|(e, config, state)| (e, *config, *state))
        .collect();

    for (entity, config, state) in entities {
        let mut body = BackendBody::<B>::new(world, entity);
        state.apply_wall_slide(&config, &mut body);
    }
}

/// Physics tick: horizontal velocity from input.
///
/// Ground contact comes from the most recently completed probe rather than
/// the decision tick's latched flag.
pub fn apply_horizontal_movement<B: PlatformerPhysicsBackend>(world: &mut World) {
    let entities: Vec<(Entity, PlatformerConfig, PlatformerState, bool)> = world
        .query::<(
            Entity,
            &PlatformerConfig,
            &PlatformerState,
            Option<&EnvironmentProbe>,
        )>()
        .iter(world)
        .map(|(e, config, state, probe)| {
            let grounded = probe.map_or(state.is_grounded, |p| p.latest().grounded);
            (e, *config, *state, grounded)
        })
        .collect();

    for (entity, config, state, grounded) in entities {
        let mut body = BackendBody::<B>::new(world, entity);
        state.apply_horizontal_movement(&config, grounded, &mut body);
    }
}

/// Sync state marker components with [`PlatformerState`].
pub fn sync_state_markers(
    mut commands: Commands,
    q_characters: Query<(
        Entity,
        &PlatformerState,
        Has<Grounded>,
        Has<Airborne>,
        Option<&WallSliding>,
    )>,
) {
    for (entity, state, has_grounded, has_airborne, wall_sliding) in &q_characters {
        if state.is_grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !state.is_grounded && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }

        // The wall is on the side the character faces while sliding.
        match (state.is_wall_sliding, wall_sliding) {
            (true, Some(marker)) if marker.wall_side == state.facing => {}
            (true, _) => {
                commands.entity(entity).insert(WallSliding::new(state.facing));
            }
            (false, Some(_)) => {
                commands.entity(entity).remove::<WallSliding>();
            }
            (false, None) => {}
        }
    }
}

/// Mirror the sprite horizontally when facing left.
pub fn sync_sprite_facing(
    mut q_sprites: Query<(&PlatformerState, &mut Sprite), Changed<PlatformerState>>,
) {
    for (state, mut sprite) in &mut q_sprites {
        let flip = !state.is_facing_right();
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}

/// Publish telemetry to animator parameters.
pub fn publish_animation_params(
    mut q_animators: Query<(&PlatformerTelemetry, &mut AnimatorParameters)>,
) {
    for (telemetry, mut params) in &mut q_animators {
        telemetry.publish(&mut *params);
    }
}
