//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::PlatformerSet;
use crate::backend::PlatformerPhysicsBackend;
use crate::config::{PlatformerConfig, ProbeAnchors};
use crate::probe::{EnvironmentProbe, SpatialQueries, probe_environment};
use crate::state::PlatformerState;

/// Rapier2D physics backend for the platformer controller.
///
/// This backend uses `bevy_rapier2d` for velocity and impulse operations.
/// Environment probing (circle overlap and raycast) is handled by a
/// dedicated Rapier system that receives `RapierContext` as a system
/// parameter.
pub struct Rapier2dBackend;

impl PlatformerPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // Fallback: apply as velocity change if no ExternalImpulse component
            vel.linvel += impulse;
        }
    }
}

/// Plugin that sets up Rapier2D-specific systems for the platformer controller.
///
/// When Rapier runs in the fixed schedule (`in_fixed_schedule()`), the
/// controller's movement writes land before the simulation step and the
/// probe sees the post-step positions.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                PlatformerSet::Movement.before(PhysicsSet::SyncBackend),
                PlatformerSet::Probe.after(PhysicsSet::Writeback),
            ),
        );

        app.add_systems(
            FixedUpdate,
            rapier_environment_probe.in_set(PlatformerSet::Probe),
        );
    }
}

/// [`SpatialQueries`] over a Rapier context, excluding one body.
pub struct RapierQueries<'c, 'w> {
    context: &'c RapierContext<'w>,
    exclude: Entity,
}

impl<'c, 'w> RapierQueries<'c, 'w> {
    /// Queries that ignore the rigid body `exclude` and sensors.
    pub fn new(context: &'c RapierContext<'w>, exclude: Entity) -> Self {
        Self { context, exclude }
    }

    fn filter(&self, mask: u32) -> QueryFilter<'static> {
        QueryFilter::default()
            .exclude_rigid_body(self.exclude)
            .exclude_sensors()
            .groups(CollisionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(mask),
            ))
    }
}

impl SpatialQueries for RapierQueries<'_, '_> {
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: u32) -> bool {
        let shape = Collider::ball(radius);
        self.context
            .query_pipeline
            .intersection_with_shape(
                self.context.colliders,
                self.context.rigidbody_set,
                center,
                0.0,
                &shape,
                self.filter(mask),
            )
            .is_some()
    }

    fn raycast(&self, origin: Vec2, direction: Vec2, distance: f32, mask: u32) -> bool {
        self.context
            .cast_ray(
                origin,
                direction,
                distance,
                true, // solid = true so a ray starting inside a wall hits it
                self.filter(mask),
            )
            .is_some()
    }
}

/// Rapier-specific environment probe.
///
/// Reads `Transform` rather than `GlobalTransform`: after writeback the
/// former already holds the stepped position, the latter only after
/// propagation.
fn rapier_environment_probe(
    rapier_context: ReadRapierContext,
    mut q_characters: Query<(
        Entity,
        &Transform,
        &PlatformerConfig,
        &PlatformerState,
        Option<&ProbeAnchors>,
        &mut EnvironmentProbe,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, state, anchors, mut probe) in &mut q_characters {
        let queries = RapierQueries::new(&context, entity);
        let anchors = anchors.copied().unwrap_or_default();
        let sample = probe_environment(
            &queries,
            transform.translation.xy(),
            state.facing,
            &anchors,
            config,
        );
        probe.record(sample);
    }
}

/// A bundle containing the Rapier2D physics components a platformer
/// character needs.
///
/// # Example
///
/// ```ignore
/// commands.spawn((
///     PlatformerBundle::new(PlatformerConfig::default())
///         .with_anchors(ProbeAnchors::for_box(Vec2::new(0.5, 0.5))),
///     Rapier2dPlatformerBundle::new(),
///     Collider::cuboid(0.5, 0.5),
/// ));
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `velocity`: Zero velocity (overwritten by the controller)
/// - `external_impulse`: Zero impulse (used for wall jumps and hops)
/// - `locked_axes`: [`LockedAxes::ROTATION_LOCKED`]
/// - `damping`: None, so jump heights depend only on gravity
/// - `friction`: Zero with the `Min` combine rule, so the body slides along
///   walls instead of sticking to them
#[derive(Bundle)]
pub struct Rapier2dPlatformerBundle {
    /// The rigid body type. Should typically be [`RigidBody::Dynamic`].
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Updated by Rapier each physics step.
    pub velocity: Velocity,
    /// Accumulated impulses, consumed by the next simulation step.
    pub external_impulse: ExternalImpulse,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Damping coefficients for velocity reduction.
    pub damping: Damping,
    /// Contact friction of the character's collider.
    pub friction: Friction,
}

impl Default for Rapier2dPlatformerBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier2dPlatformerBundle {
    /// Create a character bundle with rotation locked and no damping.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            friction: Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
        }
    }

    /// Set the rigid body type for the character.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set the damping coefficients for velocity reduction.
    ///
    /// Linear damping also slows falls and wall slides, so keep it small.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }

    /// Set which axes should be locked for the rigid body.
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }

    /// Set the contact friction coefficient.
    pub fn with_friction(mut self, coefficient: f32) -> Self {
        self.friction.coefficient = coefficient;
        self
    }
}
