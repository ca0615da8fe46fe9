//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the platformer controller, and the [`BodyHandle`] seam the
//! state machine uses to read and overwrite body velocity. Swapping physics
//! engines means implementing [`PlatformerPhysicsBackend`] and registering
//! a probe system through its plugin.

use std::marker::PhantomData;

use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// The backend owns the body's velocity; the controller only reads it and
/// overwrites it through these calls, so writes are visible to the physics
/// step of the same frame.
///
/// Environment probing is engine specific (it needs the engine's query
/// pipeline), so backends provide it as a system registered by
/// [`PlatformerPhysicsBackend::plugin`] in
/// [`PlatformerSet::Probe`](crate::PlatformerSet::Probe). Such a system
/// typically wraps the engine's query API in a
/// [`SpatialQueries`](crate::probe::SpatialQueries) implementation and calls
/// [`probe_environment`](crate::probe::probe_environment).
///
/// For an example implementation, see the `rapier` module's
/// `Rapier2dBackend`.
pub trait PlatformerPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current linear velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Overwrite the linear velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an instantaneous impulse to an entity.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// By-reference access to a rigid body's velocity.
///
/// The state machine never keeps a copy of the velocity: every read goes
/// through the handle, so a write earlier in a tick is visible to later
/// checks in the same tick.
pub trait BodyHandle {
    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous impulse.
    fn apply_impulse(&mut self, impulse: Vec2);

    /// Current vertical speed.
    fn vertical_speed(&self) -> f32 {
        self.velocity().y
    }

    /// Overwrite only the vertical speed.
    fn set_vertical_speed(&mut self, speed: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec2::new(velocity.x, speed));
    }

    /// Overwrite only the horizontal speed.
    fn set_horizontal_speed(&mut self, speed: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec2::new(speed, velocity.y));
    }
}

/// [`BodyHandle`] backed by a physics backend and an ECS entity.
pub struct BackendBody<'w, B: PlatformerPhysicsBackend> {
    world: &'w mut World,
    entity: Entity,
    _marker: PhantomData<B>,
}

impl<'w, B: PlatformerPhysicsBackend> BackendBody<'w, B> {
    /// Borrow the body of `entity`.
    pub fn new(world: &'w mut World, entity: Entity) -> Self {
        Self {
            world,
            entity,
            _marker: PhantomData,
        }
    }
}

impl<B: PlatformerPhysicsBackend> BodyHandle for BackendBody<'_, B> {
    fn velocity(&self) -> Vec2 {
        B::get_velocity(self.world, self.entity)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        B::set_velocity(self.world, self.entity, velocity);
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        B::apply_impulse(self.world, self.entity, impulse);
    }
}
