//! Environment probing.
//!
//! Each physics tick the backend's probe system tests for ground (a circle
//! overlap under the body) and walls (a short ray along the facing
//! direction). Results are double buffered in [`EnvironmentProbe`]: the
//! physics tick writes the `next` slot, and the decision tick swaps it into
//! `current` before deriving state. The decision tick therefore always sees
//! the world as it was before the most recent physics tick moved the body.

use bevy::prelude::*;

use crate::config::{PlatformerConfig, ProbeAnchors};
use crate::state::Facing;

/// Spatial queries a backend provides for probing.
///
/// `mask` carries the obstacle collision group bits from
/// [`PlatformerConfig::obstacle_mask`]. Implementations exclude the probing
/// body itself.
pub trait SpatialQueries {
    /// Whether any obstacle overlaps the circle.
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: u32) -> bool;

    /// Whether a ray hits an obstacle within `distance`.
    fn raycast(&self, origin: Vec2, direction: Vec2, distance: f32, mask: u32) -> bool;
}

/// Result of one environment probe.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSample {
    /// The ground circle overlaps an obstacle.
    pub grounded: bool,
    /// The wall ray hits an obstacle.
    pub wall_detected: bool,
}

impl ProbeSample {
    /// Create a sample.
    pub fn new(grounded: bool, wall_detected: bool) -> Self {
        Self {
            grounded,
            wall_detected,
        }
    }
}

/// Double-buffered probe results for a character.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct EnvironmentProbe {
    current: ProbeSample,
    next: ProbeSample,
}

impl EnvironmentProbe {
    /// Create an empty probe buffer (no ground, no wall).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result of a physics-tick probe.
    ///
    /// Later physics ticks in the same frame overwrite earlier ones.
    pub fn record(&mut self, sample: ProbeSample) {
        self.next = sample;
    }

    /// Promote the latest recorded sample to current and return it.
    ///
    /// With no physics tick since the previous swap this returns the same
    /// sample again.
    pub fn swap(&mut self) -> ProbeSample {
        self.current = self.next;
        self.current
    }

    /// Sample the decision tick is working from.
    #[inline]
    pub fn current(&self) -> ProbeSample {
        self.current
    }

    /// Most recently recorded sample, not yet seen by the decision tick.
    #[inline]
    pub fn latest(&self) -> ProbeSample {
        self.next
    }
}

/// Probe ground and wall contact for a body at `position`.
///
/// A non-positive radius or distance never detects anything.
pub fn probe_environment(
    queries: &impl SpatialQueries,
    position: Vec2,
    facing: Facing,
    anchors: &ProbeAnchors,
    config: &PlatformerConfig,
) -> ProbeSample {
    let grounded = config.ground_probe_radius > 0.0
        && queries.overlap_circle(
            anchors.ground_anchor(position, facing),
            config.ground_probe_radius,
            config.obstacle_mask,
        );

    let wall_detected = config.wall_probe_distance > 0.0
        && queries.raycast(
            anchors.wall_anchor(position, facing),
            facing.direction(),
            config.wall_probe_distance,
            config.obstacle_mask,
        );

    ProbeSample {
        grounded,
        wall_detected,
    }
}
