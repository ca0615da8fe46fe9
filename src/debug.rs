//! Probe visualization.
//!
//! Draws the ground probe circle and the wall probe ray with gizmos, colored
//! by the most recent probe result.

use bevy::prelude::*;

use crate::PlatformerSet;
use crate::config::{PlatformerConfig, ProbeAnchors};
use crate::probe::EnvironmentProbe;
use crate::state::PlatformerState;

/// Gizmo colors for [`PlatformerDebugPlugin`].
#[derive(Resource, Debug, Clone, Copy)]
pub struct ProbeGizmoColors {
    /// Color of a probe that detected something.
    pub hit: Color,
    /// Color of a probe that detected nothing.
    pub miss: Color,
}

impl Default for ProbeGizmoColors {
    fn default() -> Self {
        Self {
            hit: Color::srgb(0.0, 1.0, 0.0),
            miss: Color::srgb(1.0, 0.0, 0.0),
        }
    }
}

impl ProbeGizmoColors {
    fn pick(&self, detected: bool) -> Color {
        if detected { self.hit } else { self.miss }
    }
}

/// Plugin that draws probe gizmos for every controlled character.
///
/// Requires the gizmo plugin, which `DefaultPlugins` provides.
#[derive(Default)]
pub struct PlatformerDebugPlugin;

impl Plugin for PlatformerDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProbeGizmoColors>();
        app.add_systems(Update, draw_probe_gizmos.after(PlatformerSet::Decision));
    }
}

fn draw_probe_gizmos(
    mut gizmos: Gizmos,
    colors: Res<ProbeGizmoColors>,
    q_characters: Query<(
        &GlobalTransform,
        &PlatformerConfig,
        &PlatformerState,
        &EnvironmentProbe,
        Option<&ProbeAnchors>,
    )>,
) {
    for (transform, config, state, probe, anchors) in &q_characters {
        let anchors = anchors.copied().unwrap_or_default();
        let position = transform.translation().xy();
        let sample = probe.latest();

        gizmos.circle_2d(
            anchors.ground_anchor(position, state.facing),
            config.ground_probe_radius,
            colors.pick(sample.grounded),
        );

        let origin = anchors.wall_anchor(position, state.facing);
        gizmos.line_2d(
            origin,
            origin + state.facing.direction() * config.wall_probe_distance,
            colors.pick(sample.wall_detected),
        );
    }
}
