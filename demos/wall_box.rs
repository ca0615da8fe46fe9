//! Wall Box Example
//!
//! A playable example with a character in a tall box featuring:
//! - A floor
//! - Walls on both sides for wall-sliding and wall-jumping
//! - Two ledges at different heights
//!
//! ## Controls
//! - **A/D** or **Left/Right**: Move horizontally
//! - **Space**: Jump (tap for a short hop, press again in the air to double jump)
//! - **Space** against a wall: Wall jump while pushing away, wall hop with no input
//! - **S/Down** (hold) against a wall: Drop faster
//!
//! Tuning is read from `demos/wall_box.ron` when present.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use platformer_controller::prelude::*;
use platformer_controller::telemetry::{IS_GROUNDED, IS_WALKING, IS_WALL_SLIDING, Y_VELOCITY};

// ==================== Constants ====================

const CONFIG_PATH: &str = "demos/wall_box.ron";

const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.4, 0.5);

const BOX_WIDTH: f32 = 24.0;
const BOX_HEIGHT: f32 = 16.0;
const WALL_THICKNESS: f32 = 1.0;

/// World units visible per screen pixel.
const CAMERA_SCALE: f32 = 1.0 / 40.0;

// ==================== Main ====================

/// Marker for the on-screen telemetry readout.
#[derive(Component)]
struct TelemetryText;

fn load_config() -> PlatformerConfig {
    match PlatformerConfig::from_ron_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            warn!("using default tuning: {err}");
            PlatformerConfig::default()
        }
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Wall Box - Platformer Controller Example".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(RapierDebugRenderPlugin::default())
        // Platformer controller
        .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
        .add_plugins(KeyboardInputPlugin)
        .add_plugins(PlatformerDebugPlugin)
        // Systems
        .add_systems(Startup, setup)
        .add_systems(Update, update_telemetry_text.after(PlatformerSet::Telemetry))
        .run();
}

// ==================== Setup ====================

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
    ));

    spawn_box(&mut commands);
    spawn_player(&mut commands, load_config());

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        TelemetryText,
    ));
}

fn spawn_box(commands: &mut Commands) {
    let half_width = BOX_WIDTH / 2.0;
    let half_height = BOX_HEIGHT / 2.0;
    let half_wall = WALL_THICKNESS / 2.0;
    let wall_color = Color::srgb(0.3, 0.3, 0.3);

    // Floor
    spawn_static_box(
        commands,
        Vec2::new(0.0, -half_height - half_wall),
        Vec2::new(half_width, half_wall),
        wall_color,
    );

    // Left wall
    spawn_static_box(
        commands,
        Vec2::new(-half_width - half_wall, 0.0),
        Vec2::new(half_wall, half_height),
        wall_color,
    );

    // Right wall
    spawn_static_box(
        commands,
        Vec2::new(half_width + half_wall, 0.0),
        Vec2::new(half_wall, half_height),
        wall_color,
    );

    // Ledges
    let ledge_color = Color::srgb(0.4, 0.5, 0.3);
    spawn_static_box(
        commands,
        Vec2::new(-6.0, -3.0),
        Vec2::new(3.0, 0.25),
        ledge_color,
    );
    spawn_static_box(
        commands,
        Vec2::new(5.0, 1.5),
        Vec2::new(2.5, 0.25),
        ledge_color,
    );
}

fn spawn_static_box(commands: &mut Commands, position: Vec2, half_size: Vec2, color: Color) {
    commands.spawn((
        Sprite::from_color(color, half_size * 2.0),
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(half_size.x, half_size.y),
    ));
}

fn spawn_player(commands: &mut Commands, config: PlatformerConfig) {
    commands.spawn((
        Name::new("Player"),
        KeyboardControlled,
        PlatformerBundle::new(config).with_anchors(ProbeAnchors::for_box(PLAYER_HALF_EXTENTS)),
        AnimatorParameters::new(),
        Rapier2dPlatformerBundle::new(),
        Collider::cuboid(PLAYER_HALF_EXTENTS.x, PLAYER_HALF_EXTENTS.y),
        Sprite::from_color(Color::srgb(0.2, 0.6, 0.9), PLAYER_HALF_EXTENTS * 2.0),
        Transform::from_xyz(0.0, -BOX_HEIGHT / 2.0 + 2.0, 1.0),
    ));
}

// ==================== Systems ====================

/// Show the animation parameters the controller publishes.
fn update_telemetry_text(
    q_players: Query<&AnimatorParameters, With<KeyboardControlled>>,
    mut q_text: Query<&mut Text, With<TelemetryText>>,
) {
    let (Ok(params), Ok(mut text)) = (q_players.single(), q_text.single_mut()) else {
        return;
    };

    let flag = |key: &str| params.get_bool(key).unwrap_or_default();
    text.0 = format!(
        "A/D: Move | Space: Jump | S: Drop off wall\n\
         {IS_WALKING}: {}  {IS_GROUNDED}: {}  {IS_WALL_SLIDING}: {}  {Y_VELOCITY}: {:.2}",
        flag(IS_WALKING),
        flag(IS_GROUNDED),
        flag(IS_WALL_SLIDING),
        params.get_float(Y_VELOCITY).unwrap_or_default(),
    );
}
