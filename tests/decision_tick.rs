//! Schedule-level tests with a scripted physics backend.
//!
//! The backend stores velocity in a plain component and applies impulses
//! immediately, and the probe reports whatever the test scripted. Each test
//! drives `FixedUpdate` (physics tick) and `Update` (decision tick) by hand
//! and produces PROOF through explicit state/velocity checks.

use bevy::prelude::*;
use platformer_controller::backend::NoOpBackendPlugin;
use platformer_controller::prelude::*;
use platformer_controller::telemetry::{IS_GROUNDED, IS_WALKING, IS_WALL_SLIDING, Y_VELOCITY};

#[derive(Component, Default)]
struct TestVelocity(Vec2);

/// Probe result the scripted backend records each physics tick.
#[derive(Component, Default)]
struct ScriptedProbe(ProbeSample);

struct ScriptedBackend;

impl PlatformerPhysicsBackend for ScriptedBackend {
    fn plugin() -> impl Plugin {
        ScriptedBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<TestVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut v) = world.get_mut::<TestVelocity>(entity) {
            v.0 = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut v) = world.get_mut::<TestVelocity>(entity) {
            v.0 += impulse;
        }
    }
}

struct ScriptedBackendPlugin;

impl Plugin for ScriptedBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(NoOpBackendPlugin);
        app.add_systems(FixedUpdate, scripted_probe.in_set(PlatformerSet::Probe));
    }
}

fn scripted_probe(mut q: Query<(&ScriptedProbe, &mut EnvironmentProbe)>) {
    for (scripted, mut probe) in &mut q {
        probe.record(scripted.0);
    }
}

// ==================== Helpers ====================

const GROUND: ProbeSample = ProbeSample {
    grounded: true,
    wall_detected: false,
};
const AIR: ProbeSample = ProbeSample {
    grounded: false,
    wall_detected: false,
};
const WALL: ProbeSample = ProbeSample {
    grounded: false,
    wall_detected: true,
};

fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(PlatformerControllerPlugin::<ScriptedBackend>::default());
    app.finish();
    app.cleanup();
    app
}

fn spawn_character(app: &mut App, config: PlatformerConfig) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            PlatformerBundle::new(config),
            TestVelocity::default(),
            ScriptedProbe::default(),
            AnimatorParameters::new(),
            Sprite::default(),
        ))
        .id()
}

fn physics_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn decision_tick(app: &mut App) {
    app.world_mut().run_schedule(Update);
}

/// One physics tick followed by one decision tick.
fn frame(app: &mut App) {
    physics_tick(app);
    decision_tick(app);
}

fn script(app: &mut App, entity: Entity, sample: ProbeSample) {
    app.world_mut().get_mut::<ScriptedProbe>(entity).unwrap().0 = sample;
}

fn intent(app: &mut App, entity: Entity) -> Mut<'_, PlatformerIntent> {
    app.world_mut().get_mut::<PlatformerIntent>(entity).unwrap()
}

fn state(app: &App, entity: Entity) -> PlatformerState {
    *app.world().get::<PlatformerState>(entity).unwrap()
}

fn velocity(app: &App, entity: Entity) -> Vec2 {
    app.world().get::<TestVelocity>(entity).unwrap().0
}

fn set_velocity(app: &mut App, entity: Entity, v: Vec2) {
    app.world_mut().get_mut::<TestVelocity>(entity).unwrap().0 = v;
}

/// Bring a character into a settled wall slide against a wall on its right.
fn settle_into_wall_slide(app: &mut App, entity: Entity) {
    script(app, entity, WALL);
    set_velocity(app, entity, Vec2::new(0.0, -1.0));
    frame(app);
    decision_tick(app);
    let s = state(app, entity);
    assert!(s.is_wall_sliding && !s.can_jump);
}

// ==================== Probe Timing ====================

mod probe_timing {
    use super::*;

    #[test]
    fn decision_sees_probe_only_after_physics_tick() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);

        decision_tick(&mut app);
        // PROOF: no physics tick yet, so nothing has been probed
        assert!(!state(&app, character).is_grounded);

        physics_tick(&mut app);
        decision_tick(&mut app);
        assert!(state(&app, character).is_grounded);
        println!("PROOF: grounded only after a physics tick recorded the probe");
    }

    #[test]
    fn several_physics_ticks_keep_last_sample() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());

        script(&mut app, character, GROUND);
        physics_tick(&mut app);
        script(&mut app, character, AIR);
        physics_tick(&mut app);
        decision_tick(&mut app);

        assert!(!state(&app, character).is_grounded);
    }

    #[test]
    fn decision_without_physics_reuses_sample() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        script(&mut app, character, AIR);
        decision_tick(&mut app);
        decision_tick(&mut app);

        assert!(state(&app, character).is_grounded);
    }
}

// ==================== Jumping ====================

mod jumping {
    use super::*;

    #[test]
    fn double_jump_sequence() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        intent(&mut app, character).press_jump();
        decision_tick(&mut app);
        assert_eq!(velocity(&app, character).y, 15.0);
        assert_eq!(state(&app, character).current_jump_count, 1);

        // Airborne and falling, release then press again.
        script(&mut app, character, AIR);
        set_velocity(&mut app, character, Vec2::new(0.0, -4.0));
        intent(&mut app, character).release_jump();
        frame(&mut app);
        assert_eq!(velocity(&app, character).y, -2.0);

        intent(&mut app, character).press_jump();
        frame(&mut app);
        assert_eq!(velocity(&app, character).y, 15.0);
        assert_eq!(state(&app, character).current_jump_count, 0);

        // Third press is absorbed.
        intent(&mut app, character).release_jump();
        frame(&mut app);
        set_velocity(&mut app, character, Vec2::new(0.0, -6.0));
        intent(&mut app, character).press_jump();
        frame(&mut app);
        assert_eq!(velocity(&app, character).y, -6.0);
        println!("PROOF: two jumps, third absorbed");
    }

    #[test]
    fn held_jump_does_not_repeat() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        intent(&mut app, character).press_jump();
        decision_tick(&mut app);
        set_velocity(&mut app, character, Vec2::ZERO);
        decision_tick(&mut app);

        assert_eq!(velocity(&app, character).y, 0.0);
    }

    #[test]
    fn release_halves_ascent() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        intent(&mut app, character).press_jump();
        decision_tick(&mut app);
        intent(&mut app, character).release_jump();
        decision_tick(&mut app);

        // PROOF: 15 * 0.5
        assert_eq!(velocity(&app, character).y, 7.5);
    }

    #[test]
    fn tap_between_ticks_is_a_short_hop() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        {
            let mut intent = intent(&mut app, character);
            intent.press_jump();
            intent.release_jump();
        }
        decision_tick(&mut app);

        // Jump fires, then the release cuts it in the same tick.
        assert_eq!(velocity(&app, character).y, 7.5);
        assert_eq!(state(&app, character).current_jump_count, 1);
    }

    #[test]
    fn landing_restores_jumps() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, AIR);
        frame(&mut app);
        app.world_mut()
            .get_mut::<PlatformerState>(character)
            .unwrap()
            .current_jump_count = 0;

        script(&mut app, character, GROUND);
        set_velocity(&mut app, character, Vec2::new(0.0, -3.0));
        frame(&mut app);

        assert_eq!(state(&app, character).current_jump_count, 2);
        assert!(state(&app, character).can_jump);
    }

    #[test]
    fn wall_jump_pushes_off_the_wall() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        settle_into_wall_slide(&mut app, character);

        {
            let mut intent = intent(&mut app, character);
            intent.set_horizontal(-1.0);
            intent.press_jump();
        }
        decision_tick(&mut app);

        let v = velocity(&app, character);
        // PROOF: impulse points away from the wall on the right, and up
        assert!(v.x < 0.0, "expected leftward push, got {v}");
        assert!(v.y > 0.0, "expected upward push, got {v}");
        assert_eq!(state(&app, character).current_jump_count, 2);
    }

    #[test]
    fn wall_hop_without_input() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        settle_into_wall_slide(&mut app, character);

        intent(&mut app, character).press_jump();
        decision_tick(&mut app);

        let v = velocity(&app, character);
        let expected = PlatformerConfig::default().wall_hop_impulse(Facing::Right);
        assert!((v.x - expected.x).abs() < 1e-4);
        assert!((v.y - (-1.0 + expected.y)).abs() < 1e-4);
    }

    #[test]
    fn literal_config_wall_jump_has_configured_strength() {
        let mut app = create_test_app();
        let config = PlatformerConfig {
            wall_jump_direction: Vec2::new(1.0, 2.0),
            wall_jump_force: 10.0,
            ..default()
        };
        let character = spawn_character(&mut app, config);
        settle_into_wall_slide(&mut app, character);

        {
            let mut intent = intent(&mut app, character);
            intent.set_horizontal(-1.0);
            intent.press_jump();
        }
        decision_tick(&mut app);

        let impulse = velocity(&app, character) - Vec2::new(0.0, -1.0);
        assert!(
            (impulse.length() - 10.0).abs() < 1e-4,
            "expected an impulse of length 10, got {impulse}"
        );
    }
}

// ==================== Wall Slide ====================

mod wall_slide {
    use super::*;

    #[test]
    fn damping_applied_on_physics_tick() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        settle_into_wall_slide(&mut app, character);

        set_velocity(&mut app, character, Vec2::new(0.0, -10.0));
        physics_tick(&mut app);

        // PROOF: -10 * 0.1
        assert!((velocity(&app, character).y - -1.0).abs() < 1e-5);
    }

    #[test]
    fn holding_down_drops_faster() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        settle_into_wall_slide(&mut app, character);

        intent(&mut app, character).set_down_held(true);
        decision_tick(&mut app);
        assert!(!state(&app, character).can_wall_slide);

        set_velocity(&mut app, character, Vec2::new(0.0, -10.0));
        physics_tick(&mut app);

        // PROOF: -10 * 0.1 * 8.5
        assert!((velocity(&app, character).y - -8.5).abs() < 1e-4);
    }

    #[test]
    fn facing_locked_while_sliding() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        settle_into_wall_slide(&mut app, character);

        intent(&mut app, character).set_horizontal(-1.0);
        for _ in 0..3 {
            set_velocity(&mut app, character, Vec2::new(0.0, -1.0));
            frame(&mut app);
            assert_eq!(state(&app, character).facing, Facing::Right);
        }
    }

    #[test]
    fn no_damping_without_wall() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, AIR);
        frame(&mut app);

        set_velocity(&mut app, character, Vec2::new(0.0, -10.0));
        physics_tick(&mut app);
        assert_eq!(velocity(&app, character).y, -10.0);
    }
}

// ==================== Horizontal Movement ====================

mod horizontal {
    use super::*;

    #[test]
    fn grounded_walk_sets_velocity() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        intent(&mut app, character).set_horizontal(1.0);
        frame(&mut app);

        set_velocity(&mut app, character, Vec2::new(0.0, -0.5));
        physics_tick(&mut app);

        // PROOF: 1.0 * movement_speed, vertical untouched
        assert_eq!(velocity(&app, character), Vec2::new(5.0, -0.5));
    }

    #[test]
    fn airborne_keeps_momentum() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, AIR);
        intent(&mut app, character).set_horizontal(-1.0);
        frame(&mut app);

        set_velocity(&mut app, character, Vec2::new(7.0, 0.0));
        physics_tick(&mut app);
        assert_eq!(velocity(&app, character).x, 7.0);
    }

    #[test]
    fn uses_latest_probe_not_latched_flag() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        intent(&mut app, character).set_horizontal(1.0);
        frame(&mut app);

        // Walked off a ledge: the probe says airborne before the decision
        // tick has seen it.
        script(&mut app, character, AIR);
        physics_tick(&mut app);
        set_velocity(&mut app, character, Vec2::new(2.0, 0.0));
        physics_tick(&mut app);

        assert!(state(&app, character).is_grounded);
        assert_eq!(velocity(&app, character).x, 2.0);
    }

    #[test]
    fn air_control_overwrites_in_air() {
        let mut app = create_test_app();
        let config = PlatformerConfig::default().with_air_control(true);
        let character = spawn_character(&mut app, config);
        script(&mut app, character, AIR);
        intent(&mut app, character).set_horizontal(-1.0);
        frame(&mut app);

        set_velocity(&mut app, character, Vec2::new(7.0, 0.0));
        physics_tick(&mut app);
        assert_eq!(velocity(&app, character).x, -5.0);
    }
}

// ==================== Telemetry and Markers ====================

mod presentation {
    use super::*;

    #[test]
    fn animator_receives_parameters() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        intent(&mut app, character).set_horizontal(1.0);
        set_velocity(&mut app, character, Vec2::new(0.0, -0.25));
        frame(&mut app);

        let params = app.world().get::<AnimatorParameters>(character).unwrap();
        assert_eq!(params.get_bool(IS_WALKING), Some(true));
        assert_eq!(params.get_bool(IS_GROUNDED), Some(true));
        assert_eq!(params.get_bool(IS_WALL_SLIDING), Some(false));
        assert_eq!(params.get_float(Y_VELOCITY), Some(-0.25));
    }

    #[test]
    fn telemetry_reflects_jump_velocity() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        intent(&mut app, character).press_jump();
        decision_tick(&mut app);

        let telemetry = app.world().get::<PlatformerTelemetry>(character).unwrap();
        assert_eq!(telemetry.y_velocity, 15.0);
    }

    #[test]
    fn markers_follow_state() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        script(&mut app, character, GROUND);
        frame(&mut app);

        let entity = app.world().entity(character);
        assert!(entity.contains::<Grounded>());
        assert!(!entity.contains::<Airborne>());

        settle_into_wall_slide(&mut app, character);
        let entity = app.world().entity(character);
        assert!(entity.contains::<Airborne>());
        assert!(!entity.contains::<Grounded>());
        assert!(entity.get::<WallSliding>().unwrap().is_right());

        script(&mut app, character, AIR);
        set_velocity(&mut app, character, Vec2::new(0.0, 3.0));
        frame(&mut app);
        assert!(!app.world().entity(character).contains::<WallSliding>());
    }

    #[test]
    fn sprite_mirrors_facing() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, PlatformerConfig::default());
        intent(&mut app, character).set_horizontal(-1.0);
        frame(&mut app);

        assert!(app.world().get::<Sprite>(character).unwrap().flip_x);

        intent(&mut app, character).set_horizontal(1.0);
        frame(&mut app);
        assert!(!app.world().get::<Sprite>(character).unwrap().flip_x);
    }
}
