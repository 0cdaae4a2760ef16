//! Frame-loop scenarios driven through the headless backend

use flappy_circle::renderer::{Drawable, RecordingBackend, Topology};
use flappy_circle::sim::{FrameOutcome, FrameState};
use flappy_circle::{GameConfig, GameFrame, InitError, ShaderError, ShaderSources};

const EPS: f32 = 1e-4;

fn config() -> GameConfig {
    GameConfig {
        seed: Some(2024),
        ..GameConfig::default()
    }
}

fn frame_with(state: FrameState) -> GameFrame<RecordingBackend> {
    let mut game = GameFrame::with_state(RecordingBackend::new(), config(), state)
        .expect("default shaders link");
    game.resize(800, 600);
    game
}

#[test]
fn fifty_frames_fall_one_unit() {
    let mut game = frame_with(FrameState::with_gap(1, 0.9));

    for _ in 0..50 {
        let outcome = game.draw_frame().unwrap();
        assert!(!outcome.is_failed());
    }

    assert!((game.state().fall_offset - 1.0).abs() < EPS);
    assert!(!game.failed());
    assert_eq!(game.backend().frames().len(), 50);
}

#[test]
fn tap_rises_once_then_falls() {
    let mut game = frame_with(FrameState::with_gap(1, 0.9));

    game.notify_tap();
    game.draw_frame().unwrap();
    assert!((game.state().fall_offset + 0.03).abs() < EPS);

    game.draw_frame().unwrap();
    assert!((game.state().fall_offset + 0.01).abs() < EPS);
}

#[test]
fn frame_draws_pose_before_advancing() {
    let mut game = frame_with(FrameState::with_gap(1, 0.9));
    game.draw_frame().unwrap();

    let outcome = game.draw_frame().unwrap();
    match outcome {
        FrameOutcome::Playing { pose, .. } => {
            assert!((pose.fall_offset - 0.02).abs() < EPS);
            assert!((pose.obstacle_shift - 0.012).abs() < EPS);
        }
        FrameOutcome::Failed { .. } => panic!("unexpected failure"),
    }
}

#[test]
fn upper_gap_edge_fails_when_column_overlaps() {
    let mut state = FrameState::with_gap(1, 0.5);
    // Circle top touches the gap's upper edge exactly
    state.fall_offset = -0.45;
    state.obstacle_shift = 1.75;
    let mut game = frame_with(state);

    let outcome = game.draw_frame().unwrap();
    assert_eq!(outcome, FrameOutcome::Failed { just_failed: true });
    assert!(game.failed());
    assert_eq!(game.state().fall_offset, 0.0);
    assert_eq!(game.state().obstacle_shift, 0.0);
}

#[test]
fn upper_gap_edge_is_safe_out_of_column_range() {
    let mut state = FrameState::with_gap(1, 0.5);
    state.fall_offset = -0.45;
    state.obstacle_shift = 0.5;
    let mut game = frame_with(state);

    let outcome = game.draw_frame().unwrap();
    assert!(!outcome.is_failed());
    assert!(!game.failed());
}

#[test]
fn failure_latches_and_shows_only_the_marker() {
    let mut state = FrameState::with_gap(1, 0.5);
    state.fall_offset = -0.45;
    state.obstacle_shift = 1.75;
    let mut game = frame_with(state);

    game.draw_frame().unwrap();
    for _ in 0..10 {
        game.notify_tap();
        let outcome = game.draw_frame().unwrap();
        assert_eq!(outcome, FrameOutcome::Failed { just_failed: false });
    }

    assert!(game.failed());
    for frame in game.backend().frames() {
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].drawable, Drawable::FailMarker);
        assert_eq!(frame.draws[0].topology, Topology::Triangles);
        assert_eq!(frame.draws[0].vertex_count, 6);
    }
}

#[test]
fn falling_out_of_the_gap_eventually_fails() {
    let mut game = frame_with(FrameState::with_gap(1, 0.2));

    let mut failed_at = None;
    for n in 0..500 {
        if game.draw_frame().unwrap().is_failed() {
            failed_at = Some(n);
            break;
        }
    }

    // The circle sinks below the gap long before the column leaves
    assert!(failed_at.is_some());
    assert!(game.failed());
}

#[test]
fn every_frame_uploads_fresh_buffers() {
    let mut game = frame_with(FrameState::with_gap(1, 0.9));
    for _ in 0..5 {
        game.draw_frame().unwrap();
    }
    // Circle and column pair, positions and colors each
    assert_eq!(game.backend().buffers_uploaded(), 5 * 4);

    let frame = game.backend().last_frame().unwrap();
    assert_eq!(frame.uniform_bytes.len(), 192);
    assert_eq!(frame.transforms, game.transforms());
}

#[test]
fn destroy_then_reconstruct_on_same_backend() {
    let game = frame_with(FrameState::with_gap(1, 0.9));
    let backend = game.destroy();
    assert!(!backend.has_program());

    let mut game = GameFrame::new(backend, config()).unwrap();
    game.resize(320, 240);
    game.draw_frame().unwrap();
    assert!(game.backend().has_program());
    assert_eq!(game.backend().viewport(), (320, 240));
}

#[test]
fn mismatched_shaders_fail_to_link() {
    let mut cfg = config();
    cfg.shaders = ShaderSources {
        fragment: "@fragment fn fs_main(@location(3) color: vec4<f32>) -> @location(0) vec4<f32> { return color; }".to_string(),
        ..ShaderSources::default()
    };

    let err = GameFrame::new(RecordingBackend::new(), cfg).err().unwrap();
    assert!(matches!(err, InitError::Shader(ShaderError::Link { .. })));
}

#[test]
fn config_json_drives_the_frame() {
    let cfg = GameConfig::from_json(r#"{ "seed": 9, "tuning": { "fall_step": 0.04 } }"#).unwrap();
    let state = FrameState::with_gap(9, 0.9);
    let mut game = GameFrame::with_state(RecordingBackend::new(), cfg, state).unwrap();

    game.draw_frame().unwrap();
    assert!((game.state().fall_offset - 0.04).abs() < EPS);
}
