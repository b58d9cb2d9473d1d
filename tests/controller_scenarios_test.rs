//! End-to-end controller scenarios: landmarks in, camera moves and events out


use constellation_gestures::{
    config::Config,
    controller::{GestureController, TrackingStatus},
    gesture::GestureLabel,
    interaction::HandStrategy,
    source::{ReplaySource, Session},
    synthetic::SyntheticPose,
    Error,
};
use std::time::Instant;
use test_helpers::{left, responsive_config, right, unlabeled, Harness};

#[test]
fn test_right_hand_rotation_with_two_hands() {
    let mut h = Harness::new(&responsive_config(2.0));

    h.frame(0, &[right(SyntheticPose::Open, 0.5, 0.5), left(SyntheticPose::Open, 0.2, 0.5)]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::TwoHands);

    h.frame(33, &[right(SyntheticPose::Open, 0.6, 0.5), left(SyntheticPose::Open, 0.2, 0.5)]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Rotate);

    h.render(40);
    let s = h.spherical();
    assert!((s.theta + 0.2).abs() < 1e-9, "theta = {}", s.theta);
    assert!((s.radius - 3.0).abs() < 1e-9);
}

#[test]
fn test_rotation_applies_immediately_without_coalescing() {
    let mut config = responsive_config(2.0);
    config.camera.coalesce_rotations = false;
    let mut h = Harness::new(&config);

    h.frame(0, &[right(SyntheticPose::Open, 0.5, 0.5)]);
    h.frame(33, &[right(SyntheticPose::Open, 0.5, 0.6)]);
    let s = h.spherical();
    assert!((s.phi - (std::f64::consts::FRAC_PI_2 + 0.2)).abs() < 1e-9);
}

#[test]
fn test_dwell_999ms_does_not_fire_1001ms_does() {
    let mut h = Harness::new(&Config::default());
    for ms in (0..=990).step_by(33).chain([999]) {
        h.frame(ms, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    }
    assert!(h.events.borrow().activations.is_empty());

    h.frame(1001, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    assert_eq!(h.events.borrow().activations.len(), 1);
    assert_eq!(h.controller.current_gesture(), GestureLabel::DoubleClick);
}

#[test]
fn test_hand_gap_resets_dwell() {
    let mut h = Harness::new(&Config::default());
    for ms in (0..=495).step_by(33) {
        h.frame(ms, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    }
    h.frame(500, &[]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Idle);

    for ms in (533..=999).step_by(33) {
        h.frame(ms, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    }
    assert!(h.events.borrow().activations.is_empty());

    h.frame(1533, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    assert_eq!(h.events.borrow().activations.len(), 1);
}

#[test]
fn test_left_hand_dwell_end_to_end() {
    let mut h = Harness::new(&Config::default());
    for ms in (0..=1050).step_by(30) {
        h.frame(ms, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    }

    let events = h.events.borrow();
    assert_eq!(events.activations.len(), 1);
    let (position, at) = events.activations[0];
    let elapsed = at.duration_since(h.t0).as_millis();
    assert!((1000..1050).contains(&elapsed), "fired at {elapsed} ms");
    assert!((position.x - 0.7).abs() < 1e-12);
    assert!((position.y - 0.4).abs() < 1e-12);
    assert_eq!(events.cursor.last().copied(), Some(position));
}

#[test]
fn test_no_hand_frame_prevents_jump() {
    let mut h = Harness::new(&responsive_config(2.0));
    h.frame(0, &[right(SyntheticPose::Open, 0.5, 0.5)]);
    h.frame(33, &[right(SyntheticPose::Open, 0.6, 0.5)]);
    h.render(40);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Rotate);
    let before = h.spherical();

    h.frame(66, &[]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Idle);

    h.frame(99, &[right(SyntheticPose::Open, 0.9, 0.2)]);
    h.render(100);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Hand);
    let after = h.spherical();
    assert!((after.theta - before.theta).abs() < 1e-12);
    assert!((after.phi - before.phi).abs() < 1e-12);
}

#[test]
fn test_repeated_label_recorded_once() {
    let mut h = Harness::new(&Config::default());
    for i in 0..20 {
        h.frame(i * 33, &[right(SyntheticPose::Fist, 0.5, 0.5)]);
    }
    let fists = h
        .controller
        .history()
        .iter()
        .filter(|r| r.label == GestureLabel::Fist)
        .count();
    assert_eq!(fists, 1);
    assert_eq!(h.controller.history().len(), 1);
    assert_eq!(h.events.borrow().labels.len(), 1);
}

#[test]
fn test_history_holds_last_ten_changes() {
    let mut h = Harness::new(&Config::default());
    for i in 0..15 {
        let hands = if i % 2 == 0 {
            vec![right(SyntheticPose::Fist, 0.5, 0.5)]
        } else {
            Vec::new()
        };
        h.frame(i * 33, &hands);
    }
    let history: Vec<_> = h.controller.history().iter().collect();
    assert_eq!(history.len(), 10);
    assert_eq!(history[9].label, GestureLabel::Fist);
    assert_eq!(history[9].at, h.at(14 * 33));
    assert_eq!(h.events.borrow().labels.len(), 15);
}

#[test]
fn test_transient_error_keeps_baseline() {
    let mut h = Harness::new(&responsive_config(1.0));
    h.frame(0, &[right(SyntheticPose::Open, 0.5, 0.5)]);
    h.controller
        .on_frame_error(&Error::SourceFrame("decoder hiccup".into()), h.at(33));
    assert_eq!(h.controller.current_gesture(), GestureLabel::Hand);

    h.frame(66, &[right(SyntheticPose::Open, 0.55, 0.5)]);
    h.render(70);
    assert!((h.spherical().theta + 0.05).abs() < 1e-9);
    assert_eq!(h.controller.stats().missed_frames, 1);
}

#[test]
fn test_two_unlabeled_hands_zoom() {
    let mut h = Harness::new(&Config::default());
    h.frame(0, &[unlabeled(SyntheticPose::Open, 0.4, 0.5), unlabeled(SyntheticPose::Open, 0.6, 0.5)]);
    assert_eq!(h.controller.strategy(), Some(HandStrategy::TwoHandDistance));

    h.frame(33, &[unlabeled(SyntheticPose::Open, 0.2, 0.5), unlabeled(SyntheticPose::Open, 0.8, 0.5)]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::ZoomOut);
    assert!((h.spherical().radius - 3.04).abs() < 1e-9);

    h.frame(66, &[unlabeled(SyntheticPose::Open, 0.45, 0.5), unlabeled(SyntheticPose::Open, 0.55, 0.5)]);
    assert_eq!(h.controller.current_gesture(), GestureLabel::ZoomIn);
    assert!((h.spherical().radius - 2.99).abs() < 1e-9);
}

#[test]
fn test_fallback_is_terminal() {
    let mut broken = ReplaySource::unavailable("hand tracking library failed to load");
    let mut controller = GestureController::new(&Config::default()).unwrap();
    assert!(!controller.start(&mut broken));
    assert!(matches!(controller.status(), TrackingStatus::Fallback { .. }));
    assert_eq!(controller.current_gesture(), GestureLabel::Fallback);

    controller.on_hands(&[right(SyntheticPose::Fist, 0.5, 0.5)], Instant::now());
    assert_eq!(controller.current_gesture(), GestureLabel::Fallback);
    assert_eq!(controller.stats().frames, 0);

    // A working source cannot revive it
    let mut working = ReplaySource::new("late", Session::default());
    assert!(!controller.start(&mut working));
    assert!(!working.is_running());
}

#[test]
fn test_stop_resets_and_ignores_later_frames() {
    let mut h = Harness::new(&Config::default());
    h.frame(0, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    assert!(h.controller.cursor().is_some());

    h.controller.stop(&mut h.source);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Idle);
    assert!(h.controller.cursor().is_none());
    assert_eq!(h.controller.status(), &TrackingStatus::Stopped);

    h.frame(2000, &[left(SyntheticPose::Pointing, 0.3, 0.4)]);
    assert!(h.events.borrow().activations.is_empty());
    assert_eq!(
        h.events.borrow().statuses.last(),
        Some(&TrackingStatus::Stopped)
    );
}

#[test]
fn test_idle_rotation_yields_to_gestures() {
    let mut config = Config::default();
    config.idle.inactivity_timeout_ms = 500;
    let mut h = Harness::new(&config);
    assert!(h.controller.idle_rotation_active());

    h.render(0);
    let start = h.camera.borrow().position();
    assert!((start - nalgebra::Vector3::new(0.0, 0.0, 3.0)).norm() > 0.0);

    h.frame(10, &[right(SyntheticPose::Fist, 0.5, 0.5)]);
    assert!(!h.controller.idle_rotation_active());
    let held = h.camera.borrow().position();
    h.render(400);
    assert_eq!(h.camera.borrow().position(), held);

    h.frame(450, &[]);
    h.render(960);
    assert!(h.controller.idle_rotation_active());
    assert!((h.spherical().radius - 3.0).abs() < 1e-9);
}

#[test]
fn test_detached_camera_is_noop() {
    let mut h = Harness::new(&responsive_config(2.0));
    h.controller.attach_camera(None);
    h.frame(0, &[right(SyntheticPose::Open, 0.5, 0.5)]);
    h.frame(33, &[right(SyntheticPose::Open, 0.7, 0.5)]);
    h.render(40);
    assert_eq!(h.controller.current_gesture(), GestureLabel::Rotate);
    assert_eq!(h.camera.borrow().position(), nalgebra::Vector3::new(0.0, 0.0, 3.0));
}
