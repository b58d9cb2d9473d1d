//! Benchmarks for the per-frame gesture pipeline

use constellation_gestures::{
    app::synthetic_session,
    camera::{CameraAdapter, OrbitRig, RotationIntent},
    classifier::{ClassifierTier, GestureClassifier},
    config::{CameraConfig, ClassifierConfig, Config},
    controller::GestureController,
    filters::create_filter,
    interaction::InteractionEngine,
    landmarks::{HandObservation, Handedness, Point2D},
    source::{LandmarkSource, ReplaySource},
    synthetic::{synthetic_hand, SyntheticPose},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::{Duration, Instant};

fn hands() -> Vec<(&'static str, HandObservation)> {
    let tip = Point2D::new(0.5, 0.4);
    [
        ("open", SyntheticPose::Open),
        ("fist", SyntheticPose::Fist),
        ("pointing", SyntheticPose::Pointing),
        ("pinching", SyntheticPose::Pinching),
    ]
    .into_iter()
    .filter_map(|(name, pose)| synthetic_hand(pose, tip, None).ok().map(|h| (name, h)))
    .collect()
}

fn benchmark_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");

    for tier in [ClassifierTier::Exact, ClassifierTier::Cheap] {
        let classifier = GestureClassifier::new(&ClassifierConfig {
            tier,
            ..ClassifierConfig::default()
        });
        for (name, hand) in hands() {
            group.bench_with_input(
                BenchmarkId::new(format!("{tier:?}").to_lowercase(), name),
                &hand,
                |b, hand| b.iter(|| black_box(classifier.classify(black_box(hand)))),
            );
        }
    }

    group.finish();
}

fn benchmark_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing");
    let path: Vec<Point2D> = (0..100)
        .map(|i| {
            let t = f64::from(i) * 0.05;
            Point2D::new(0.5 + 0.2 * t.sin() + 0.003 * rand::random::<f64>(), 0.5)
        })
        .collect();

    for spec in ["none", "exponential:0.3", "moving_average:5"] {
        let Ok(mut filter) = create_filter(spec) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("sequence_100", spec), &path, |b, path| {
            b.iter(|| {
                filter.reset();
                for &p in path {
                    black_box(filter.apply(black_box(p)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let t0 = Instant::now();

    let sweep: Vec<Vec<HandObservation>> = (0..60)
        .filter_map(|i| {
            let x = 0.3 + 0.4 * f64::from(i) / 59.0;
            let right = synthetic_hand(SyntheticPose::Open, Point2D::new(x, 0.5), Some(Handedness::Right)).ok()?;
            let left = synthetic_hand(SyntheticPose::Pointing, Point2D::new(0.3, 0.4), Some(Handedness::Left)).ok()?;
            Some(vec![right, left])
        })
        .collect();

    let mut config = Config::default();
    config.rotation.frame_skip = 1;
    if let Ok(mut engine) = InteractionEngine::new(&config) {
        group.bench_function("two_hand_sweep_60", |b| {
            b.iter(|| {
                engine.reset();
                for (i, frame) in sweep.iter().enumerate() {
                    let now = t0 + Duration::from_millis(33 * i as u64);
                    black_box(engine.process(black_box(frame), now));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_camera(c: &mut Criterion) {
    let mut group = c.benchmark_group("camera");
    let rig = OrbitRig::default().into_handle();
    let mut adapter = CameraAdapter::new(&CameraConfig::default());
    adapter.attach(Some(&rig));

    group.bench_function("rotate", |b| {
        b.iter(|| adapter.rotate(black_box(RotationIntent::new(0.01, 0.005))));
    });
    group.bench_function("submit_and_flush", |b| {
        b.iter(|| {
            adapter.submit_rotation(black_box(RotationIntent::new(0.01, -0.005)));
            adapter.flush()
        });
    });

    group.finish();
}

fn benchmark_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);
    let session = synthetic_session(7);

    group.bench_function("synthetic_session", |b| {
        b.iter(|| {
            let Ok(mut controller) = GestureController::new(&Config::default()) else {
                return None;
            };
            let camera = OrbitRig::default().into_handle();
            controller.attach_camera(Some(&camera));
            let mut source = ReplaySource::new("bench", session.clone());
            controller.start(&mut source);

            let t0 = Instant::now();
            while let Some(frame) = source.next_frame() {
                let Ok(frame) = frame else { continue };
                let now = t0 + Duration::from_millis(frame.at_ms);
                controller.on_hands(&frame.hands, now);
                controller.on_render_frame(now);
            }
            controller.stop(&mut source);
            Some(black_box(controller.stats()))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_classifier,
    benchmark_smoothing,
    benchmark_engine,
    benchmark_camera,
    benchmark_replay
);
criterion_main!(benches);
