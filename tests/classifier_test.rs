//! Hand pose classification across both tiers

use constellation_gestures::{
    classifier::{ClassifierTier, GestureClassifier, HandPose},
    config::ClassifierConfig,
    landmarks::{HandObservation, Handedness, LandmarkSet, Point2D},
    synthetic::{hand_landmarks, synthetic_hand, SyntheticPose},
};
use proptest::prelude::*;

fn classifier(tier: ClassifierTier) -> GestureClassifier {
    GestureClassifier::new(&ClassifierConfig {
        tier,
        ..ClassifierConfig::default()
    })
}

fn observation(points: &[Point2D]) -> HandObservation {
    HandObservation {
        landmarks: LandmarkSet::new(points).unwrap(),
        handedness: Handedness::Unknown,
    }
}

fn tier() -> impl Strategy<Value = ClassifierTier> {
    prop_oneof![Just(ClassifierTier::Exact), Just(ClassifierTier::Cheap)]
}

#[test]
fn test_presets_classify_as_named() {
    for tier in [ClassifierTier::Exact, ClassifierTier::Cheap] {
        let c = classifier(tier);
        let tip = Point2D::new(0.5, 0.4);
        let cases = [
            (SyntheticPose::Open, HandPose::Open),
            (SyntheticPose::Fist, HandPose::Fist),
            (SyntheticPose::Pointing, HandPose::Pointing),
            (SyntheticPose::Pinching, HandPose::Pinching),
        ];
        for (pose, expected) in cases {
            let hand = synthetic_hand(pose, tip, None).unwrap();
            assert_eq!(c.classify(&hand), expected, "{pose:?} with {tier:?}");
        }
    }
}

#[test]
fn test_fist_tolerance_is_configurable() {
    // Index and middle curled, ring and pinky straight
    let points = hand_landmarks([false, false, true, true], None, Point2D::new(0.5, 0.5));
    let hand = observation(&points);

    let lenient = GestureClassifier::default();
    assert_eq!(lenient.classify(&hand), HandPose::Fist);

    let strict = GestureClassifier::new(&ClassifierConfig {
        fist_max_extended: 1,
        ..ClassifierConfig::default()
    });
    assert_ne!(strict.classify(&hand), HandPose::Fist);
}

#[test]
fn test_pinch_threshold_is_configurable() {
    let points = hand_landmarks([true; 4], Some((0.05, 0.0)), Point2D::new(0.5, 0.5));
    let hand = observation(&points);
    assert_eq!(GestureClassifier::default().classify(&hand), HandPose::Pinching);

    let tight = GestureClassifier::new(&ClassifierConfig {
        pinch_threshold: 0.04,
        ..ClassifierConfig::default()
    });
    assert_eq!(tight.classify(&hand), HandPose::Open);
}

proptest! {
    #[test]
    fn test_pointing_wherever_the_thumb_is(
        tier in tier(),
        dx in -0.15f64..0.15,
        dy in -0.15f64..0.15,
        x in 0.2f64..0.8,
        y in 0.2f64..0.8,
    ) {
        let points = hand_landmarks([true, false, false, false], Some((dx, dy)), Point2D::new(x, y));
        prop_assert_eq!(classifier(tier).classify(&observation(&points)), HandPose::Pointing);
    }

    #[test]
    fn test_curled_index_and_middle_is_fist(
        tier in tier(),
        ring in any::<bool>(),
        pinky in any::<bool>(),
        dx in -0.05f64..0.05,
        dy in -0.05f64..0.05,
        x in 0.2f64..0.8,
        y in 0.2f64..0.8,
    ) {
        // Thumb anywhere near the index tip, even touching it
        let points = hand_landmarks([false, false, ring, pinky], Some((dx, dy)), Point2D::new(x, y));
        prop_assert_eq!(classifier(tier).classify(&observation(&points)), HandPose::Fist);
    }

    #[test]
    fn test_classification_ignores_position(
        x in 0.2f64..0.8,
        y in 0.2f64..0.8,
    ) {
        let c = GestureClassifier::default();
        for (pose, expected) in [
            (SyntheticPose::Open, HandPose::Open),
            (SyntheticPose::Fist, HandPose::Fist),
            (SyntheticPose::Pointing, HandPose::Pointing),
            (SyntheticPose::Pinching, HandPose::Pinching),
        ] {
            let hand = synthetic_hand(pose, Point2D::new(x, y), Some(Handedness::Left)).unwrap();
            prop_assert_eq!(c.classify(&hand), expected);
        }
    }
}
