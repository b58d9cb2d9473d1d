//! Synthetic hands for demos, tests and benchmarks.
//!
//! Hands are upright (wrist at the bottom) and placed so that the index
//! fingertip lands exactly on the requested point.

use crate::{
    landmarks::{HandObservation, Handedness, Point2D, RawHand},
    Result,
};

/// Pose presets for synthetic hands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticPose {
    /// All four fingers straight, thumb out
    Open,
    /// All four fingers curled
    Fist,
    /// Index straight, the rest curled
    Pointing,
    /// Fingers straight, thumb tip touching the index tip
    Pinching,
}

impl SyntheticPose {
    const fn extended(self) -> [bool; 4] {
        match self {
            Self::Open | Self::Pinching => [true, true, true, true],
            Self::Fist => [false, false, false, false],
            Self::Pointing => [true, false, false, false],
        }
    }
}

// Wrist-relative layout, before translation. Rows: MCP, PIP, DIP, TIP.
const WRIST: (f64, f64) = (0.0, 0.30);
const THUMB: [(f64, f64); 4] = [(-0.05, 0.26), (-0.08, 0.22), (-0.10, 0.18), (-0.12, 0.15)];
const FINGERS_EXTENDED: [[(f64, f64); 4]; 4] = [
    [(-0.03, 0.15), (-0.03, 0.08), (-0.03, 0.04), (-0.03, 0.00)],
    [(0.00, 0.14), (0.00, 0.07), (0.00, 0.03), (0.00, -0.01)],
    [(0.03, 0.15), (0.03, 0.09), (0.03, 0.05), (0.03, 0.02)],
    [(0.055, 0.17), (0.055, 0.12), (0.055, 0.09), (0.055, 0.06)],
];
const FINGERS_FOLDED: [[(f64, f64); 2]; 4] = [
    [(-0.03, 0.12), (-0.03, 0.17)],
    [(0.00, 0.11), (0.00, 0.16)],
    [(0.03, 0.12), (0.03, 0.17)],
    [(0.055, 0.14), (0.055, 0.19)],
];
const PINCH_THUMB_OFFSET: (f64, f64) = (0.02, 0.01);

/// Build 21 landmarks
///
/// `extended` covers index, middle, ring and pinky. `thumb_tip` optionally
/// overrides the thumb tip, given relative to the index fingertip.
#[must_use]
pub fn hand_landmarks(
    extended: [bool; 4],
    thumb_tip: Option<(f64, f64)>,
    index_tip: Point2D,
) -> Vec<Point2D> {
    let mut layout = Vec::with_capacity(21);
    layout.push(WRIST);
    layout.extend_from_slice(&THUMB);
    for (finger, &straight) in extended.iter().enumerate() {
        let rows = FINGERS_EXTENDED[finger];
        layout.push(rows[0]);
        layout.push(rows[1]);
        if straight {
            layout.push(rows[2]);
            layout.push(rows[3]);
        } else {
            layout.extend_from_slice(&FINGERS_FOLDED[finger]);
        }
    }

    let (tip_x, tip_y) = layout[8];
    if let Some((dx, dy)) = thumb_tip {
        layout[4] = (tip_x + dx, tip_y + dy);
    }

    let (shift_x, shift_y) = (index_tip.x - tip_x, index_tip.y - tip_y);
    layout
        .into_iter()
        .map(|(x, y)| Point2D::new(x + shift_x, y + shift_y))
        .collect()
}

/// Raw hand with the given pose and index fingertip position
#[must_use]
pub fn synthetic_raw_hand(
    pose: SyntheticPose,
    index_tip: Point2D,
    handedness: Option<Handedness>,
) -> RawHand {
    let thumb = (pose == SyntheticPose::Pinching).then_some(PINCH_THUMB_OFFSET);
    RawHand {
        landmarks: hand_landmarks(pose.extended(), thumb, index_tip),
        handedness,
    }
}

/// Validated hand with the given pose and index fingertip position
///
/// # Errors
///
/// Returns `MalformedObservation` if `index_tip` is not finite.
pub fn synthetic_hand(
    pose: SyntheticPose,
    index_tip: Point2D,
    handedness: Option<Handedness>,
) -> Result<HandObservation> {
    HandObservation::try_from(&synthetic_raw_hand(pose, index_tip, handedness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INDEX_TIP, THUMB_TIP};

    #[test]
    fn test_index_tip_lands_on_target() {
        for pose in [
            SyntheticPose::Open,
            SyntheticPose::Fist,
            SyntheticPose::Pointing,
            SyntheticPose::Pinching,
        ] {
            let hand = synthetic_hand(pose, Point2D::new(0.42, 0.37), None).unwrap();
            let tip = hand.index_tip();
            assert!((tip.x - 0.42).abs() < 1e-12);
            assert!((tip.y - 0.37).abs() < 1e-12);
            assert_eq!(hand.landmarks.points().len(), 21);
        }
    }

    #[test]
    fn test_pinch_thumb_sits_next_to_index() {
        let raw = synthetic_raw_hand(SyntheticPose::Pinching, Point2D::new(0.5, 0.5), None);
        let d = raw.landmarks[THUMB_TIP].distance_to(&raw.landmarks[INDEX_TIP]);
        assert!(d < 0.03);
    }
}
