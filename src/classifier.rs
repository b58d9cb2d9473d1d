//! Per-frame hand pose classification.
//!
//! Every test here is purely geometric on normalized landmark positions and
//! assumes a right-side-up, front-facing camera, so "up" on screen means a
//! smaller y. Two accuracy tiers exist; a classifier runs one tier only.

use crate::{
    config::ClassifierConfig,
    constants::{
        EXTENSION_TIPS, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
        PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, WRIST,
    },
    landmarks::{HandObservation, LandmarkSet, Point2D},
};
use serde::{Deserialize, Serialize};

/// Accuracy/cost tier of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierTier {
    /// Checks all four fingers
    #[default]
    Exact,
    /// Checks index and middle against their MCP joints only
    Cheap,
}

/// Discrete pose of a single hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandPose {
    /// No other pose matched
    Open,
    /// Fingers curled
    Fist,
    /// Index extended, the rest folded
    Pointing,
    /// Thumb and index tips together
    Pinching,
}

/// Euclidean distance in normalized 2D coordinates
#[must_use]
pub fn distance(p1: Point2D, p2: Point2D) -> f64 {
    p1.distance_to(&p2)
}

/// Whether the thumb and index tips are closer than `threshold`
#[must_use]
pub fn is_pinching(thumb_tip: Point2D, index_tip: Point2D, threshold: f64) -> bool {
    distance(thumb_tip, index_tip) < threshold
}

/// PIP joint paired with a fingertip for the extension test
const fn pip_for(tip_index: usize) -> Option<usize> {
    match tip_index {
        INDEX_TIP => Some(INDEX_PIP),
        MIDDLE_TIP => Some(MIDDLE_PIP),
        RING_TIP => Some(RING_PIP),
        PINKY_TIP => Some(PINKY_PIP),
        _ => None,
    }
}

/// Whether a finger is extended: its tip sits above its PIP joint
///
/// Only index, middle, ring and pinky tips are meaningful; any other index
/// (including the thumb tip) reports `false`.
#[must_use]
pub fn is_finger_extended(hand: &LandmarkSet, tip_index: usize) -> bool {
    pip_for(tip_index).is_some_and(|pip| hand.point(tip_index).y < hand.point(pip).y)
}

/// Wrist-relative extension: the tip is farther from the wrist than the PIP joint
fn is_extended_from_wrist(hand: &LandmarkSet, tip_index: usize) -> bool {
    let wrist = hand.point(WRIST);
    pip_for(tip_index).is_some_and(|pip| {
        distance(hand.point(tip_index), wrist) > distance(hand.point(pip), wrist)
    })
}

/// Hand pose classifier
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    tier: ClassifierTier,
    pinch_threshold: f64,
    fist_max_extended: usize,
}

impl GestureClassifier {
    /// Create a classifier from configuration
    #[must_use]
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            tier: config.tier,
            pinch_threshold: config.pinch_threshold,
            fist_max_extended: config.fist_max_extended,
        }
    }

    /// Whether the hand is a fist
    #[must_use]
    pub fn is_fist(&self, hand: &LandmarkSet) -> bool {
        match self.tier {
            ClassifierTier::Exact => {
                let extended = EXTENSION_TIPS
                    .iter()
                    .filter(|&&tip| is_extended_from_wrist(hand, tip))
                    .count();
                extended <= self.fist_max_extended
            }
            ClassifierTier::Cheap => {
                hand.point(INDEX_TIP).y > hand.point(INDEX_MCP).y
                    && hand.point(MIDDLE_TIP).y > hand.point(MIDDLE_MCP).y
            }
        }
    }

    /// Whether only the index finger is extended
    #[must_use]
    pub fn is_pointing(&self, hand: &LandmarkSet) -> bool {
        if !is_finger_extended(hand, INDEX_TIP) {
            return false;
        }
        match self.tier {
            ClassifierTier::Exact => [MIDDLE_TIP, RING_TIP, PINKY_TIP]
                .iter()
                .all(|&tip| !is_finger_extended(hand, tip)),
            ClassifierTier::Cheap => hand.point(MIDDLE_TIP).y > hand.point(MIDDLE_MCP).y,
        }
    }

    /// Classify one hand
    ///
    /// Precedence is pointing, fist, pinch, open: a pointing hand stays
    /// pointing wherever the thumb is, and a hand with curled index and middle
    /// fingers is a fist even when the thumb rests on the index tip.
    #[must_use]
    pub fn classify(&self, hand: &HandObservation) -> HandPose {
        let landmarks = &hand.landmarks;
        if self.is_pointing(landmarks) {
            HandPose::Pointing
        } else if self.is_fist(landmarks) {
            HandPose::Fist
        } else if is_pinching(hand.thumb_tip(), hand.index_tip(), self.pinch_threshold) {
            HandPose::Pinching
        } else {
            HandPose::Open
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
