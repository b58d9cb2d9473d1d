//! Hand landmark data model.
//!
//! A landmark source delivers [`RawHand`] values, which are validated into
//! [`HandObservation`]s before anything downstream looks at them. Validation is
//! the only place a malformed hand is detected; every other module can index a
//! [`LandmarkSet`] without bounds worries.

use crate::{constants::NUM_HAND_LANDMARKS, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in normalized frame coordinates (0..1 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal position as a fraction of frame width
    pub x: f64,
    /// Vertical position as a fraction of frame height, growing downwards
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Mirror horizontally, as seen through a front-facing camera
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self::new(1.0 - self.x, self.y)
    }

    /// Whether both coordinates are finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which hand an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    /// Left hand (drives the cursor)
    Left,
    /// Right hand (drives rotation)
    Right,
    /// Label unavailable
    #[default]
    Unknown,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Exactly 21 landmarks in the fixed anatomical order
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Point2D; NUM_HAND_LANDMARKS],
}

impl LandmarkSet {
    /// Validate a landmark slice
    ///
    /// # Errors
    ///
    /// Returns `MalformedObservation` if the slice does not hold exactly 21
    /// finite points.
    pub fn new(points: &[Point2D]) -> Result<Self> {
        let points: [Point2D; NUM_HAND_LANDMARKS] = points.try_into().map_err(|_| {
            Error::MalformedObservation(format!(
                "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
                points.len()
            ))
        })?;

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::MalformedObservation(format!(
                "landmark {index} has a non-finite coordinate"
            )));
        }

        Ok(Self { points })
    }

    /// Landmark at an anatomical index
    ///
    /// Indices come from [`crate::constants`]; anything above 20 is a programming
    /// error and panics like any out-of-range array access.
    #[must_use]
    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    /// All landmarks in order
    #[must_use]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }
}

/// Unvalidated hand as delivered by a landmark source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawHand {
    /// Landmark points, expected to be 21
    pub landmarks: Vec<Point2D>,
    /// Handedness label, if the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
}

/// Validated hand observation for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    /// Landmark set
    pub landmarks: LandmarkSet,
    /// Handedness label
    pub handedness: Handedness,
}

impl HandObservation {
    /// Index fingertip position
    #[must_use]
    pub fn index_tip(&self) -> Point2D {
        self.landmarks.point(crate::constants::INDEX_TIP)
    }

    /// Thumb tip position
    #[must_use]
    pub fn thumb_tip(&self) -> Point2D {
        self.landmarks.point(crate::constants::THUMB_TIP)
    }
}

impl TryFrom<&RawHand> for HandObservation {
    type Error = Error;

    fn try_from(raw: &RawHand) -> Result<Self> {
        Ok(Self {
            landmarks: LandmarkSet::new(&raw.landmarks)?,
            handedness: raw.handedness.unwrap_or_default(),
        })
    }
}

/// Skeleton connections between landmarks, used for overlay drawing
pub const HAND_CONNECTIONS: [(usize, usize); 23] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (0, 9), (9, 10), (10, 11), (11, 12),
    (0, 13), (13, 14), (14, 15), (15, 16),
    (0, 17), (17, 18), (18, 19), (19, 20),
    (5, 9), (9, 13), (13, 17),
];
