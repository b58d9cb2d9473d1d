//! Gesture labels, history and the edge-triggered reporter.

use crate::constants::GESTURE_HISTORY_CAPACITY;
use std::{collections::VecDeque, fmt, time::Instant};

/// Currently recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    /// No hand present
    #[default]
    Idle,
    /// Hand present but still
    Hand,
    /// Fist
    Fist,
    /// Index finger pointing
    Pointing,
    /// Thumb and index pinching
    Pinch,
    /// Open hand
    OpenHand,
    /// Rotating the camera
    Rotate,
    /// Moving the camera closer
    ZoomIn,
    /// Moving the camera away
    ZoomOut,
    /// Activation (double-click equivalent)
    DoubleClick,
    /// Both hands present, neither doing anything
    TwoHands,
    /// Tracking unavailable
    Fallback,
}

impl GestureLabel {
    /// Upper-case name used in status displays
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Hand => "HAND",
            Self::Fist => "FIST",
            Self::Pointing => "POINTING",
            Self::Pinch => "PINCH",
            Self::OpenHand => "OPEN_HAND",
            Self::Rotate => "ROTATE",
            Self::ZoomIn => "ZOOM_IN",
            Self::ZoomOut => "ZOOM_OUT",
            Self::DoubleClick => "DOUBLE_CLICK",
            Self::TwoHands => "TWO_HANDS",
            Self::Fallback => "FALLBACK",
        }
    }

    /// Tie-break weight when two hands propose different labels
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::DoubleClick => 4,
            Self::Rotate | Self::ZoomIn | Self::ZoomOut => 3,
            Self::Fist | Self::Pinch | Self::Pointing => 2,
            Self::Hand | Self::OpenHand | Self::TwoHands => 1,
            Self::Idle | Self::Fallback => 0,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureRecord {
    /// Label that became current
    pub label: GestureLabel,
    /// When it became current
    pub at: Instant,
}

/// Bounded history of label changes, oldest first
#[derive(Debug, Clone)]
pub struct GestureHistory {
    capacity: usize,
    records: VecDeque<GestureRecord>,
}

impl GestureHistory {
    /// Create a history holding at most `capacity` records
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a record, dropping the oldest on overflow
    pub fn push(&mut self, record: GestureRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Most recent record
    #[must_use]
    pub fn latest(&self) -> Option<&GestureRecord> {
        self.records.back()
    }

    /// Records, most recent last
    pub fn iter(&self) -> impl Iterator<Item = &GestureRecord> {
        self.records.iter()
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for GestureHistory {
    fn default() -> Self {
        Self::new(GESTURE_HISTORY_CAPACITY)
    }
}

/// Holds the current label and records every change
#[derive(Debug, Clone, Default)]
pub struct GestureReporter {
    current: GestureLabel,
    history: GestureHistory,
}

impl GestureReporter {
    /// Create a reporter starting at IDLE with an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a label; returns the new record only if the label changed
    pub fn publish(&mut self, label: GestureLabel, at: Instant) -> Option<GestureRecord> {
        if label == self.current {
            return None;
        }
        self.current = label;
        let record = GestureRecord { label, at };
        self.history.push(record);
        Some(record)
    }

    /// Currently held label
    #[must_use]
    pub const fn current(&self) -> GestureLabel {
        self.current
    }

    /// Label change history
    #[must_use]
    pub const fn history(&self) -> &GestureHistory {
        &self.history
    }
}
