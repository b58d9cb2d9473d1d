//! Per-hand interaction state machine.
//!
//! Turns the validated hands of one frame into a single gesture label plus the
//! control intents for that frame. Continuity across frames lives in one
//! tracker per role; a tracker forgets everything as soon as its role goes
//! unobserved for a frame.

use crate::{
    camera::{RotationIntent, ZoomIntent},
    classifier::{distance, GestureClassifier, HandPose},
    config::{ActivationPolicy, Config, JitterPolicy, StrategyMode},
    filters::PositionFilter,
    gesture::GestureLabel,
    landmarks::{HandObservation, Handedness, Point2D},
    Result,
};
use std::time::{Duration, Instant};

/// How hands map to controls for one tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStrategy {
    /// Right hand rotates, left hand drives the cursor
    RoleSplit,
    /// Two hands zoom by the distance between their index tips
    TwoHandDistance,
}

impl HandStrategy {
    /// Pick the strategy for a session from its first frame
    #[must_use]
    pub fn choose(mode: StrategyMode, hands: &[HandObservation]) -> Self {
        match mode {
            StrategyMode::RoleSplit => Self::RoleSplit,
            StrategyMode::TwoHandDistance => Self::TwoHandDistance,
            StrategyMode::Auto => {
                let unlabeled = hands.iter().all(|h| h.handedness == Handedness::Unknown);
                if hands.len() == 2 && unlabeled {
                    Self::TwoHandDistance
                } else {
                    Self::RoleSplit
                }
            }
        }
    }
}

/// Everything one frame produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Winning label for the frame
    pub label: GestureLabel,
    /// Camera rotation to apply
    pub rotation: Option<RotationIntent>,
    /// Camera zoom to apply
    pub zoom: Option<ZoomIntent>,
    /// Mirrored cursor position, when a cursor hand is present
    pub cursor: Option<Point2D>,
    /// Activation at this normalized position
    pub activation: Option<Point2D>,
}

impl FrameOutcome {
    fn idle() -> Self {
        Self {
            label: GestureLabel::Idle,
            rotation: None,
            zoom: None,
            cursor: None,
            activation: None,
        }
    }
}

/// Assign each hand to at most one role
///
/// Labeled hands claim their role first, the earliest hand winning a
/// collision. Unlabeled hands then fill whatever is left, rotation first.
#[must_use]
pub fn assign_roles(
    hands: &[HandObservation],
) -> (Option<&HandObservation>, Option<&HandObservation>) {
    let mut rotation = None;
    let mut cursor = None;

    for hand in hands {
        match hand.handedness {
            Handedness::Right if rotation.is_none() => rotation = Some(hand),
            Handedness::Left if cursor.is_none() => cursor = Some(hand),
            _ => {}
        }
    }
    for hand in hands.iter().filter(|h| h.handedness == Handedness::Unknown) {
        if rotation.is_none() {
            rotation = Some(hand);
        } else if cursor.is_none() {
            cursor = Some(hand);
        }
    }

    (rotation, cursor)
}

/// Combine the role labels into one frame label
#[must_use]
pub fn resolve_label(rotation: Option<GestureLabel>, cursor: Option<GestureLabel>) -> GestureLabel {
    match (rotation, cursor) {
        (Some(rot), Some(cur)) => {
            let winner = if cur.precedence() > rot.precedence() { cur } else { rot };
            if winner.precedence() <= GestureLabel::Hand.precedence() {
                GestureLabel::TwoHands
            } else {
                winner
            }
        }
        (Some(label), None) | (None, Some(label)) => label,
        (None, None) => GestureLabel::Idle,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct RoleOutput {
    label: GestureLabel,
    rotation: Option<RotationIntent>,
    zoom: Option<ZoomIntent>,
}

#[derive(Debug, Clone, Copy)]
struct RotationState {
    anchor: Option<Point2D>,
    frames_since_processed: u32,
    last_label: GestureLabel,
    last_pinch_distance: Option<f64>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            anchor: None,
            frames_since_processed: 0,
            last_label: GestureLabel::Hand,
            last_pinch_distance: None,
        }
    }
}

/// Rotation role: index-tip motion becomes camera orbit
pub struct RotationTracker {
    sensitivity: f64,
    movement_threshold: f64,
    jitter: JitterPolicy,
    frame_skip: u32,
    pinch_zoom_gain: f64,
    pinch_zoom_threshold: f64,
    filter: Box<dyn PositionFilter>,
    state: Option<RotationState>,
}

impl RotationTracker {
    /// Create a tracker from configuration
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the smoothing filter cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let rotation = &config.rotation;
        Ok(Self {
            sensitivity: rotation.sensitivity,
            movement_threshold: rotation.movement_threshold,
            jitter: rotation.jitter,
            frame_skip: rotation.frame_skip.max(1),
            pinch_zoom_gain: rotation.pinch_zoom_gain,
            pinch_zoom_threshold: rotation.pinch_zoom_threshold,
            filter: config.create_filter()?,
            state: None,
        })
    }

    /// Forget the hand
    pub fn reset(&mut self) {
        self.state = None;
        self.filter.reset();
    }

    fn update(&mut self, hand: &HandObservation, pose: HandPose) -> RoleOutput {
        let mut state = self.state.take().unwrap_or_default();
        let output = match pose {
            HandPose::Fist => {
                state.last_pinch_distance = None;
                RoleOutput {
                    label: GestureLabel::Fist,
                    ..RoleOutput::default()
                }
            }
            HandPose::Pinching => self.pinch(&mut state, hand),
            HandPose::Open | HandPose::Pointing => {
                state.last_pinch_distance = None;
                self.track(&mut state, hand.index_tip())
            }
        };
        state.last_label = output.label;
        self.state = Some(state);
        output
    }

    fn pinch(&mut self, state: &mut RotationState, hand: &HandObservation) -> RoleOutput {
        let pinch_distance = distance(hand.thumb_tip(), hand.index_tip());
        let mut output = RoleOutput {
            label: GestureLabel::Pinch,
            ..RoleOutput::default()
        };

        if let Some(last) = state.last_pinch_distance {
            let change = pinch_distance - last;
            if change.abs() > self.pinch_zoom_threshold {
                output.label = if change > 0.0 {
                    GestureLabel::ZoomOut
                } else {
                    GestureLabel::ZoomIn
                };
                output.zoom = Some(ZoomIntent {
                    change: change * self.pinch_zoom_gain,
                });
            }
        }
        state.last_pinch_distance = Some(pinch_distance);

        // Rotation resumes from where the pinch ended
        self.filter.reset();
        state.anchor = Some(self.filter.apply(hand.index_tip()));
        state.frames_since_processed = 0;
        output
    }

    fn track(&mut self, state: &mut RotationState, raw: Point2D) -> RoleOutput {
        let position = match self.jitter {
            JitterPolicy::Smoothing => self.filter.apply(raw),
            JitterPolicy::FrameSkip => raw,
        };

        let Some(anchor) = state.anchor else {
            state.anchor = Some(position);
            state.frames_since_processed = 0;
            return RoleOutput {
                label: GestureLabel::Hand,
                ..RoleOutput::default()
            };
        };

        if self.jitter == JitterPolicy::FrameSkip {
            state.frames_since_processed += 1;
            if state.frames_since_processed < self.frame_skip {
                return RoleOutput {
                    label: state.last_label,
                    ..RoleOutput::default()
                };
            }
            state.frames_since_processed = 0;
        }

        let dx = (position.x - anchor.x) * self.sensitivity;
        let dy = (position.y - anchor.y) * self.sensitivity;
        state.anchor = Some(position);

        if dx.hypot(dy) < self.movement_threshold {
            RoleOutput {
                label: GestureLabel::Hand,
                ..RoleOutput::default()
            }
        } else {
            RoleOutput {
                label: GestureLabel::Rotate,
                rotation: Some(RotationIntent::new(dx, dy)),
                zoom: None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CursorState {
    position: Point2D,
    dwell_start: Option<Instant>,
    tap_count: u32,
    last_tap: Option<Instant>,
}

#[derive(Debug, Clone, Copy)]
struct CursorOutput {
    label: GestureLabel,
    cursor: Point2D,
    activation: Option<Point2D>,
}

/// Cursor role: mirrored pointer plus dwell or double-tap activation
pub struct CursorTracker {
    policy: ActivationPolicy,
    dwell: Duration,
    tap_window: Duration,
    tap_stillness: f64,
    state: Option<CursorState>,
}

impl CursorTracker {
    /// Create a tracker from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            policy: config.cursor.activation,
            dwell: config.cursor.dwell(),
            tap_window: config.cursor.double_tap_window(),
            tap_stillness: config.cursor.tap_stillness,
            state: None,
        }
    }

    /// Forget the hand, cancelling any dwell or tap in progress
    pub fn reset(&mut self) {
        self.state = None;
    }

    fn update(&mut self, hand: &HandObservation, pose: HandPose, now: Instant) -> CursorOutput {
        let cursor = hand.index_tip().mirrored();
        let previous = self.state.map(|s| s.position);
        let mut state = self.state.take().unwrap_or_default();
        state.position = cursor;

        let mut activation = None;
        let label = match pose {
            HandPose::Pointing => {
                let fired = match self.policy {
                    ActivationPolicy::Dwell => Self::dwell(&mut state, self.dwell, now),
                    ActivationPolicy::DoubleTap => {
                        let still = previous.is_some_and(|p| p.distance_to(&cursor) < self.tap_stillness);
                        still && Self::tap(&mut state, self.tap_window, now)
                    }
                };
                if fired {
                    activation = Some(cursor);
                    GestureLabel::DoubleClick
                } else {
                    GestureLabel::Pointing
                }
            }
            HandPose::Fist => {
                state.dwell_start = None;
                GestureLabel::Fist
            }
            HandPose::Open | HandPose::Pinching => {
                state.dwell_start = None;
                GestureLabel::OpenHand
            }
        };

        self.state = Some(state);
        CursorOutput {
            label,
            cursor,
            activation,
        }
    }

    fn dwell(state: &mut CursorState, dwell: Duration, now: Instant) -> bool {
        let start = *state.dwell_start.get_or_insert(now);
        if now.saturating_duration_since(start) >= dwell {
            state.dwell_start = Some(now);
            true
        } else {
            false
        }
    }

    fn tap(state: &mut CursorState, window: Duration, now: Instant) -> bool {
        if state
            .last_tap
            .is_some_and(|last| now.saturating_duration_since(last) > window)
        {
            state.tap_count = 0;
        }
        state.tap_count += 1;
        state.last_tap = Some(now);

        if state.tap_count >= 2 {
            state.tap_count = 0;
            state.last_tap = None;
            true
        } else {
            false
        }
    }
}

/// Zoom by the distance between two hands' index tips
pub struct TwoHandZoom {
    threshold: f64,
    gain: f64,
    last_distance: Option<f64>,
}

impl TwoHandZoom {
    /// Create from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.two_hand.zoom_threshold,
            gain: config.two_hand.zoom_gain,
            last_distance: None,
        }
    }

    /// Forget the distance baseline
    pub fn reset(&mut self) {
        self.last_distance = None;
    }

    fn update(&mut self, first: &HandObservation, second: &HandObservation) -> RoleOutput {
        let current = distance(first.index_tip(), second.index_tip());
        let mut output = RoleOutput {
            label: GestureLabel::TwoHands,
            ..RoleOutput::default()
        };

        if let Some(last) = self.last_distance {
            let change = current - last;
            if change.abs() > self.threshold {
                output.label = if change < 0.0 {
                    GestureLabel::ZoomIn
                } else {
                    GestureLabel::ZoomOut
                };
                output.zoom = Some(ZoomIntent {
                    change: change * self.gain,
                });
            }
        }
        self.last_distance = Some(current);
        output
    }
}

/// Frame-level state machine over all roles
pub struct InteractionEngine {
    classifier: GestureClassifier,
    mode: StrategyMode,
    strategy: Option<HandStrategy>,
    rotation: RotationTracker,
    cursor: CursorTracker,
    two_hand: TwoHandZoom,
}

impl InteractionEngine {
    /// Create an engine from configuration
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the smoothing filter cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            classifier: GestureClassifier::new(&config.classifier),
            mode: config.two_hand.strategy,
            strategy: None,
            rotation: RotationTracker::new(config)?,
            cursor: CursorTracker::new(config),
            two_hand: TwoHandZoom::new(config),
        })
    }

    /// Strategy locked for the current session
    #[must_use]
    pub const fn strategy(&self) -> Option<HandStrategy> {
        self.strategy
    }

    /// End the session: forget roles, timers and baselines
    pub fn reset(&mut self) {
        self.strategy = None;
        self.rotation.reset();
        self.cursor.reset();
        self.two_hand.reset();
    }

    /// Process the valid hands of one frame
    pub fn process(&mut self, hands: &[HandObservation], now: Instant) -> FrameOutcome {
        if hands.is_empty() {
            self.reset();
            return FrameOutcome::idle();
        }

        let strategy = match self.strategy {
            Some(strategy) => strategy,
            None => {
                let strategy = HandStrategy::choose(self.mode, hands);
                log::info!("Session started with {} hand(s), strategy {strategy:?}", hands.len());
                self.strategy = Some(strategy);
                strategy
            }
        };

        match (strategy, hands) {
            (HandStrategy::TwoHandDistance, [first, second, ..]) => {
                self.rotation.reset();
                self.cursor.reset();
                let output = self.two_hand.update(first, second);
                FrameOutcome {
                    label: output.label,
                    zoom: output.zoom,
                    ..FrameOutcome::idle()
                }
            }
            (HandStrategy::TwoHandDistance, [single]) => {
                self.cursor.reset();
                self.two_hand.reset();
                let output = self.update_rotation(single);
                FrameOutcome {
                    label: output.label,
                    rotation: output.rotation,
                    zoom: output.zoom,
                    ..FrameOutcome::idle()
                }
            }
            _ => self.process_roles(hands, now),
        }
    }

    fn update_rotation(&mut self, hand: &HandObservation) -> RoleOutput {
        let pose = self.classifier.classify(hand);
        self.rotation.update(hand, pose)
    }

    fn process_roles(&mut self, hands: &[HandObservation], now: Instant) -> FrameOutcome {
        let (rotation_hand, cursor_hand) = assign_roles(hands);

        let rotation = match rotation_hand {
            Some(hand) => Some(self.update_rotation(hand)),
            None => {
                self.rotation.reset();
                None
            }
        };

        let cursor = match cursor_hand {
            Some(hand) => {
                let pose = self.classifier.classify(hand);
                Some(self.cursor.update(hand, pose, now))
            }
            None => {
                self.cursor.reset();
                None
            }
        };

        FrameOutcome {
            label: resolve_label(rotation.map(|r| r.label), cursor.map(|c| c.label)),
            rotation: rotation.and_then(|r| r.rotation),
            zoom: rotation.and_then(|r| r.zoom),
            cursor: cursor.map(|c| c.cursor),
            activation: cursor.and_then(|c| c.activation),
        }
    }
}
