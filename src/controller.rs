//! Gesture controller: the single owner of tracking state.
//!
//! The host creates one controller, attaches the scene camera and a landmark
//! source, then forwards two independent callback streams into it: landmark
//! frames through [`GestureController::on_hands`] and display refreshes
//! through [`GestureController::on_render_frame`]. No operation returns an
//! error; failures end up in the gesture label, the tracking status or the
//! log.

use crate::{
    camera::{CameraAdapter, CameraHandle, IdleRotation},
    config::Config,
    gesture::{GestureHistory, GestureLabel, GestureReporter},
    interaction::{HandStrategy, InteractionEngine},
    landmarks::{HandObservation, Point2D, RawHand},
    source::LandmarkSource,
    Error, Result,
};
use log::{debug, info, warn};
use std::{fmt, time::Instant};

/// Lifecycle of hand tracking
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    /// Not started
    #[default]
    Off,
    /// Frames are being processed
    Active {
        /// Source name
        source: String,
    },
    /// Source unavailable; gestures disabled
    Fallback {
        /// Why the source failed
        reason: String,
    },
    /// Stopped by the host
    Stopped,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::Active { source } => write!(f, "ACTIVE ({source})"),
            Self::Fallback { reason } => write!(f, "FALLBACK ({reason})"),
            Self::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Receives controller notifications; every method defaults to a no-op
pub trait GestureObserver {
    /// The published label changed
    fn on_gesture_changed(&mut self, _label: GestureLabel, _at: Instant) {}

    /// The cursor hand activated at a normalized position
    fn on_activate(&mut self, _position: Point2D, _at: Instant) {}

    /// The cursor moved (mirrored, normalized)
    fn on_cursor_moved(&mut self, _position: Point2D) {}

    /// Tracking status changed
    fn on_status(&mut self, _status: &TrackingStatus) {}

    /// Valid hands of a processed frame, before any other notification
    fn on_hands(&mut self, _hands: &[HandObservation]) {}
}

/// Counters kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerStats {
    /// Frames processed
    pub frames: u64,
    /// Hands dropped as malformed
    pub malformed_hands: u64,
    /// Frames lost to source errors
    pub missed_frames: u64,
    /// Activations fired
    pub activations: u64,
}

/// Owns the gesture pipeline from landmarks to camera and cursor
pub struct GestureController {
    engine: InteractionEngine,
    adapter: CameraAdapter,
    idle: IdleRotation,
    reporter: GestureReporter,
    observers: Vec<Box<dyn GestureObserver>>,
    status: TrackingStatus,
    cursor: Option<Point2D>,
    stats: ControllerStats,
}

impl GestureController {
    /// Create a controller
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: InteractionEngine::new(config)?,
            adapter: CameraAdapter::new(&config.camera),
            idle: IdleRotation::new(&config.idle),
            reporter: GestureReporter::new(),
            observers: Vec::new(),
            status: TrackingStatus::Off,
            cursor: None,
            stats: ControllerStats::default(),
        })
    }

    /// Register an observer
    pub fn add_observer(&mut self, observer: Box<dyn GestureObserver>) {
        self.observers.push(observer);
    }

    /// Bind the camera, or detach it with `None`
    pub fn attach_camera(&mut self, camera: Option<&CameraHandle>) {
        self.adapter.attach(camera);
    }

    /// Start the source and begin processing frames
    ///
    /// Returns whether tracking is active. A source that cannot start puts
    /// the controller into FALLBACK for good.
    pub fn start(&mut self, source: &mut dyn LandmarkSource) -> bool {
        if let TrackingStatus::Fallback { .. } = self.status {
            debug!("Ignoring start while in fallback");
            return false;
        }
        match source.start() {
            Ok(()) => {
                info!("Hand tracking started with {}", source.name());
                self.set_status(TrackingStatus::Active {
                    source: source.name().to_string(),
                });
                true
            }
            Err(e) => {
                warn!("Hand tracking unavailable: {e}");
                self.engine.reset();
                self.adapter.cancel_pending();
                self.cursor = None;
                self.publish(GestureLabel::Fallback, Instant::now());
                self.set_status(TrackingStatus::Fallback {
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    /// Stop the source and drop all in-flight state; safe to call repeatedly
    pub fn stop(&mut self, source: &mut dyn LandmarkSource) {
        source.stop();
        self.engine.reset();
        self.adapter.cancel_pending();
        self.cursor = None;
        self.publish(GestureLabel::Idle, Instant::now());
        if let TrackingStatus::Active { .. } = self.status {
            info!("Hand tracking stopped");
            self.set_status(TrackingStatus::Stopped);
        }
    }

    /// Process the hands of one video frame
    pub fn on_hands(&mut self, hands: &[RawHand], now: Instant) {
        if !self.is_active() {
            debug!("Dropping frame, tracking is {}", self.status);
            return;
        }
        self.stats.frames += 1;

        let observations: Vec<HandObservation> = hands
            .iter()
            .filter_map(|raw| match HandObservation::try_from(raw) {
                Ok(hand) => Some(hand),
                Err(e) => {
                    debug!("Skipping hand: {e}");
                    self.stats.malformed_hands += 1;
                    None
                }
            })
            .collect();

        for observer in &mut self.observers {
            observer.on_hands(&observations);
        }
        if !observations.is_empty() {
            self.idle.suspend(now);
        }

        let outcome = self.engine.process(&observations, now);

        if let Some(rotation) = outcome.rotation {
            self.adapter.submit_rotation(rotation);
        }
        if let Some(zoom) = outcome.zoom {
            self.adapter.zoom(zoom);
        }

        self.cursor = outcome.cursor;
        if let Some(position) = outcome.cursor {
            for observer in &mut self.observers {
                observer.on_cursor_moved(position);
            }
        }
        if let Some(position) = outcome.activation {
            self.stats.activations += 1;
            for observer in &mut self.observers {
                observer.on_activate(position, now);
            }
        }

        self.publish(outcome.label, now);
    }

    /// Record a frame the source failed to deliver
    ///
    /// State is left untouched, so the next good frame measures motion from
    /// the last good baseline.
    pub fn on_frame_error(&mut self, error: &Error, now: Instant) {
        self.stats.missed_frames += 1;
        warn!("Missed landmark frame: {error}");
        debug!("Missed frame at {now:?}, {} so far", self.stats.missed_frames);
    }

    /// Display refresh: apply the coalesced rotation, then ambient motion
    pub fn on_render_frame(&mut self, now: Instant) {
        self.adapter.flush();
        self.idle.tick(now, &self.adapter);
    }

    fn publish(&mut self, label: GestureLabel, at: Instant) {
        if let Some(record) = self.reporter.publish(label, at) {
            debug!("Gesture changed to {}", record.label);
            for observer in &mut self.observers {
                observer.on_gesture_changed(record.label, record.at);
            }
        }
    }

    fn set_status(&mut self, status: TrackingStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        for observer in &mut self.observers {
            observer.on_status(&self.status);
        }
    }

    /// Whether frames are being processed
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, TrackingStatus::Active { .. })
    }

    /// Current tracking status
    #[must_use]
    pub const fn status(&self) -> &TrackingStatus {
        &self.status
    }

    /// Currently published gesture
    #[must_use]
    pub const fn current_gesture(&self) -> GestureLabel {
        self.reporter.current()
    }

    /// Last label changes, most recent last
    #[must_use]
    pub const fn history(&self) -> &GestureHistory {
        self.reporter.history()
    }

    /// Latest mirrored cursor position, while a cursor hand is present
    #[must_use]
    pub const fn cursor(&self) -> Option<Point2D> {
        self.cursor
    }

    /// Strategy of the current session
    #[must_use]
    pub const fn strategy(&self) -> Option<HandStrategy> {
        self.engine.strategy()
    }

    /// Camera adapter
    #[must_use]
    pub const fn camera(&self) -> &CameraAdapter {
        &self.adapter
    }

    /// Whether idle rotation currently drives the camera
    #[must_use]
    pub fn idle_rotation_active(&self) -> bool {
        self.idle.is_active()
    }

    /// Diagnostic counters
    #[must_use]
    pub const fn stats(&self) -> ControllerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::OrbitRig,
        landmarks::Handedness,
        source::{ReplaySource, Session},
        synthetic::{synthetic_raw_hand, SyntheticPose},
    };
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct Recorder {
        statuses: Rc<RefCell<Vec<TrackingStatus>>>,
    }

    impl GestureObserver for Recorder {
        fn on_status(&mut self, status: &TrackingStatus) {
            self.statuses.borrow_mut().push(status.clone());
        }
    }

    fn started() -> (GestureController, ReplaySource) {
        let mut controller = GestureController::new(&Config::default()).unwrap();
        let mut source = ReplaySource::new("test", Session::default());
        assert!(controller.start(&mut source));
        (controller, source)
    }

    #[test]
    fn test_frames_ignored_before_start() {
        let mut controller = GestureController::new(&Config::default()).unwrap();
        let hand = synthetic_raw_hand(SyntheticPose::Fist, Point2D::new(0.5, 0.5), None);
        controller.on_hands(&[hand], Instant::now());
        assert_eq!(controller.current_gesture(), GestureLabel::Idle);
        assert_eq!(controller.stats().frames, 0);
    }

    #[test]
    fn test_fallback_when_source_unavailable() {
        let mut controller = GestureController::new(&Config::default()).unwrap();
        let recorder = Recorder::default();
        let statuses = Rc::clone(&recorder.statuses);
        controller.add_observer(Box::new(recorder));

        let mut source = ReplaySource::unavailable("camera permission denied");
        assert!(!controller.start(&mut source));
        assert_eq!(controller.current_gesture(), GestureLabel::Fallback);
        assert_eq!(statuses.borrow().len(), 1);

        let hand = synthetic_raw_hand(SyntheticPose::Fist, Point2D::new(0.5, 0.5), None);
        controller.on_hands(&[hand], Instant::now());
        assert_eq!(controller.current_gesture(), GestureLabel::Fallback);
    }

    #[test]
    fn test_malformed_hand_is_skipped() {
        let (mut controller, _source) = started();
        let mut bad = synthetic_raw_hand(SyntheticPose::Fist, Point2D::new(0.5, 0.5), None);
        bad.landmarks.truncate(20);
        let good = synthetic_raw_hand(SyntheticPose::Fist, Point2D::new(0.5, 0.5), Some(Handedness::Right));

        controller.on_hands(&[bad.clone(), good], Instant::now());
        assert_eq!(controller.current_gesture(), GestureLabel::Fist);

        controller.on_hands(&[bad], Instant::now());
        assert_eq!(controller.current_gesture(), GestureLabel::Idle);
        assert_eq!(controller.stats().malformed_hands, 2);
    }

    #[test]
    fn test_stop_clears_state_and_pending_rotation() {
        let mut config = Config::default();
        config.rotation.frame_skip = 1;
        let mut controller = GestureController::new(&config).unwrap();
        let mut source = ReplaySource::new("test", Session::default());
        let camera = OrbitRig::default().into_handle();
        controller.attach_camera(Some(&camera));
        assert!(controller.start(&mut source));

        let t0 = Instant::now();
        for x in [0.5, 0.7] {
            let hand = synthetic_raw_hand(SyntheticPose::Open, Point2D::new(x, 0.5), None);
            controller.on_hands(&[hand], t0);
        }
        assert_eq!(controller.current_gesture(), GestureLabel::Rotate);
        assert!(controller.camera().has_pending());

        controller.stop(&mut source);
        controller.stop(&mut source);
        assert!(!controller.camera().has_pending());
        assert_eq!(controller.current_gesture(), GestureLabel::Idle);
        assert_eq!(controller.status(), &TrackingStatus::Stopped);

        // Nothing deferred fires after stop
        let before = camera.borrow().position();
        controller.on_render_frame(t0);
        assert_eq!(camera.borrow().position(), before);
    }

    #[test]
    fn test_frame_error_is_counted_only() {
        let (mut controller, _source) = started();
        controller.on_frame_error(&Error::SourceFrame("glitch".into()), Instant::now());
        assert_eq!(controller.stats().missed_frames, 1);
        assert_eq!(controller.current_gesture(), GestureLabel::Idle);
        assert!(controller.is_active());
    }
}
