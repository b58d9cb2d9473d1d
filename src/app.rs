//! Replay application: drives a landmark source, the gesture controller and a
//! render clock against an in-memory orbit camera.

use crate::{
    camera::{CameraHandle, OrbitRig, Spherical},
    config::Config,
    controller::{ControllerStats, GestureController, GestureObserver, TrackingStatus},
    cursor::{CommandBuffer, CursorLayer},
    error::Result,
    gesture::GestureLabel,
    landmarks::{Handedness, Point2D, RawHand},
    source::{LandmarkFrame, LandmarkSource, ReplaySource, Session},
    synthetic::{synthetic_raw_hand, SyntheticPose},
};
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    cell::RefCell,
    fmt,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

/// Nominal capture interval of the synthetic session (about 30 Hz)
const FRAME_INTERVAL_MS: u64 = 33;

/// Where frames come from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Recorded YAML session
    Session(PathBuf),
    /// Scripted demo session
    Synthetic {
        /// Jitter seed
        seed: u64,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Frame input
    pub input: InputSource,
    /// Render ticks per second
    pub render_hz: u32,
    /// Sleep so frames arrive at their recorded pace
    pub realtime: bool,
    /// Write the played session to this file
    pub save_session: Option<PathBuf>,
}

/// Logs gesture and status changes relative to the start of the replay
struct LoggingObserver {
    origin: Instant,
}

impl GestureObserver for LoggingObserver {
    fn on_gesture_changed(&mut self, label: GestureLabel, at: Instant) {
        info!(
            "[{:>6} ms] gesture {label}",
            at.saturating_duration_since(self.origin).as_millis()
        );
    }

    fn on_activate(&mut self, position: Point2D, at: Instant) {
        info!(
            "[{:>6} ms] activate at ({:.3}, {:.3})",
            at.saturating_duration_since(self.origin).as_millis(),
            position.x,
            position.y
        );
    }

    fn on_status(&mut self, status: &TrackingStatus) {
        info!("Tracking status: {status}");
    }
}

/// Outcome of a replay
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Controller counters
    pub stats: ControllerStats,
    /// Label changes as milliseconds since the start
    pub history: Vec<(GestureLabel, u128)>,
    /// Final camera placement
    pub camera: Option<Spherical>,
    /// Viewport double-clicks dispatched
    pub clicks: Vec<(i32, i32)>,
    /// Final tracking status
    pub status: TrackingStatus,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tracking status: {}", self.status)?;
        writeln!(
            f,
            "Frames: {} processed, {} missed, {} malformed hands",
            self.stats.frames, self.stats.missed_frames, self.stats.malformed_hands
        )?;
        if let Some(camera) = self.camera {
            writeln!(
                f,
                "Camera: theta {:.3} rad, phi {:.3} rad, distance {:.3}",
                camera.theta, camera.phi, camera.radius
            )?;
        }
        writeln!(f, "Activations: {}", self.stats.activations)?;
        for (x, y) in &self.clicks {
            writeln!(f, "  double-click at ({x}, {y})")?;
        }
        write!(f, "Recent gestures:")?;
        for (label, ms) in &self.history {
            write!(f, " {label}@{ms}ms")?;
        }
        Ok(())
    }
}

/// Replays a session through the gesture controller
pub struct ReplayApp {
    config: AppConfig,
    controller: GestureController,
    source: ReplaySource,
    camera: CameraHandle,
    overlay: Rc<RefCell<CommandBuffer>>,
    clicks: Rc<RefCell<Vec<(i32, i32)>>>,
}

impl ReplayApp {
    /// Build the application
    ///
    /// # Errors
    ///
    /// Returns an error if the gesture configuration is invalid, the render
    /// rate is zero or the session cannot be loaded.
    pub fn new(config: AppConfig, gestures: &Config) -> Result<Self> {
        info!("Initializing constellation gesture replay");
        if config.render_hz == 0 {
            return Err(crate::Error::InvalidInput("Render rate must be greater than 0".to_string()));
        }

        let session = match &config.input {
            InputSource::Session(path) => Session::from_file(path)?,
            InputSource::Synthetic { seed } => {
                info!("Generating synthetic session with seed {seed}");
                synthetic_session(*seed)
            }
        };
        if let Some(path) = &config.save_session {
            session.to_file(path)?;
            info!("Session saved to {}", path.display());
        }
        let name = match &config.input {
            InputSource::Session(path) => path.display().to_string(),
            InputSource::Synthetic { .. } => "synthetic".to_string(),
        };

        let mut controller = GestureController::new(gestures)?;
        let camera = OrbitRig::default().into_handle();
        controller.attach_camera(Some(&camera));

        let overlay = Rc::new(RefCell::new(CommandBuffer::default()));
        let clicks: Rc<RefCell<Vec<(i32, i32)>>> = Rc::default();
        let sink_clicks = Rc::clone(&clicks);
        controller.add_observer(Box::new(CursorLayer::new(
            &gestures.cursor,
            Rc::clone(&overlay),
            move |x, y| sink_clicks.borrow_mut().push((x, y)),
        )));

        Ok(Self {
            config,
            controller,
            source: ReplaySource::new(name, session),
            camera,
            overlay,
            clicks,
        })
    }

    /// Replay every frame, interleaving render ticks at the configured rate
    ///
    /// # Errors
    ///
    /// Currently never fails; kept fallible for sources that can.
    pub fn run(&mut self) -> Result<RunSummary> {
        let origin = Instant::now();
        self.controller.add_observer(Box::new(LoggingObserver { origin }));

        let render_interval = Duration::from_secs_f64(1.0 / f64::from(self.config.render_hz));
        let mut next_render = origin;
        let mut clock = origin;

        if self.controller.start(&mut self.source) {
            while let Some(frame) = self.source.next_frame() {
                match frame {
                    Ok(LandmarkFrame { at_ms, hands, .. }) => {
                        clock = origin + Duration::from_millis(at_ms);
                        while next_render <= clock {
                            self.controller.on_render_frame(next_render);
                            next_render += render_interval;
                        }
                        if self.config.realtime {
                            std::thread::sleep(clock.saturating_duration_since(Instant::now()));
                        }
                        self.controller.on_hands(&hands, clock);
                    }
                    Err(e) => self.controller.on_frame_error(&e, clock),
                }
            }
            self.controller.on_render_frame(next_render);
            self.controller.stop(&mut self.source);
        } else {
            warn!("Replay skipped: {}", self.controller.status());
        }

        let history = self
            .controller
            .history()
            .iter()
            .map(|r| (r.label, r.at.saturating_duration_since(origin).as_millis()))
            .collect();
        info!("Overlay redrawn {} times", self.overlay.borrow().clears());

        Ok(RunSummary {
            stats: self.controller.stats(),
            history,
            camera: self.controller.camera().spherical(),
            clicks: self.clicks.borrow().clone(),
            status: self.controller.status().clone(),
        })
    }

    /// Camera driven by the replay
    #[must_use]
    pub const fn camera(&self) -> &CameraHandle {
        &self.camera
    }
}

/// Scripted demo session
///
/// A right hand sweeps to the right, a left hand points and dwells, then two
/// unlabeled hands move apart. Short gaps without hands separate the phases,
/// and one frame reports a tracker failure.
#[must_use]
pub fn synthetic_session(seed: u64) -> Session {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut frames = Vec::new();
    let mut at_ms = 0;
    let mut jitter = move || rng.gen_range(-0.002f64..0.002);

    let mut push = |frames: &mut Vec<LandmarkFrame>, hands: Vec<RawHand>, error: Option<&str>| {
        frames.push(LandmarkFrame {
            at_ms,
            hands,
            error: error.map(str::to_string),
        });
        at_ms += FRAME_INTERVAL_MS;
    };

    // Right hand sweeps from 0.3 to 0.7
    for i in 0..45 {
        let x = 0.3 + 0.4 * f64::from(i) / 44.0;
        let tip = Point2D::new(x + jitter(), 0.5 + jitter());
        let hand = synthetic_raw_hand(SyntheticPose::Open, tip, Some(Handedness::Right));
        push(&mut frames, vec![hand], if i == 20 { Some("tracker timeout") } else { None });
    }
    for _ in 0..6 {
        push(&mut frames, Vec::new(), None);
    }

    // Left hand points at one spot for about 1.3 s
    for _ in 0..40 {
        let tip = Point2D::new(0.35 + jitter(), 0.4 + jitter());
        let hand = synthetic_raw_hand(SyntheticPose::Pointing, tip, Some(Handedness::Left));
        push(&mut frames, vec![hand], None);
    }
    for _ in 0..6 {
        push(&mut frames, Vec::new(), None);
    }

    // Two unlabeled hands spread apart
    for i in 0..15 {
        let half = 0.05 + 0.3 * f64::from(i) / 14.0;
        let hands = vec![
            synthetic_raw_hand(SyntheticPose::Open, Point2D::new(0.5 - half, 0.5 + jitter()), None),
            synthetic_raw_hand(SyntheticPose::Open, Point2D::new(0.5 + half, 0.5 + jitter()), None),
        ];
        push(&mut frames, hands, None);
    }
    push(&mut frames, Vec::new(), None);

    Session { frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_app() -> ReplayApp {
        let config = AppConfig {
            input: InputSource::Synthetic { seed: 42 },
            render_hz: 60,
            realtime: false,
            save_session: None,
        };
        ReplayApp::new(config, &Config::default()).unwrap()
    }

    #[test]
    fn test_synthetic_session_shape() {
        let session = synthetic_session(1);
        assert_eq!(session.frames.len(), 45 + 6 + 40 + 6 + 15 + 1);
        assert_eq!(session.frames.iter().filter(|f| f.error.is_some()).count(), 1);
        assert!(session.frames.windows(2).all(|w| w[0].at_ms < w[1].at_ms));
    }

    #[test]
    fn test_synthetic_replay_runs_all_phases() {
        let mut app = synthetic_app();
        let summary = app.run().unwrap();

        assert_eq!(summary.stats.missed_frames, 1);
        assert_eq!(summary.stats.activations, 1);
        assert_eq!(summary.clicks.len(), 1);
        assert_eq!(summary.status, TrackingStatus::Stopped);

        let camera = summary.camera.unwrap();
        // Sweeping right turns the view left; spreading hands zooms out
        assert!(camera.theta < 0.0);
        assert!(camera.radius > 3.0);
    }

    #[test]
    fn test_zero_render_rate_is_rejected() {
        let config = AppConfig {
            input: InputSource::Synthetic { seed: 0 },
            render_hz: 0,
            realtime: false,
            save_session: None,
        };
        assert!(ReplayApp::new(config, &Config::default()).is_err());
    }
}
