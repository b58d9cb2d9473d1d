//! Hand-gesture control for the constellation universe viewer.
//!
//! Turns noisy per-frame hand landmarks into stable orbit-camera control:
//! - Geometric pose classification (open, fist, pointing, pinching)
//! - Per-hand role state machines with frame skipping or smoothing
//! - Orbit camera rotation and zoom with polar and distance clamps
//! - A cursor overlay with dwell or double-tap activation
//! - An edge-triggered gesture label with a bounded history
//!
//! The pipeline runs as:
//! 1. A [`source::LandmarkSource`] delivers the hands of each video frame
//! 2. The [`controller::GestureController`] validates and classifies them
//! 3. The interaction engine produces one label plus control intents
//! 4. Intents move the attached camera and notify observers such as the
//!    [`cursor::CursorLayer`]
//!
//! # Examples
//!
//! ```
//! use constellation_gestures::{
//!     camera::OrbitRig,
//!     config::Config,
//!     controller::GestureController,
//!     gesture::GestureLabel,
//!     landmarks::{Handedness, Point2D},
//!     source::{ReplaySource, Session},
//!     synthetic::{synthetic_raw_hand, SyntheticPose},
//! };
//! use std::time::{Duration, Instant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.rotation.frame_skip = 1;
//!
//! let mut controller = GestureController::new(&config)?;
//! let camera = OrbitRig::default().into_handle();
//! controller.attach_camera(Some(&camera));
//!
//! let mut source = ReplaySource::new("demo", Session::default());
//! controller.start(&mut source);
//!
//! let t0 = Instant::now();
//! for (i, x) in [0.5, 0.6].into_iter().enumerate() {
//!     let hand = synthetic_raw_hand(SyntheticPose::Open, Point2D::new(x, 0.5), Some(Handedness::Right));
//!     controller.on_hands(&[hand], t0 + Duration::from_millis(33 * i as u64));
//! }
//! assert_eq!(controller.current_gesture(), GestureLabel::Rotate);
//!
//! // Rotations are applied on the next render frame
//! controller.on_render_frame(t0 + Duration::from_millis(40));
//! controller.stop(&mut source);
//! # Ok(())
//! # }
//! ```

/// Replay application
pub mod app;

/// Orbit camera trait, adapter and idle rotation
pub mod camera;

/// Hand pose classification
pub mod classifier;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Gesture controller and observer interface
pub mod controller;

/// Cursor overlay and activation dispatch
pub mod cursor;

/// Error types and result handling
pub mod error;

/// Position smoothing filters
pub mod filters;

/// Gesture labels and history
pub mod gesture;

/// Per-frame interaction state machine
pub mod interaction;

/// Hand landmark data model
pub mod landmarks;

/// Landmark sources and recorded sessions
pub mod source;

/// Synthetic hands for demos and tests
pub mod synthetic;

/// Numeric helpers
pub mod utils;

pub use error::{Error, Result};
