//! Configuration management for the gesture controller

use crate::{
    classifier::ClassifierTier,
    constants::{
        DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_DWELL_ACTIVATION_MS, DEFAULT_FIST_MAX_EXTENDED,
        DEFAULT_FRAME_SKIP, DEFAULT_HISTORY_WINDOW, DEFAULT_IDLE_ROTATION_SPEED,
        DEFAULT_INACTIVITY_TIMEOUT_MS, DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE,
        DEFAULT_MOVEMENT_THRESHOLD, DEFAULT_OVERLAY_HEIGHT, DEFAULT_OVERLAY_WIDTH,
        DEFAULT_PINCH_THRESHOLD, DEFAULT_PINCH_ZOOM_GAIN, DEFAULT_PINCH_ZOOM_THRESHOLD,
        DEFAULT_POLAR_MARGIN, DEFAULT_SENSITIVITY, DEFAULT_SMOOTHING_FACTOR, DEFAULT_TAP_STILLNESS,
        DEFAULT_TWO_HAND_ZOOM_GAIN, DEFAULT_TWO_HAND_ZOOM_THRESHOLD, DEFAULT_VIEWPORT_HEIGHT,
        DEFAULT_VIEWPORT_WIDTH, MAX_HISTORY_WINDOW,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{f64::consts::FRAC_PI_2, path::Path, time::Duration};

/// Gesture controller configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pose classifier configuration
    pub classifier: ClassifierConfig,

    /// Rotation role configuration
    pub rotation: RotationConfig,

    /// Cursor role configuration
    pub cursor: CursorConfig,

    /// Two-hand strategy configuration
    pub two_hand: TwoHandConfig,

    /// Orbit camera limits
    pub camera: CameraConfig,

    /// Idle auto-rotation
    pub idle: IdleConfig,
}

/// Pose classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Accuracy tier (exact or cheap)
    pub tier: ClassifierTier,

    /// Thumb-index tip distance below which a hand is pinching
    pub pinch_threshold: f64,

    /// Exact tier: at most this many extended fingers still make a fist
    pub fist_max_extended: usize,
}

/// How rotation jitter is suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterPolicy {
    /// Process every Nth frame only
    #[default]
    FrameSkip,
    /// Smooth every frame through a position filter
    Smoothing,
}

/// Rotation role parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Multiplier applied to index-tip deltas
    pub sensitivity: f64,

    /// Scaled delta magnitude below which the hand counts as still
    pub movement_threshold: f64,

    /// Jitter suppression policy
    pub jitter: JitterPolicy,

    /// Frame-skip policy: process every Nth frame
    pub frame_skip: u32,

    /// Smoothing policy: filter spec (`exponential` or `moving_average`)
    pub smoothing_filter: String,

    /// Exponential filter alpha
    pub smoothing_factor: f64,

    /// Moving average window (at most 5 samples)
    pub history_window: usize,

    /// Camera distance change per unit of pinch distance change
    pub pinch_zoom_gain: f64,

    /// Pinch distance change below which no zoom is applied
    pub pinch_zoom_threshold: f64,
}

/// How the cursor hand activates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPolicy {
    /// Sustained pointing fires after a dwell time
    #[default]
    Dwell,
    /// Two still pointing samples inside a time window
    DoubleTap,
}

/// Cursor role and overlay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Activation policy
    pub activation: ActivationPolicy,

    /// Dwell time before activation
    pub dwell_activation_ms: u64,

    /// Maximum gap between the two taps of a double-tap
    pub double_tap_window_ms: u64,

    /// Cursor movement below which a pointing sample counts as a tap
    pub tap_stillness: f64,

    /// Overlay width in pixels
    pub overlay_width: u32,

    /// Overlay height in pixels
    pub overlay_height: u32,

    /// Viewport width in pixels
    pub viewport_width: u32,

    /// Viewport height in pixels
    pub viewport_height: u32,
}

/// Session strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Decide from the first frame of each session
    #[default]
    Auto,
    /// Always split hands into rotation and cursor roles
    RoleSplit,
    /// Two unlabeled hands zoom by their distance
    TwoHandDistance,
}

/// Two-hand distance zoom parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoHandConfig {
    /// Strategy selection
    pub strategy: StrategyMode,

    /// Distance change below which no zoom is applied
    pub zoom_threshold: f64,

    /// Camera distance change per unit of hand distance change
    pub zoom_gain: f64,
}

/// Orbit camera limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Closest allowed distance to the target
    pub min_distance: f64,

    /// Farthest allowed distance from the target
    pub max_distance: f64,

    /// Multiplier on zoom intents
    pub zoom_sensitivity: f64,

    /// Polar angle stays within [margin, PI - margin]
    pub polar_margin: f64,

    /// Defer rotations to the next render frame, keeping only the newest
    pub coalesce_rotations: bool,
}

/// Idle auto-rotation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Enable auto-rotation while no gesture input arrives
    pub enabled: bool,

    /// Time without gesture input before auto-rotation resumes
    pub inactivity_timeout_ms: u64,

    /// Rotation per render frame in radians
    pub rotation_speed: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tier: ClassifierTier::Exact,
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            fist_max_extended: DEFAULT_FIST_MAX_EXTENDED,
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            movement_threshold: DEFAULT_MOVEMENT_THRESHOLD,
            jitter: JitterPolicy::FrameSkip,
            frame_skip: DEFAULT_FRAME_SKIP,
            smoothing_filter: "exponential".to_string(),
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            history_window: DEFAULT_HISTORY_WINDOW,
            pinch_zoom_gain: DEFAULT_PINCH_ZOOM_GAIN,
            pinch_zoom_threshold: DEFAULT_PINCH_ZOOM_THRESHOLD,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            activation: ActivationPolicy::Dwell,
            dwell_activation_ms: DEFAULT_DWELL_ACTIVATION_MS,
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            tap_stillness: DEFAULT_TAP_STILLNESS,
            overlay_width: DEFAULT_OVERLAY_WIDTH,
            overlay_height: DEFAULT_OVERLAY_HEIGHT,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Default for TwoHandConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyMode::Auto,
            zoom_threshold: DEFAULT_TWO_HAND_ZOOM_THRESHOLD,
            zoom_gain: DEFAULT_TWO_HAND_ZOOM_GAIN,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            zoom_sensitivity: 1.0,
            polar_margin: DEFAULT_POLAR_MARGIN,
            coalesce_rotations: true,
        }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inactivity_timeout_ms: DEFAULT_INACTIVITY_TIMEOUT_MS,
            rotation_speed: DEFAULT_IDLE_ROTATION_SPEED,
        }
    }
}

impl CursorConfig {
    /// Dwell time as a duration
    #[must_use]
    pub const fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_activation_ms)
    }

    /// Double-tap window as a duration
    #[must_use]
    pub const fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

impl IdleConfig {
    /// Inactivity timeout as a duration
    #[must_use]
    pub const fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_timeout_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `ConfigError` if it
    /// does not parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text does not parse.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails and `IoError` if the file
    /// cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create the rotation smoothing filter from configuration
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the filter name or its parameter is invalid.
    pub fn create_filter(&self) -> Result<Box<dyn crate::filters::PositionFilter>> {
        use crate::filters::{
            create_filter, exponential::ExponentialFilter, moving_average::MovingAverageFilter,
        };

        match self.rotation.smoothing_filter.as_str() {
            "exponential" => Ok(Box::new(ExponentialFilter::new(self.rotation.smoothing_factor)?)),
            "moving_average" => Ok(Box::new(MovingAverageFilter::new(self.rotation.history_window)?)),
            name => create_filter(name),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        // Classifier
        if !(self.classifier.pinch_threshold > 0.0 && self.classifier.pinch_threshold < 1.0) {
            return Err(Error::ConfigError(
                "Pinch threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.classifier.fist_max_extended > 3 {
            return Err(Error::ConfigError(
                "Fist tolerance must leave at least one finger curled (max 3)".to_string(),
            ));
        }

        // Rotation
        if !(self.rotation.sensitivity.is_finite() && self.rotation.sensitivity > 0.0) {
            return Err(Error::ConfigError("Sensitivity must be greater than 0".to_string()));
        }
        if !(self.rotation.movement_threshold.is_finite() && self.rotation.movement_threshold >= 0.0) {
            return Err(Error::ConfigError(
                "Movement threshold must not be negative".to_string(),
            ));
        }
        if !(self.rotation.pinch_zoom_gain.is_finite() && self.rotation.pinch_zoom_gain > 0.0) {
            return Err(Error::ConfigError("Pinch zoom gain must be greater than 0".to_string()));
        }
        if !(self.rotation.pinch_zoom_threshold.is_finite()
            && self.rotation.pinch_zoom_threshold >= 0.0)
        {
            return Err(Error::ConfigError(
                "Pinch zoom threshold must not be negative".to_string(),
            ));
        }
        if self.rotation.frame_skip == 0 {
            return Err(Error::ConfigError("Frame skip must be at least 1".to_string()));
        }
        if !(self.rotation.smoothing_factor > 0.0 && self.rotation.smoothing_factor <= 1.0) {
            return Err(Error::ConfigError(
                "Smoothing factor must be in (0.0, 1.0]".to_string(),
            ));
        }
        if self.rotation.history_window == 0 || self.rotation.history_window > MAX_HISTORY_WINDOW {
            return Err(Error::ConfigError(format!(
                "History window must be between 1 and {MAX_HISTORY_WINDOW}"
            )));
        }
        self.create_filter()
            .map_err(|e| Error::ConfigError(format!("Invalid smoothing filter: {e}")))?;

        // Cursor
        if self.cursor.dwell_activation_ms == 0 || self.cursor.double_tap_window_ms == 0 {
            return Err(Error::ConfigError(
                "Activation timings must be greater than 0 ms".to_string(),
            ));
        }
        if !(self.cursor.tap_stillness.is_finite() && self.cursor.tap_stillness > 0.0) {
            return Err(Error::ConfigError("Tap stillness must be greater than 0".to_string()));
        }
        if self.cursor.overlay_width == 0
            || self.cursor.overlay_height == 0
            || self.cursor.viewport_width == 0
            || self.cursor.viewport_height == 0
        {
            return Err(Error::ConfigError(
                "Overlay and viewport sizes must be greater than 0".to_string(),
            ));
        }

        // Two hands
        if !(self.two_hand.zoom_gain.is_finite() && self.two_hand.zoom_gain > 0.0) {
            return Err(Error::ConfigError("Two-hand zoom gain must be greater than 0".to_string()));
        }
        if !(self.two_hand.zoom_threshold.is_finite() && self.two_hand.zoom_threshold >= 0.0) {
            return Err(Error::ConfigError(
                "Two-hand zoom threshold must not be negative".to_string(),
            ));
        }

        // Camera
        if !(self.camera.min_distance > 0.0
            && self.camera.min_distance < self.camera.max_distance
            && self.camera.max_distance.is_finite())
        {
            return Err(Error::ConfigError(
                "Camera distances must satisfy 0 < min_distance < max_distance".to_string(),
            ));
        }
        if !(self.camera.polar_margin >= 0.0 && self.camera.polar_margin < FRAC_PI_2) {
            return Err(Error::ConfigError(
                "Polar margin must be between 0 and PI/2".to_string(),
            ));
        }

        if !(self.camera.zoom_sensitivity.is_finite() && self.camera.zoom_sensitivity > 0.0) {
            return Err(Error::ConfigError("Zoom sensitivity must be greater than 0".to_string()));
        }

        // Idle rotation
        if !self.idle.rotation_speed.is_finite() {
            return Err(Error::ConfigError("Idle rotation speed must be finite".to_string()));
        }
        if self.idle.enabled && self.idle.inactivity_timeout_ms == 0 {
            return Err(Error::ConfigError(
                "Inactivity timeout must be greater than 0 ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Constellation gesture control configuration

# Hand pose classification
classifier:
  tier: exact              # exact | cheap
  pinch_threshold: 0.06
  fist_max_extended: 2

# Rotation hand (right hand, or the only hand)
rotation:
  sensitivity: 4.0
  movement_threshold: 0.01
  jitter: frame_skip       # frame_skip | smoothing
  frame_skip: 3
  smoothing_filter: "exponential"
  smoothing_factor: 0.3
  history_window: 5
  pinch_zoom_gain: 10.0
  pinch_zoom_threshold: 0.01

# Cursor hand (left hand)
cursor:
  activation: dwell        # dwell | double_tap
  dwell_activation_ms: 1000
  double_tap_window_ms: 500
  tap_stillness: 0.02
  overlay_width: 160
  overlay_height: 120
  viewport_width: 1920
  viewport_height: 1080

# Two unlabeled hands
two_hand:
  strategy: auto           # auto | role_split | two_hand_distance
  zoom_threshold: 0.02
  zoom_gain: 0.1

# Orbit camera
camera:
  min_distance: 0.5
  max_distance: 10.0
  zoom_sensitivity: 1.0
  polar_margin: 0.1
  coalesce_rotations: true

# Idle auto-rotation
idle:
  enabled: true
  inactivity_timeout_ms: 180000
  rotation_speed: 0.003
"#;
