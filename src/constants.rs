//! Constants used throughout the library

/// Number of landmarks per tracked hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Landmark indices (fixed anatomical scheme)
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Fingertips that take part in the extension test (thumb excluded)
pub const EXTENSION_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Gesture history capacity
pub const GESTURE_HISTORY_CAPACITY: usize = 10;

/// Classifier defaults
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.06;
pub const DEFAULT_FIST_MAX_EXTENDED: usize = 2;

/// Rotation role defaults
pub const DEFAULT_SENSITIVITY: f64 = 4.0;
pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.01;
pub const DEFAULT_FRAME_SKIP: u32 = 3;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;
pub const DEFAULT_HISTORY_WINDOW: usize = 5;
pub const MAX_HISTORY_WINDOW: usize = 5;
pub const DEFAULT_PINCH_ZOOM_GAIN: f64 = 10.0;
pub const DEFAULT_PINCH_ZOOM_THRESHOLD: f64 = 0.01;

/// Cursor role defaults
pub const DEFAULT_DWELL_ACTIVATION_MS: u64 = 1000;
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 500;
pub const DEFAULT_TAP_STILLNESS: f64 = 0.02;

/// Two-hand distance zoom defaults
pub const DEFAULT_TWO_HAND_ZOOM_THRESHOLD: f64 = 0.02;
pub const DEFAULT_TWO_HAND_ZOOM_GAIN: f64 = 0.1;

/// Orbit camera limits
pub const DEFAULT_MIN_DISTANCE: f64 = 0.5;
pub const DEFAULT_MAX_DISTANCE: f64 = 10.0;
pub const DEFAULT_POLAR_MARGIN: f64 = 0.1;

/// Idle auto-rotation defaults
pub const DEFAULT_INACTIVITY_TIMEOUT_MS: u64 = 180_000;
pub const DEFAULT_IDLE_ROTATION_SPEED: f64 = 0.003;

/// Overlay and viewport sizes in pixels
pub const DEFAULT_OVERLAY_WIDTH: u32 = 160;
pub const DEFAULT_OVERLAY_HEIGHT: u32 = 120;
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;

/// Cursor glyph radii in overlay pixels
pub const CURSOR_OUTER_RADIUS: i32 = 8;
pub const CURSOR_INNER_RADIUS: i32 = 3;

/// Exponential filter bounds
pub const EXPONENTIAL_ALPHA_MIN: f64 = 0.0;
pub const EXPONENTIAL_ALPHA_MAX: f64 = 1.0;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
