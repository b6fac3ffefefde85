//! Constants used throughout the application

/// Number of landmarks reported per tracked hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Landmark indices (MediaPipe Hands ordering)
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertip landmark indices, thumb first
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Reference joints paired with [`FINGER_TIPS`] for the extension test
/// (IP for the thumb, PIP for the other fingers)
pub const FINGER_PIPS: [usize; 5] = [THUMB_IP, INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];

/// Default frames per second assumption
pub const DEFAULT_FPS: f64 = 30.0;

/// Default gesture thresholds, relative to hand size
pub const DEFAULT_FINGER_THRESHOLD: f64 = 0.15;
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.08;
pub const DEFAULT_GRAB_THRESHOLD: f64 = 0.12;

/// Scroll midpoint displacement (normalized camera space) required per tick
pub const DEFAULT_SCROLL_DELTA_THRESHOLD: f64 = 0.02;

/// Default debounce and cooldown parameters
pub const DEFAULT_STABILITY_FRAMES: usize = 3;
pub const DEFAULT_COOLDOWN_CLICK_MS: u64 = 300;
pub const DEFAULT_COOLDOWN_SCROLL_MS: u64 = 50;
pub const DEFAULT_KEYBOARD_HOLD_TIME: f64 = 1.0;

/// Default cursor mapping parameters
pub const DEFAULT_DEAD_ZONE: f64 = 0.1;
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// Default One-Euro filter parameters
pub const DEFAULT_ONE_EURO_FREQ: f64 = 30.0;
pub const DEFAULT_ONE_EURO_MINCUTOFF: f64 = 1.0;
pub const DEFAULT_ONE_EURO_BETA: f64 = 0.007;
pub const DEFAULT_ONE_EURO_DCUTOFF: f64 = 1.0;

/// Default EMA filter alpha
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Default hand tracking parameters
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_MAX_NUM_HANDS: usize = 2;

/// Frames a hand may be absent before smoothing state is reset
pub const DEFAULT_HAND_LOST_FRAMES: u32 = 2;

/// Consecutive malformed frames before the pipeline reports degraded mode
pub const MALFORMED_BURST_LIMIT: u32 = 10;

/// Singular values below this ratio of the largest are treated as rank loss
pub const RANK_EPSILON: f64 = 1e-9;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
