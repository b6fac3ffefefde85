//! Configuration management for the hand-control pipeline

use crate::constants::{
    DEFAULT_COOLDOWN_CLICK_MS, DEFAULT_COOLDOWN_SCROLL_MS, DEFAULT_DEAD_ZONE, DEFAULT_EMA_ALPHA,
    DEFAULT_FINGER_THRESHOLD, DEFAULT_GRAB_THRESHOLD, DEFAULT_HAND_LOST_FRAMES,
    DEFAULT_KEYBOARD_HOLD_TIME, DEFAULT_MAX_NUM_HANDS, DEFAULT_MIN_CONFIDENCE,
    DEFAULT_ONE_EURO_BETA, DEFAULT_ONE_EURO_DCUTOFF, DEFAULT_ONE_EURO_FREQ,
    DEFAULT_ONE_EURO_MINCUTOFF, DEFAULT_PINCH_THRESHOLD, DEFAULT_SCROLL_DELTA_THRESHOLD,
    DEFAULT_SENSITIVITY, DEFAULT_STABILITY_FRAMES,
};
use crate::landmarks::Handedness;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hand tracking configuration
    pub tracking: TrackingConfig,

    /// Gesture recognition configuration
    pub gestures: GestureConfig,

    /// Cursor smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Cursor mapping configuration
    pub cursor: CursorConfig,
}

/// Hand tracking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Which hand drives the cursor
    pub dominant_hand: Handedness,

    /// Maximum number of hands processed per frame (1 or 2)
    pub max_num_hands: usize,

    /// Detections below this confidence are treated as no hand (0.0-1.0)
    pub min_confidence: f64,

    /// Frames a hand may be absent before smoothing state is reset
    pub hand_lost_frames: u32,
}

/// Gesture recognition parameters. Distance thresholds are relative to
/// the hand size estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Finger extension threshold
    pub finger_threshold: f64,

    /// Fingertip pinch threshold
    pub pinch_threshold: f64,

    /// Vertical palm displacement for window minimize/maximize while grabbing
    pub grab_threshold: f64,

    /// Scroll midpoint displacement required per scroll tick
    pub scroll_delta_threshold: f64,

    /// Consecutive identical frames required before a gesture commits
    pub stability_frames: usize,

    /// Cooldown between click-like gestures (ms)
    pub cooldown_click_ms: u64,

    /// Cooldown between scroll ticks (ms)
    pub cooldown_scroll_ms: u64,

    /// Seconds all fingers must stay open to arm keyboard mode
    pub keyboard_hold_time: f64,
}

/// Which smoothing strategy filters the cursor trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmootherKind {
    OneEuro,
    Ema,
}

/// Cursor smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smoothing strategy
    pub kind: SmootherKind,

    /// EMA smoothing factor (0 = maximum smoothing, 1 = passthrough)
    pub ema_alpha: f64,

    /// One-Euro expected update frequency (Hz)
    pub one_euro_freq: f64,

    /// One-Euro minimum cutoff frequency (stability when stationary)
    pub one_euro_mincutoff: f64,

    /// One-Euro speed coefficient (responsiveness when moving)
    pub one_euro_beta: f64,

    /// One-Euro derivative cutoff frequency
    pub one_euro_dcutoff: f64,
}

/// Cursor mapping parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Margin fraction excluded on each screen edge (0.0-0.4)
    pub dead_zone: f64,

    /// Cursor movement amplification
    pub sensitivity: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            dominant_hand: Handedness::Right,
            max_num_hands: DEFAULT_MAX_NUM_HANDS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            hand_lost_frames: DEFAULT_HAND_LOST_FRAMES,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            finger_threshold: DEFAULT_FINGER_THRESHOLD,
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            grab_threshold: DEFAULT_GRAB_THRESHOLD,
            scroll_delta_threshold: DEFAULT_SCROLL_DELTA_THRESHOLD,
            stability_frames: DEFAULT_STABILITY_FRAMES,
            cooldown_click_ms: DEFAULT_COOLDOWN_CLICK_MS,
            cooldown_scroll_ms: DEFAULT_COOLDOWN_SCROLL_MS,
            keyboard_hold_time: DEFAULT_KEYBOARD_HOLD_TIME,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            kind: SmootherKind::OneEuro,
            ema_alpha: DEFAULT_EMA_ALPHA,
            one_euro_freq: DEFAULT_ONE_EURO_FREQ,
            one_euro_mincutoff: DEFAULT_ONE_EURO_MINCUTOFF,
            one_euro_beta: DEFAULT_ONE_EURO_BETA,
            one_euro_dcutoff: DEFAULT_ONE_EURO_DCUTOFF,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.tracking.max_num_hands) {
            return Err(Error::Config("max_num_hands must be 1 or 2".to_string()));
        }
        if !(0.0..=1.0).contains(&self.tracking.min_confidence) {
            return Err(Error::Config(
                "min_confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.gestures.finger_threshold <= 0.0 {
            return Err(Error::Config("finger_threshold must be positive".to_string()));
        }
        if self.gestures.pinch_threshold <= 0.0 {
            return Err(Error::Config("pinch_threshold must be positive".to_string()));
        }
        if self.gestures.grab_threshold <= 0.0 {
            return Err(Error::Config("grab_threshold must be positive".to_string()));
        }
        if self.gestures.stability_frames == 0 {
            return Err(Error::Config(
                "stability_frames must be greater than 0".to_string(),
            ));
        }
        if self.gestures.keyboard_hold_time <= 0.0 {
            return Err(Error::Config("keyboard_hold_time must be positive".to_string()));
        }

        if !(0.0..=1.0).contains(&self.smoothing.ema_alpha) {
            return Err(Error::Config(
                "ema_alpha must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.smoothing.one_euro_freq <= 0.0 {
            return Err(Error::Config("one_euro_freq must be positive".to_string()));
        }
        if self.smoothing.one_euro_mincutoff <= 0.0 {
            return Err(Error::Config("one_euro_mincutoff must be positive".to_string()));
        }
        if self.smoothing.one_euro_dcutoff <= 0.0 {
            return Err(Error::Config("one_euro_dcutoff must be positive".to_string()));
        }

        if !(0.0..0.5).contains(&self.cursor.dead_zone) {
            return Err(Error::Config(
                "dead_zone must be in [0.0, 0.5)".to_string(),
            ));
        }
        if self.cursor.sensitivity <= 0.0 {
            return Err(Error::Config("sensitivity must be positive".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Control Configuration

# Hand tracking
tracking:
  dominant_hand: right
  max_num_hands: 2
  min_confidence: 0.7
  hand_lost_frames: 2

# Gesture recognition (distance thresholds relative to hand size)
gestures:
  finger_threshold: 0.15
  pinch_threshold: 0.08
  grab_threshold: 0.12
  scroll_delta_threshold: 0.02
  stability_frames: 3
  cooldown_click_ms: 300
  cooldown_scroll_ms: 50
  keyboard_hold_time: 1.0

# Cursor smoothing
smoothing:
  kind: one_euro
  ema_alpha: 0.3
  one_euro_freq: 30.0
  one_euro_mincutoff: 1.0
  one_euro_beta: 0.007
  one_euro_dcutoff: 1.0

# Cursor mapping
cursor:
  dead_zone: 0.1
  sensitivity: 1.0
"#;
