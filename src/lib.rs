//! Hand gesture interpretation library for real-time cursor and input control.
//!
//! This library turns a stream of hand-landmark observations (21 3D points
//! per hand per frame, produced by an external tracking model) into
//! discrete user-intent events:
//! 1. Geometry analysis derives finger extension and pinch state per frame
//! 2. A debounced, cooldown-gated state machine classifies gestures
//! 3. An adaptive One-Euro (or EMA) filter stabilizes the cursor trajectory
//! 4. A calibrated perspective transform maps camera space to screen space
//!
//! Video acquisition, the landmark detector itself and the OS injection
//! layer are external collaborators; the pipeline consumes plain landmark
//! data and emits one [`pipeline::ActionEvent`] per frame.
//!
//! # Examples
//!
//! ## Processing frames
//!
//! ```
//! use hand_control::config::Config;
//! use hand_control::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = Pipeline::new(Config::default(), 1920.0, 1080.0)?;
//!
//! // Without a visible hand every frame resolves to Idle
//! let event = pipeline.process_frame(None, None, 0.0);
//! assert!(event.cursor.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing a coordinate stream
//!
//! ```
//! use hand_control::config::SmoothingConfig;
//! use hand_control::smoothing::create_smoother;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut smoother = create_smoother(&SmoothingConfig::default())?;
//!
//! // The first sample passes through with zero lag
//! assert_eq!(smoother.filter(0.5, 0.0), 0.5);
//! let next = smoother.filter(0.6, 1.0 / 30.0);
//! assert!(next > 0.5 && next < 0.6);
//! # Ok(())
//! # }
//! ```
//!
//! ## Fitting a screen calibration
//!
//! ```
//! use hand_control::calibration::{CalibrationTransform, CorrespondencePair};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pairs = [
//!     CorrespondencePair { camera: (0.1, 0.1), screen: (0.0, 0.0) },
//!     CorrespondencePair { camera: (0.9, 0.1), screen: (1920.0, 0.0) },
//!     CorrespondencePair { camera: (0.9, 0.9), screen: (1920.0, 1080.0) },
//!     CorrespondencePair { camera: (0.1, 0.9), screen: (0.0, 1080.0) },
//! ];
//! let transform = CalibrationTransform::fit(&pairs)?;
//!
//! let (x, y) = transform.apply((0.5, 0.5));
//! assert!((x - 960.0).abs() < 1e-6);
//! assert!((y - 540.0).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

/// Hand landmark data structures
pub mod landmarks;

/// Pure per-frame hand geometry (finger extension, pinches, pointer)
pub mod geometry;

/// Cursor trajectory smoothing (One-Euro, EMA)
pub mod smoothing;

/// Camera-space to screen-space calibration
pub mod calibration;

/// Gesture classification state machine
pub mod gesture;

/// Per-frame pipeline orchestration
pub mod pipeline;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

#[cfg(test)]
pub(crate) mod test_hands;

pub use error::{Error, Result};
