//! Signal smoothing for the cursor trajectory.
//!
//! This module provides interchangeable low-pass strategies that turn a
//! jittery raw coordinate stream into a stable one. Each tracked scalar
//! (cursor x, cursor y) owns its own filter state.

/// Exponential moving average smoothing
pub mod ema;

/// Adaptive One-Euro smoothing
pub mod one_euro;

use crate::config::{SmootherKind, SmoothingConfig};
use crate::Result;

/// Trait for all cursor smoothers
pub trait Smoother: Send {
    /// Filter one sample. `timestamp` is in seconds and must be
    /// non-decreasing across calls.
    fn filter(&mut self, raw: f64, timestamp: f64) -> f64;

    /// Clear state; the next sample passes through with zero lag
    fn reset(&mut self);

    /// Get smoother name
    fn name(&self) -> &str;
}

/// Create a scalar smoother from configuration
pub fn create_smoother(config: &SmoothingConfig) -> Result<Box<dyn Smoother>> {
    match config.kind {
        SmootherKind::Ema => Ok(Box::new(ema::EmaSmoother::new(config.ema_alpha)?)),
        SmootherKind::OneEuro => Ok(Box::new(one_euro::OneEuroSmoother::new(
            config.one_euro_mincutoff,
            config.one_euro_beta,
            config.one_euro_dcutoff,
        )?)),
    }
}

/// 2D point smoother: independent x and y filters sharing one timestamp
pub struct PointSmoother {
    x: Box<dyn Smoother>,
    y: Box<dyn Smoother>,
}

impl PointSmoother {
    /// Build both axis filters from configuration
    pub fn from_config(config: &SmoothingConfig) -> Result<Self> {
        Ok(Self {
            x: create_smoother(config)?,
            y: create_smoother(config)?,
        })
    }

    /// Smooth a 2D point
    pub fn filter(&mut self, point: (f64, f64), timestamp: f64) -> (f64, f64) {
        (
            self.x.filter(point.0, timestamp),
            self.y.filter(point.1, timestamp),
        )
    }

    /// Reset both axis filters
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }

    /// Name of the underlying strategy
    #[must_use]
    pub fn name(&self) -> &str {
        self.x.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingConfig;

    #[test]
    fn test_create_smoother_from_config() {
        let mut config = SmoothingConfig::default();
        assert_eq!(create_smoother(&config).unwrap().name(), "OneEuroSmoother");

        config.kind = SmootherKind::Ema;
        assert_eq!(create_smoother(&config).unwrap().name(), "EmaSmoother");
    }

    #[test]
    fn test_point_smoother_axes_are_independent() {
        let config = SmoothingConfig {
            kind: SmootherKind::Ema,
            ema_alpha: 0.5,
            ..SmoothingConfig::default()
        };
        let mut smoother = PointSmoother::from_config(&config).unwrap();

        let first = smoother.filter((10.0, 100.0), 0.0);
        assert_eq!(first, (10.0, 100.0));

        let second = smoother.filter((20.0, 100.0), 0.033);
        assert_eq!(second, (15.0, 100.0));
    }

    #[test]
    fn test_point_smoother_reset() {
        let config = SmoothingConfig {
            kind: SmootherKind::Ema,
            ema_alpha: 0.2,
            ..SmoothingConfig::default()
        };
        let mut smoother = PointSmoother::from_config(&config).unwrap();

        smoother.filter((100.0, 100.0), 0.0);
        smoother.reset();

        // First sample after reset passes through unfiltered
        assert_eq!(smoother.filter((5.0, 7.0), 1.0), (5.0, 7.0));
    }
}
