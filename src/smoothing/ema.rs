use super::Smoother;
use crate::{Error, Result};

/// Exponential moving average smoother.
///
/// `filtered = alpha * raw + (1 - alpha) * prev`. Constant lag regardless
/// of movement speed; the simplest strategy.
pub struct EmaSmoother {
    alpha: f64,
    prev: Option<f64>,
}

impl EmaSmoother {
    /// Create a new EMA smoother.
    ///
    /// # Errors
    ///
    /// Fails if alpha is outside (0, 1].
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::Filter(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, prev: None })
    }
}

impl Smoother for EmaSmoother {
    fn filter(&mut self, raw: f64, _timestamp: f64) -> f64 {
        let filtered = match self.prev {
            Some(prev) => self.alpha.mul_add(raw - prev, prev),
            None => raw,
        };
        self.prev = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.prev = None;
    }

    fn name(&self) -> &str {
        "EmaSmoother"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_passes_through() {
        let mut smoother = EmaSmoother::new(0.5).unwrap();
        assert_eq!(smoother.filter(10.0, 0.0), 10.0);
    }

    #[test]
    fn test_second_value_is_smoothed() {
        let mut smoother = EmaSmoother::new(0.5).unwrap();
        smoother.filter(10.0, 0.0);
        assert_eq!(smoother.filter(20.0, 0.033), 15.0); // 0.5 * 20 + 0.5 * 10
    }

    #[test]
    fn test_alpha_controls_responsiveness() {
        // High alpha tracks closely
        let mut fast = EmaSmoother::new(0.9).unwrap();
        fast.filter(10.0, 0.0);
        assert!((fast.filter(20.0, 0.033) - 19.0).abs() < 1e-9);

        // Low alpha smooths heavily
        let mut slow = EmaSmoother::new(0.1).unwrap();
        slow.filter(10.0, 0.0);
        assert!((slow.filter(20.0, 0.033) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(EmaSmoother::new(0.0).is_err());
        assert!(EmaSmoother::new(1.5).is_err());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut smoother = EmaSmoother::new(0.5).unwrap();
        smoother.filter(100.0, 0.0);
        smoother.reset();
        assert_eq!(smoother.filter(5.0, 1.0), 5.0);
    }
}
