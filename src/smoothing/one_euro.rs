use super::Smoother;
use crate::{Error, Result};
use std::f64::consts::PI;

/// Inner first-order low-pass stage used for both the value and its
/// derivative estimate
#[derive(Debug, Default)]
struct LowPass {
    prev: Option<f64>,
}

impl LowPass {
    fn filter(&mut self, value: f64, alpha: f64) -> f64 {
        let out = match self.prev {
            Some(prev) => alpha.mul_add(value - prev, prev),
            None => value,
        };
        self.prev = Some(out);
        out
    }

    fn reset(&mut self) {
        self.prev = None;
    }
}

/// One-Euro smoother: adaptive cutoff frequency scaled by signal speed.
///
/// Slow, deliberate motion gets heavy smoothing (kills jitter); fast
/// motion gets light smoothing (kills lag). `mincutoff` sets the baseline
/// smoothness, `beta` the responsiveness to speed.
pub struct OneEuroSmoother {
    mincutoff: f64,
    beta: f64,
    dcutoff: f64,

    value_filter: LowPass,
    derivative_filter: LowPass,
    prev_time: Option<f64>,
    prev_filtered: Option<f64>,
}

impl OneEuroSmoother {
    /// Create a new One-Euro smoother.
    ///
    /// # Errors
    ///
    /// Fails if either cutoff frequency is not positive.
    pub fn new(mincutoff: f64, beta: f64, dcutoff: f64) -> Result<Self> {
        if mincutoff <= 0.0 {
            return Err(Error::Filter(format!(
                "Minimum cutoff must be positive, got {mincutoff}"
            )));
        }
        if dcutoff <= 0.0 {
            return Err(Error::Filter(format!(
                "Derivative cutoff must be positive, got {dcutoff}"
            )));
        }
        Ok(Self {
            mincutoff,
            beta,
            dcutoff,
            value_filter: LowPass::default(),
            derivative_filter: LowPass::default(),
            prev_time: None,
            prev_filtered: None,
        })
    }

    /// Smoothing factor for a cutoff frequency at a given time step
    fn alpha(cutoff: f64, dt: f64) -> f64 {
        let tau = 1.0 / (2.0 * PI * cutoff);
        1.0 / (1.0 + tau / dt)
    }
}

impl Smoother for OneEuroSmoother {
    fn filter(&mut self, raw: f64, timestamp: f64) -> f64 {
        let (Some(prev_time), Some(prev_filtered)) = (self.prev_time, self.prev_filtered) else {
            // First sample: pass through with zero lag
            self.prev_time = Some(timestamp);
            self.prev_filtered = Some(raw);
            return raw;
        };

        let dt = timestamp - prev_time;
        if dt <= 0.0 {
            // Duplicate or non-monotonic timestamp; hold the output
            return prev_filtered;
        }

        // Smooth the derivative estimate at the fixed derivative cutoff
        let derivative = (raw - prev_filtered) / dt;
        let derivative_smooth = self
            .derivative_filter
            .filter(derivative, Self::alpha(self.dcutoff, dt));

        // Speed-adaptive cutoff, then smooth the value itself
        let cutoff = self.beta.mul_add(derivative_smooth.abs(), self.mincutoff);
        let filtered = self.value_filter.filter(raw, Self::alpha(cutoff, dt));

        self.prev_time = Some(timestamp);
        self.prev_filtered = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.value_filter.reset();
        self.derivative_filter.reset();
        self.prev_time = None;
        self.prev_filtered = None;
    }

    fn name(&self) -> &str {
        "OneEuroSmoother"
    }
}
