//! Escape-time evaluation with smooth (fractional) iteration counts.
use std::f64::consts::LN_2;

use crate::complex::C;
use crate::error::{Error, Result};

/// Magnitude-squared divergence threshold used by the sampler, 2^40.
pub const DEFAULT_HORIZON: f64 = 1_099_511_627_776.0;

/// Evaluate a single point `c = creal + cimag*i`.
///
/// Iterates `z <- z^2 + c` starting from `z = c` and returns 0 if the orbit
/// stays within `horizon` for `max_iter` steps. Otherwise returns
/// `n - log2(ln |z|^2) + log_horizon`, where `n` is the step at which the
/// orbit crossed the horizon.
///
/// `log_horizon` must equal `log2(ln(horizon))` and `horizon` must satisfy
/// `ln(horizon) > 1`; neither is checked here, see [`Horizon`].
#[inline]
pub fn evaluate(creal: f64, cimag: f64, max_iter: u32, horizon: f64, log_horizon: f64) -> f64 {
    let mut real = creal;
    let mut imag = cimag;
    for n in 0..max_iter {
        let real2 = real * real;
        let imag2 = imag * imag;
        if real2 + imag2 > horizon {
            return smooth(n, real2 + imag2, log_horizon);
        }
        imag = 2.0 * real * imag + cimag;
        real = real2 - imag2 + creal;
    }
    0.0
}

/// Smoothed escape value for an orbit that crossed the horizon at step `n`
/// with squared magnitude `mag2`.
#[inline]
pub(crate) fn smooth(n: u32, mag2: f64, log_horizon: f64) -> f64 {
    n as f64 - mag2.ln().ln() / LN_2 + log_horizon
}

/// A divergence horizon together with its precomputed log term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Horizon {
    horizon: f64,
    log_horizon: f64,
}

impl Horizon {
    pub fn new(horizon: f64) -> Result<Self> {
        if !(horizon.is_finite() && horizon.ln() > 1.0) {
            return Err(Error::HorizonTooSmall { horizon });
        }
        Ok(Self {
            horizon,
            log_horizon: horizon.ln().ln() / LN_2,
        })
    }

    pub fn value(&self) -> f64 {
        self.horizon
    }

    pub fn log(&self) -> f64 {
        self.log_horizon
    }

    /// Whether a starting point with squared magnitude `mag2` is safely
    /// inside the horizon.
    ///
    /// Requires `|c|^2 + |c| <= horizon / 2`. Then the orbit cannot escape on
    /// step 0, and an escape on step 1 has `|z|^2 <= horizon^2 / 4`, so every
    /// smoothed value stays positive.
    pub fn contains(&self, mag2: f64) -> bool {
        mag2 + mag2.sqrt() <= self.horizon / 2.0
    }

    pub fn evaluate(&self, c: C<f64>, max_iter: u32) -> f64 {
        evaluate(c.re, c.im, max_iter, self.horizon, self.log_horizon)
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            log_horizon: DEFAULT_HORIZON.ln().ln() / LN_2,
        }
    }
}
