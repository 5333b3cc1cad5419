//! Forward EZ-diffusion equations
//!
//! Closed-form predictions of accuracy, mean response time, and response-time
//! variance from the latent parameters. All functions are pure; inputs must
//! satisfy `drift_rate > 0` and `boundary > 0`.

use crate::params::{LatentParams, SummaryStats};

/// Predicted accuracy rate for the given parameters
///
/// Monotonically increasing in `drift_rate * boundary`, always in (0, 1).
pub fn forward_accuracy(drift_rate: f64, boundary: f64) -> f64 {
    assert!(
        drift_rate.is_finite() && drift_rate > 0.0,
        "drift_rate must be finite and > 0"
    );
    assert!(
        boundary.is_finite() && boundary > 0.0,
        "boundary must be finite and > 0"
    );
    let y = (-drift_rate * boundary).exp();
    1.0 / (y + 1.0)
}

/// Predicted mean response time for the given parameters
///
/// The decision-time component is added to the non-decision offset.
pub fn forward_mean_rt(drift_rate: f64, boundary: f64, nondecision: f64) -> f64 {
    assert!(
        drift_rate.is_finite() && drift_rate > 0.0,
        "drift_rate must be finite and > 0"
    );
    assert!(
        boundary.is_finite() && boundary > 0.0,
        "boundary must be finite and > 0"
    );
    let y = (-drift_rate * boundary).exp();
    nondecision + (boundary / (2.0 * drift_rate)) * ((1.0 - y) / (1.0 + y))
}

/// Predicted response-time variance for the given parameters
pub fn forward_var_rt(drift_rate: f64, boundary: f64) -> f64 {
    assert!(
        drift_rate.is_finite() && drift_rate > 0.0,
        "drift_rate must be finite and > 0"
    );
    assert!(
        boundary.is_finite() && boundary > 0.0,
        "boundary must be finite and > 0"
    );
    let y = (-drift_rate * boundary).exp();
    let numerator = 1.0 - 2.0 * drift_rate * boundary * y - y * y;
    (boundary / (2.0 * drift_rate.powi(3))) * (numerator / ((y + 1.0) * (y + 1.0)))
}

/// Predicted summary statistics for the given parameters
pub fn predict(params: &LatentParams) -> SummaryStats {
    SummaryStats::new(
        forward_accuracy(params.drift_rate, params.boundary),
        forward_mean_rt(params.drift_rate, params.boundary, params.nondecision),
        forward_var_rt(params.drift_rate, params.boundary),
    )
}
