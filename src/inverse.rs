//! Inverse EZ-diffusion equations
//!
//! Recovery of latent parameters from observed summary statistics. The
//! recovery order is fixed: drift rate first, then boundary from the
//! recovered drift, then non-decision time from both.

use anyhow::{bail, Result};

use crate::params::{LatentParams, SummaryStats};

/// Accuracy values at or below chance are raised to this before the logit.
const ACCURACY_FLOOR: f64 = 0.501;
/// Accuracy values at or above 1 are lowered to this before the logit.
const ACCURACY_CEIL: f64 = 0.999;

/// Clamp accuracy into the open interval where the logit is defined.
///
/// A lossy approximation at extreme accuracy; accepted as a known source of
/// recovery bias near the interval endpoints.
fn clamp_accuracy(accuracy: f64) -> f64 {
    if accuracy <= 0.5 {
        ACCURACY_FLOOR
    } else if accuracy >= 1.0 {
        ACCURACY_CEIL
    } else {
        accuracy
    }
}

fn logit(r: f64) -> f64 {
    (r / (1.0 - r)).ln()
}

/// Recover the drift rate from accuracy and response-time variance.
///
/// Uses the closed-form EZ inverse: the quartic expression under the root
/// equals `drift_rate^4` exactly when the inputs come from the forward
/// equations.
pub fn inverse_drift_rate(accuracy: f64, var_rt: f64) -> Result<f64> {
    if !var_rt.is_finite() || var_rt <= 0.0 {
        bail!("response-time variance must be finite and > 0, got {var_rt}");
    }
    let r = clamp_accuracy(accuracy);
    let l = logit(r);
    let quartic = l * (r * r * l - r * l + r - 0.5) / var_rt;
    if !quartic.is_finite() || quartic <= 0.0 {
        bail!("drift inversion out of domain: accuracy {accuracy}, variance {var_rt}");
    }
    Ok(quartic.powf(0.25))
}

/// Recover the boundary separation from accuracy and a recovered drift rate.
pub fn inverse_boundary(accuracy: f64, drift_rate: f64) -> Result<f64> {
    if !drift_rate.is_finite() || drift_rate == 0.0 {
        bail!("boundary inversion requires a finite nonzero drift rate, got {drift_rate}");
    }
    let l = logit(clamp_accuracy(accuracy));
    Ok(l / drift_rate)
}

/// Recover the non-decision time by subtracting the decision-time component
/// implied by the recovered drift rate and boundary from the mean RT.
pub fn inverse_nondecision(mean_rt: f64, drift_rate: f64, boundary: f64) -> f64 {
    let y = (-drift_rate * boundary).exp();
    let decision_time = (boundary / (2.0 * drift_rate)) * ((1.0 - y) / (1.0 + y));
    mean_rt - decision_time
}

/// Recover all three parameters from summary statistics in the fixed order.
///
/// Each downstream step consumes the previous step's output, never the
/// ground truth.
pub fn recover(stats: &SummaryStats) -> Result<LatentParams> {
    let drift_rate = inverse_drift_rate(stats.accuracy, stats.var_rt)?;
    let boundary = inverse_boundary(stats.accuracy, drift_rate)?;
    let nondecision = inverse_nondecision(stats.mean_rt, drift_rate, boundary);
    Ok(LatentParams::new(drift_rate, boundary, nondecision))
}
