//! Latent parameters and summary statistics
//!
//! Value types shared by the forward equations, the samplers, and the
//! recovery harness.

/// Latent parameters of the EZ-diffusion model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatentParams {
    /// Average rate of evidence accumulation
    pub drift_rate: f64,
    /// Distance between decision thresholds
    pub boundary: f64,
    /// Encoding and motor latency added to decision time
    pub nondecision: f64,
}

impl LatentParams {
    /// Create new latent parameters
    pub fn new(drift_rate: f64, boundary: f64, nondecision: f64) -> Self {
        Self {
            drift_rate,
            boundary,
            nondecision,
        }
    }
}

/// Summary statistics of a two-choice decision task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Proportion of correct responses, in (0, 1)
    pub accuracy: f64,
    /// Mean response time
    pub mean_rt: f64,
    /// Response-time variance
    pub var_rt: f64,
}

impl SummaryStats {
    /// Create new summary statistics
    pub fn new(accuracy: f64, mean_rt: f64, var_rt: f64) -> Self {
        Self {
            accuracy,
            mean_rt,
            var_rt,
        }
    }
}
