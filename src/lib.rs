//! EZ-diffusion simulate-and-recover
//!
//! Closed-form forward equations predict accuracy, mean response time, and
//! response-time variance from the latent parameters of a two-choice
//! decision task (drift rate, boundary separation, non-decision time).
//! Inverse equations recover the parameters from (possibly noisy) summary
//! statistics, and a Monte Carlo harness measures recovery bias and squared
//! error across configurable trial counts and sample sizes.

pub mod forward;
pub mod inverse;
pub mod io;
pub mod params;
pub mod recovery;
pub mod sampling;
pub mod summary;

// Re-export main types
pub use forward::{forward_accuracy, forward_mean_rt, forward_var_rt, predict};
pub use inverse::{inverse_boundary, inverse_drift_rate, inverse_nondecision, recover};
pub use params::{LatentParams, SummaryStats};
pub use recovery::{run_recovery, run_trials, RecoveryConfig, TrialRecord};
pub use sampling::{observe, sample_accuracy, sample_mean_rt, sample_var_rt};
pub use summary::{summarize, ParameterSummary, RecoverySummary};
