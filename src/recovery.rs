use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::inverse::recover;
use crate::params::LatentParams;
use crate::sampling::observe;

pub const DEFAULT_ITERATIONS: usize = 1000;
pub const DEFAULT_SAMPLE_SIZES: [u64; 3] = [10, 40, 4000];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    pub n_iterations: usize,
    pub sample_sizes: Vec<u64>,
    pub seed: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            n_iterations: DEFAULT_ITERATIONS,
            sample_sizes: DEFAULT_SAMPLE_SIZES.to_vec(),
            seed: 42,
        }
    }
}

impl RecoveryConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: RecoveryConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_iterations == 0 {
            bail!("n_iterations must be > 0");
        }
        if self.sample_sizes.is_empty() {
            bail!("sample_sizes must be non-empty");
        }
        if let Some(&n) = self.sample_sizes.iter().find(|&&n| n < 2) {
            bail!("sample sizes must be >= 2, got {n}");
        }
        Ok(())
    }

    pub fn total_trials(&self) -> usize {
        self.sample_sizes.len() * self.n_iterations
    }
}

/// One Monte Carlo trial: the true parameters that generated the data and,
/// for successful recoveries, the estimates with per-parameter bias
/// (true minus estimated) and squared error. Failed recoveries keep the true
/// parameters and leave every derived field empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub sample_size: u64,
    pub iteration: usize,
    pub true_drift: f64,
    pub true_boundary: f64,
    pub true_nondecision: f64,
    pub est_drift: Option<f64>,
    pub est_boundary: Option<f64>,
    pub est_nondecision: Option<f64>,
    pub drift_bias: Option<f64>,
    pub boundary_bias: Option<f64>,
    pub nondecision_bias: Option<f64>,
    pub drift_se: Option<f64>,
    pub boundary_se: Option<f64>,
    pub nondecision_se: Option<f64>,
}

impl TrialRecord {
    pub fn success(
        sample_size: u64,
        iteration: usize,
        truth: &LatentParams,
        estimate: &LatentParams,
    ) -> Self {
        let drift_bias = truth.drift_rate - estimate.drift_rate;
        let boundary_bias = truth.boundary - estimate.boundary;
        let nondecision_bias = truth.nondecision - estimate.nondecision;

        Self {
            sample_size,
            iteration,
            true_drift: truth.drift_rate,
            true_boundary: truth.boundary,
            true_nondecision: truth.nondecision,
            est_drift: Some(estimate.drift_rate),
            est_boundary: Some(estimate.boundary),
            est_nondecision: Some(estimate.nondecision),
            drift_bias: Some(drift_bias),
            boundary_bias: Some(boundary_bias),
            nondecision_bias: Some(nondecision_bias),
            drift_se: Some(drift_bias * drift_bias),
            boundary_se: Some(boundary_bias * boundary_bias),
            nondecision_se: Some(nondecision_bias * nondecision_bias),
        }
    }

    pub fn failed(sample_size: u64, iteration: usize, truth: &LatentParams) -> Self {
        Self {
            sample_size,
            iteration,
            true_drift: truth.drift_rate,
            true_boundary: truth.boundary,
            true_nondecision: truth.nondecision,
            est_drift: None,
            est_boundary: None,
            est_nondecision: None,
            drift_bias: None,
            boundary_bias: None,
            nondecision_bias: None,
            drift_se: None,
            boundary_se: None,
            nondecision_se: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.est_drift.is_some()
    }
}

fn sample_true_params<R: Rng + ?Sized>(rng: &mut R) -> LatentParams {
    LatentParams::new(
        rng.gen_range(0.5..2.0),
        rng.gen_range(0.5..2.0),
        rng.gen_range(0.1..0.5),
    )
}

/// Run `n_iterations` independent trials at one sample size, appending one
/// record per trial to the caller-owned collection. A numerical failure
/// inside a trial yields a failed record and never affects other trials.
pub fn run_trials<R: Rng + ?Sized>(
    rng: &mut R,
    sample_size: u64,
    n_iterations: usize,
    records: &mut Vec<TrialRecord>,
) {
    for iteration in 1..=n_iterations {
        let truth = sample_true_params(rng);
        let recovered = observe(rng, &truth, sample_size).and_then(|stats| recover(&stats));
        records.push(match recovered {
            Ok(estimate) => TrialRecord::success(sample_size, iteration, &truth, &estimate),
            Err(_) => TrialRecord::failed(sample_size, iteration, &truth),
        });
    }
}

/// Run the full simulate-and-recover process for every configured sample
/// size, in order, from a single seeded random stream.
pub fn run_recovery(config: &RecoveryConfig) -> Result<Vec<TrialRecord>> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.total_trials());
    for &sample_size in &config.sample_sizes {
        run_trials(&mut rng, sample_size, config.n_iterations, &mut records);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::predict;

    fn small_config() -> RecoveryConfig {
        RecoveryConfig {
            n_iterations: 20,
            sample_sizes: vec![10, 40],
            seed: 42,
        }
    }

    #[test]
    fn run_is_reproducible() {
        let config = small_config();
        let a = run_recovery(&config).unwrap();
        let b = run_recovery(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn record_count_is_sizes_times_iterations() {
        let config = small_config();
        let records = run_recovery(&config).unwrap();
        assert_eq!(records.len(), config.total_trials());

        for &n in &config.sample_sizes {
            let per_size = records.iter().filter(|r| r.sample_size == n).count();
            assert_eq!(per_size, config.n_iterations);
        }
    }

    #[test]
    fn iterations_are_one_based_and_ordered() {
        let config = small_config();
        let records = run_recovery(&config).unwrap();
        assert_eq!(records[0].iteration, 1);
        assert_eq!(records[config.n_iterations - 1].iteration, config.n_iterations);
        assert_eq!(records[0].sample_size, 10);
        assert_eq!(records[config.n_iterations].sample_size, 40);
    }

    #[test]
    fn true_parameters_stay_inside_the_drawing_ranges() {
        let records = run_recovery(&small_config()).unwrap();
        for record in &records {
            assert!(record.true_drift >= 0.5 && record.true_drift < 2.0);
            assert!(record.true_boundary >= 0.5 && record.true_boundary < 2.0);
            assert!(record.true_nondecision >= 0.1 && record.true_nondecision < 0.5);
        }
    }

    #[test]
    fn noiseless_single_trial_recovers_fixed_parameters() {
        let truth = LatentParams::new(1.0, 1.0, 0.3);
        let estimate = crate::inverse::recover(&predict(&truth)).unwrap();
        let record = TrialRecord::success(4000, 1, &truth, &estimate);

        assert!(record.drift_bias.unwrap().abs() < 1e-6);
        assert!(record.boundary_bias.unwrap().abs() < 1e-6);
        assert!(record.nondecision_bias.unwrap().abs() < 1e-6);
    }

    #[test]
    fn failed_record_keeps_truth_and_clears_derived_fields() {
        let truth = LatentParams::new(1.3, 0.8, 0.2);
        let record = TrialRecord::failed(40, 3, &truth);
        assert!(!record.succeeded());
        assert_eq!(record.true_drift, 1.3);
        assert_eq!(record.est_drift, None);
        assert_eq!(record.drift_se, None);
    }

    #[test]
    fn default_config_uses_built_in_values() {
        let config = RecoveryConfig::default();
        assert_eq!(config.n_iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.sample_sizes, DEFAULT_SAMPLE_SIZES);
    }

    #[test]
    fn zero_iterations_is_a_configuration_error() {
        let config = RecoveryConfig {
            n_iterations: 0,
            ..RecoveryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn sample_sizes_below_two_are_rejected() {
        let config = RecoveryConfig {
            sample_sizes: vec![10, 1],
            ..RecoveryConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RecoveryConfig {
            sample_sizes: vec![],
            ..RecoveryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
