//! Sampling-noise models for observed summary statistics
//!
//! Each sampler maps one predicted statistic and a trial sample size to one
//! noisy observation, matching the sampling distribution of the corresponding
//! finite-sample estimator. Draws are independent per call and come from a
//! caller-supplied random source.

use anyhow::{Context, Result};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Gamma, Normal};

use crate::forward::predict;
use crate::params::{LatentParams, SummaryStats};

/// One observed accuracy rate: a binomial proportion over `n` trials.
pub fn sample_accuracy<R: Rng + ?Sized>(rng: &mut R, r_pred: f64, n: u64) -> Result<f64> {
    let binomial = Binomial::new(n, r_pred)
        .with_context(|| format!("invalid binomial proportion {r_pred}"))?;
    Ok(binomial.sample(rng) as f64 / n as f64)
}

/// One observed mean RT: normal with the standard-error-scaled variance
/// `v_pred / n`.
pub fn sample_mean_rt<R: Rng + ?Sized>(rng: &mut R, m_pred: f64, v_pred: f64, n: u64) -> Result<f64> {
    let normal = Normal::new(m_pred, (v_pred / n as f64).sqrt()).with_context(|| {
        format!("invalid mean RT sampling distribution: mean {m_pred}, variance {v_pred}, n {n}")
    })?;
    Ok(normal.sample(rng))
}

/// One observed RT variance: gamma with shape `(n-1)/2` and scale
/// `2 * v_pred / (n-1)`, the sampling distribution of a sample variance
/// under normality. Requires `n >= 2`.
pub fn sample_var_rt<R: Rng + ?Sized>(rng: &mut R, v_pred: f64, n: u64) -> Result<f64> {
    let shape = (n as f64 - 1.0) / 2.0;
    let scale = 2.0 * v_pred / (n as f64 - 1.0);
    let gamma = Gamma::new(shape, scale).with_context(|| {
        format!("invalid variance sampling distribution: variance {v_pred}, n {n}")
    })?;
    Ok(gamma.sample(rng))
}

/// Observed summary statistics for the given parameters: predict, then inject
/// sampling noise into each statistic, all conditioned on the same `n`.
pub fn observe<R: Rng + ?Sized>(rng: &mut R, params: &LatentParams, n: u64) -> Result<SummaryStats> {
    let predicted = predict(params);
    Ok(SummaryStats::new(
        sample_accuracy(rng, predicted.accuracy, n)?,
        sample_mean_rt(rng, predicted.mean_rt, predicted.var_rt, n)?,
        sample_var_rt(rng, predicted.var_rt, n)?,
    ))
}
