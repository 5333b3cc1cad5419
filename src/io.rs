use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;

use crate::recovery::TrialRecord;
use crate::summary::RecoverySummary;

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryReport {
    pub n_iterations: usize,
    pub sample_sizes: Vec<u64>,
    pub seed: u64,
    pub summaries: Vec<RecoverySummary>,
}

fn fmt_f64(v: f64) -> String {
    format!("{v:.10}")
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) => fmt_f64(x),
        None => "NA".to_string(),
    }
}

pub fn ensure_outdir(outdir: &Path) -> Result<()> {
    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory: {}", outdir.display()))
}

pub fn write_results_csv(path: &Path, records: &[TrialRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open results.csv for writing: {}", path.display()))?;

    wtr.write_record([
        "sample_size",
        "iteration",
        "true_drift",
        "true_boundary",
        "true_nondecision",
        "est_drift",
        "est_boundary",
        "est_nondecision",
        "drift_bias",
        "boundary_bias",
        "nondecision_bias",
        "drift_se",
        "boundary_se",
        "nondecision_se",
    ])?;

    for record in records {
        wtr.write_record([
            record.sample_size.to_string(),
            record.iteration.to_string(),
            fmt_f64(record.true_drift),
            fmt_f64(record.true_boundary),
            fmt_f64(record.true_nondecision),
            fmt_opt(record.est_drift),
            fmt_opt(record.est_boundary),
            fmt_opt(record.est_nondecision),
            fmt_opt(record.drift_bias),
            fmt_opt(record.boundary_bias),
            fmt_opt(record.nondecision_bias),
            fmt_opt(record.drift_se),
            fmt_opt(record.boundary_se),
            fmt_opt(record.nondecision_se),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv(path: &Path, summaries: &[RecoverySummary]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to open summary.csv for writing: {}", path.display()))?;

    wtr.write_record([
        "sample_size",
        "n_trials",
        "n_failed",
        "drift_bias_mean",
        "drift_bias_std",
        "drift_mse",
        "boundary_bias_mean",
        "boundary_bias_std",
        "boundary_mse",
        "nondecision_bias_mean",
        "nondecision_bias_std",
        "nondecision_mse",
    ])?;

    for summary in summaries {
        wtr.write_record([
            summary.sample_size.to_string(),
            summary.n_trials.to_string(),
            summary.n_failed.to_string(),
            fmt_f64(summary.drift.bias_mean),
            fmt_f64(summary.drift.bias_std),
            fmt_f64(summary.drift.mse),
            fmt_f64(summary.boundary.bias_mean),
            fmt_f64(summary.boundary.bias_std),
            fmt_f64(summary.boundary.mse),
            fmt_f64(summary.nondecision.bias_mean),
            fmt_f64(summary.nondecision.bias_std),
            fmt_f64(summary.nondecision.mse),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_report_json(outdir: &Path, report: &RecoveryReport) -> Result<PathBuf> {
    let path = outdir.join("summary.json");
    let payload =
        serde_json::to_string_pretty(report).context("failed to serialize recovery report")?;
    fs::write(&path, payload)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(path)
}
