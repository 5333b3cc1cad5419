use std::collections::BTreeMap;

use serde::Serialize;

use crate::recovery::TrialRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ParameterSummary {
    pub bias_mean: f64,
    pub bias_std: f64,
    pub mse: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoverySummary {
    pub sample_size: u64,
    pub n_trials: usize,
    pub n_failed: usize,
    pub drift: ParameterSummary,
    pub boundary: ParameterSummary,
    pub nondecision: ParameterSummary,
}

#[derive(Debug, Default, Clone)]
struct BiasAccumulator {
    count: usize,
    bias_sum: f64,
    bias_sum_sq: f64,
    se_sum: f64,
}

impl BiasAccumulator {
    fn observe(&mut self, bias: f64, squared_error: f64) {
        self.count += 1;
        self.bias_sum += bias;
        self.bias_sum_sq += bias * bias;
        self.se_sum += squared_error;
    }

    fn finalize(&self) -> ParameterSummary {
        if self.count == 0 {
            return ParameterSummary {
                bias_mean: 0.0,
                bias_std: 0.0,
                mse: 0.0,
            };
        }

        let n = self.count as f64;
        let bias_mean = self.bias_sum / n;
        // Sample standard deviation (n - 1 denominator)
        let bias_std = if self.count > 1 {
            ((self.bias_sum_sq - n * bias_mean * bias_mean) / (n - 1.0))
                .max(0.0)
                .sqrt()
        } else {
            0.0
        };

        ParameterSummary {
            bias_mean,
            bias_std,
            mse: self.se_sum / n,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct SizeAccumulator {
    n_trials: usize,
    n_failed: usize,
    drift: BiasAccumulator,
    boundary: BiasAccumulator,
    nondecision: BiasAccumulator,
}

/// Aggregate trial records per sample size. Only successful trials contribute
/// to the bias and squared-error statistics; failed trials are counted but
/// excluded from every aggregate.
pub fn summarize(records: &[TrialRecord]) -> Vec<RecoverySummary> {
    let mut by_size: BTreeMap<u64, SizeAccumulator> = BTreeMap::new();

    for record in records {
        let acc = by_size.entry(record.sample_size).or_default();
        acc.n_trials += 1;

        let derived = (
            record.drift_bias,
            record.boundary_bias,
            record.nondecision_bias,
            record.drift_se,
            record.boundary_se,
            record.nondecision_se,
        );
        match derived {
            (Some(db), Some(bb), Some(nb), Some(dse), Some(bse), Some(nse)) => {
                acc.drift.observe(db, dse);
                acc.boundary.observe(bb, bse);
                acc.nondecision.observe(nb, nse);
            }
            _ => acc.n_failed += 1,
        }
    }

    by_size
        .into_iter()
        .map(|(sample_size, acc)| RecoverySummary {
            sample_size,
            n_trials: acc.n_trials,
            n_failed: acc.n_failed,
            drift: acc.drift.finalize(),
            boundary: acc.boundary.finalize(),
            nondecision: acc.nondecision.finalize(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LatentParams;

    fn success_with_drift_bias(iteration: usize, bias: f64) -> TrialRecord {
        let truth = LatentParams::new(1.0, 1.0, 0.3);
        let estimate = LatentParams::new(1.0 - bias, 1.0, 0.3);
        TrialRecord::success(10, iteration, &truth, &estimate)
    }

    #[test]
    fn failed_trials_are_excluded_from_every_aggregate() {
        let truth = LatentParams::new(1.0, 1.0, 0.3);
        let records = vec![
            success_with_drift_bias(1, 0.1),
            success_with_drift_bias(2, 0.2),
            TrialRecord::failed(10, 3, &truth),
            success_with_drift_bias(4, 0.3),
            TrialRecord::failed(10, 5, &truth),
        ];

        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];

        assert_eq!(summary.sample_size, 10);
        assert_eq!(summary.n_trials, 5);
        assert_eq!(summary.n_failed, 2);

        // Manual arithmetic over the three successful records
        assert!((summary.drift.bias_mean - 0.2).abs() < 1e-12);
        assert!((summary.drift.bias_std - 0.1).abs() < 1e-12);
        let expected_mse = (0.01 + 0.04 + 0.09) / 3.0;
        assert!((summary.drift.mse - expected_mse).abs() < 1e-12);

        assert!(summary.boundary.bias_mean.abs() < 1e-12);
        assert!(summary.nondecision.bias_mean.abs() < 1e-12);
    }

    #[test]
    fn summaries_are_keyed_and_ordered_by_sample_size() {
        let truth = LatentParams::new(1.0, 1.0, 0.3);
        let estimate = LatentParams::new(0.9, 1.1, 0.25);
        let records = vec![
            TrialRecord::success(4000, 1, &truth, &estimate),
            TrialRecord::success(10, 1, &truth, &estimate),
            TrialRecord::success(40, 1, &truth, &estimate),
        ];

        let summaries = summarize(&records);
        let sizes: Vec<u64> = summaries.iter().map(|s| s.sample_size).collect();
        assert_eq!(sizes, vec![10, 40, 4000]);
    }

    #[test]
    fn all_failed_trials_produce_zeroed_aggregates() {
        let truth = LatentParams::new(1.0, 1.0, 0.3);
        let records = vec![
            TrialRecord::failed(10, 1, &truth),
            TrialRecord::failed(10, 2, &truth),
        ];

        let summaries = summarize(&records);
        assert_eq!(summaries[0].n_failed, 2);
        assert_eq!(summaries[0].drift.bias_mean, 0.0);
        assert_eq!(summaries[0].drift.mse, 0.0);
    }

    #[test]
    fn single_success_has_zero_std() {
        let records = vec![success_with_drift_bias(1, 0.2)];
        let summaries = summarize(&records);
        assert_eq!(summaries[0].drift.bias_std, 0.0);
        assert!((summaries[0].drift.bias_mean - 0.2).abs() < 1e-12);
    }

    #[test]
    fn empty_record_set_summarizes_to_nothing() {
        assert!(summarize(&[]).is_empty());
    }
}
