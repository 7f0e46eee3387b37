//! Cost prediction from a synthetic usage history.
//!
//! Every call synthesizes a brand new 30-day history, fits a linear model on
//! it and evaluates the model at day 45 with the live snapshot's usage. The
//! history has no relation to previously displayed snapshots, so predictions
//! vary from call to call even for identical input.

use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

use crate::analysis::regression::{EstimateError, LinearModel, trailing_mean};
use crate::metrics::UsageSnapshot;

pub const HISTORY_DAYS: u32 = 30;
pub const FORECAST_DAY: u32 = 45;
pub const MOVING_AVERAGE_WINDOW: usize = 5;
pub const COST_RAMP_START: f64 = 50.0;
pub const COST_RAMP_END: f64 = 500.0;
pub const COST_NOISE_STD_DEV: f64 = 15.0;

pub const FEATURE_NAMES: [&str; 5] = ["day", "cpu_usage", "api_calls", "storage_used", "cost_moving_average"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub day: u32,
    pub cpu_usage: u32,
    pub api_calls: u32,
    pub storage_used: u32,
    pub cost: f64,
    pub cost_moving_average: f64,
}

impl HistoryRow {
    pub fn features(&self) -> Vec<f64> {
        vec![
            self.day as f64,
            self.cpu_usage as f64,
            self.api_calls as f64,
            self.storage_used as f64,
            self.cost_moving_average,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticHistory {
    pub rows: Vec<HistoryRow>,
}

impl SyntheticHistory {
    /// Thirty days of random usage with a cost ramping linearly from 50 to
    /// 500 plus gaussian noise.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let days = HISTORY_DAYS as usize;
        let step = (COST_RAMP_END - COST_RAMP_START) / (days - 1) as f64;

        let costs: Vec<f64> = (0..days)
            .map(|i| COST_RAMP_START + step * i as f64 + sample_normal(rng, 0.0, COST_NOISE_STD_DEV))
            .collect();
        let averages = trailing_mean(&costs, MOVING_AVERAGE_WINDOW);

        let rows = costs
            .iter()
            .zip(&averages)
            .enumerate()
            .map(|(i, (&cost, &cost_moving_average))| HistoryRow {
                day: i as u32 + 1,
                cpu_usage: rng.gen_range(20..90),
                api_calls: rng.gen_range(5_000..50_000),
                storage_used: rng.gen_range(100..1_000),
                cost,
                cost_moving_average,
            })
            .collect();

        Self { rows }
    }

    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(HistoryRow::features).collect()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.cost).collect()
    }

    pub fn last_moving_average(&self) -> Option<f64> {
        self.rows.last().map(|r| r.cost_moving_average)
    }
}

/// Prediction together with what produced it.
#[derive(Debug, Clone, Serialize)]
pub struct CostPrediction {
    pub predicted_cost: f64,
    pub query: Vec<f64>,
    pub model: LinearModel,
    pub history: SyntheticHistory,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl CostEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn predict<R: Rng + ?Sized>(
        &self,
        snapshot: &UsageSnapshot,
        rng: &mut R,
    ) -> Result<CostPrediction, EstimateError> {
        let history = SyntheticHistory::generate(rng);
        let model = LinearModel::fit(&history.features(), &history.costs())?;

        let query = vec![
            FORECAST_DAY as f64,
            snapshot.cpu_utilization as f64,
            snapshot.api_calls as f64,
            snapshot.storage_used_gb as f64,
            history.last_moving_average().unwrap_or_default(),
        ];
        let predicted_cost = round_to_cents(model.predict(&query));

        tracing::debug!(predicted_cost, intercept = model.intercept, "fitted cost model");

        Ok(CostPrediction {
            predicted_cost,
            query,
            model,
            history,
        })
    }

    pub fn predict_cost<R: Rng + ?Sized>(
        &self,
        snapshot: &UsageSnapshot,
        rng: &mut R,
    ) -> Result<f64, EstimateError> {
        Ok(self.predict(snapshot, rng)?.predicted_cost)
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Box-Muller transform; `1 - u` keeps the logarithm finite.
fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1 = 1.0 - rng.r#gen::<f64>();
    let u2 = rng.r#gen::<f64>();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn has_two_decimals(value: f64) -> bool {
        let scaled = value * 100.0;
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn test_history_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let history = SyntheticHistory::generate(&mut rng);

        assert_eq!(history.rows.len(), HISTORY_DAYS as usize);
        for (i, row) in history.rows.iter().enumerate() {
            assert_eq!(row.day, i as u32 + 1);
            assert!((20..90).contains(&row.cpu_usage));
            assert!((5_000..50_000).contains(&row.api_calls));
            assert!((100..1_000).contains(&row.storage_used));
        }

        // Ramp dominates noise at the ends of the series
        assert!(history.rows[0].cost < history.rows[29].cost);
        assert_eq!(history.rows[0].cost_moving_average, history.rows[0].cost);
        let tail: f64 = history.rows[25..].iter().map(|r| r.cost).sum::<f64>() / 5.0;
        assert!((history.last_moving_average().unwrap() - tail).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_is_rounded_to_cents() {
        let estimator = CostEstimator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let snapshot = UsageSnapshot::default();

        for _ in 0..50 {
            let cost = estimator.predict_cost(&snapshot, &mut rng).unwrap();
            assert!(cost.is_finite());
            assert!(has_two_decimals(cost), "{} has more than two decimals", cost);
        }
    }

    #[test]
    fn test_query_uses_live_snapshot_and_last_synthetic_average() {
        let estimator = CostEstimator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let snapshot = UsageSnapshot::new(77, 640, 12_345, 300);

        let prediction = estimator.predict(&snapshot, &mut rng).unwrap();
        assert_eq!(prediction.query[0], 45.0);
        assert_eq!(prediction.query[1], 77.0);
        assert_eq!(prediction.query[2], 12_345.0);
        assert_eq!(prediction.query[3], 640.0);
        assert_eq!(prediction.query[4], prediction.history.last_moving_average().unwrap());
        assert_eq!(prediction.model.coefficients.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_same_seed_same_prediction() {
        // Unseeded calls legitimately differ; a fixed seed pins the synthetic history.
        let estimator = CostEstimator::new();
        let snapshot = UsageSnapshot::default();

        let a = estimator.predict_cost(&snapshot, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = estimator.predict_cost(&snapshot, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(12.345_678), 12.35);
        assert_eq!(round_to_cents(-3.004), -3.0);
        assert_eq!(round_to_cents(100.0), 100.0);
    }

    #[test]
    fn test_normal_samples_are_centered() {
        let mut rng = StdRng::seed_from_u64(8);
        let samples: Vec<f64> = (0..20_000).map(|_| sample_normal(&mut rng, 0.0, 15.0)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.5, "mean {}", mean);
        assert!((variance.sqrt() - 15.0).abs() < 0.5, "std {}", variance.sqrt());
    }
}
