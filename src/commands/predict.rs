use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::CostEstimator;
use crate::cli::SnapshotArgs;
use crate::config::Config;
use crate::metrics::UsageSnapshot;
use crate::output::{OutputFormat, PredictionReport};

pub fn handle_predict_command(
    usage: &SnapshotArgs,
    config: &Config,
    json_output: bool,
    verbose: bool,
) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    let snapshot = usage.resolve(UsageSnapshot::random(&mut rng));

    let report = build_prediction_report(snapshot, config, verbose, &mut rng)?;

    if json_output {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_table());
    }
    Ok(())
}

pub fn build_prediction_report(
    snapshot: UsageSnapshot,
    config: &Config,
    verbose: bool,
    rng: &mut StdRng,
) -> Result<PredictionReport> {
    let prediction = CostEstimator::new()
        .predict(&snapshot, rng)
        .context("Failed to fit cost model")?;

    Ok(PredictionReport {
        snapshot,
        predicted_cost: prediction.predicted_cost,
        details: verbose.then_some(prediction),
        decimal_places: config.output.decimal_places,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_only_when_verbose() {
        let config = Config::default();
        let snapshot = UsageSnapshot::default();

        let quiet =
            build_prediction_report(snapshot, &config, false, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(quiet.details.is_none());

        let verbose =
            build_prediction_report(snapshot, &config, true, &mut StdRng::seed_from_u64(3)).unwrap();
        let details = verbose.details.as_ref().unwrap();
        assert_eq!(details.predicted_cost, verbose.predicted_cost);
        assert_eq!(quiet.predicted_cost, verbose.predicted_cost);
    }

    #[test]
    fn test_prediction_is_rounded() {
        let report = build_prediction_report(
            UsageSnapshot::new(70, 400, 20000, 150),
            &Config::default(),
            false,
            &mut StdRng::seed_from_u64(11),
        )
        .unwrap();
        let cents = report.predicted_cost * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6);
    }
}
