use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::RecommendationGenerator;
use crate::cli::SnapshotArgs;
use crate::config::{Config, Secrets};
use crate::metrics::UsageSnapshot;
use crate::models::{GeminiClient, TextGenerator};
use crate::output::{OutputFormat, RecommendationReport};

pub async fn handle_recommend_command(
    usage: &SnapshotArgs,
    config: &Config,
    secrets: &Secrets,
    json_output: bool,
) -> Result<()> {
    let snapshot = usage.resolve(UsageSnapshot::random(&mut StdRng::from_entropy()));
    let client = GeminiClient::new(
        secrets.gemini_api_key.clone(),
        config.generation.model.clone(),
        config.generation.endpoint.clone(),
    );

    let report = build_recommendation_report(snapshot, &RecommendationGenerator::new(client)).await?;

    if json_output {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_table());
    }
    Ok(())
}

pub async fn build_recommendation_report<G: TextGenerator>(
    snapshot: UsageSnapshot,
    recommender: &RecommendationGenerator<G>,
) -> Result<RecommendationReport> {
    let recommendations = recommender
        .recommend(&snapshot)
        .await
        .context("Failed to generate recommendations")?;

    Ok(RecommendationReport {
        snapshot,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationError;

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("  echo: {}  ", prompt.len()))
        }
    }

    #[tokio::test]
    async fn test_report_carries_trimmed_text() {
        let report = build_recommendation_report(
            UsageSnapshot::default(),
            &RecommendationGenerator::new(EchoGenerator),
        )
        .await
        .unwrap();
        assert!(report.recommendations.starts_with("echo: "));
        assert!(!report.recommendations.ends_with(' '));
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let client = GeminiClient::new(None, "gemini-1.5-pro", "http://127.0.0.1:9");
        let result =
            build_recommendation_report(UsageSnapshot::default(), &RecommendationGenerator::new(client))
                .await;
        let err = result.unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("GEMINI_API_KEY")));
    }
}
