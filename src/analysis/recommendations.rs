// Cost-saving suggestions from the text generation service
use crate::metrics::UsageSnapshot;
use crate::models::gemini::{GenerationError, TextGenerator};

/// Request text describing the snapshot and the kinds of actions wanted.
pub fn build_prompt(snapshot: &UsageSnapshot) -> String {
    format!(
        "Given this cloud usage:
- CPU: {cpu}%
- API Calls: {api_calls}
- Storage: {storage}GB
- Cost: ${cost}

Suggest ONLY precise cost-saving actions.

Example:
✅ Reduce API Calls (Batching, Caching)
✅ Optimize Compute (Downsize VM, Auto-scale)
✅ Switch to Cheaper Storage (S3, Glacier)
✅ Use Free-Tier APIs (AWS, Firebase, Supabase)
",
        cpu = snapshot.cpu_utilization,
        api_calls = snapshot.api_calls,
        storage = snapshot.storage_used_gb,
        cost = snapshot.monthly_cost,
    )
}

pub struct RecommendationGenerator<G> {
    generator: G,
}

impl<G: TextGenerator> RecommendationGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Ask for suggestions and return the reply trimmed, otherwise untouched.
    pub async fn recommend(&self, snapshot: &UsageSnapshot) -> Result<String, GenerationError> {
        let prompt = build_prompt(snapshot);
        let reply = self.generator.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}
