// Per-session dashboard state and the logic that runs on every turn
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::time::Instant;

use crate::alerts::{AlertSender, AlertTransport, HttpTransport};
use crate::analysis::{CostEstimator, RecommendationGenerator};
use crate::config::{Config, Secrets};
use crate::metrics::{MockMetricsGenerator, UsageSnapshot};
use crate::models::{GeminiClient, TextGenerator};
use crate::session::navigation::{NavigationError, Provider, Role, Screen, SessionContext};

/// What one dashboard turn produced.
///
/// A turn stops at the first failing step. Results from earlier steps are
/// kept, later ones stay `None`, and the failure is recorded in `error`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub user: Option<String>,
    pub role: Option<Role>,
    pub provider: Provider,
    pub snapshot: UsageSnapshot,
    pub active_servers: u32,
    pub predicted_cost: Option<f64>,
    pub recommendations: Option<String>,
    pub show_credits: bool,
    pub error: Option<String>,
}

/// Everything one interactive session owns: navigation, mock metrics and the
/// outbound services. Nothing here is shared between sessions.
pub struct DashboardSession<G = GeminiClient, T = HttpTransport> {
    context: SessionContext,
    metrics: MockMetricsGenerator,
    estimator: CostEstimator,
    recommender: RecommendationGenerator<G>,
    alerts: AlertSender<T>,
    rng: StdRng,
    // Outcome of the last request, reused until the snapshot changes
    last_recommendation: Option<(UsageSnapshot, Result<String, String>)>,
}

impl DashboardSession<GeminiClient, HttpTransport> {
    pub fn from_config(config: &Config, secrets: &Secrets) -> Self {
        let generator = GeminiClient::new(
            secrets.gemini_api_key.clone(),
            config.generation.model.clone(),
            config.generation.endpoint.clone(),
        );
        let alerts = AlertSender::new(secrets.telegram(), config.alerts.api_base.clone());
        let metrics = MockMetricsGenerator::new(
            config.dashboard.refresh_interval(),
            config.dashboard.initial_servers,
        );

        Self::with_services(metrics, generator, alerts, StdRng::from_entropy())
    }
}

impl<G: TextGenerator, T: AlertTransport> DashboardSession<G, T> {
    pub fn with_services(
        metrics: MockMetricsGenerator,
        generator: G,
        alerts: AlertSender<T>,
        rng: StdRng,
    ) -> Self {
        Self {
            context: SessionContext::new(),
            metrics,
            estimator: CostEstimator::new(),
            recommender: RecommendationGenerator::new(generator),
            alerts,
            rng,
            last_recommendation: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.context
    }

    pub fn metrics(&self) -> &MockMetricsGenerator {
        &self.metrics
    }

    pub fn alerts(&self) -> &AlertSender<T> {
        &self.alerts
    }

    pub async fn dashboard_turn(&mut self) -> Result<DashboardView> {
        self.dashboard_turn_at(Instant::now()).await
    }

    /// Re-run the dashboard logic as of `now`.
    ///
    /// Refreshes metrics (alerting on scale events), predicts cost and fetches
    /// recommendations. A failed alert delivery fails the whole turn; a failed
    /// prediction or recommendation request ends it early. Recommendations are
    /// requested at most once per distinct snapshot, whether or not the request
    /// succeeded.
    pub async fn dashboard_turn_at(&mut self, now: Instant) -> Result<DashboardView> {
        if self.context.screen() != Screen::Dashboard {
            return Err(NavigationError::WrongScreen {
                expected: Screen::Dashboard,
                actual: self.context.screen(),
            }
            .into());
        }

        let snapshot = self.metrics.fetch_at(now, &mut self.rng, &self.alerts).await?;

        let mut view = DashboardView {
            user: self.context.user().map(str::to_string),
            role: self.context.role(),
            provider: self.context.provider(),
            snapshot,
            active_servers: self.metrics.active_servers(),
            predicted_cost: None,
            recommendations: None,
            show_credits: self.context.shows_credits(),
            error: None,
        };

        self.fill_estimates(&mut view).await;

        Ok(view)
    }

    async fn fill_estimates(&mut self, view: &mut DashboardView) {
        let snapshot = view.snapshot;

        match self.estimator.predict_cost(&snapshot, &mut self.rng) {
            Ok(cost) => view.predicted_cost = Some(cost),
            Err(e) => {
                let message = format!("Failed to predict cost: {}", e);
                tracing::warn!("{}", message);
                view.error = Some(message);
                return;
            }
        }

        let outcome = match &self.last_recommendation {
            Some((seen, outcome)) if *seen == snapshot => outcome.clone(),
            _ => {
                let outcome = self
                    .recommender
                    .recommend(&snapshot)
                    .await
                    .map_err(|e| format!("Failed to fetch recommendations: {}", e));
                if let Err(message) = &outcome {
                    tracing::warn!("{}", message);
                }
                self.last_recommendation = Some((snapshot, outcome.clone()));
                outcome
            }
        };

        match outcome {
            Ok(reply) => view.recommendations = Some(reply),
            Err(message) => view.error = Some(message),
        }
    }
}
