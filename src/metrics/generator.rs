// Mock usage metrics with simulated autoscaling
use anyhow::Result;
use rand::Rng;
use std::time::{Duration, Instant};

use crate::alerts::{AlertSender, AlertTransport};
use crate::metrics::scaling::{ScaleDecision, ScalingPolicy, ScalingState};
use crate::metrics::snapshot::UsageSnapshot;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Produces a fresh random snapshot at most once per refresh interval and
/// keeps the simulated server count in step with it.
#[derive(Debug, Clone)]
pub struct MockMetricsGenerator {
    snapshot: UsageSnapshot,
    last_refresh: Instant,
    refresh_interval: Duration,
    scaling: ScalingState,
    policy: ScalingPolicy,
}

impl MockMetricsGenerator {
    pub fn new(refresh_interval: Duration, initial_servers: u32) -> Self {
        Self::starting_at(Instant::now(), refresh_interval, initial_servers)
    }

    /// Start the refresh timer at `now`; the first regeneration happens once
    /// a full interval has passed.
    pub fn starting_at(now: Instant, refresh_interval: Duration, initial_servers: u32) -> Self {
        Self {
            snapshot: UsageSnapshot::default(),
            last_refresh: now,
            refresh_interval,
            scaling: ScalingState::new(initial_servers),
            policy: ScalingPolicy::default(),
        }
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        self.snapshot
    }

    pub fn active_servers(&self) -> u32 {
        self.scaling.active_servers()
    }

    pub fn last_refresh(&self) -> Instant {
        self.last_refresh
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_refresh) > self.refresh_interval
    }

    /// Replace the snapshot wholesale and run the scaling policy against it.
    pub fn replace_snapshot(&mut self, snapshot: UsageSnapshot) -> ScaleDecision {
        self.snapshot = snapshot;
        let decision = self.scaling.apply(&self.policy, &self.snapshot);
        if decision.is_change() {
            tracing::info!(?decision, servers = self.scaling.active_servers(), "scaling event");
        } else {
            tracing::debug!(servers = self.scaling.active_servers(), "no scaling change");
        }
        decision
    }

    /// Replace the snapshot, then deliver the scale alert if the policy fired.
    pub async fn record_snapshot<T: AlertTransport>(
        &mut self,
        snapshot: UsageSnapshot,
        alerts: &AlertSender<T>,
    ) -> Result<ScaleDecision> {
        let decision = self.replace_snapshot(snapshot);
        if let Some(message) = decision.alert_message() {
            alerts.send(&message).await?;
        }
        Ok(decision)
    }

    /// Snapshot as of `now`, regenerating and alerting when the window has passed.
    pub async fn fetch_at<R, T>(
        &mut self,
        now: Instant,
        rng: &mut R,
        alerts: &AlertSender<T>,
    ) -> Result<UsageSnapshot>
    where
        R: Rng + ?Sized,
        T: AlertTransport,
    {
        if self.is_due(now) {
            self.last_refresh = now;
            let snapshot = UsageSnapshot::random(rng);
            tracing::debug!(?snapshot, "regenerated usage snapshot");
            self.record_snapshot(snapshot, alerts).await?;
        }
        Ok(self.snapshot)
    }
}

impl Default for MockMetricsGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::notifications::testing::RecordingTransport;
    use crate::config::TelegramCredentials;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn configured_sender() -> AlertSender<RecordingTransport> {
        AlertSender::with_transport(
            Some(TelegramCredentials {
                bot_token: "token".to_string(),
                chat_id: "chat".to_string(),
            }),
            "https://api.telegram.org",
            RecordingTransport::default(),
        )
    }

    fn sent_texts(sender: &AlertSender<RecordingTransport>) -> Vec<String> {
        sender
            .transport()
            .calls()
            .into_iter()
            .filter_map(|(_, form)| form.into_iter().find(|(k, _)| k == "text").map(|(_, v)| v))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_is_gated_by_interval() {
        let start = Instant::now();
        let mut generator = MockMetricsGenerator::starting_at(start, Duration::from_secs(10), 2);
        let mut rng = StdRng::seed_from_u64(1);
        let alerts = configured_sender();

        let early = generator.fetch_at(start + Duration::from_secs(5), &mut rng, &alerts).await.unwrap();
        assert_eq!(early, UsageSnapshot::default());
        // Exactly at the interval is not past it
        let edge = generator.fetch_at(start + Duration::from_secs(10), &mut rng, &alerts).await.unwrap();
        assert_eq!(edge, UsageSnapshot::default());
        assert_eq!(generator.last_refresh(), start);

        let fresh = generator.fetch_at(start + Duration::from_secs(11), &mut rng, &alerts).await.unwrap();
        assert_eq!(generator.last_refresh(), start + Duration::from_secs(11));
        assert!(fresh.is_within_bounds());

        // Window restarts from the last refresh
        let held = generator.fetch_at(start + Duration::from_secs(15), &mut rng, &alerts).await.unwrap();
        assert_eq!(held, fresh);
        assert_eq!(generator.last_refresh(), start + Duration::from_secs(11));
    }

    #[tokio::test]
    async fn test_fetch_within_window_is_idempotent() {
        let start = Instant::now();
        let mut generator = MockMetricsGenerator::starting_at(start, Duration::from_secs(10), 2);
        let mut rng = StdRng::seed_from_u64(99);
        let alerts = configured_sender();

        let first = generator.fetch_at(start + Duration::from_secs(11), &mut rng, &alerts).await.unwrap();
        let second = generator.fetch_at(start + Duration::from_secs(12), &mut rng, &alerts).await.unwrap();
        assert_eq!(first, second);

        let third = generator.fetch_at(start + Duration::from_secs(30), &mut rng, &alerts).await.unwrap();
        assert!(third.is_within_bounds());
        assert_eq!(generator.last_refresh(), start + Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_scale_up_sends_one_alert() {
        let mut generator = MockMetricsGenerator::new(DEFAULT_REFRESH_INTERVAL, 2);
        let alerts = configured_sender();

        let decision = generator
            .record_snapshot(UsageSnapshot::new(85, 500, 1000, 200), &alerts)
            .await
            .unwrap();

        assert_eq!(decision, ScaleDecision::ScaleUp(3));
        assert_eq!(generator.active_servers(), 3);
        let texts = sent_texts(&alerts);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains('3'));
    }

    #[tokio::test]
    async fn test_scale_down_sends_one_alert() {
        let mut generator = MockMetricsGenerator::new(DEFAULT_REFRESH_INTERVAL, 2);
        let alerts = configured_sender();

        let decision = generator
            .record_snapshot(UsageSnapshot::new(20, 500, 1000, 200), &alerts)
            .await
            .unwrap();

        assert_eq!(decision, ScaleDecision::ScaleDown(1));
        assert_eq!(generator.active_servers(), 1);
        let texts = sent_texts(&alerts);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains('1'));
    }

    #[tokio::test]
    async fn test_floor_reached_sends_nothing() {
        let mut generator = MockMetricsGenerator::new(DEFAULT_REFRESH_INTERVAL, 1);
        let alerts = configured_sender();

        let decision = generator
            .record_snapshot(UsageSnapshot::new(20, 500, 1000, 200), &alerts)
            .await
            .unwrap();

        assert_eq!(decision, ScaleDecision::NoChange);
        assert_eq!(generator.active_servers(), 1);
        assert!(sent_texts(&alerts).is_empty());
    }

    #[tokio::test]
    async fn test_many_fetches_keep_invariants() {
        let start = Instant::now();
        let mut generator = MockMetricsGenerator::starting_at(start, Duration::from_secs(10), 2);
        let mut rng = StdRng::seed_from_u64(2024);
        let alerts = configured_sender();

        let mut previous = generator.active_servers();
        let mut changes = 0;
        for round in 1..=2_000u64 {
            let now = start + Duration::from_secs(round * 11);
            let snapshot = generator.fetch_at(now, &mut rng, &alerts).await.unwrap();
            assert_eq!(generator.last_refresh(), now);
            assert!(snapshot.is_within_bounds());
            assert!(generator.active_servers() >= 1);
            if generator.active_servers() != previous {
                changes += 1;
                previous = generator.active_servers();
            }
        }
        // One alert per server-count change, none otherwise
        assert_eq!(sent_texts(&alerts).len(), changes);
    }
}
