use anyhow::Result;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::alerts::{AlertSender, AlertTransport};
use crate::config::{Config, Secrets};
use crate::metrics::{MockMetricsGenerator, UsageSnapshot};
use crate::output::{OutputFormat, SnapshotReport};

pub async fn handle_snapshot_command(
    servers: u32,
    config: &Config,
    secrets: &Secrets,
    json_output: bool,
) -> Result<()> {
    let alerts = AlertSender::new(secrets.telegram(), config.alerts.api_base.clone());
    let snapshot = UsageSnapshot::random(&mut StdRng::from_entropy());

    let report = build_snapshot_report(snapshot, servers, config, &alerts).await?;

    if json_output {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_table());
    }
    Ok(())
}

/// Apply the scaling policy to `snapshot` starting from `servers`, alerting on change.
pub async fn build_snapshot_report<T: AlertTransport>(
    snapshot: UsageSnapshot,
    servers: u32,
    config: &Config,
    alerts: &AlertSender<T>,
) -> Result<SnapshotReport> {
    let mut metrics = MockMetricsGenerator::new(config.dashboard.refresh_interval(), servers);
    let previous_servers = metrics.active_servers();
    let decision = metrics.record_snapshot(snapshot, alerts).await?;

    Ok(SnapshotReport {
        generated_at: Utc::now(),
        snapshot,
        previous_servers,
        active_servers: metrics.active_servers(),
        decision,
    })
}
