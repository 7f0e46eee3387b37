use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::analysis::prediction::{CostPrediction, FEATURE_NAMES};
use crate::metrics::{ScaleDecision, UsageSnapshot};

/// Trait for reports that can be displayed as tables or JSON
pub trait OutputFormat {
    fn to_table(&self) -> String;
    fn to_json(&self) -> Result<String, serde_json::Error>;
}

#[derive(Tabled, Serialize, Debug)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    fn new(metric: &str, value: String) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

#[derive(Tabled, Serialize, Debug)]
pub struct HistoryTableRow {
    #[tabled(rename = "Day")]
    pub day: u32,
    #[tabled(rename = "CPU %")]
    pub cpu_usage: u32,
    #[tabled(rename = "API Calls")]
    pub api_calls: String,
    #[tabled(rename = "Storage GB")]
    pub storage_used: u32,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Cost MA(5)")]
    pub cost_moving_average: String,
}

fn snapshot_rows(snapshot: &UsageSnapshot) -> Vec<MetricRow> {
    vec![
        MetricRow::new("CPU Utilization", format!("{}%", snapshot.cpu_utilization)),
        MetricRow::new("Storage Used", format!("{} GB", snapshot.storage_used_gb)),
        MetricRow::new("API Calls", format_number(snapshot.api_calls as u64)),
        MetricRow::new("Monthly Cost", format_currency(snapshot.monthly_cost as f64, 0)),
    ]
}

fn render(rows: Vec<MetricRow>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

/// Output of the `snapshot` command.
#[derive(Debug, Serialize)]
pub struct SnapshotReport {
    pub generated_at: DateTime<Utc>,
    pub snapshot: UsageSnapshot,
    pub previous_servers: u32,
    pub active_servers: u32,
    pub decision: ScaleDecision,
}

impl OutputFormat for SnapshotReport {
    fn to_table(&self) -> String {
        let mut rows = snapshot_rows(&self.snapshot);
        rows.push(MetricRow::new(
            "Active Servers",
            format!("{} -> {}", self.previous_servers, self.active_servers),
        ));
        rows.push(MetricRow::new("Scaling", describe_decision(&self.decision)));
        rows.push(MetricRow::new(
            "Generated At",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ));
        render(rows)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Output of the `predict` command.
#[derive(Debug, Serialize)]
pub struct PredictionReport {
    pub snapshot: UsageSnapshot,
    pub predicted_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CostPrediction>,
    #[serde(skip)]
    pub decimal_places: u8,
}

impl OutputFormat for PredictionReport {
    fn to_table(&self) -> String {
        let mut rows = snapshot_rows(&self.snapshot);
        rows.push(MetricRow::new(
            "AI Predicted Cost",
            format_currency(self.predicted_cost, self.decimal_places),
        ));
        let mut output = render(rows);

        if let Some(details) = &self.details {
            let mut model_rows = vec![MetricRow::new("intercept", format!("{:.6}", details.model.intercept))];
            model_rows.extend(
                FEATURE_NAMES
                    .iter()
                    .zip(&details.model.coefficients)
                    .map(|(name, coefficient)| MetricRow::new(name, format!("{:.6}", coefficient))),
            );
            output.push_str("\n\nFitted model\n");
            output.push_str(&render(model_rows));

            let history_rows: Vec<HistoryTableRow> = details
                .history
                .rows
                .iter()
                .map(|row| HistoryTableRow {
                    day: row.day,
                    cpu_usage: row.cpu_usage,
                    api_calls: format_number(row.api_calls as u64),
                    storage_used: row.storage_used,
                    cost: format!("{:.2}", row.cost),
                    cost_moving_average: format!("{:.2}", row.cost_moving_average),
                })
                .collect();
            output.push_str("\n\nSynthetic history\n");
            output.push_str(&Table::new(history_rows).with(Style::modern()).to_string());
        }

        output
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Output of the `recommend` command.
#[derive(Debug, Serialize)]
pub struct RecommendationReport {
    pub snapshot: UsageSnapshot,
    pub recommendations: String,
}

impl OutputFormat for RecommendationReport {
    fn to_table(&self) -> String {
        let mut output = render(snapshot_rows(&self.snapshot));
        output.push_str("\n\n🤖 AI Cost Optimization\n");
        output.push_str(&self.recommendations);
        output
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn describe_decision(decision: &ScaleDecision) -> String {
    match decision {
        ScaleDecision::ScaleUp(count) => format!("scale up to {}", count),
        ScaleDecision::ScaleDown(count) => format!("scale down to {}", count),
        ScaleDecision::NoChange => "no change".to_string(),
    }
}

/// Format a number with commas for thousands separator
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }

    result
}

fn format_currency(amount: f64, decimal_places: u8) -> String {
    format!("${:.*}", decimal_places as usize, amount)
}
