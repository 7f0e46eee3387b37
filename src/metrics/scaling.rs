//! Threshold-based autoscaling simulation.
//!
//! The policy looks at a single snapshot and the current server count and
//! moves the count by at most one instance. Scale-up has no ceiling; scale-down
//! stops at one server.

use serde::{Deserialize, Serialize};

use crate::metrics::snapshot::UsageSnapshot;

/// Outcome of evaluating the scaling policy against one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "servers", rename_all = "snake_case")]
pub enum ScaleDecision {
    /// Scale up to the given server count.
    ScaleUp(u32),
    /// Scale down to the given server count.
    ScaleDown(u32),
    /// No change needed.
    NoChange,
}

impl ScaleDecision {
    /// Notification text for a scale event, `None` when nothing changed.
    pub fn alert_message(&self) -> Option<String> {
        match self {
            ScaleDecision::ScaleUp(count) => Some(format!("🚀 Scaling Up! New Server Count: {}", count)),
            ScaleDecision::ScaleDown(count) => {
                Some(format!("🛑 Scaling Down! New Server Count: {}", count))
            }
            ScaleDecision::NoChange => None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, ScaleDecision::NoChange)
    }
}

/// Thresholds that convert a snapshot into a server-count delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPolicy {
    pub scale_up_cpu_above: u32,
    pub scale_up_api_calls_above: u32,
    pub scale_down_cpu_below: u32,
    pub scale_down_api_calls_below: u32,
    pub min_servers: u32,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            scale_up_cpu_above: 80,
            // Mock snapshots top out at this value, so this rule never fires on them.
            scale_up_api_calls_above: 50_000,
            scale_down_cpu_below: 30,
            scale_down_api_calls_below: 5_000,
            min_servers: 1,
        }
    }
}

impl ScalingPolicy {
    /// Evaluate the rules in order, first match wins.
    pub fn decide(&self, snapshot: &UsageSnapshot, current_servers: u32) -> ScaleDecision {
        if snapshot.cpu_utilization > self.scale_up_cpu_above
            || snapshot.api_calls > self.scale_up_api_calls_above
        {
            return ScaleDecision::ScaleUp(current_servers.saturating_add(1));
        }

        if snapshot.cpu_utilization < self.scale_down_cpu_below
            && snapshot.api_calls < self.scale_down_api_calls_below
            && current_servers > self.min_servers
        {
            return ScaleDecision::ScaleDown(current_servers - 1);
        }

        ScaleDecision::NoChange
    }
}

/// Count of active server instances. Never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingState {
    active_servers: u32,
}

impl ScalingState {
    pub fn new(active_servers: u32) -> Self {
        Self {
            active_servers: active_servers.max(1),
        }
    }

    pub fn active_servers(&self) -> u32 {
        self.active_servers
    }

    /// Run the policy and commit its decision.
    pub fn apply(&mut self, policy: &ScalingPolicy, snapshot: &UsageSnapshot) -> ScaleDecision {
        let decision = policy.decide(snapshot, self.active_servers);
        match decision {
            ScaleDecision::ScaleUp(count) | ScaleDecision::ScaleDown(count) => {
                self.active_servers = count.max(1);
            }
            ScaleDecision::NoChange => {}
        }
        decision
    }
}

impl Default for ScalingState {
    fn default() -> Self {
        Self::new(2)
    }
}
