use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const CPU_RANGE: RangeInclusive<u32> = 10..=90;
pub const STORAGE_RANGE: RangeInclusive<u32> = 100..=1000;
pub const API_CALLS_RANGE: RangeInclusive<u32> = 1000..=50000;
pub const MONTHLY_COST_RANGE: RangeInclusive<u32> = 50..=500;

/// One atomic set of the four mock usage metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// CPU utilization in percent
    pub cpu_utilization: u32,
    /// Storage used in GB
    pub storage_used_gb: u32,
    pub api_calls: u32,
    pub monthly_cost: u32,
}

impl UsageSnapshot {
    pub fn new(cpu_utilization: u32, storage_used_gb: u32, api_calls: u32, monthly_cost: u32) -> Self {
        Self {
            cpu_utilization,
            storage_used_gb,
            api_calls,
            monthly_cost,
        }
    }

    /// Draw all four metrics at once. Fields are never updated individually.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            cpu_utilization: rng.gen_range(CPU_RANGE),
            storage_used_gb: rng.gen_range(STORAGE_RANGE),
            api_calls: rng.gen_range(API_CALLS_RANGE),
            monthly_cost: rng.gen_range(MONTHLY_COST_RANGE),
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        CPU_RANGE.contains(&self.cpu_utilization)
            && STORAGE_RANGE.contains(&self.storage_used_gb)
            && API_CALLS_RANGE.contains(&self.api_calls)
            && MONTHLY_COST_RANGE.contains(&self.monthly_cost)
    }
}

impl Default for UsageSnapshot {
    fn default() -> Self {
        // Values shown before the first refresh
        Self::new(50, 500, 25_000, 200)
    }
}
