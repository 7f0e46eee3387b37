// Mock cloud usage metrics and autoscaling simulation
pub mod generator;
pub mod scaling;
pub mod snapshot;

pub use generator::{DEFAULT_REFRESH_INTERVAL, MockMetricsGenerator};
pub use scaling::{ScaleDecision, ScalingPolicy, ScalingState};
pub use snapshot::UsageSnapshot;
