// Cost prediction and optimization analysis
pub mod prediction;
pub mod recommendations;
pub mod regression;

pub use prediction::{CostEstimator, CostPrediction, SyntheticHistory};
pub use recommendations::{RecommendationGenerator, build_prompt};
pub use regression::{EstimateError, LinearModel};
