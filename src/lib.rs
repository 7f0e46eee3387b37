// cloudopt library crate
// Exposes modules for integration testing

pub mod alerts;
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod http_stub;
