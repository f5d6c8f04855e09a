use thiserror::Error;

use tidvakt_config::ConfigError;
use tidvakt_core::SimulationError;
use tidvakt_telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Failed to render report: {0}")]
    Report(#[from] serde_yaml::Error),

    #[error("Trace digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("Backends disagree for seed {seed}: {details}")]
    BackendMismatch { seed: u64, details: String },
}
