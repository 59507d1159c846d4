use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AutopilotError {
    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    #[error("Command error: {0}")]
    CommandError(String),

    #[error("Orbital mechanics error: {0}")]
    DomainError(String),

    #[error("Phase error: {0}")]
    PhaseError(String),

    #[error("Timed out while {0}")]
    Timeout(String),

    #[error("Cancelled while {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}
