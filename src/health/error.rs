// src/health/error.rs
use reqwest::StatusCode;
use std::time::Duration;

use super::HealthStatus;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Health request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Health request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Health endpoint returned HTTP {0}")]
    Protocol(StatusCode),

    #[error("Health response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

// A bad body lands in the same bucket as a dead connection.
impl From<ProbeError> for HealthStatus {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Protocol(_) => HealthStatus::Error,
            ProbeError::Transport(_) | ProbeError::Timeout(_) | ProbeError::Decode(_) => {
                HealthStatus::Unreachable
            }
        }
    }
}
