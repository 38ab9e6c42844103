// src/view/report.rs
use crate::health::{HealthPayload, HealthStatus, CHECKING_INDICATOR};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Shown on the City line when a connected backend does not report one.
pub const DEFAULT_CITY: &str = "Seattle";

/// What the status panel shows for the current view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub state: &'static str,
    pub indicator: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
    pub docs_url: String,
}

impl StatusReport {
    pub fn new(
        status: Option<&HealthStatus>,
        checked_at: Option<DateTime<Utc>>,
        docs_url: String,
    ) -> Self {
        let payload = status.and_then(HealthStatus::payload);
        let field = |get: fn(&HealthPayload) -> Option<&str>| {
            payload.and_then(get).map(str::to_string)
        };

        Self {
            state: status.map_or("checking", HealthStatus::label),
            indicator: status.map_or(CHECKING_INDICATOR, HealthStatus::indicator),
            version: field(HealthPayload::version),
            environment: field(HealthPayload::environment),
            city: field(HealthPayload::city)
                .or_else(|| payload.map(|_| DEFAULT_CITY.to_string())),
            checked_at,
            docs_url,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "API Status: {}", self.indicator)?;
        // Connected always lists the detail lines, blank when unreported.
        if self.state == "connected" {
            writeln!(f, "Version: {}", self.version.as_deref().unwrap_or_default())?;
            writeln!(f, "Environment: {}", self.environment.as_deref().unwrap_or_default())?;
            writeln!(f, "City: {}", self.city.as_deref().unwrap_or(DEFAULT_CITY))?;
        }
        write!(f, "API Documentation: {}", self.docs_url)
    }
}
