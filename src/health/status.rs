// src/health/status.rs
use serde::Serialize;
use std::fmt;

use super::HealthPayload;

pub const CHECKING_INDICATOR: &str = "checking...";
pub const CONNECTED_INDICATOR: &str = "✅ Connected";
pub const ERROR_INDICATOR: &str = "❌ Error";
pub const UNREACHABLE_INDICATOR: &str = "⚠️ Backend not running (expected for static preview)";

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HealthStatus {
    /// 2xx with a JSON body
    Connected { payload: HealthPayload },
    /// Non-2xx status; the body is never read
    Error,
    /// Transport fault, timeout or unparseable body
    Unreachable,
}

impl HealthStatus {
    pub fn indicator(&self) -> &'static str {
        match self {
            HealthStatus::Connected { .. } => CONNECTED_INDICATOR,
            HealthStatus::Error => ERROR_INDICATOR,
            HealthStatus::Unreachable => UNREACHABLE_INDICATOR,
        }
    }

    /// Short machine label, used for metric labels and logs.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Connected { .. } => "connected",
            HealthStatus::Error => "error",
            HealthStatus::Unreachable => "unreachable",
        }
    }

    pub fn payload(&self) -> Option<&HealthPayload> {
        match self {
            HealthStatus::Connected { payload } => Some(payload),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, HealthStatus::Connected { .. })
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}
