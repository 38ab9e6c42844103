// src/health/mod.rs
mod error;
mod payload;
mod probe;
mod status;

pub use error::ProbeError;
pub use payload::HealthPayload;
pub use probe::HealthProbe;
pub use status::{
    HealthStatus, CHECKING_INDICATOR, CONNECTED_INDICATOR, ERROR_INDICATOR,
    UNREACHABLE_INDICATOR,
};
