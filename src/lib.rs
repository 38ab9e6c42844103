// src/lib.rs
pub mod config;
pub mod health;
pub mod metrics;
pub mod view;

pub use config::{Config, EndpointConfig, ProbeConfig};
pub use health::{HealthPayload, HealthProbe, HealthStatus, ProbeError};
pub use view::{ProbeHandle, StatusReport, StatusView};
