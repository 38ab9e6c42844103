// src/health/probe.rs
use crate::config::{EndpointConfig, ProbeConfig};
use reqwest::{Client, StatusCode};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{HealthPayload, HealthStatus, ProbeError};

/// Issues the single `GET {base}/health` request behind a status view.
pub struct HealthProbe {
    endpoint: EndpointConfig,
    config: ProbeConfig,
    client: Client,
}

impl HealthProbe {
    pub fn new(endpoint: EndpointConfig, config: ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("status-probe/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(endpoint, config, client))
    }

    /// Build a probe on top of a caller-supplied HTTP client.
    pub fn with_client(endpoint: EndpointConfig, config: ProbeConfig, client: Client) -> Self {
        Self {
            endpoint,
            config,
            client,
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Run the probe and keep the full failure detail.
    pub async fn fetch(&self) -> Result<HealthPayload, ProbeError> {
        let limit = self.config.timeout();
        timeout(limit, self.request())
            .await
            .map_err(|_| ProbeError::Timeout(limit))?
    }

    /// Run the probe and fold every failure into a display state.
    pub async fn check(&self) -> HealthStatus {
        match self.fetch().await {
            Ok(payload) => HealthStatus::Connected { payload },
            Err(e) => {
                warn!("Health probe against {} failed: {}", self.endpoint.health_url(), e);
                HealthStatus::from(e)
            }
        }
    }

    /// Like [`check`](Self::check), but gives up as soon as `shutdown`
    /// flips to `true` or its sender goes away. Returns `None` in that case.
    pub async fn check_with_shutdown(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Option<HealthStatus> {
        if *shutdown.borrow() {
            return None;
        }

        tokio::select! {
            status = self.check() => Some(status),
            _ = wait_for_shutdown(&mut shutdown) => {
                debug!("Health probe cancelled");
                None
            }
        }
    }

    async fn request(&self) -> Result<HealthPayload, ProbeError> {
        let url = self.endpoint.health_url();
        debug!("Sending health request to {}", url);

        let response = self.client.get(&url).send().await?;
        check_status(response.status())?;

        let body = response.bytes().await?;
        debug!("Received {} byte health response", body.len());

        Ok(HealthPayload::from_slice(&body)?)
    }
}

fn check_status(status: StatusCode) -> Result<(), ProbeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ProbeError::Protocol(status))
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if shutdown.changed().await.is_err() {
            return;
        }
        if *shutdown.borrow() {
            return;
        }
    }
}
