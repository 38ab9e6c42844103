// src/view/status_view.rs
use crate::health::{HealthProbe, HealthStatus};
use crate::metrics::MetricsCollector;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::StatusReport;

#[derive(Debug)]
struct ViewState {
    status: Option<HealthStatus>,
    last_checked: Option<DateTime<Utc>>,
    active: bool,
}

/// Owner of the displayed health status.
///
/// Each [`activate`](Self::activate) spawns one probe. Probes that resolve
/// after [`teardown`](Self::teardown) are discarded, and dropping the view
/// cancels whatever is still in flight.
pub struct StatusView {
    probe: Arc<HealthProbe>,
    state: Arc<RwLock<ViewState>>,
    metrics: Option<Arc<MetricsCollector>>,
    shutdown_tx: watch::Sender<bool>,
}

/// Handle to one spawned probe.
pub struct ProbeHandle {
    id: Uuid,
    task: JoinHandle<Option<HealthStatus>>,
}

impl ProbeHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the probe. Yields the status only if it was applied to the view.
    pub async fn wait(self) -> Option<HealthStatus> {
        match self.task.await {
            Ok(status) => status,
            Err(e) => {
                warn!("Activation {} did not complete: {}", self.id, e);
                None
            }
        }
    }
}

impl StatusView {
    pub fn new(probe: HealthProbe) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            probe: Arc::new(probe),
            state: Arc::new(RwLock::new(ViewState {
                status: None,
                last_checked: None,
                active: true,
            })),
            metrics: None,
            shutdown_tx,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn activate(&self) -> ProbeHandle {
        let id = Uuid::new_v4();
        let probe = self.probe.clone();
        let state = self.state.clone();
        let metrics = self.metrics.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let span = info_span!(
            "activation",
            id = %id,
            url = %self.probe.endpoint().health_url()
        );

        let task = tokio::spawn(
            async move {
                let start = Instant::now();

                let status = match probe.check_with_shutdown(shutdown_rx).await {
                    Some(status) => status,
                    None => {
                        if let Some(metrics) = &metrics {
                            metrics.record_cancelled();
                        }
                        return None;
                    }
                };

                let mut view = state.write().await;
                if !view.active {
                    debug!("View torn down, discarding {} result", status.label());
                    return None;
                }
                view.status = Some(status.clone());
                view.last_checked = Some(Utc::now());
                drop(view);

                let elapsed = start.elapsed();
                if let Some(metrics) = &metrics {
                    metrics.record_check(&status, elapsed);
                }
                info!("API status resolved to {} in {:?}", status.label(), elapsed);

                Some(status)
            }
            .instrument(span),
        );

        ProbeHandle { id, task }
    }

    /// Stop every in-flight probe. Once this returns the held status is frozen.
    pub async fn teardown(&self) {
        let mut view = self.state.write().await;
        if !view.active {
            return;
        }
        view.active = false;
        drop(view);

        self.shutdown_tx.send_replace(true);
        debug!("Status view torn down");
    }

    pub async fn is_active(&self) -> bool {
        self.state.read().await.active
    }

    /// `None` until the first probe resolves.
    pub async fn status(&self) -> Option<HealthStatus> {
        self.state.read().await.status.clone()
    }

    pub async fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_checked
    }

    pub async fn render(&self) -> StatusReport {
        let view = self.state.read().await;
        StatusReport::new(
            view.status.as_ref(),
            view.last_checked,
            self.probe.endpoint().docs_url(),
        )
    }
}

impl Drop for StatusView {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EndpointConfig, ProbeConfig};
    use crate::health::CHECKING_INDICATOR;
    use crate::metrics::MetricsRegistry;
    use std::time::Duration;

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        url
    }

    fn view_for(url: &str) -> StatusView {
        let probe =
            HealthProbe::new(EndpointConfig::new(url), ProbeConfig { timeout_secs: 5 }).unwrap();
        StatusView::new(probe)
    }

    #[tokio::test]
    async fn test_panicked_task_resolves_to_none() {
        let handle = ProbeHandle {
            id: Uuid::new_v4(),
            task: tokio::spawn(async {
                let resolved: Vec<Option<HealthStatus>> = Vec::new();
                resolved[0].clone()
            }),
        };

        assert_eq!(handle.wait().await, None);
    }

    #[tokio::test]
    async fn test_placeholder_before_activation() {
        let view = view_for("http://localhost:8000");

        assert_eq!(view.status().await, None);
        assert_eq!(view.last_checked().await, None);
        assert_eq!(view.render().await.indicator, CHECKING_INDICATOR);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_rendered() {
        let registry = MetricsRegistry::new().unwrap();
        let view = view_for(&closed_port_url()).with_metrics(registry.collector());

        let resolved = view.activate().wait().await;

        assert_eq!(resolved, Some(HealthStatus::Unreachable));
        assert_eq!(view.status().await, Some(HealthStatus::Unreachable));
        assert!(view.last_checked().await.is_some());
        assert_eq!(registry.collector().checks("unreachable"), 1);
    }

    #[tokio::test]
    async fn test_teardown_cancels_in_flight_probe() {
        let registry = MetricsRegistry::new().unwrap();
        let view = view_for(&silent_server().await).with_metrics(registry.collector());

        let handle = view.activate();
        tokio::time::sleep(Duration::from_millis(50)).await;

        view.teardown().await;

        assert_eq!(handle.wait().await, None);
        assert_eq!(view.status().await, None);
        assert!(!view.is_active().await);
        assert_eq!(registry.collector().checks("cancelled"), 1);
    }

    #[tokio::test]
    async fn test_activation_after_teardown_is_inert() {
        let view = view_for(&closed_port_url());
        view.teardown().await;
        view.teardown().await;

        assert_eq!(view.activate().wait().await, None);
        assert_eq!(view.status().await, None);
    }

    #[tokio::test]
    async fn test_overlapping_activations_settle() {
        let view = view_for(&closed_port_url());

        let first = view.activate();
        let second = view.activate();
        assert_ne!(first.id(), second.id());

        assert_eq!(first.wait().await, Some(HealthStatus::Unreachable));
        assert_eq!(second.wait().await, Some(HealthStatus::Unreachable));
        assert_eq!(view.status().await, Some(HealthStatus::Unreachable));
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight_probe() {
        let view = view_for(&silent_server().await);
        let handle = view.activate();
        tokio::time::sleep(Duration::from_millis(50)).await;

        drop(view);

        let resolved = tokio::time::timeout(Duration::from_secs(2), handle.wait())
            .await
            .unwrap();
        assert_eq!(resolved, None);
    }
}
