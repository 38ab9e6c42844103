// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

use crate::health::HealthStatus;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    pub checks_total: IntCounterVec,
    pub check_duration_seconds: Histogram,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("status_probe_checks_total", "Health probes by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "status_probe_check_duration_seconds",
                "Time from activation until the probe resolved",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        Ok(Self {
            checks_total,
            check_duration_seconds,
        })
    }

    pub fn record_check(&self, status: &HealthStatus, elapsed: Duration) {
        self.checks_total.with_label_values(&[status.label()]).inc();
        self.check_duration_seconds.observe(elapsed.as_secs_f64());
    }

    pub fn record_cancelled(&self) {
        self.checks_total.with_label_values(&["cancelled"]).inc();
    }

    pub fn checks(&self, outcome: &str) -> u64 {
        self.checks_total.with_label_values(&[outcome]).get()
    }
}
