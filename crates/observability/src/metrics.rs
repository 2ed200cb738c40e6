//! Delivery metrics
//!
//! Thin wrappers over the `metrics` facade plus an in-memory aggregator for
//! end-of-run summaries. Without an installed recorder the macros are no-ops.

use std::collections::BTreeMap;

use metrics::{counter, histogram};

/// Record one send outcome (`delivered` / `rejected` / `failed`)
pub fn record_marker_delivery(sink_name: &str, outcome: &'static str) {
    counter!(
        "kube_marker_deliveries_total",
        "sink" => sink_name.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record round-trip time of one send
pub fn record_delivery_latency_ms(sink_name: &str, latency_ms: f64) {
    histogram!(
        "kube_marker_delivery_latency_ms",
        "sink" => sink_name.to_string()
    )
    .record(latency_ms);
}

/// Record an event entering the exporter
pub fn record_event_received() {
    counter!("kube_marker_events_received_total").increment(1);
}

/// In-memory delivery aggregator
#[derive(Debug, Clone, Default)]
pub struct DeliveryAggregator {
    outcomes: BTreeMap<&'static str, u64>,
    latency_ms: RunningStats,
}

impl DeliveryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one send outcome
    pub fn update(&mut self, outcome: &'static str, latency_ms: f64) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        self.latency_ms.push(latency_ms);
    }

    pub fn summary(&self) -> DeliverySummary {
        let total = self.latency_ms.count();
        let delivered = self.outcomes.get("delivered").copied().unwrap_or(0);
        DeliverySummary {
            total,
            delivered,
            failed: total - delivered,
            success_rate: if total > 0 {
                delivered as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            outcomes: self.outcomes.clone(),
            latency_ms: StatsSummary::from(&self.latency_ms),
        }
    }
}

/// Delivery summary
#[derive(Debug, Clone, Default)]
pub struct DeliverySummary {
    pub total: u64,
    pub delivered: u64,
    pub failed: u64,
    pub success_rate: f64,
    pub outcomes: BTreeMap<&'static str, u64>,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for DeliverySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Delivery Summary ===")?;
        writeln!(f, "Events: {}", self.total)?;
        writeln!(
            f,
            "Delivered: {} ({:.2}%)",
            self.delivered, self.success_rate
        )?;
        writeln!(f, "Failed: {}", self.failed)?;
        for (outcome, count) in &self.outcomes {
            writeln!(f, "  {}: {}", outcome, count)?;
        }
        writeln!(f, "Latency (ms): {}", self.latency_ms)
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
