//! Per-sink delivery counters

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::ContractError;

/// Metric label for the result of one send
pub fn outcome_label(result: &Result<(), ContractError>) -> &'static str {
    match result {
        Ok(()) => "delivered",
        Err(ContractError::RemoteRejection { .. }) => "rejected",
        Err(_) => "failed",
    }
}

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Markers accepted by the remote (2xx)
    delivered_count: AtomicU64,
    /// Markers answered with a non-2xx status
    rejected_count: AtomicU64,
    /// Calls that failed locally or in transport
    failure_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn inc_rejected_count(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one send result
    pub fn record(&self, result: &Result<(), ContractError>) {
        match result {
            Ok(()) => self.inc_delivered_count(),
            Err(ContractError::RemoteRejection { .. }) => self.inc_rejected_count(),
            Err(_) => self.inc_failure_count(),
        }
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            rejected_count: self.rejected_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub rejected_count: u64,
    pub failure_count: u64,
}

impl MetricsSnapshot {
    /// Total number of send calls observed
    pub fn attempts(&self) -> u64 {
        self.delivered_count + self.rejected_count + self.failure_count
    }
}
