//! EventSink trait - delivery interface
//!
//! Defines the abstract interface for sinks and the per-call context that
//! carries the caller's deadline and cancellation signal.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{ContractError, KubeEvent};

/// Event delivery trait
///
/// `send` takes `&self` so a sink can be shared by concurrent callers.
#[trait_variant::make(EventSink: Send)]
pub trait LocalEventSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one event
    ///
    /// # Errors
    /// Returns the serialization, transport, remote or cancellation error
    /// for this call. Calls are independent of each other.
    async fn send(&self, event: &KubeEvent, cx: &DeliveryContext) -> Result<(), ContractError>;

    /// Release held resources. Safe to call more than once.
    async fn close(&mut self) -> Result<(), ContractError>;
}

/// Deadline and cancellation for a single delivery
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl DeliveryContext {
    /// Context with neither deadline nor cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancellationToken::new(),
        }
    }

    /// Set an absolute deadline
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a cancellation token
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Absolute deadline, if any
    pub fn get_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancellation token observed by the call
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}
