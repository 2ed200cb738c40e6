//! # Sinks
//!
//! Delivery targets for Kubernetes events.
//!
//! Responsible for:
//! - Translating a `KubeEvent` into the vendor payload
//! - One outbound request per event, no queue and no retry
//! - Classifying the remote answer into success or a typed error

pub mod logzio;
pub mod marker;
pub mod metrics;

pub use contracts::{DeliveryContext, EventSink, KubeEvent};
pub use logzio::LogzioSink;
pub use marker::{Marker, MarkerRequest};
pub use metrics::{outcome_label, MetricsSnapshot, SinkMetrics};

use contracts::{ContractError, ReceiverConfig};
use tracing::instrument;

/// Create the sink for a configured receiver
///
/// Construction errors are attributed to the receiver name.
#[instrument(name = "sinks_build_sink", skip(receiver), fields(sink = %receiver.name))]
pub fn build_sink(receiver: &ReceiverConfig) -> Result<LogzioSink, ContractError> {
    LogzioSink::new(&receiver.name, receiver.logzio.clone())
        .map_err(|e| ContractError::sink_creation(&receiver.name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::LogzioConfig;

    #[test]
    fn test_build_sink_names_receiver() {
        let receiver = ReceiverConfig {
            name: "markers".to_string(),
            logzio: LogzioConfig::default(),
        };
        let err = build_sink(&receiver).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().starts_with("failed to create sink 'markers'"));
    }

    #[test]
    fn test_build_sink_ok() {
        let receiver = ReceiverConfig {
            name: "markers".to_string(),
            logzio: LogzioConfig {
                base_api: "https://api.logz.io".to_string(),
                token: "secret".to_string(),
                debug: false,
            },
        };
        let sink = build_sink(&receiver).unwrap();
        assert_eq!(sink.name(), "markers");
    }
}
