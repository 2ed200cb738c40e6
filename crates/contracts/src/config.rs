//! Receiver configuration
//!
//! Root of the exporter configuration: a list of named receivers, each
//! carrying the connection parameters of its sink.

use serde::{Deserialize, Serialize};

/// Exporter configuration root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Delivery targets
    #[serde(default)]
    pub receivers: Vec<ReceiverConfig>,
}

/// One named delivery target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Receiver name (used for logging/metrics)
    pub name: String,

    /// Logz.io marker parameters
    pub logzio: LogzioConfig,
}

/// Logz.io marker API parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogzioConfig {
    /// API base URL, e.g. `https://api.logz.io`
    #[serde(default)]
    pub base_api: String,

    /// API token sent as `X-API-TOKEN`
    #[serde(default)]
    pub token: String,

    /// Log request and response bodies
    #[serde(default)]
    pub debug: bool,
}

impl ExporterConfig {
    /// Look up a receiver by name
    pub fn receiver(&self, name: &str) -> Option<&ReceiverConfig> {
        self.receivers.iter().find(|r| r.name == name)
    }
}
