//! Layered error definitions
//!
//! Categorized by source: config / sink construction / delivery

use thiserror::Error;

/// Boxed transport-level cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Construction Errors =====
    /// Receiver could not be turned into a sink
    #[error("failed to create sink '{sink_name}': {source}")]
    SinkCreation {
        sink_name: String,
        #[source]
        source: Box<ContractError>,
    },

    /// Sink connection error (client setup)
    #[error("sink '{sink_name}' connection error: {source}")]
    SinkConnection {
        sink_name: String,
        #[source]
        source: BoxError,
    },

    // ===== Delivery Errors =====
    /// Payload could not be encoded, nothing was sent
    #[error("sink '{sink_name}' serialization error: {source}")]
    Serialization {
        sink_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Network or protocol failure talking to the remote
    #[error("sink '{sink_name}' transport error: {source}")]
    Transport {
        sink_name: String,
        #[source]
        source: BoxError,
    },

    /// Remote answered with a non-2xx status
    #[error("Error from {vendor}: {body}")]
    RemoteRejection {
        vendor: &'static str,
        status: u16,
        body: String,
    },

    /// Deadline elapsed before the remote answered
    #[error("sink '{sink_name}' delivery timed out after {waited_ms}ms")]
    Timeout { sink_name: String, waited_ms: u64 },

    /// Caller cancelled the delivery
    #[error("sink '{sink_name}' delivery cancelled")]
    Cancelled { sink_name: String },

    /// Send attempted after close
    #[error("sink '{sink_name}' is closed")]
    SinkClosed { sink_name: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Attribute a construction failure to a named receiver
    pub fn sink_creation(sink_name: impl Into<String>, source: ContractError) -> Self {
        Self::SinkCreation {
            sink_name: sink_name.into(),
            source: Box::new(source),
        }
    }

    /// Create transport error
    pub fn transport(
        sink_name: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            sink_name: sink_name.into(),
            source: source.into(),
        }
    }

    /// Whether the error was raised before any sink existed
    pub fn is_config(&self) -> bool {
        match self {
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => true,
            Self::SinkCreation { source, .. } => source.is_config(),
            _ => false,
        }
    }
}
