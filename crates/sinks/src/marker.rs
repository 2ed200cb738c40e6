//! Logz.io marker payload
//!
//! Wire shape of `POST /v2/markers/create-markers`:
//!
//! ```json
//! {"markers":[{"title":"k8s event","tag":"DEPLOYMENT","timestamp":1709294405,
//!              "description":"...","metadata":{...}}]}
//! ```
//!
//! `tag` and `metadata` are left out when unset; `title` and `description`
//! are always written, even when empty.

use contracts::KubeEvent;
use serde::Serialize;
use serde_json::Value;

/// Title of every marker produced from a Kubernetes event
pub const MARKER_TITLE: &str = "k8s event";

/// Classification tag of every marker produced from a Kubernetes event
pub const MARKER_TAG: &str = "DEPLOYMENT";

/// One timeline annotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub title: String,

    #[serde(skip_serializing_if = "is_blank")]
    pub tag: Option<String>,

    /// Unix seconds
    pub timestamp: i64,

    pub description: String,

    /// Opaque structured payload, forwarded as-is
    #[serde(skip_serializing_if = "is_unset")]
    pub metadata: Option<Value>,
}

/// Request envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRequest {
    pub markers: Vec<Marker>,
}

impl Marker {
    /// Translate an event into a marker
    ///
    /// Every event is translated; the whole event is attached as metadata
    /// without flattening. An empty message is passed through and left for
    /// the remote to reject.
    pub fn from_event(event: &KubeEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            title: MARKER_TITLE.to_string(),
            tag: Some(MARKER_TAG.to_string()),
            timestamp: event.creation_timestamp().timestamp(),
            description: event.message().to_string(),
            metadata: Some(serde_json::to_value(event)?),
        })
    }
}

impl MarkerRequest {
    /// Envelope holding exactly one marker
    pub fn single(marker: Marker) -> Self {
        Self {
            markers: vec![marker],
        }
    }

    /// Serialize to the request body
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

fn is_blank(tag: &Option<String>) -> bool {
    tag.as_deref().is_none_or(str::is_empty)
}

fn is_unset(metadata: &Option<Value>) -> bool {
    matches!(metadata, None | Some(Value::Null))
}
