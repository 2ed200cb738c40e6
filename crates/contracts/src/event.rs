//! KubeEvent - input handed to every sink
//!
//! A Kubernetes `Event` enriched with the labels, annotations and owners of
//! the object it refers to. Field names follow the Kubernetes wire format
//! (camelCase). Fields this model does not know about are kept in `extra`
//! so they still reach sinks that forward the event as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kubernetes event as seen by sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeEvent {
    /// Object metadata of the event itself
    pub metadata: EventMeta,

    /// Name of the cluster the event was observed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Object the event is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_object: Option<InvolvedObject>,

    /// Short machine-readable reason (e.g. `ScalingReplicaSet`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable description
    #[serde(default)]
    pub message: String,

    /// `Normal` or `Warning`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    /// Number of times this event has occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<DateTime<Utc>>,

    /// Component that reported the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_instance: Option<String>,

    /// Fields not modelled above, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Event object metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    /// When the API server created the event object
    pub creation_timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// Reference to the object an event is about, with its metadata attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedObject {
    #[serde(default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,

    /// Object was already gone when the event was enriched
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

/// Owner of the involved object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

/// Reporting component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl KubeEvent {
    /// Create a minimal event with only the fields every sink relies on
    pub fn new(message: impl Into<String>, creation_timestamp: DateTime<Utc>) -> Self {
        Self {
            metadata: EventMeta {
                name: String::new(),
                namespace: None,
                uid: None,
                resource_version: None,
                creation_timestamp,
                labels: BTreeMap::new(),
                annotations: BTreeMap::new(),
            },
            cluster_name: None,
            involved_object: None,
            reason: None,
            message: message.into(),
            event_type: None,
            count: None,
            first_timestamp: None,
            last_timestamp: None,
            source: None,
            reporting_component: None,
            reporting_instance: None,
            extra: Map::new(),
        }
    }

    /// Creation time of the event object
    pub fn creation_timestamp(&self) -> DateTime<Utc> {
        self.metadata.creation_timestamp
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `namespace/name` of the event, for logging
    pub fn display_name(&self) -> String {
        match &self.metadata.namespace {
            Some(ns) => format!("{}/{}", ns, self.metadata.name),
            None => self.metadata.name.clone(),
        }
    }
}
