//! Usage telemetry events emitted after client operations.

use crate::Params;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session context attached to every event. Never carries the API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContext {
    pub user_id: String,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub client_version: String,
}

/// One telemetry event: operation name plus a small property summary.
///
/// Properties hold option keys, memory ids and API versions; memory content
/// and metadata values are never recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub client: ClientContext,
    #[serde(default)]
    pub properties: Params,
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>, client: ClientContext, properties: Params) -> Self {
        Self {
            name: name.into(),
            client,
            properties,
            timestamp: Utc::now(),
        }
    }
}
