//! Request DTOs and option builders for the memory service API.

use crate::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Query/body parameters for a single request (option name -> JSON value).
pub type Params = Map<String, Value>;

/// Single chat message (user/assistant).
///
/// Keys other than `role` and `content` (e.g. `name`) are kept in `extra`
/// and sent as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra per-message field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Input accepted by `add`: raw text or an already structured conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Messages {
    Text(String),
    List(Vec<Message>),
}

impl From<&str> for Messages {
    fn from(text: &str) -> Self {
        Messages::Text(text.to_string())
    }
}

impl From<String> for Messages {
    fn from(text: String) -> Self {
        Messages::Text(text)
    }
}

impl From<Vec<Message>> for Messages {
    fn from(list: Vec<Message>) -> Self {
        Messages::List(list)
    }
}

/// API version path segment, selectable per call for listing and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            other => Err(ClientError::InvalidInput(format!(
                "unsupported API version: {other}"
            ))),
        }
    }
}

/// Builder for per-call options (user/agent/run scoping, filters, pagination).
///
/// Anything the typed setters don't cover can be passed with [`MemoryOptions::set`];
/// the remote service defines which keys each endpoint honours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryOptions {
    params: Params,
}

impl MemoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn user_id(self, user_id: impl Into<String>) -> Self {
        self.set("user_id", user_id.into())
    }

    pub fn agent_id(self, agent_id: impl Into<String>) -> Self {
        self.set("agent_id", agent_id.into())
    }

    pub fn app_id(self, app_id: impl Into<String>) -> Self {
        self.set("app_id", app_id.into())
    }

    pub fn run_id(self, run_id: impl Into<String>) -> Self {
        self.set("run_id", run_id.into())
    }

    pub fn metadata(self, metadata: Value) -> Self {
        self.set("metadata", metadata)
    }

    pub fn filters(self, filters: Value) -> Self {
        self.set("filters", filters)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page)
    }

    pub fn page_size(self, page_size: u32) -> Self {
        self.set("page_size", page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}

impl From<MemoryOptions> for Params {
    fn from(opts: MemoryOptions) -> Self {
        opts.params
    }
}

impl From<Params> for MemoryOptions {
    fn from(params: Params) -> Self {
        Self { params }
    }
}

/// One entry of a batch update: both fields are required by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub memory_id: String,
    pub text: String,
}

impl BatchUpdate {
    pub fn new(memory_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            memory_id: memory_id.into(),
            text: text.into(),
        }
    }
}

/// One entry of a batch delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDelete {
    pub memory_id: String,
}

impl BatchDelete {
    pub fn new(memory_id: impl Into<String>) -> Self {
        Self {
            memory_id: memory_id.into(),
        }
    }
}

/// Project settings update (at least one field must be set).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_categories: Option<Vec<String>>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.custom_instructions.is_none() && self.custom_categories.is_none()
    }
}

/// `{ "message": ... }` envelope returned by the composite operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_keeps_extra_keys() {
        let msg: Message = serde_json::from_value(json!({
            "role": "user",
            "content": "hi",
            "name": "alex"
        }))
        .unwrap();
        assert_eq!(msg.extra["name"], "alex");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "user", "content": "hi", "name": "alex" })
        );
        assert_eq!(
            serde_json::to_value(Message::assistant("ok")).unwrap(),
            json!({ "role": "assistant", "content": "ok" })
        );
    }
}
