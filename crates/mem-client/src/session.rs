//! Per-client session state and the response handling both clients share.

use mem_request::{Identifiers, Method, Params};
use mem_types::{ClientContext, ClientError, Result, TelemetryEvent, TelemetrySink};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const USER_ID_HEADER: &str = "Mem0-User-ID";

/// Credentials, endpoint and identifiers of one client. Read-only once the
/// startup probe has run.
#[derive(Clone)]
pub struct Session {
    api_key: String,
    host: String,
    ids: Identifiers,
    user_id: String,
    timeout: Duration,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("ids", &self.ids)
            .field("user_id", &self.user_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) fn new(
        api_key: String,
        host: String,
        ids: Identifiers,
        user_id: String,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            host,
            ids,
            user_id,
            timeout,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn ids(&self) -> &Identifiers {
        &self.ids
    }

    pub fn org_id(&self) -> Option<&str> {
        self.ids.org_id.as_deref()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.ids.project_id.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when the deprecated organization/project names are configured.
    pub fn uses_legacy_identifiers(&self) -> bool {
        self.ids.uses_legacy_names()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", self.api_key))
            .map_err(|_| ClientError::Configuration("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);
        let user = HeaderValue::from_str(&self.user_id)
            .map_err(|_| ClientError::Configuration("user id contains invalid characters".into()))?;
        let user_header = HeaderName::from_bytes(USER_ID_HEADER.as_bytes())
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(user_header, user);
        Ok(headers)
    }

    /// Take org/project ids from a ping response when none were configured.
    pub(crate) fn adopt_ping(&mut self, body: &Value) {
        if !self.ids.is_empty() {
            return;
        }
        let field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        if let (Some(org_id), Some(project_id)) = (field("org_id"), field("project_id")) {
            tracing::debug!(%org_id, %project_id, "using org/project from API key");
            self.ids = Identifiers::with_ids(org_id, project_id);
        }
    }

    pub(crate) fn context(&self) -> ClientContext {
        ClientContext {
            user_id: self.user_id.clone(),
            host: self.host.clone(),
            org_id: self.ids.org_id.clone(),
            project_id: self.ids.project_id.clone(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub(crate) fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Transport(format!("request timed out: {e}"))
    } else {
        ClientError::Transport(e.to_string())
    }
}

/// Status check and JSON decode of a finished exchange. An empty 2xx body
/// decodes as `null`.
pub(crate) fn decode_response(status: reqwest::StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Map a failed startup probe: a rejected key becomes `Authentication`.
pub(crate) fn probe_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Status { status, body } => ClientError::Authentication(format!(
            "invalid API key (status {status}): {body}"
        )),
        other => other,
    }
}

pub(crate) fn decode_as<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Hand one event to the sink. A panicking sink is contained here.
pub(crate) fn emit(
    sink: &dyn TelemetrySink,
    prefix: &str,
    op: &str,
    session: &Session,
    properties: Params,
) {
    let event = TelemetryEvent::new(format!("{prefix}.{op}"), session.context(), properties);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.capture(event)));
    if outcome.is_err() {
        tracing::debug!(op, "telemetry sink panicked; ignored");
    }
}

/// Telemetry property helpers. None of them include memory content.
pub(crate) mod props {
    use mem_request::plan::option_keys;
    use mem_types::{ApiVersion, Params, ProjectUpdate};
    use serde_json::{json, Value};

    pub fn none() -> Params {
        Params::new()
    }

    pub fn keys(options: &Params) -> Params {
        let mut p = Params::new();
        p.insert("keys".to_string(), option_keys(options));
        p
    }

    pub fn versioned_keys(version: ApiVersion, options: &Params) -> Params {
        let mut p = keys(options);
        p.insert("api_version".to_string(), Value::from(version.as_str()));
        p
    }

    pub fn memory_id(memory_id: &str) -> Params {
        let mut p = Params::new();
        p.insert("memory_id".to_string(), Value::from(memory_id));
        p
    }

    pub fn schema(schema: &str, options: &Params) -> Params {
        let mut p = keys(options);
        p.insert("schema".to_string(), Value::from(schema));
        p
    }

    pub fn fields(fields: Option<&[String]>) -> Params {
        let mut p = Params::new();
        p.insert("fields".to_string(), json!(fields));
        p
    }

    pub fn project_update(update: &ProjectUpdate) -> Params {
        let mut p = Params::new();
        p.insert(
            "custom_instructions".to_string(),
            json!(update.custom_instructions),
        );
        p.insert(
            "custom_categories".to_string(),
            json!(update.custom_categories),
        );
        p
    }

    pub fn count(n: usize) -> Params {
        let mut p = Params::new();
        p.insert("count".to_string(), Value::from(n));
        p
    }
}
