//! Client configuration: explicit values, with optional environment fallback.

use crate::identity;
use crate::session::Session;
use mem_request::Identifiers;
use mem_telemetry::{TelemetrySettings, TelemetrySink};
use mem_types::{ClientError, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://api.mem0.ai";
pub const API_KEY_ENV: &str = "MEM0_API_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for constructing a client.
///
/// `ClientConfig::new()` uses only what is set on it; `from_env()` also fills
/// the API key, identity directory and telemetry sink from the environment.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub org_id: Option<String>,
    pub project_id: Option<String>,
    /// Deprecated: use `org_id`.
    pub organization: Option<String>,
    /// Deprecated: use `project_id`.
    pub project: Option<String>,
    /// Overrides the identity bootstrap when set.
    pub user_id: Option<String>,
    pub config_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: None,
            org_id: None,
            project_id: None,
            organization: None,
            project: None,
            user_id: None,
            config_dir: None,
            timeout: DEFAULT_TIMEOUT,
            telemetry: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("org_id", &self.org_id)
            .field("project_id", &self.project_id)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("user_id", &self.user_id)
            .field("config_dir", &self.config_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ClientConfig {
    /// Empty configuration. Reads nothing from the environment; use
    /// [`ClientConfig::from_env`] for the `MEM0_API_KEY` fallback.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: non_empty(lookup(API_KEY_ENV)),
            config_dir: identity::default_dir(&lookup),
            telemetry: Some(TelemetrySettings::from_lookup(&lookup).into_sink()),
            ..Self::default()
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Validate and split into the session and its telemetry sink.
    ///
    /// Everything here is local: a missing API key or contradictory
    /// identifiers fail before any connection is opened.
    pub(crate) fn into_parts(self) -> Result<(Session, Arc<dyn TelemetrySink>)> {
        let api_key = non_empty(self.api_key).ok_or_else(|| {
            ClientError::Configuration(format!(
                "API key not provided; pass one explicitly or set {API_KEY_ENV}"
            ))
        })?;
        let host = non_empty(self.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .trim_end_matches('/')
            .to_string();

        let ids = Identifiers {
            org_id: self.org_id,
            project_id: self.project_id,
            org_name: self.organization,
            project_name: self.project,
        };
        ids.validate()?;
        if ids.uses_legacy_names() {
            tracing::warn!(
                "organization/project names are deprecated and will be removed; \
                 use org_id/project_id instead"
            );
        }

        let user_id = match non_empty(self.user_id) {
            Some(id) => id,
            None => match self.config_dir {
                Some(ref dir) => identity::resolve_user_id(dir),
                None => identity::ephemeral_user_id(),
            },
        };

        let telemetry = self
            .telemetry
            .unwrap_or_else(|| Arc::new(mem_telemetry::NoopSink));
        let session = Session::new(api_key, host, ids, user_id, self.timeout);
        Ok((session, telemetry))
    }
}
