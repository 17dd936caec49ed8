//! Usage telemetry sinks for the memory clients.
//!
//! Every sink is best-effort: `capture` never blocks on I/O and never reports
//! failure back to the caller.

mod background;
#[cfg(feature = "test-util")]
mod mock;
mod sink;

use std::sync::Arc;

pub use background::{BackgroundSink, ExportError, Exporter, HttpExporter};
pub use mem_types::{ClientContext, TelemetryEvent, TelemetrySink};
pub use sink::{NoopSink, TracingSink};

#[cfg(feature = "test-util")]
pub use mock::RecordingSink;

/// Environment switches for telemetry (`MEM0_TELEMETRY`, `MEM0_TELEMETRY_URL`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub url: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
        }
    }
}

impl TelemetrySettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("MEM0_TELEMETRY")
            .map(|v| {
                !matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "false" | "0" | "no" | "off"
                )
            })
            .unwrap_or(true);
        let url = lookup("MEM0_TELEMETRY_URL").filter(|u| !u.trim().is_empty());
        Self { enabled, url }
    }

    /// Build the sink these settings describe.
    pub fn into_sink(self) -> Arc<dyn TelemetrySink> {
        if !self.enabled {
            return Arc::new(NoopSink);
        }
        if let Some(url) = self.url {
            match BackgroundSink::spawn(HttpExporter::new(url)) {
                Ok(sink) => return Arc::new(sink),
                Err(e) => tracing::warn!(error = %e, "telemetry worker failed to start"),
            }
        }
        Arc::new(TracingSink)
    }
}

/// Sink selected from the process environment.
pub fn from_env() -> Arc<dyn TelemetrySink> {
    TelemetrySettings::from_env().into_sink()
}
