//! Trivial sinks.

use mem_types::{TelemetryEvent, TelemetrySink};

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn capture(&self, _event: TelemetryEvent) {}
}

/// Writes each event as a debug-level `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn capture(&self, event: TelemetryEvent) {
        tracing::debug!(
            target: "mem_telemetry",
            event = %event.name,
            user_id = %event.client.user_id,
            properties = %serde_json::Value::Object(event.properties),
            "telemetry event"
        );
    }
}
