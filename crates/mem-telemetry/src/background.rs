//! Background sink: unbounded queue + one worker thread that hands events to an exporter.

use mem_types::{TelemetryEvent, TelemetrySink};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("telemetry export error: {0}")]
    Other(String),
    #[error("telemetry endpoint returned {0}")]
    Status(u16),
}

/// Delivers one event somewhere. Runs on the worker thread only.
pub trait Exporter: Send + 'static {
    fn export(&mut self, event: &TelemetryEvent) -> Result<(), ExportError>;
}

impl<F> Exporter for F
where
    F: FnMut(&TelemetryEvent) -> Result<(), ExportError> + Send + 'static,
{
    fn export(&mut self, event: &TelemetryEvent) -> Result<(), ExportError> {
        self(event)
    }
}

/// Sink that queues events and exports them off the caller's thread.
///
/// `capture` only pushes onto an unbounded channel. The worker drains the
/// queue until every `BackgroundSink` handle is dropped; export failures are
/// logged at debug level and otherwise ignored.
#[derive(Debug, Clone)]
pub struct BackgroundSink {
    tx: mpsc::UnboundedSender<TelemetryEvent>,
}

impl BackgroundSink {
    pub fn spawn<E: Exporter>(exporter: E) -> std::io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<TelemetryEvent>();
        let mut exporter = exporter;
        std::thread::Builder::new()
            .name("mem-telemetry".to_string())
            .spawn(move || {
                while let Some(event) = rx.blocking_recv() {
                    if let Err(e) = exporter.export(&event) {
                        tracing::debug!(event = %event.name, error = %e, "telemetry export failed");
                    }
                }
            })?;
        Ok(Self { tx })
    }
}

impl TelemetrySink for BackgroundSink {
    fn capture(&self, event: TelemetryEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("telemetry worker stopped; event dropped");
        }
    }
}

/// Exporter that POSTs each event as JSON to a fixed URL.
pub struct HttpExporter {
    url: String,
    timeout: Duration,
    client: Option<reqwest::blocking::Client>,
}

impl HttpExporter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(5),
            client: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // Built lazily so the blocking client is created on the worker thread.
    fn client(&mut self) -> Result<&reqwest::blocking::Client, ExportError> {
        if self.client.is_none() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| ExportError::Other(e.to_string()))?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| ExportError::Other("http client unavailable".to_string()))
    }
}

impl std::fmt::Debug for HttpExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExporter")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Exporter for HttpExporter {
    fn export(&mut self, event: &TelemetryEvent) -> Result<(), ExportError> {
        let url = self.url.clone();
        let res = self
            .client()?
            .post(url)
            .json(event)
            .send()
            .map_err(|e| ExportError::Other(e.to_string()))?;
        if !res.status().is_success() {
            return Err(ExportError::Status(res.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mem_types::ClientContext;
    use std::sync::mpsc as std_mpsc;

    fn event(name: &str) -> TelemetryEvent {
        TelemetryEvent::new(name, ClientContext::default(), Default::default())
    }

    #[test]
    fn worker_exports_events_in_order() {
        let (seen_tx, seen_rx) = std_mpsc::channel();
        let sink = BackgroundSink::spawn(move |e: &TelemetryEvent| -> Result<(), ExportError> {
            let _ = seen_tx.send(e.name.clone());
            Ok(())
        })
        .unwrap();

        sink.capture(event("client.add"));
        sink.capture(event("client.get"));

        let timeout = Duration::from_secs(2);
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), "client.add");
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), "client.get");
    }

    #[test]
    fn export_failure_does_not_stop_worker() {
        let (seen_tx, seen_rx) = std_mpsc::channel();
        let mut calls = 0;
        let sink = BackgroundSink::spawn(move |e: &TelemetryEvent| -> Result<(), ExportError> {
            calls += 1;
            if calls == 1 {
                return Err(ExportError::Other("endpoint down".to_string()));
            }
            let _ = seen_tx.send(e.name.clone());
            Ok(())
        })
        .unwrap();

        sink.capture(event("first"));
        sink.capture(event("second"));

        let got = seen_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(got, "second");
    }

    #[test]
    fn unreachable_endpoint_is_swallowed() {
        let sink = BackgroundSink::spawn(
            HttpExporter::new("http://127.0.0.1:9/telemetry")
                .with_timeout(Duration::from_millis(200)),
        )
        .unwrap();
        sink.capture(event("client.search"));
    }
}
