//! Access logging as an injected capability.
//!
//! The HTTP pipeline hands one [`AccessRecord`] per request to whatever
//! [`AccessLogSink`] it was built with. Production emits through `tracing`;
//! tests capture records in memory and compare them with responses.

use std::sync::Mutex;
use std::time::Duration;

/// One completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency: Duration,
    pub request_id: String,
}

/// Receives exactly one record per request.
pub trait AccessLogSink: Send + Sync {
    fn record(&self, record: AccessRecord);
}

/// Emits each record as an `info` event on the process subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAccessLog;

impl AccessLogSink for TracingAccessLog {
    fn record(&self, record: AccessRecord) {
        tracing::info!(
            method = %record.method,
            path = %record.path,
            status = record.status,
            latency_ms = record.latency.as_secs_f64() * 1000.0,
            request_id = %record.request_id,
            "incoming request"
        );
    }
}

/// Keeps records in memory (tests/dev).
#[derive(Debug, Default)]
pub struct MemoryAccessLog {
    inner: Mutex<Vec<AccessRecord>>,
}

impl MemoryAccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub fn records(&self) -> Vec<AccessRecord> {
        match self.inner.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The record carrying `request_id`, if any.
    pub fn find(&self, request_id: &str) -> Option<AccessRecord> {
        self.records().into_iter().find(|r| r.request_id == request_id)
    }
}

impl AccessLogSink for MemoryAccessLog {
    fn record(&self, record: AccessRecord) {
        match self.inner.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(request_id: &str, status: u16) -> AccessRecord {
        AccessRecord {
            method: "GET".to_string(),
            path: "/users".to_string(),
            status,
            latency: Duration::from_millis(3),
            request_id: request_id.to_string(),
        }
    }

    #[test]
    fn memory_sink_keeps_records_in_order() {
        let sink = MemoryAccessLog::new();
        sink.record(sample("a", 200));
        sink.record(sample("b", 404));

        let ids: Vec<_> = sink.records().into_iter().map(|r| r.request_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(sink.find("b").map(|r| r.status), Some(404));
        assert!(sink.find("c").is_none());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn tracing_sink_emits_one_structured_event() {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingAccessLog.record(sample("r1", 500));
        });

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "INFO");
        let fields = &event["fields"];
        assert_eq!(fields["message"], "incoming request");
        assert_eq!(fields["request_id"], "r1");
        assert_eq!(fields["status"], 500);
        assert_eq!(fields["method"], "GET");
        assert_eq!(fields["path"], "/users");
        let latency_ms = fields["latency_ms"].as_f64().unwrap();
        assert!((latency_ms - 3.0).abs() < 1e-9);
    }
}
