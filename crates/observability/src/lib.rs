//! Tracing, logging and the access-log capability (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Per-request access records and the sinks that receive them.
pub mod access_log;

pub use access_log::{AccessLogSink, AccessRecord, MemoryAccessLog, TracingAccessLog};
pub use self::tracing::LogFormat;
