//! Logging primitives.
//!
//! A `Logger` only has to implement `log`; the level helpers are defined in
//! terms of it so tests can supply a capturing logger in a few lines.
//! Implementors must be `Send + Sync + 'static` so they can sit behind the
//! global facade and be shared between tasks.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short upper-case name used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait Logger: Send + Sync + 'static {
    /// Emit a log record at the given level.
    fn log(&self, level: LogLevel, message: &str);

    /// Flush any buffered records.
    fn flush(&self) {}

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Writes one compact JSON object per record to stdout.
///
/// Example: `{"level":"INFO","msg":"...","ts":"2026-01-01T00:00:00+00:00"}`
#[derive(Debug, Clone, Copy)]
pub struct StdoutLogger {
    pub min_level: LogLevel,
}

impl Default for StdoutLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

impl StdoutLogger {
    pub(crate) fn format_record(level: LogLevel, message: &str) -> String {
        serde_json::json!({
            "ts": chrono::Utc::now().to_rfc3339(),
            "level": level.as_str(),
            "msg": message,
        })
        .to_string()
    }
}

impl Logger for StdoutLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if level >= self.min_level {
            println!("{}", Self::format_record(level, message));
        }
    }
}

/// Forwards records into `tracing`, so the binary's subscriber decides
/// formatting and filtering (`RUST_LOG`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "collab_graph", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "collab_graph", "{}", message),
            LogLevel::Info => tracing::info!(target: "collab_graph", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "collab_graph", "{}", message),
            LogLevel::Error => tracing::error!(target: "collab_graph", "{}", message),
        }
    }
}
