//! Top-level logger exports and a small global facade.
//!
//! - `Logger`: trait defining the logging surface
//! - `LogLevel`: enum of levels
//! - `NoopLogger`: drops everything
//! - `StdoutLogger`: JSON lines on stdout
//! - `TracingLogger`: forwards into `tracing` (what the binary installs)
//!
//! ```rust,no_run
//! use collab_graph::logger;
//! logger::init_logger(logger::StdoutLogger::default());
//! logger::info("app started");
//! ```
//!
//! Library code logs through the free functions below. Until a logger is
//! installed they are no-ops.

pub mod core;

pub use self::core::{LogLevel, Logger, NoopLogger, StdoutLogger, TracingLogger};

use std::sync::{Arc, RwLock};

static GLOBAL_LOGGER: RwLock<Option<Arc<dyn Logger>>> = RwLock::new(None);

/// Install `logger` as the process-wide logger, replacing any previous one.
pub fn init_logger<L: Logger>(logger: L) {
    let mut slot = GLOBAL_LOGGER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(previous) = slot.take() {
        previous.flush();
    }
    *slot = Some(Arc::new(logger));
}

/// Log through the global logger if one is installed.
pub fn log(level: LogLevel, message: &str) {
    let logger = GLOBAL_LOGGER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    if let Some(logger) = logger {
        logger.log(level, message);
    }
}

pub fn trace(msg: &str) {
    log(LogLevel::Trace, msg);
}

pub fn debug(msg: &str) {
    log(LogLevel::Debug, msg);
}

pub fn info(msg: &str) {
    log(LogLevel::Info, msg);
}

pub fn warn(msg: &str) {
    log(LogLevel::Warn, msg);
}

pub fn error(msg: &str) {
    log(LogLevel::Error, msg);
}
