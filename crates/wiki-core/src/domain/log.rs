//! Logging capability used by the settings record.
//!
//! [`SiteSettings`](super::site_settings::SiteSettings) never reaches for a
//! global logger.  Operations that report something take a `&dyn SettingsLog`
//! (or use [`TracingLog`] through their convenience form), so the record stays
//! a plain value type that tests can drive with [`RecordingLog`].
//!
//! Only two severities exist here: a warning when the record repairs itself or
//! falls back to defaults on empty input, and an error when persisted JSON is
//! corrupt.

use std::sync::{Mutex, PoisonError};

/// Target used for every event emitted by [`TracingLog`].
pub const LOG_TARGET: &str = "wiki_core::settings";

/// Narrow logging interface the settings record reports through.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsLog {
    /// Reports a recoverable oddity (self-healing read, empty input).
    fn warn(&self, message: &str);

    /// Reports a failure that was recovered from by falling back to defaults.
    fn error(&self, message: &str);
}

/// Forwards settings log events to `tracing`.
///
/// This is the implementation used by the convenience forms of the
/// [`SiteSettings`](super::site_settings::SiteSettings) methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl SettingsLog for TracingLog {
    fn warn(&self, message: &str) {
        tracing::warn!(target: LOG_TARGET, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: LOG_TARGET, "{message}");
    }
}

/// Severity of a recorded log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warn,
    Error,
}

/// A log that records every event in memory.
///
/// Events are stored behind a `Mutex` so a single recorder can be shared
/// (e.g. through an `Arc`) with code that only sees `&dyn SettingsLog`.
///
/// ```
/// use wiki_core::{LogLevel, RecordingLog, SiteSettings};
///
/// let log = RecordingLog::new();
/// let settings = SiteSettings::load_from_json_with(Some(""), &log).unwrap();
///
/// assert_eq!(settings, SiteSettings::default());
/// assert_eq!(log.entries()[0].0, LogLevel::Warn);
/// ```
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event recorded so far, in order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the messages recorded at warning level.
    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(LogLevel::Warn)
    }

    /// Returns the messages recorded at error level.
    pub fn errors(&self) -> Vec<String> {
        self.messages_at(LogLevel::Error)
    }

    fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl SettingsLog for RecordingLog {
    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
