//! Anomaly capture and translated-unit counting shared across concurrent units.

use log::warn;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level (e.g., "INFO", "WARN", "ERROR")
    pub level: String,
    /// Log message
    pub message: String,
}

/// Anomalies seen while translating. Each one is also emitted through `log`.
///
/// Scoped handles share the entries of the log they came from and prefix
/// every message with their scope (file name, container path).
#[derive(Debug, Clone, Default)]
pub struct AnomalyLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    scope: Option<String>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle writing to the same entries under `scope`. Scopes nest.
    pub fn scoped(&self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        Self {
            entries: Arc::clone(&self.entries),
            scope: Some(match &self.scope {
                Some(outer) => format!("{} {}", outer, scope),
                None => scope,
            }),
        }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Record a non-fatal irregularity
    pub fn anomaly(&self, context: &str, message: impl Into<String>) {
        let message = match &self.scope {
            Some(scope) => format!("Anomaly in {} {}: {}", scope, context, message.into()),
            None => format!("Anomaly {}: {}", context, message.into()),
        };
        warn!("{}", message);
        self.entries.lock().push(LogEntry {
            level: "WARN".to_string(),
            message,
        });
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Additive counter of successfully translated units
#[derive(Debug, Clone, Default)]
pub struct TranslationTally {
    count: Arc<AtomicUsize>,
}

impl TranslationTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
