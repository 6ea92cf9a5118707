//! In-run activity log for agent calls.
//!
//! Every stage of a production run appends entries here so the final
//! blueprint export (and the operator) can see what each agent did and
//! when. This complements `tracing` output: the log travels with the
//! run result instead of the process stderr.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log entry.
///
/// Entries have no separate id field; their position in the log is their
/// identity, and insertion order is stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    /// A stage finished and its output merged, as opposed to mere progress
    Success,
    Warn,
    Error,
}

/// A single timestamped record of agent activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct LogEntry {
    timestamp: DateTime<Utc>,
    agent: String,
    level: LogLevel,
    message: String,
}

impl LogEntry {
    pub fn new(agent: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            agent: agent.into(),
            level,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.agent,
            self.message
        )
    }
}

/// Ordered collection of [`LogEntry`] records for a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentLog {
    entries: Vec<LogEntry>,
}

impl AgentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, agent: impl Into<String>, message: impl Into<String>) {
        self.push(LogEntry::new(agent, LogLevel::Info, message));
    }

    pub fn success(&mut self, agent: impl Into<String>, message: impl Into<String>) {
        self.push(LogEntry::new(agent, LogLevel::Success, message));
    }

    pub fn warn(&mut self, agent: impl Into<String>, message: impl Into<String>) {
        self.push(LogEntry::new(agent, LogLevel::Warn, message));
    }

    pub fn error(&mut self, agent: impl Into<String>, message: impl Into<String>) {
        self.push(LogEntry::new(agent, LogLevel::Error, message));
    }

    pub fn push(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Info | LogLevel::Success => {
                tracing::info!(agent = %entry.agent, "{}", entry.message)
            }
            LogLevel::Warn => tracing::warn!(agent = %entry.agent, "{}", entry.message),
            LogLevel::Error => tracing::error!(agent = %entry.agent, "{}", entry.message),
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_preserve_insertion_order() {
        let mut log = AgentLog::new();
        log.info("researcher", "started");
        log.warn("researcher", "retrying");
        log.info("director", "started");

        let agents: Vec<&str> = log.entries().iter().map(|e| e.agent().as_str()).collect();
        assert_eq!(agents, vec!["researcher", "researcher", "director"]);
        assert_eq!(*log.entries()[1].level(), LogLevel::Warn);
    }

    #[test]
    fn display_includes_level_and_agent() {
        let entry = LogEntry::new("marketer", LogLevel::Error, "boom");
        let rendered = entry.to_string();
        assert!(rendered.contains("ERROR"));
        assert!(rendered.contains("marketer"));
        assert!(rendered.contains("boom"));
    }
}
