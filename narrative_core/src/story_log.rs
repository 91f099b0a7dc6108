//! Story log - append-only record of everything that happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    #[default]
    Event,
    System,
    Decision,
    Consequence,
    /// Ambient flavour delivered by `advance`.
    Random,
    ObserverInsight,
    OracleGlimpse,
    Narrator,
}

/// One line of the story log with a snapshot of the player at that moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub content: String,
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,
    pub timestamp: DateTime<Utc>,
    pub day: u32,
    pub sanity: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryLog {
    entries: Vec<LogEntry>,
}

impl StoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn count_of(&self, entry_type: LogEntryType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .count()
    }

    pub fn of_type(&self, entry_type: LogEntryType) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(move |e| e.entry_type == entry_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, entry_type: LogEntryType) -> LogEntry {
        LogEntry {
            content: content.to_string(),
            entry_type,
            timestamp: Utc::now(),
            day: 1,
            sanity: 100,
        }
    }

    #[test]
    fn test_counts_and_recent() {
        let mut log = StoryLog::new();
        log.push(entry("a", LogEntryType::Event));
        log.push(entry("b", LogEntryType::Decision));
        log.push(entry("c", LogEntryType::Decision));

        assert_eq!(log.len(), 3);
        assert_eq!(log.count_of(LogEntryType::Decision), 2);
        assert_eq!(log.recent(2)[0].content, "b");
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn test_entry_type_serializes_as_type() {
        let json = serde_json::to_value(entry("x", LogEntryType::ObserverInsight)).unwrap();
        assert_eq!(json["type"], "observer_insight");
        assert_eq!(json["sanity"], 100);
    }
}
