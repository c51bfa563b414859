//! Pipeline log channel.
//!
//! Every entry goes to `tracing` and is fanned out to subscribers of
//! [`LOG_BROADCASTER`], so a CLI, a test or a front end can follow progress.
//! Publishing never fails when nobody is listening.

use once_cell::sync::Lazy;
use serde::Serialize;
use tokio::sync::broadcast;

/// Entries kept for slow subscribers before they start lagging.
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for display
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, indent: u8) -> Self {
        Self {
            level,
            message: message.into(),
            indent,
        }
    }

    fn trace(&self) {
        let pad = "   ".repeat(usize::from(self.indent));
        match self.level {
            LogLevel::Info => tracing::info!("{pad}{}", self.message),
            LogLevel::Success => tracing::info!("{pad}✓ {}", self.message),
            LogLevel::Warning => tracing::warn!("{pad}{}", self.message),
            LogLevel::Error => tracing::error!("{pad}{}", self.message),
        }
    }
}

/// Process-wide log channel
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::default);

pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl LogBroadcaster {
    pub fn publish(&self, entry: LogEntry) {
        entry.trace();
        // Err only means there are no receivers
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

fn emit(level: LogLevel, msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.publish(LogEntry::new(level, msg, indent));
}

pub fn log_info(msg: impl Into<String>) {
    emit(LogLevel::Info, msg, 0);
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogLevel::Success, msg, 0);
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogLevel::Warning, msg, 0);
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    emit(LogLevel::Warning, msg, indent);
}

pub fn log_error(msg: impl Into<String>) {
    emit(LogLevel::Error, msg, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_entries() {
        let channel = LogBroadcaster::default();
        let mut rx = channel.subscribe();

        channel.publish(LogEntry::new(LogLevel::Info, "reading", 0));
        channel.publish(LogEntry::new(LogLevel::Warning, "skipped", 1));

        assert_eq!(rx.try_recv().unwrap(), LogEntry::new(LogLevel::Info, "reading", 0));
        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, LogLevel::Warning);
        assert_eq!(second.indent, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers() {
        LogBroadcaster::default().publish(LogEntry::new(LogLevel::Error, "nobody listening", 0));
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_value(LogEntry::new(LogLevel::Success, "done", 0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "level": "success", "message": "done", "indent": 0 })
        );
    }
}
