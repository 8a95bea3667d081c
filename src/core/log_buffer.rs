//! Bounded audit trail shown in the system log panel
//!
//! Every producer on the screen (boot, fetch, strike, unlock) writes one
//! human-readable line per completed step. Lines are stamped with the local
//! time of day and kept in append order; the oldest line is dropped once the
//! buffer is full.

use std::collections::VecDeque;

use tracing::info;

/// Number of audit lines kept on screen
pub const LOG_CAPACITY: usize = 16;

/// Lines present before anything has run
pub const SEED_LINES: [&str; 3] = [
    "[SYSTEM] Initializing Sovereign Substrate...",
    "[BOOT] Calibrating Neural Sequencers...",
    "[NETWORK] Syncing with Base Bedrock...",
];

/// Single audit line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Local time of day (`HH:MM:SS`); empty for seed lines
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }

    /// Entry stamped with the current local time
    pub fn now(message: impl Into<String>) -> Self {
        Self::new(chrono::Local::now().format("%H:%M:%S").to_string(), message)
    }

    /// Rendered form: `[HH:MM:SS] message`, or the bare message for seed lines
    pub fn display(&self) -> String {
        if self.timestamp.is_empty() {
            self.message.clone()
        } else {
            format!("[{}] {}", self.timestamp, self.message)
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Append-only FIFO of audit lines with a fixed capacity
#[derive(Clone, Debug)]
pub struct LogRingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

impl LogRingBuffer {
    /// Empty buffer; a capacity of 0 is bumped to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer pre-filled with the boot seed lines
    pub fn seeded(capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        for line in SEED_LINES {
            buffer.push(LogEntry::new("", line));
        }
        buffer
    }

    /// Stamp `message` with the current time and append it
    pub fn append(&mut self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        info!(event_type = "AUDIT", timestamp = %entry.timestamp, "{}", entry.message);
        self.push(entry);
    }

    /// Append a pre-built entry with automatic rotation
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries oldest first
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// `(1-based index, rendered line)` pairs, oldest first
    pub fn numbered_lines(&self) -> Vec<(usize, String)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i + 1, entry.display()))
            .collect()
    }

    /// Number of entries whose message contains `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .count()
    }
}
