use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Assignment,
    Queue,
    Status,
    Conflict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 200;

/// Record of what happened at the desk, keeping at most `capacity` entries.
/// The oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    entries: Vec<ActivityLog>,
    capacity: usize,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }

    /// A capacity of zero is raised to one so the latest entry is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        ActivityFeed {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }

    pub fn record(&mut self, kind: ActivityKind, message: impl Into<String>) -> &ActivityLog {
        let entry = ActivityLog {
            id: Uuid::new_v4(),
            message: message.into(),
            timestamp: Local::now(),
            kind,
        };
        tracing::debug!(kind = ?entry.kind, "{}", entry.message);
        self.entries.push(entry);
        self.trim();
        &self.entries[self.entries.len() - 1]
    }

    /// Most recent entries first.
    pub fn recent(&self, limit: usize) -> Vec<&ActivityLog> {
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn of_kind(&self, kind: ActivityKind) -> Vec<&ActivityLog> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
