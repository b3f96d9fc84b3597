//! Waiting queue of appointments that have no staff member yet.
//!
//! Positions are 1-based and dense: after any removal the remaining items
//! are renumbered 1..N in their previous order.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub position: usize,
    pub added_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct WaitingQueue {
    items: Vec<QueueItem>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        WaitingQueue { items: Vec::new() }
    }

    /// Build a queue from items carrying arbitrary positions.
    pub fn from_items(items: Vec<QueueItem>) -> Self {
        let mut queue = WaitingQueue { items };
        queue.reorder();
        queue
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in position order.
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Append an appointment at the back of the queue.
    ///
    /// An appointment already in the queue keeps its place.
    pub fn enqueue(&mut self, appointment_id: Uuid) -> QueueItem {
        if let Some(existing) = self.find_by_appointment(appointment_id) {
            return existing.clone();
        }

        let item = QueueItem {
            id: Uuid::new_v4(),
            appointment_id,
            position: self.items.len() + 1,
            added_at: Local::now(),
        };
        self.items.push(item.clone());
        item
    }

    pub fn get(&self, item_id: Uuid) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn find_by_appointment(&self, appointment_id: Uuid) -> Option<&QueueItem> {
        self.items
            .iter()
            .find(|item| item.appointment_id == appointment_id)
    }

    pub fn front(&self) -> Option<&QueueItem> {
        self.items.first()
    }

    /// Remove a queue item and renumber what remains.
    pub fn remove(&mut self, item_id: Uuid) -> Option<QueueItem> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        let removed = self.items.remove(index);
        self.reorder();
        Some(removed)
    }

    pub fn remove_appointment(&mut self, appointment_id: Uuid) -> Option<QueueItem> {
        let item_id = self.find_by_appointment(appointment_id)?.id;
        self.remove(item_id)
    }

    /// Sort by current position and renumber 1..N.
    ///
    /// Equal positions keep their relative order.
    pub fn reorder(&mut self) {
        self.items.sort_by_key(|item| item.position);
        for (index, item) in self.items.iter_mut().enumerate() {
            item.position = index + 1;
        }
    }
}

/// Render a position as "1st", "2nd", "3rd", "4th", ...
pub fn ordinal_badge(position: usize) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", position, suffix)
}
