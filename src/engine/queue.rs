//! Matchmaking queues.
//!
//! One FIFO per category. A player waits here until an opponent shows up,
//! the player disconnects, or the player starts a different join flow.

use std::collections::{HashMap, VecDeque};

/// A player waiting for an opponent in one category.
#[derive(Debug, Clone)]
pub struct WaitingEntry {
    /// Connection id of the waiting player.
    pub id: String,

    /// Display name carried into the room on match.
    pub nickname: String,

    /// When the player entered the queue.
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// Per-category FIFO queues of waiting players.
#[derive(Debug, Default)]
pub struct QueueManager {
    queues: HashMap<String, VecDeque<WaitingEntry>>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a player onto a category's queue. No-op when the player is
    /// already waiting in that category; returns whether an entry was
    /// added.
    pub fn enqueue(&mut self, category: &str, id: &str, nickname: &str) -> bool {
        let queue = self.queues.entry(category.to_string()).or_default();
        if queue.iter().any(|entry| entry.id == id) {
            return false;
        }
        queue.push_back(WaitingEntry {
            id: id.to_string(),
            nickname: nickname.to_string(),
            joined_at: chrono::Utc::now(),
        });
        true
    }

    /// Whether a player is waiting in a category.
    pub fn is_queued(&self, category: &str, id: &str) -> bool {
        self.queues
            .get(category)
            .map_or(false, |queue| queue.iter().any(|entry| entry.id == id))
    }

    /// The longest-waiting player in a category, without removing it.
    pub fn peek(&self, category: &str) -> Option<&WaitingEntry> {
        self.queues.get(category).and_then(|queue| queue.front())
    }

    /// Pop the longest-waiting player in a category.
    pub fn pop_front(&mut self, category: &str) -> Option<WaitingEntry> {
        self.queues.get_mut(category).and_then(|queue| queue.pop_front())
    }

    /// Drop a player's entries from every category queue.
    pub fn remove_all(&mut self, id: &str) {
        for queue in self.queues.values_mut() {
            queue.retain(|entry| entry.id != id);
        }
    }

    /// Number of players waiting in a category.
    pub fn waiting_count(&self, category: &str) -> usize {
        self.queues.get(category).map_or(0, |queue| queue.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queues = QueueManager::new();
        queues.enqueue("ANIMALS", "a", "alice");
        queues.enqueue("ANIMALS", "b", "bob");

        // The longest-waiting player matches first.
        assert_eq!(queues.pop_front("ANIMALS").unwrap().id, "a");
        assert_eq!(queues.pop_front("ANIMALS").unwrap().id, "b");
        assert_eq!(queues.pop_front("ANIMALS").map(|e| e.id), None);
    }

    #[test]
    fn test_enqueue_is_idempotent_per_category() {
        let mut queues = QueueManager::new();
        assert!(queues.enqueue("ANIMALS", "a", "alice"));
        assert!(!queues.enqueue("ANIMALS", "a", "alice"));
        assert_eq!(queues.waiting_count("ANIMALS"), 1);

        // A different category is a different queue.
        assert!(queues.enqueue("FOODS", "a", "alice"));
    }

    #[test]
    fn test_remove_all_clears_every_category() {
        let mut queues = QueueManager::new();
        queues.enqueue("ANIMALS", "a", "alice");
        queues.enqueue("FOODS", "a", "alice");
        queues.enqueue("FOODS", "b", "bob");

        queues.remove_all("a");

        assert!(!queues.is_queued("ANIMALS", "a"));
        assert!(!queues.is_queued("FOODS", "a"));
        assert!(queues.is_queued("FOODS", "b"));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut queues = QueueManager::new();
        queues.enqueue("ANIMALS", "a", "alice");

        assert_eq!(queues.peek("ANIMALS").unwrap().id, "a");
        assert_eq!(queues.waiting_count("ANIMALS"), 1);
    }
}
