//! Bot opponent scheduling.
//!
//! A bot's reply is not a background task. It is a pending entry with a
//! deadline, held here and drained by the engine's polling pass. The engine
//! re-validates the room when an entry comes due, so a deadline whose room
//! has since vanished degrades to a no-op; removing the entry outright is
//! only an optimization.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Pause before a bot answers, modeling thinking time.
pub const BOT_THINK_DELAY: Duration = Duration::from_millis(900);

/// Pending bot turns, one per room at most.
#[derive(Debug, Default)]
pub struct BotScheduler {
    /// Room code to the instant the bot should act.
    pending: HashMap<String, Instant>,
}

impl BotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the bot's next guess for a room. A newer deadline for the
    /// same room replaces the old one.
    pub fn schedule(&mut self, room_code: &str, due_at: Instant) {
        self.pending.insert(room_code.to_string(), due_at);
    }

    /// Drop a room's pending guess. Returns whether one existed.
    pub fn cancel(&mut self, room_code: &str) -> bool {
        self.pending.remove(room_code).is_some()
    }

    pub fn is_pending(&self, room_code: &str) -> bool {
        self.pending.contains_key(room_code)
    }

    /// Drain every room whose deadline has passed.
    pub fn drain_due(&mut self, now: Instant) -> Vec<String> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(code, _)| code.clone())
            .collect();
        for code in &due {
            self.pending.remove(code);
        }
        due
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
