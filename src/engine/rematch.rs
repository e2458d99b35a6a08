//! Rematch negotiation state.

use std::collections::HashMap;

/// Pending rematch proposals, requester id to room code.
///
/// An entry lives from the request until the counterpart's response has
/// been processed, and is removed no matter what the answer was.
#[derive(Debug, Default)]
pub struct RematchTracker {
    pending: HashMap<String, String>,
}

impl RematchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a proposal. A repeat from the same requester replaces it.
    pub fn record(&mut self, requester: &str, room_code: &str) {
        self.pending
            .insert(requester.to_string(), room_code.to_string());
    }

    /// Room a requester has proposed a rematch for.
    pub fn pending_room(&self, requester: &str) -> Option<&str> {
        self.pending.get(requester).map(|code| code.as_str())
    }

    /// Consume the proposal made by `requester` for `room_code`. Returns
    /// whether one was there to consume.
    pub fn take(&mut self, requester: &str, room_code: &str) -> bool {
        if self.pending.get(requester).map(String::as_str) == Some(room_code) {
            self.pending.remove(requester);
            true
        } else {
            false
        }
    }

    /// Drop any proposal made by this player.
    pub fn remove_requester(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// Drop every proposal pointing at a room.
    pub fn remove_room(&mut self, room_code: &str) {
        self.pending.retain(|_, code| code != room_code);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
