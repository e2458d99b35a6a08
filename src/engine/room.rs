//! Room state and registry.
//!
//! A room holds one round of the duel: two seats, the secret word, and the
//! turn marker. The registry owns every live room and a reverse index from
//! player id to room code, which is what enforces "one room per player".

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::json;

/// Seats per room.
pub const ROOM_SEATS: usize = 2;

/// Display name used for bot seats.
pub const BOT_NICKNAME: &str = "Bot";

/// How long a finished room with no accepted rematch stays resident
/// before the reap removes it.
pub const FINISHED_ROOM_TTL: Duration = Duration::from_secs(300);

/// One occupant of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// Connection id, or a synthesized id for bot seats.
    pub id: String,

    /// Display name.
    pub nickname: String,

    /// Bot seats never receive outbound events.
    pub is_bot: bool,
}

impl Seat {
    pub fn human(id: &str, nickname: &str) -> Self {
        Self {
            id: id.to_string(),
            nickname: nickname.to_string(),
            is_bot: false,
        }
    }

    /// Synthetic opponent seat. Its id is derived from the room code so a
    /// room and its bot can never drift apart.
    pub fn bot(room_code: &str) -> Self {
        Self {
            id: format!("bot:{room_code}"),
            nickname: BOT_NICKNAME.to_string(),
            is_bot: true,
        }
    }
}

/// Room lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    /// One seat taken, waiting for the second (code-join flow).
    #[default]
    WaitingForOpponent,
    /// Both seats taken, a round is live.
    Active,
    /// A win was declared; awaiting rematch decision or teardown.
    Finished,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingForOpponent => "waiting_for_opponent",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }

    /// Whether the room can accept guesses.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the round has been decided.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Room errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    Full,
    AlreadySeated,
    NotFound,
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "Room is full"),
            Self::AlreadySeated => write!(f, "Already seated in this room"),
            Self::NotFound => write!(f, "No such room"),
        }
    }
}

impl std::error::Error for RoomError {}

/// A paired (or vs-bot, or half-filled) game session keyed by a short code.
#[derive(Debug, Clone)]
pub struct Room {
    /// Short shareable code, also the registry key.
    pub code: String,

    /// Uppercase category key the secret is drawn from.
    pub category: String,

    /// The round's target word.
    secret: String,

    /// Index into `seats` of whoever may guess right now.
    turn_index: usize,

    /// Seat 0 is the host/first joiner, seat 1 the guest.
    seats: Vec<Seat>,

    /// Lifecycle state.
    pub status: RoomStatus,

    /// When the room was created.
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// When the current round was decided, if it has been.
    finished_at: Option<Instant>,
}

impl Room {
    /// Room opened by a code-join, holding only its first seat.
    pub fn waiting(code: String, category: String, secret: String, host: Seat) -> Self {
        Self {
            code,
            category,
            secret,
            turn_index: 0,
            seats: vec![host],
            status: RoomStatus::WaitingForOpponent,
            created_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    /// Room created with both seats filled; play starts immediately with
    /// the turn on seat 0.
    pub fn paired(code: String, category: String, secret: String, host: Seat, guest: Seat) -> Self {
        Self {
            code,
            category,
            secret,
            turn_index: 0,
            seats: vec![host, guest],
            status: RoomStatus::Active,
            created_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    /// Seat a second player. The room goes live once full.
    pub fn add_seat(&mut self, seat: Seat) -> Result<(), RoomError> {
        if self.seats.len() >= ROOM_SEATS {
            return Err(RoomError::Full);
        }
        if self.seats.iter().any(|s| s.id == seat.id) {
            return Err(RoomError::AlreadySeated);
        }
        self.seats.push(seat);
        if self.seats.len() == ROOM_SEATS {
            self.status = RoomStatus::Active;
        }
        Ok(())
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, index: usize) -> Option<&Seat> {
        self.seats.get(index)
    }

    /// Seat index of a player, if seated here.
    pub fn seat_of(&self, id: &str) -> Option<usize> {
        self.seats.iter().position(|s| s.id == id)
    }

    pub fn has_player(&self, id: &str) -> bool {
        self.seat_of(id).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= ROOM_SEATS
    }

    /// Seat currently holding the turn.
    pub fn current_seat(&self) -> Option<&Seat> {
        self.seats.get(self.turn_index)
    }

    /// The other seat, relative to a seated player.
    pub fn opponent_of(&self, id: &str) -> Option<&Seat> {
        let index = self.seat_of(id)?;
        self.seats.get(1 - index)
    }

    /// Whether `id` may act right now.
    pub fn is_turn_of(&self, id: &str) -> bool {
        self.status.is_active() && self.current_seat().map_or(false, |s| s.id == id)
    }

    /// Hand the turn to the other seat.
    pub fn flip_turn(&mut self) {
        self.turn_index = 1 - self.turn_index;
    }

    /// Declare the current round decided. The turn marker stays where it
    /// is; no further guesses are accepted.
    pub fn finish(&mut self, now: Instant) {
        self.status = RoomStatus::Finished;
        self.finished_at = Some(now);
    }

    /// Start a fresh round with a new secret. The turn returns to seat 0.
    pub fn reset(&mut self, secret: String) {
        self.secret = secret;
        self.turn_index = 0;
        self.status = RoomStatus::Active;
        self.finished_at = None;
    }

    /// Whether the room has sat finished for at least `ttl`.
    pub fn finished_longer_than(&self, ttl: Duration, now: Instant) -> bool {
        self.finished_at
            .map_or(false, |at| now.saturating_duration_since(at) >= ttl)
    }

    /// Snapshot for debugging or an admin surface. The secret stays out.
    pub fn to_json(&self) -> serde_json::Value {
        let players: Vec<serde_json::Value> = self
            .seats
            .iter()
            .map(|s| json!({ "nickname": s.nickname, "is_bot": s.is_bot }))
            .collect();

        json!({
            "room_code": self.code,
            "category": self.category,
            "status": self.status.as_str(),
            "turn_index": self.turn_index,
            "players": players,
        })
    }
}

/// Room registry: all live rooms plus the player-to-room reverse index.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,

    /// Player id to room code.
    player_index: HashMap<String, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a room, indexing its current seats.
    pub fn add(&mut self, room: Room) {
        for seat in room.seats() {
            self.player_index.insert(seat.id.clone(), room.code.clone());
        }
        self.rooms.insert(room.code.clone(), room);
    }

    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Code of the room a player occupies.
    pub fn room_code_for(&self, player_id: &str) -> Option<&str> {
        self.player_index.get(player_id).map(|code| code.as_str())
    }

    pub fn get_for_player(&self, player_id: &str) -> Option<&Room> {
        self.player_index
            .get(player_id)
            .and_then(|code| self.rooms.get(code))
    }

    pub fn get_for_player_mut(&mut self, player_id: &str) -> Option<&mut Room> {
        let code = self.player_index.get(player_id)?.clone();
        self.rooms.get_mut(&code)
    }

    /// Seat a player in an existing room, keeping the reverse index in
    /// step.
    pub fn fill_seat(&mut self, code: &str, seat: Seat) -> Result<(), RoomError> {
        let room = self.rooms.get_mut(code).ok_or(RoomError::NotFound)?;
        let id = seat.id.clone();
        room.add_seat(seat)?;
        self.player_index.insert(id, code.to_string());
        Ok(())
    }

    /// Remove a room and its index entries.
    pub fn remove(&mut self, code: &str) -> Option<Room> {
        let room = self.rooms.remove(code)?;
        for seat in room.seats() {
            self.player_index.remove(&seat.id);
        }
        Some(room)
    }

    /// Remove the room a player occupies, if any.
    pub fn remove_for_player(&mut self, player_id: &str) -> Option<Room> {
        let code = self.player_index.get(player_id)?.clone();
        self.remove(&code)
    }

    /// Remove every room that has sat finished for at least `ttl`,
    /// returning them.
    pub fn reap_finished(&mut self, ttl: Duration, now: Instant) -> Vec<Room> {
        let expired: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.finished_longer_than(ttl, now))
            .map(|room| room.code.clone())
            .collect();

        expired.iter().filter_map(|code| self.remove(code)).collect()
    }

    pub fn count(&self) -> usize {
        self.rooms.len()
    }

    pub fn active_count(&self) -> usize {
        self.rooms.values().filter(|r| r.status.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired_room(code: &str) -> Room {
        Room::paired(
            code.to_string(),
            "ANIMALS".to_string(),
            "tiger".to_string(),
            Seat::human("a", "alice"),
            Seat::human("b", "bob"),
        )
    }

    #[test]
    fn test_waiting_room_goes_live_when_filled() {
        let mut room = Room::waiting(
            "code1".to_string(),
            "ANIMALS".to_string(),
            "tiger".to_string(),
            Seat::human("a", "alice"),
        );
        assert_eq!(room.status, RoomStatus::WaitingForOpponent);
        assert!(!room.is_full());

        room.add_seat(Seat::human("b", "bob")).unwrap();
        assert_eq!(room.status, RoomStatus::Active);
        assert!(room.is_full());
    }

    #[test]
    fn test_add_seat_rejections() {
        let mut room = paired_room("code1");
        assert_eq!(
            room.add_seat(Seat::human("c", "carol")),
            Err(RoomError::Full)
        );

        let mut half = Room::waiting(
            "code2".to_string(),
            "ANIMALS".to_string(),
            "tiger".to_string(),
            Seat::human("a", "alice"),
        );
        assert_eq!(
            half.add_seat(Seat::human("a", "alice")),
            Err(RoomError::AlreadySeated)
        );
    }

    #[test]
    fn test_turn_ownership_and_flip() {
        let mut room = paired_room("code1");
        assert!(room.is_turn_of("a"));
        assert!(!room.is_turn_of("b"));

        room.flip_turn();
        assert!(room.is_turn_of("b"));
        assert!(!room.is_turn_of("a"));

        room.flip_turn();
        assert!(room.is_turn_of("a"));
    }

    #[test]
    fn test_finish_keeps_turn_and_blocks_acting() {
        let mut room = paired_room("code1");
        room.finish(Instant::now());

        assert!(room.status.is_finished());
        assert_eq!(room.turn_index(), 0);
        // Nobody may act in a finished room.
        assert!(!room.is_turn_of("a"));
        assert!(!room.is_turn_of("b"));
    }

    #[test]
    fn test_reset_starts_a_fresh_round() {
        let mut room = paired_room("code1");
        room.flip_turn();
        room.finish(Instant::now());

        room.reset("zebra".to_string());

        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.turn_index(), 0);
        assert_eq!(room.secret(), "zebra");
        assert!(!room.finished_longer_than(Duration::ZERO, Instant::now()));
    }

    #[test]
    fn test_opponent_lookup() {
        let room = paired_room("code1");
        assert_eq!(room.opponent_of("a").unwrap().id, "b");
        assert_eq!(room.opponent_of("b").unwrap().id, "a");
        assert!(room.opponent_of("c").is_none());

        let half = Room::waiting(
            "code2".to_string(),
            "ANIMALS".to_string(),
            "tiger".to_string(),
            Seat::human("a", "alice"),
        );
        assert!(half.opponent_of("a").is_none());
    }

    #[test]
    fn test_registry_indexes_players() {
        let mut registry = RoomRegistry::new();
        registry.add(paired_room("code1"));

        assert_eq!(registry.room_code_for("a"), Some("code1"));
        assert_eq!(registry.room_code_for("b"), Some("code1"));
        assert_eq!(registry.get_for_player("a").unwrap().code, "code1");
    }

    #[test]
    fn test_registry_fill_seat_updates_index() {
        let mut registry = RoomRegistry::new();
        registry.add(Room::waiting(
            "code1".to_string(),
            "ANIMALS".to_string(),
            "tiger".to_string(),
            Seat::human("a", "alice"),
        ));
        assert_eq!(registry.room_code_for("b"), None);

        registry.fill_seat("code1", Seat::human("b", "bob")).unwrap();
        assert_eq!(registry.room_code_for("b"), Some("code1"));

        assert_eq!(
            registry.fill_seat("code1", Seat::human("c", "carol")),
            Err(RoomError::Full)
        );
        assert_eq!(
            registry.fill_seat("nope", Seat::human("c", "carol")),
            Err(RoomError::NotFound)
        );
    }

    #[test]
    fn test_registry_remove_cleans_index() {
        let mut registry = RoomRegistry::new();
        registry.add(paired_room("code1"));

        let removed = registry.remove_for_player("a").unwrap();
        assert_eq!(removed.code, "code1");
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.room_code_for("a"), None);
        assert_eq!(registry.room_code_for("b"), None);
    }

    #[test]
    fn test_reap_finished_rooms() {
        let mut registry = RoomRegistry::new();
        registry.add(paired_room("done"));
        registry.add(Room::paired(
            "live".to_string(),
            "ANIMALS".to_string(),
            "zebra".to_string(),
            Seat::human("c", "carol"),
            Seat::human("d", "dave"),
        ));
        let started = Instant::now();
        registry.get_mut("done").unwrap().finish(started);

        let reaped = registry.reap_finished(FINISHED_ROOM_TTL, started + FINISHED_ROOM_TTL);
        assert_eq!(reaped.len(), 1);
        assert_eq!(reaped[0].code, "done");
        assert_eq!(registry.count(), 1);
        assert!(registry.get("live").is_some());
    }

    #[test]
    fn test_bot_seat_identity() {
        let seat = Seat::bot("code1");
        assert!(seat.is_bot);
        assert_eq!(seat.id, "bot:code1");
        assert_eq!(seat.nickname, BOT_NICKNAME);
    }

    #[test]
    fn test_to_json_snapshot() {
        let room = paired_room("code1");
        let json = room.to_json();
        assert_eq!(json["room_code"], "code1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["turn_index"], 0);
        assert_eq!(json["players"][1]["nickname"], "bob");
        // The secret never appears in snapshots.
        assert!(json.get("secret").is_none());
    }
}
