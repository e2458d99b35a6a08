//! Matchmaking and room engine for WordDuel.
//!
//! This module provides the core state types and managers:
//!
//! - `words` - per-category word bank with load-time normalization
//! - `feedback` - guess evaluation (per-letter verdicts)
//! - `queue` - per-category matchmaking queues
//! - `room` - room state machine and registry with reverse index
//! - `bot` - delayed bot guesses as polled scheduler state
//! - `rematch` - pending rematch proposals
//! - `events` - the transport boundary types
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           GameEngine                             │
//! │                                                                  │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────────────┐  │
//! │  │ QueueManager │  │  RoomRegistry  │  │ RematchTracker       │  │
//! │  │              │  │                │  │   requester → code   │  │
//! │  │ category →   │  │ code → Room    │  ├──────────────────────┤  │
//! │  │   FIFO of    │  │                │  │ BotScheduler         │  │
//! │  │   waiting    │  │ player id →    │  │   code → deadline    │  │
//! │  │   players    │  │   code         │  ├──────────────────────┤  │
//! │  │              │  │                │  │ WordBank             │  │
//! │  │              │  │                │  │   category → words   │  │
//! │  └──────────────┘  └────────────────┘  └──────────────────────┘  │
//! │                                                                  │
//! │  inbound: join_game, join_game_with_code, play_vs_bot, guess,    │
//! │           rematch_request, rematch_response, disconnect          │
//! │  outbound: Vec<OutboundEvent>, never addressed to a bot seat     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All mutation flows through `&mut GameEngine`, so the notifications
//! describing one transition — the secret reveal, both turn flags, both
//! nickname pairings — always leave as a single bundle before any later
//! guess can be processed. An embedder that introduces threads or tasks
//! must keep serializing access to the engine (one lock, or one actor)
//! to preserve that guarantee. The bot's delayed reply is scheduler state
//! drained by [`GameEngine::tick`], never a background task.

pub mod bot;
pub mod events;
pub mod feedback;
pub mod queue;
pub mod rematch;
pub mod room;
pub mod words;

// Re-export commonly used types
pub use bot::{BotScheduler, BOT_THINK_DELAY};
pub use events::{
    ClientEvent, GuessRequest, JoinGameRequest, JoinWithCodeRequest, OutboundEvent, ServerEvent,
    RESULT_LOST, RESULT_WON,
};
pub use feedback::{evaluate, LetterVerdict};
pub use queue::{QueueManager, WaitingEntry};
pub use rematch::RematchTracker;
pub use room::{
    Room, RoomError, RoomRegistry, RoomStatus, Seat, BOT_NICKNAME, FINISHED_ROOM_TTL, ROOM_SEATS,
};
pub use words::{WordBank, WORD_LENGTH};

use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use serde_json::Value;

/// Length of generated room codes.
const ROOM_CODE_LEN: usize = 5;

const ROOM_CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Short shareable token. Collisions are not re-checked; the token space
/// is large against the number of simultaneously live rooms.
fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| *ROOM_CODE_CHARSET.choose(&mut rng).unwrap_or(&b'a') as char)
        .collect()
}

/// The notification bundle that opens a round: secret reveal, turn flags,
/// nickname pairing, in seat order. Bot seats are skipped.
fn round_start_events(room: &Room) -> Vec<OutboundEvent> {
    let mut events = Vec::new();
    let mut push = |seat: &Seat, event: ServerEvent| {
        if !seat.is_bot {
            events.push(OutboundEvent {
                to: seat.id.clone(),
                event,
            });
        }
    };

    for seat in room.seats() {
        push(
            seat,
            ServerEvent::MatchFound {
                secret: room.secret().to_string(),
            },
        );
    }
    for (i, seat) in room.seats().iter().enumerate() {
        push(seat, ServerEvent::YourTurn(i == room.turn_index()));
    }
    for seat in room.seats() {
        if let Some(opponent) = room.opponent_of(&seat.id) {
            push(
                seat,
                ServerEvent::NicknameInfo {
                    own: seat.nickname.clone(),
                    opponent: opponent.nickname.clone(),
                },
            );
        }
    }
    events
}

/// The engine's owned state: word bank, queues, rooms, rematch proposals,
/// pending bot work.
///
/// Construct once at startup and thread a `&mut` reference through the
/// transport's event loop; there is no interior locking and no singleton.
#[derive(Debug)]
pub struct GameEngine {
    pub words: WordBank,
    pub queues: QueueManager,
    pub rooms: RoomRegistry,
    rematches: RematchTracker,
    bots: BotScheduler,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Engine with the built-in word categories.
    pub fn new() -> Self {
        Self::with_word_bank(WordBank::with_defaults())
    }

    /// Engine with a custom word bank.
    pub fn with_word_bank(words: WordBank) -> Self {
        Self {
            words,
            queues: QueueManager::new(),
            rooms: RoomRegistry::new(),
            rematches: RematchTracker::new(),
            bots: BotScheduler::new(),
        }
    }

    /// Route a raw named event from the transport. Malformed payloads are
    /// dropped without a reply.
    pub fn handle_raw(&mut self, conn_id: &str, name: &str, payload: &Value) -> Vec<OutboundEvent> {
        match ClientEvent::parse(name, payload) {
            Some(event) => self.handle_event(conn_id, event),
            None => {
                debug!("dropping malformed {name:?} from {conn_id}");
                Vec::new()
            }
        }
    }

    /// Route a typed event.
    pub fn handle_event(&mut self, conn_id: &str, event: ClientEvent) -> Vec<OutboundEvent> {
        match event {
            ClientEvent::JoinGame(req) => self.join_game(conn_id, req),
            ClientEvent::JoinGameWithCode(req) => self.join_with_code(conn_id, req),
            ClientEvent::PlayVsBot(req) => self.play_vs_bot(conn_id, req),
            ClientEvent::Guess(req) => self.guess(conn_id, req),
            ClientEvent::RematchRequest => self.rematch_request(conn_id),
            ClientEvent::RematchResponse(answer) => self.rematch_response(conn_id, &answer),
            ClientEvent::Disconnect => self.disconnect(conn_id),
        }
    }

    /// Queue-based matchmaking: pair with the longest-waiting player in
    /// the category, or start waiting.
    pub fn join_game(&mut self, conn_id: &str, req: JoinGameRequest) -> Vec<OutboundEvent> {
        let Some(category) = self.playable_category(&req.category, &req.nickname) else {
            debug!("join_game from {conn_id} dropped: unusable category or nickname");
            return Vec::new();
        };
        if self.rooms.room_code_for(conn_id).is_some() {
            debug!("join_game from {conn_id} dropped: already seated");
            return Vec::new();
        }

        let nickname = req.nickname.trim().to_string();
        if self.queues.is_queued(&category, conn_id) {
            debug!("{nickname} is already waiting in {category}");
            return Vec::new();
        }
        // A stale self-entry at the head would pair the player with
        // themselves; leave everything untouched instead.
        if self.queues.peek(&category).map_or(false, |e| e.id == conn_id) {
            return Vec::new();
        }
        self.queues.remove_all(conn_id);

        if self.queues.waiting_count(&category) == 0 {
            self.queues.enqueue(&category, conn_id, &nickname);
            info!("{nickname} queued for {category}");
            return Vec::new();
        }

        let Some(secret) = self.words.pick(&category).map(str::to_string) else {
            return Vec::new();
        };
        let Some(opponent) = self.queues.pop_front(&category) else {
            return Vec::new();
        };

        let code = generate_room_code();
        let room = Room::paired(
            code.clone(),
            category.clone(),
            secret,
            Seat::human(&opponent.id, &opponent.nickname),
            Seat::human(conn_id, &nickname),
        );
        info!(
            "matched {} vs {nickname} in room {code} ({category})",
            opponent.nickname
        );
        let events = round_start_events(&room);
        self.rooms.add(room);
        events
    }

    /// Code-based matchmaking: first joiner opens the room, the second
    /// fills it, anyone later is turned away.
    pub fn join_with_code(&mut self, conn_id: &str, req: JoinWithCodeRequest) -> Vec<OutboundEvent> {
        let code = req.room_code.trim().to_string();
        if code.is_empty() {
            return Vec::new();
        }
        let Some(category) = self.playable_category(&req.category, &req.nickname) else {
            debug!("join_game_with_code from {conn_id} dropped: unusable category or nickname");
            return Vec::new();
        };
        // Re-join of a room you already occupy is a no-op.
        if self.rooms.get(&code).map_or(false, |r| r.has_player(conn_id)) {
            return Vec::new();
        }
        if self.rooms.room_code_for(conn_id).is_some() {
            debug!("join_game_with_code from {conn_id} dropped: already seated elsewhere");
            return Vec::new();
        }

        let nickname = req.nickname.trim().to_string();
        self.queues.remove_all(conn_id);

        let existing = self.rooms.get(&code).map(|r| (r.category.clone(), r.is_full()));
        match existing {
            None => {
                let Some(secret) = self.words.pick(&category).map(str::to_string) else {
                    return Vec::new();
                };
                let room = Room::waiting(
                    code.clone(),
                    category.clone(),
                    secret,
                    Seat::human(conn_id, &nickname),
                );
                info!("{nickname} opened room {code} ({category})");
                self.rooms.add(room);
                Vec::new()
            }
            Some((room_category, _)) if room_category != category => {
                debug!("join for room {code} dropped: category mismatch");
                Vec::new()
            }
            Some((_, true)) => vec![OutboundEvent {
                to: conn_id.to_string(),
                event: ServerEvent::Error(RoomError::Full.to_string()),
            }],
            Some((_, false)) => {
                match self.rooms.fill_seat(&code, Seat::human(conn_id, &nickname)) {
                    Ok(()) => {
                        info!("{nickname} filled room {code}");
                        self.rooms
                            .get(&code)
                            .map(round_start_events)
                            .unwrap_or_default()
                    }
                    Err(RoomError::Full) => vec![OutboundEvent {
                        to: conn_id.to_string(),
                        event: ServerEvent::Error(RoomError::Full.to_string()),
                    }],
                    Err(_) => Vec::new(),
                }
            }
        }
    }

    /// Single-player mode: a full room against a bot, playable at once.
    pub fn play_vs_bot(&mut self, conn_id: &str, req: JoinGameRequest) -> Vec<OutboundEvent> {
        let Some(category) = self.playable_category(&req.category, &req.nickname) else {
            debug!("play_vs_bot from {conn_id} dropped: unusable category or nickname");
            return Vec::new();
        };
        if self.rooms.room_code_for(conn_id).is_some() {
            debug!("play_vs_bot from {conn_id} dropped: already seated");
            return Vec::new();
        }
        self.queues.remove_all(conn_id);

        let Some(secret) = self.words.pick(&category).map(str::to_string) else {
            return Vec::new();
        };
        let nickname = req.nickname.trim().to_string();
        let code = generate_room_code();
        let room = Room::paired(
            code.clone(),
            category.clone(),
            secret,
            Seat::human(conn_id, &nickname),
            Seat::bot(&code),
        );
        info!("{nickname} opened bot room {code} ({category})");
        let events = round_start_events(&room);
        self.rooms.add(room);
        events
    }

    /// A guess from a connection. The room comes from the explicit code
    /// when given, otherwise from the sender's own seat.
    pub fn guess(&mut self, conn_id: &str, req: GuessRequest) -> Vec<OutboundEvent> {
        let explicit = req
            .room_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);
        let code = match explicit {
            Some(code) => code,
            None => match self.rooms.room_code_for(conn_id) {
                Some(code) => code.to_string(),
                None => return Vec::new(),
            },
        };
        self.apply_guess(&code, conn_id, &req.guess)
    }

    /// Shared guess path for humans and the bot.
    fn apply_guess(&mut self, code: &str, sender: &str, raw_guess: &str) -> Vec<OutboundEvent> {
        let guess = raw_guess.trim().to_lowercase();
        if !words::is_valid_shape(&guess) {
            debug!("guess from {sender} dropped: not {WORD_LENGTH} letters");
            return Vec::new();
        }
        let Some(room) = self.rooms.get_mut(code) else {
            return Vec::new();
        };
        if !room.status.is_active() || !room.is_full() {
            return Vec::new();
        }
        if !room.is_turn_of(sender) {
            debug!("guess from {sender} dropped: not their turn");
            return Vec::new();
        }

        let verdicts = feedback::evaluate(&guess, room.secret());
        let mut events = Vec::new();
        for seat in room.seats().iter().filter(|s| !s.is_bot) {
            events.push(OutboundEvent {
                to: seat.id.clone(),
                event: ServerEvent::OpponentGuess {
                    guess: guess.clone(),
                    feedback: verdicts.clone(),
                },
            });
        }

        if guess == room.secret() {
            let winner_index = room.turn_index();
            for (i, seat) in room.seats().iter().enumerate() {
                if seat.is_bot {
                    continue;
                }
                let message = if i == winner_index { RESULT_WON } else { RESULT_LOST };
                events.push(OutboundEvent {
                    to: seat.id.clone(),
                    event: ServerEvent::GameResult(message.to_string()),
                });
            }
            room.finish(Instant::now());
            let winner = room
                .seat(winner_index)
                .map(|s| s.nickname.clone())
                .unwrap_or_default();
            info!("room {code} decided: {winner} guessed the word");
            self.bots.cancel(code);
            return events;
        }

        room.flip_turn();
        for (i, seat) in room.seats().iter().enumerate() {
            if seat.is_bot {
                continue;
            }
            events.push(OutboundEvent {
                to: seat.id.clone(),
                event: ServerEvent::YourTurn(i == room.turn_index()),
            });
        }
        if room.current_seat().map_or(false, |s| s.is_bot) {
            self.bots.schedule(code, Instant::now() + BOT_THINK_DELAY);
        }
        events
    }

    /// Propose a rematch in a finished room. Against a bot the room just
    /// restarts; against a human the proposal is forwarded.
    pub fn rematch_request(&mut self, conn_id: &str) -> Vec<OutboundEvent> {
        let Some(code) = self.rooms.room_code_for(conn_id).map(str::to_string) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get(&code) else {
            return Vec::new();
        };
        if !room.status.is_finished() {
            debug!("rematch request from {conn_id} dropped: round still open");
            return Vec::new();
        }
        let Some(opponent) = room.opponent_of(conn_id).cloned() else {
            return Vec::new();
        };

        if opponent.is_bot {
            return self.reset_room(&code);
        }

        self.rematches.record(conn_id, &code);
        vec![OutboundEvent {
            to: opponent.id,
            event: ServerEvent::RematchRequest,
        }]
    }

    /// Answer an opponent's rematch proposal. The proposal is consumed
    /// whatever the answer; only an exact "yes" restarts the room.
    pub fn rematch_response(&mut self, conn_id: &str, answer: &str) -> Vec<OutboundEvent> {
        let Some(code) = self.rooms.room_code_for(conn_id).map(str::to_string) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get(&code) else {
            return Vec::new();
        };
        let Some(requester) = room.opponent_of(conn_id).cloned() else {
            return Vec::new();
        };
        if !self.rematches.take(&requester.id, &code) {
            debug!("rematch response from {conn_id} dropped: nothing pending");
            return Vec::new();
        }

        let mut events = vec![OutboundEvent {
            to: requester.id,
            event: ServerEvent::RematchResponse(answer.to_string()),
        }];
        if answer == "yes" {
            events.extend(self.reset_room(&code));
        } else {
            info!("rematch declined in room {code}");
        }
        events
    }

    /// Tear down everything tied to a connection: queue entries, pending
    /// proposals, and the room it occupies.
    pub fn disconnect(&mut self, conn_id: &str) -> Vec<OutboundEvent> {
        self.queues.remove_all(conn_id);
        self.rematches.remove_requester(conn_id);

        let Some(room) = self.rooms.remove_for_player(conn_id) else {
            info!("{conn_id} disconnected");
            return Vec::new();
        };
        self.bots.cancel(&room.code);
        self.rematches.remove_room(&room.code);
        info!("{conn_id} disconnected, closing room {}", room.code);

        room.opponent_of(conn_id)
            .filter(|seat| !seat.is_bot)
            .map(|seat| {
                vec![OutboundEvent {
                    to: seat.id.clone(),
                    event: ServerEvent::OpponentLeft,
                }]
            })
            .unwrap_or_default()
    }

    /// Drive time-based work: due bot guesses and the finished-room reap.
    /// The transport layer calls this on its own cadence.
    pub fn tick(&mut self, now: Instant) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        for code in self.bots.drain_due(now) {
            events.extend(self.bot_guess(&code));
        }
        for room in self.rooms.reap_finished(FINISHED_ROOM_TTL, now) {
            self.rematches.remove_room(&room.code);
            info!("reaped idle room {}", room.code);
        }
        events
    }

    /// A due bot turn. The room may have changed or vanished since the
    /// deadline was set, so every precondition is re-checked before
    /// acting; any failure degrades to a no-op.
    fn bot_guess(&mut self, code: &str) -> Vec<OutboundEvent> {
        let Some(room) = self.rooms.get(code) else {
            return Vec::new();
        };
        if !room.status.is_active() {
            return Vec::new();
        }
        let Some(seat) = room.current_seat() else {
            return Vec::new();
        };
        if !seat.is_bot {
            return Vec::new();
        }
        let bot_id = seat.id.clone();
        let Some(word) = self.words.pick(&room.category).map(str::to_string) else {
            return Vec::new();
        };
        self.apply_guess(code, &bot_id, &word)
    }

    /// Fresh round in an existing room: new secret from the room's fixed
    /// category, turn back to seat 0, the round-start bundle re-sent.
    fn reset_room(&mut self, code: &str) -> Vec<OutboundEvent> {
        let Some(room) = self.rooms.get_mut(code) else {
            return Vec::new();
        };
        let Some(secret) = self.words.pick(&room.category).map(str::to_string) else {
            return Vec::new();
        };
        room.reset(secret);
        info!("room {code} restarted with a fresh word");
        round_start_events(room)
    }

    /// Canonical category key, provided the join-request fields pass the
    /// input checks and the category can supply a word.
    fn playable_category(&self, category: &str, nickname: &str) -> Option<String> {
        let category = category.trim();
        if category.is_empty() || nickname.trim().is_empty() {
            return None;
        }
        let key = category.to_uppercase();
        if self.words.has_playable(&key) {
            Some(key)
        } else {
            None
        }
    }
}
