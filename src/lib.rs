//! WordDuel Engine Library
//!
//! This crate provides the matchmaking and room engine for WordDuel, a
//! two-player, turn-based word-guessing duel.
//!
//! # Overview
//!
//! The engine module provides:
//!
//! - **Word Bank** - per-category fixed-length word lists with load-time
//!   normalization and random selection.
//!
//! - **Feedback Evaluation** - per-letter verdicts (correct / present /
//!   absent) with standard duplicate-letter accounting.
//!
//! - **Matchmaking** - per-category FIFO queues, shareable room codes,
//!   and an instant single-player mode against a bot.
//!
//! - **Room Management** - paired rooms with turn ownership, win
//!   detection, rematch negotiation, and disconnect teardown, indexed
//!   both by room code and by player.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - A guess out of turn, a
//!    join into a full room, or a rematch in an open round is rejected at
//!    the engine boundary.
//!
//! 2. **Managers provide indexed access** - Look up rooms by code or by
//!    occupant, queues by category, pending bot work by room.
//!
//! 3. **No networking** - This crate is pure state; the transport layer
//!    delivers named events in and carries named events out.
//!
//! 4. **Deterministic time** - Delayed work (bot guesses, idle-room
//!    reaping) is scheduler state driven by an explicit clock value, not
//!    background tasks.
//!
//! # Example
//!
//! ```rust
//! use wordduel_engine::engine::{ClientEvent, GameEngine, JoinGameRequest};
//!
//! let mut engine = GameEngine::new();
//!
//! // The first player waits in the category queue.
//! let waiting = engine.handle_event(
//!     "conn-1",
//!     ClientEvent::JoinGame(JoinGameRequest {
//!         category: "animals".to_string(),
//!         nickname: "alice".to_string(),
//!     }),
//! );
//! assert!(waiting.is_empty());
//!
//! // The second player completes the match: both seats get the reveal,
//! // their turn flag, and the nickname pairing.
//! let events = engine.handle_event(
//!     "conn-2",
//!     ClientEvent::JoinGame(JoinGameRequest {
//!         category: "ANIMALS".to_string(),
//!         nickname: "bob".to_string(),
//!     }),
//! );
//! assert_eq!(events.len(), 6);
//! ```

pub mod engine;

// Re-export everything from the engine module at crate root
pub use engine::*;
