//! # Narrative Core
//!
//! The consequence engine behind an interactive narrative. This crate drives
//! the story over the data model in `story_rules`: it turns world interactions
//! into narration and decisions, applies the effects of a chosen decision, and
//! keeps an adaptive narrator that comments on how the player behaves.
//!
//! ## Core Components
//!
//! - **engine**: The story state machine, event dispatch and consequence resolution
//! - **narrator**: Mood, memory and voice of the narrator
//! - **scheduler**: Virtual-time deferred narration with epoch cancellation
//! - **observer**: Sinks for narration, decisions, environment changes and log entries
//! - **export**: Session snapshot and end-of-story analysis
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Every branch is decided by the player state and the content table
//! - **Host-Driven**: The engine never spawns threads or reads the clock for pacing; the host calls `tick`
//! - **Deterministic on demand**: All randomness flows through [`RandomSource`], so tests can pin it

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod narrator;
pub mod observer;
pub mod random;
pub mod scheduler;
pub mod story_log;
pub mod text_effects;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use export::*;
pub use narrator::*;
pub use observer::*;
pub use random::*;
pub use scheduler::*;
pub use story_log::*;
pub use text_effects::*;
