//! # Story Rules
//!
//! The data side of the consequence engine: archetypes, player state, effect
//! declarations and the narrative content table. This crate is the single
//! source of truth for story state and contains no engine logic.

pub mod archetype;
pub mod content;
pub mod effects;
pub mod error;
pub mod player_state;

pub use archetype::*;
pub use content::*;
pub use effects::*;
pub use error::*;
pub use player_state::*;
