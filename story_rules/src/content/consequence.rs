//! Consequence definitions - what happens after a decision is made.

use serde::{Deserialize, Serialize};

use crate::effects::{Effect, EffectSet};

/// Narration used when a consequence id is unknown.
pub const FALLBACK_CONSEQUENCE_TEXT: &str =
    "Your choice ripples outward, though its meaning remains unclear.";

/// Outcome text plus the effects applied when a consequence resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceDefinition {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

impl ConsequenceDefinition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Default definition for unknown consequences: fixed text, no effects.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CONSEQUENCE_TEXT)
    }

    pub fn is_fallback(&self) -> bool {
        self.text == FALLBACK_CONSEQUENCE_TEXT && self.effects.is_empty()
    }
}

/// Consequence as written in JSON content files, with object-shaped effects.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConsequenceRecord {
    pub text: String,
    #[serde(default)]
    pub effects: Option<EffectSet>,
}

impl From<ConsequenceRecord> for ConsequenceDefinition {
    fn from(record: ConsequenceRecord) -> Self {
        Self {
            text: record.text,
            effects: record
                .effects
                .map(EffectSet::into_effects)
                .unwrap_or_default(),
        }
    }
}
