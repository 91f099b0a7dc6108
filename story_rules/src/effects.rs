//! Consequence effects: the ways a resolved decision can mutate player state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single declared side effect of a consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Set a story flag (overwrites).
    SetFlag { name: String, value: bool },

    /// Shallow-merge `patch` into the node's state record.
    SetNodeState {
        node: String,
        patch: Map<String, Value>,
    },

    /// Add `delta` to sanity. The multiplier applies to Emotion Engine players only.
    ChangeSanity {
        delta: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        emotion_engine_multiplier: Option<f64>,
    },

    /// Set the current emotion. Ignored unless the player is an Emotion Engine.
    SetEmotion { value: String },

    /// Forwarded opaquely to the environment sink.
    TriggerWorldEvent { id: String },
}

/// Application phases. Effects are always applied in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectPhase {
    Flags,
    NodeStates,
    Sanity,
    Emotion,
    WorldEvent,
}

impl Effect {
    pub fn set_flag(name: impl Into<String>, value: bool) -> Self {
        Effect::SetFlag {
            name: name.into(),
            value,
        }
    }

    pub fn set_node_state(node: impl Into<String>, patch: Map<String, Value>) -> Self {
        Effect::SetNodeState {
            node: node.into(),
            patch,
        }
    }

    pub fn change_sanity(delta: i32) -> Self {
        Effect::ChangeSanity {
            delta,
            emotion_engine_multiplier: None,
        }
    }

    pub fn change_sanity_scaled(delta: i32, multiplier: f64) -> Self {
        Effect::ChangeSanity {
            delta,
            emotion_engine_multiplier: Some(multiplier),
        }
    }

    pub fn set_emotion(value: impl Into<String>) -> Self {
        Effect::SetEmotion {
            value: value.into(),
        }
    }

    pub fn trigger_world_event(id: impl Into<String>) -> Self {
        Effect::TriggerWorldEvent { id: id.into() }
    }

    pub fn phase(&self) -> EffectPhase {
        match self {
            Effect::SetFlag { .. } => EffectPhase::Flags,
            Effect::SetNodeState { .. } => EffectPhase::NodeStates,
            Effect::ChangeSanity { .. } => EffectPhase::Sanity,
            Effect::SetEmotion { .. } => EffectPhase::Emotion,
            Effect::TriggerWorldEvent { .. } => EffectPhase::WorldEvent,
        }
    }
}

/// Sort effects into application order, keeping declaration order within a phase.
pub fn in_application_order(effects: &[Effect]) -> Vec<&Effect> {
    let mut ordered: Vec<&Effect> = effects.iter().collect();
    ordered.sort_by_key(|e| e.phase());
    ordered
}

/// Object-shaped effect declaration as written in JSON content files.
///
/// Every key is optional; absent keys contribute nothing. Converted into the
/// ordered [`Effect`] list with [`EffectSet::into_effects`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectSet {
    pub set_flags: BTreeMap<String, bool>,
    pub set_node_states: BTreeMap<String, Map<String, Value>>,
    pub change_sanity: Option<i32>,
    pub emotion_engine_sanity_multiplier: Option<f64>,
    pub set_emotion: Option<String>,
    pub trigger_world_event: Option<String>,
}

impl EffectSet {
    /// Flatten into the ordered effect list. A multiplier without a base
    /// sanity delta is dropped.
    pub fn into_effects(self) -> Vec<Effect> {
        let mut effects = Vec::new();

        for (name, value) in self.set_flags {
            effects.push(Effect::SetFlag { name, value });
        }
        for (node, patch) in self.set_node_states {
            effects.push(Effect::SetNodeState { node, patch });
        }
        if let Some(delta) = self.change_sanity {
            effects.push(Effect::ChangeSanity {
                delta,
                emotion_engine_multiplier: self.emotion_engine_sanity_multiplier,
            });
        }
        if let Some(value) = self.set_emotion {
            effects.push(Effect::SetEmotion { value });
        }
        if let Some(id) = self.trigger_world_event {
            effects.push(Effect::TriggerWorldEvent { id });
        }

        effects
    }
}

/// What applying an effect did, for the caller to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    FlagSet { name: String, value: bool },
    NodeStateMerged { node: String },
    SanityChanged { applied_delta: i32, sanity: i32 },
    EmotionSet { value: String },
    /// Emotion change ignored for a non Emotion Engine player.
    EmotionIgnored,
    /// A world event the host environment should react to.
    WorldEventTriggered { id: String },
}
