//! Player state - the single mutable record of a playthrough.

mod behavior;

pub use behavior::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::archetype::Archetype;
use crate::effects::{in_application_order, Effect, EffectOutcome};

/// Starting sanity for a fresh playthrough.
pub const INITIAL_SANITY: i32 = 100;

/// Per-node state record. Values are arbitrary JSON.
pub type NodeState = Map<String, Value>;

/// The complete state of the player at any point in the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub name: String,

    /// In-game day, starting at 1.
    pub day: u32,

    pub archetype: Archetype,

    /// Intended range 0-100; arithmetic is not clamped.
    pub sanity: i32,

    /// Only ever set for Emotion Engine players.
    pub current_emotion: Option<String>,

    pub narrator_relationship: i32,

    pub behavior_profile: BehaviorProfile,

    /// Narrative switches. An absent key reads as false.
    pub story_flags: HashMap<String, bool>,

    /// Per-node sub-state, merged on update.
    pub node_states: HashMap<String, NodeState>,

    /// Append-only interaction history of event types.
    pub events: Vec<String>,

    pub autoplay: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("Wanderer")
    }
}

impl PlayerState {
    /// Create a fresh player state with default values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            day: 1,
            archetype: Archetype::Undefined,
            sanity: INITIAL_SANITY,
            current_emotion: None,
            narrator_relationship: 0,
            behavior_profile: BehaviorProfile::default(),
            story_flags: HashMap::new(),
            node_states: HashMap::new(),
            events: Vec::new(),
            autoplay: false,
        }
    }

    /// Read a story flag.
    pub fn flag(&self, name: &str) -> bool {
        self.story_flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.story_flags.insert(name.into(), value);
    }

    pub fn node_state(&self, node: &str) -> Option<&NodeState> {
        self.node_states.get(node)
    }

    /// Shallow-merge `patch` into the node's record, creating it if absent.
    pub fn merge_node_state(&mut self, node: impl Into<String>, patch: NodeState) {
        let state = self.node_states.entry(node.into()).or_default();
        for (key, value) in patch {
            state.insert(key, value);
        }
    }

    pub fn record_event(&mut self, event_type: impl Into<String>) {
        self.events.push(event_type.into());
    }

    /// Record a classified behaviour and shift the narrator relationship.
    pub fn record_behavior(&mut self, behavior: BehaviorTrait) {
        self.behavior_profile.increment(behavior);
        self.narrator_relationship += behavior.relationship_shift();
    }

    pub fn is_emotion_engine(&self) -> bool {
        self.archetype == Archetype::EmotionEngine
    }

    /// Apply one effect.
    pub fn apply_effect(&mut self, effect: &Effect) -> EffectOutcome {
        match effect {
            Effect::SetFlag { name, value } => {
                self.set_flag(name.clone(), *value);
                EffectOutcome::FlagSet {
                    name: name.clone(),
                    value: *value,
                }
            }
            Effect::SetNodeState { node, patch } => {
                self.merge_node_state(node.clone(), patch.clone());
                EffectOutcome::NodeStateMerged { node: node.clone() }
            }
            Effect::ChangeSanity {
                delta,
                emotion_engine_multiplier,
            } => {
                let applied_delta = match emotion_engine_multiplier {
                    Some(multiplier) if self.is_emotion_engine() => {
                        (*delta as f64 * multiplier).round() as i32
                    }
                    _ => *delta,
                };
                self.sanity = self.sanity.saturating_add(applied_delta);
                EffectOutcome::SanityChanged {
                    applied_delta,
                    sanity: self.sanity,
                }
            }
            Effect::SetEmotion { value } => {
                if self.is_emotion_engine() {
                    self.current_emotion = Some(value.clone());
                    EffectOutcome::EmotionSet {
                        value: value.clone(),
                    }
                } else {
                    EffectOutcome::EmotionIgnored
                }
            }
            Effect::TriggerWorldEvent { id } => {
                EffectOutcome::WorldEventTriggered { id: id.clone() }
            }
        }
    }

    /// Apply a list of effects in phase order: flags, node states, sanity,
    /// emotion, world events.
    pub fn apply_effects(&mut self, effects: &[Effect]) -> Vec<EffectOutcome> {
        in_application_order(effects)
            .into_iter()
            .map(|effect| self.apply_effect(effect))
            .collect()
    }

    /// Advance to the next in-game day.
    pub fn advance_day(&mut self) -> u32 {
        self.day += 1;
        self.day
    }
}
