//! Consequence resolution: apply a chosen decision's effects and schedule its
//! narration.

use serde_json::{Map, Value};
use tracing::debug;

use story_rules::{Archetype, Effect, EffectOutcome};

use super::{DeferredNarration, StoryEngine};
use crate::observer::{EnvironmentChange, EnvironmentChangeKind};
use crate::story_log::LogEntryType;

impl StoryEngine {
    /// Choose one of the offered decisions. Inert (returns false) unless a
    /// choice is pending and `index` is in range.
    pub fn make_decision(&mut self, index: usize) -> bool {
        if !self.waiting_for_decision {
            debug!(index, "make_decision ignored, nothing pending");
            return false;
        }
        let Some(decision) = self.available_decisions.get(index).cloned() else {
            debug!(index, offered = self.available_decisions.len(), "make_decision index out of range");
            return false;
        };

        self.log_event(format!("Chose: {}", decision.text), LogEntryType::Decision);

        let context = decision.context.unwrap_or_default();
        self.process_consequence(&decision.consequence, &context);

        self.waiting_for_decision = false;
        self.available_decisions.clear();

        self.observe_behavior(&decision.consequence, &context);
        true
    }

    /// Apply a consequence's effects now and schedule its narration.
    ///
    /// The environment sink hears about the consequence immediately; the text
    /// follows after the configured delay unless a new choice is offered first.
    pub fn process_consequence(&mut self, consequence: &str, context: &str) {
        let mut definition = self.content.consequence_or_default(consequence);

        if consequence == "geode_touch" && self.player.archetype == Archetype::EmotionEngine {
            let emotion = self
                .player
                .current_emotion
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null);
            let mut patch = Map::new();
            patch.insert("lastTouchedEmotion".to_string(), emotion);
            definition.effects.push(Effect::set_node_state("geode", patch));
        }

        debug!(consequence, context, effects = definition.effects.len(), "resolving consequence");

        for outcome in self.player.apply_effects(&definition.effects) {
            if let EffectOutcome::WorldEventTriggered { id } = outcome {
                self.notify_environment(EnvironmentChangeKind::WorldEvent, id);
            }
        }

        let delay = self.config.consequence_delay();
        let task = self.schedule_narration(
            delay,
            DeferredNarration::Consequence {
                consequence: consequence.to_string(),
                text: definition.text,
            },
        );
        self.pending_consequences.push(task);

        self.notify_environment(EnvironmentChangeKind::Consequence, consequence.to_string());
    }

    fn notify_environment(&mut self, kind: EnvironmentChangeKind, consequence: String) {
        let change = EnvironmentChange {
            kind,
            consequence,
            intensity: self.environment_intensity(),
        };
        super::notify_all(&mut self.observers, "environment", |o| {
            o.on_environment_change(&change)
        });
    }

    /// Feed a resolved decision to the behaviour profile and the narrator.
    fn observe_behavior(&mut self, consequence: &str, context: &str) {
        let behavior = self.narrator.update_memory(consequence, context, &self.player);
        self.player.record_behavior(behavior);

        self.narrator.update_personality_drift(behavior);
        self.narrator.update_narrative_style();
        self.narrator
            .update_mood(self.player.narrator_relationship, &self.player.behavior_profile);
    }
}
