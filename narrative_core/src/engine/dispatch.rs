//! Event dispatch: turn a world interaction into narration and decisions.

use tracing::debug;

use story_rules::{Archetype, Decision};

use super::{pick_text, StoryEngine};
use crate::story_log::LogEntryType;
use crate::text_effects::{archetype_flavor, corrupt, Corruption};

/// Event type of the main door puzzle.
pub const LOCKED_DOOR_EVENT: &str = "locked_door_main";

/// Flag that unlocks the main door.
pub const LOCKED_DOOR_FLAG: &str = "lever_alpha_pulled";

/// Narration while the main door is still locked.
pub const LOCKED_DOOR_TEXT: &str =
    "The door is locked. Somewhere in this place, a mechanism must control it.";

/// What a dispatched event produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// Final narration after every transform.
    pub text: String,
    /// Decisions offered; empty when the engine stayed idle.
    pub decisions: Vec<Decision>,
    pub corruption: Corruption,
}

/// Extra line logged for Silent Observers at certain nodes.
fn observer_insight(event_type: &str) -> Option<&'static str> {
    match event_type {
        "mirror" => Some("You notice your reflection blinks a fraction of a second after you do."),
        "tree" => Some("You notice the rings in the bark count backwards from the centre."),
        _ => None,
    }
}

impl StoryEngine {
    /// Resolve a world interaction into narration and, possibly, a pending
    /// choice.
    ///
    /// Unknown event types are ignored entirely and return `None`.
    pub fn trigger_event(&mut self, event_type: &str, title: &str) -> Option<EventOutcome> {
        let Some(template) = self.content.get(event_type) else {
            debug!(event_type, "no template for event, ignoring");
            return None;
        };

        let mut text = pick_text(template, self.rng.as_mut());
        let effects = template.effects.clone();
        let mut decisions = template.decisions_for(&self.player);

        let corruption = if event_type == LOCKED_DOOR_EVENT && !self.player.flag(LOCKED_DOOR_FLAG) {
            text = LOCKED_DOOR_TEXT.to_string();
            decisions.clear();
            Corruption::Untouched
        } else {
            for injection in &self.injections {
                if injection.applies_to(event_type, &self.player) {
                    injection.apply(&mut text, &mut decisions);
                }
            }

            text = archetype_flavor(&text, self.player.archetype);

            let (corrupted, corruption) =
                corrupt(&text, self.player.sanity, &self.config, self.rng.as_mut());
            text = corrupted;
            corruption
        };

        self.update_story(text.clone(), effects);
        self.log_event(format!("Interacted with: {}", title), LogEntryType::Event);

        if self.player.archetype == Archetype::SilentObserver {
            if let Some(insight) = observer_insight(event_type) {
                self.log_event(insight, LogEntryType::ObserverInsight);
            }
        }

        if !decisions.is_empty() {
            decisions = decisions
                .into_iter()
                .map(|decision| decision.with_context(event_type))
                .collect();
            self.offer_decisions(decisions.clone());
        }

        self.player.record_event(event_type);

        Some(EventOutcome {
            text,
            decisions,
            corruption,
        })
    }

    fn offer_decisions(&mut self, decisions: Vec<Decision>) {
        self.available_decisions = decisions;
        self.waiting_for_decision = true;
        self.epoch += 1;
        self.cancel_pending_consequences();
        debug!(count = self.available_decisions.len(), epoch = self.epoch, "awaiting choice");

        let offered = self.available_decisions.clone();
        super::notify_all(&mut self.observers, "decision", |o| {
            o.on_decision_required(&offered)
        });

        if self.player.archetype == Archetype::GoldenMaskedOracle
            && self.rng.chance(self.config.oracle_glimpse_chance)
        {
            let glimpse = &offered[self.rng.next_index(offered.len())];
            self.log_event(
                format!(
                    "The mask flickers. You glimpse a path: \"{}\" leads to {}.",
                    glimpse.text, glimpse.consequence
                ),
                LogEntryType::OracleGlimpse,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::observer::RecordingObserver;
    use crate::random::ScriptedRandom;
    use story_rules::{NarrativeContentStore, PlayerState};

    fn engine(archetype: Archetype, values: Vec<f64>) -> (StoryEngine, RecordingObserver) {
        let mut player = PlayerState::new("Tester");
        player.archetype = archetype;
        let mut engine = StoryEngine::with_random_source(
            player,
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
            Box::new(ScriptedRandom::new(values)),
        );
        let recorder = RecordingObserver::new();
        engine.add_observer(recorder.clone());
        (engine, recorder)
    }

    #[test]
    fn test_unknown_event_is_complete_noop() {
        let (mut engine, recorder) = engine(Archetype::Undefined, vec![]);

        assert!(engine.trigger_event("placeholder_statue", "Statue").is_none());
        assert!(engine.log().is_empty());
        assert!(engine.player().events.is_empty());
        assert!(recorder.recorded().updates.is_empty());
        assert!(!engine.is_waiting_for_decision());
    }

    #[test]
    fn test_text_variant_is_picked_by_rng() {
        let (mut engine, _) = engine(Archetype::Undefined, vec![ScriptedRandom::index(1, 2)]);

        let outcome = engine.trigger_event("clock", "Clock").unwrap();
        assert_eq!(outcome.text, "The clock's hands point to an hour that does not exist.");
    }

    #[test]
    fn test_decisions_tagged_with_context() {
        let (mut engine, recorder) = engine(Archetype::Undefined, vec![]);

        engine.trigger_event("tree", "Old Tree");
        let offered = engine.available_decisions();
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].context.as_deref(), Some("tree"));
        assert_eq!(recorder.recorded().decisions.len(), 1);
    }

    #[test]
    fn test_event_logged_and_recorded() {
        let (mut engine, _) = engine(Archetype::Undefined, vec![]);

        engine.trigger_event("tree", "Old Tree");
        assert_eq!(engine.log().entries()[0].content, "Interacted with: Old Tree");
        assert_eq!(engine.player().events, vec!["tree".to_string()]);
    }

    #[test]
    fn test_silent_observer_insight() {
        let (mut engine, _) = engine(Archetype::SilentObserver, vec![ScriptedRandom::index(0, 2)]);

        engine.trigger_event("mirror", "Mirror");
        assert_eq!(engine.log().count_of(LogEntryType::ObserverInsight), 1);

        engine.trigger_event("window", "Window");
        assert_eq!(engine.log().count_of(LogEntryType::ObserverInsight), 1);
    }

    #[test]
    fn test_archetype_flavor_applied() {
        let (mut engine, _) = engine(Archetype::AgentOfChaos, vec![]);

        let outcome = engine.trigger_event("tree", "Old Tree").unwrap();
        assert_eq!(
            outcome.text,
            archetype_flavor(
                &NarrativeContentStore::builtin().get("tree").unwrap().text.clone().unwrap(),
                Archetype::AgentOfChaos
            )
        );
    }

    #[test]
    fn test_oracle_glimpse_when_pinned() {
        // clock text variant, glimpse roll, glimpse index
        let (mut engine, _) = engine(
            Archetype::GoldenMaskedOracle,
            vec![ScriptedRandom::index(0, 2), 0.1, ScriptedRandom::index(1, 2)],
        );

        engine.trigger_event("clock", "Clock");
        let glimpse = engine.log().of_type(LogEntryType::OracleGlimpse).next().unwrap();
        assert!(glimpse.content.contains("stop_clock"));
        // Gameplay is unchanged
        assert_eq!(engine.available_decisions().len(), 2);
    }

    #[test]
    fn test_oracle_glimpse_roll_fails() {
        let (mut engine, _) = engine(
            Archetype::GoldenMaskedOracle,
            vec![ScriptedRandom::index(0, 2), 0.3],
        );

        engine.trigger_event("clock", "Clock");
        assert_eq!(engine.log().count_of(LogEntryType::OracleGlimpse), 0);
    }

    #[test]
    fn test_low_sanity_phrase_corruption() {
        let (mut engine, _) = engine(Archetype::Undefined, vec![0.5, ScriptedRandom::index(0, 4)]);
        engine.player_mut().sanity = 20;

        let outcome = engine.trigger_event("tree", "Old Tree").unwrap();
        assert_eq!(outcome.corruption, Corruption::PhraseAppended);
        assert!(outcome
            .text
            .ends_with(crate::text_effects::UNSETTLING_PHRASES[0]));
    }

    #[test]
    fn test_locked_door_opens_after_lever() {
        let (mut engine, _) = engine(Archetype::Undefined, vec![]);
        engine.player_mut().set_flag(LOCKED_DOOR_FLAG, true);

        let outcome = engine.trigger_event(LOCKED_DOOR_EVENT, "Main Door").unwrap();
        assert_ne!(outcome.text, LOCKED_DOOR_TEXT);
        assert_eq!(outcome.decisions.len(), 1);
        assert_eq!(outcome.decisions[0].consequence, "open_main_door");
    }
}
