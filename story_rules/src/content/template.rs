//! Narrative templates and the decisions they offer.

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::player_state::PlayerState;

/// Both an archetype and an emotion must match for the decision to be offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCondition {
    pub archetype: Archetype,
    pub emotion: String,
}

/// A choice offered to the player after an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub text: String,

    /// Consequence id resolved when this decision is chosen.
    pub consequence: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype_condition: Option<Archetype>,

    /// Story flag that must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_flag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_condition: Option<EmotionCondition>,

    /// Event type that offered this decision. Filled in at dispatch time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Decision {
    /// Create an unconditional decision.
    pub fn new(text: impl Into<String>, consequence: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            consequence: consequence.into(),
            archetype_condition: None,
            condition_flag: None,
            emotion_condition: None,
            context: None,
        }
    }

    /// Only offer to players of this archetype.
    pub fn for_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype_condition = Some(archetype);
        self
    }

    /// Only offer once the flag is set.
    pub fn requires_flag(mut self, flag: impl Into<String>) -> Self {
        self.condition_flag = Some(flag.into());
        self
    }

    /// Only offer when both archetype and current emotion match.
    pub fn requires_emotion(mut self, archetype: Archetype, emotion: impl Into<String>) -> Self {
        self.emotion_condition = Some(EmotionCondition {
            archetype,
            emotion: emotion.into(),
        });
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Check every declared condition against the player. Undeclared
    /// conditions always pass.
    pub fn is_available_to(&self, player: &PlayerState) -> bool {
        let archetype_ok = self
            .archetype_condition
            .map_or(true, |required| required == player.archetype);

        let flag_ok = self
            .condition_flag
            .as_deref()
            .map_or(true, |flag| player.flag(flag));

        let emotion_ok = self.emotion_condition.as_ref().map_or(true, |cond| {
            cond.archetype == player.archetype
                && player.current_emotion.as_deref() == Some(cond.emotion.as_str())
        });

        archetype_ok && flag_ok && emotion_ok
    }
}

/// Story text and decisions attached to an event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NarrativeTemplate {
    /// Single fixed text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Variants, one picked at random. Takes precedence over `text`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<Decision>,

    /// Presentation tags passed through to the narration sink.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
}

impl NarrativeTemplate {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_variants<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn decision(mut self, decision: Decision) -> Self {
        self.decisions.push(decision);
        self
    }

    pub fn effect(mut self, tag: impl Into<String>) -> Self {
        self.effects.push(tag.into());
        self
    }

    pub fn has_text(&self) -> bool {
        !self.texts.is_empty() || self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Fresh copy of the decisions this template offers to `player`.
    pub fn decisions_for(&self, player: &PlayerState) -> Vec<Decision> {
        self.decisions
            .iter()
            .filter(|d| d.is_available_to(player))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconditional_decision_always_available() {
        let player = PlayerState::default();
        assert!(Decision::new("Look", "look").is_available_to(&player));
    }

    #[test]
    fn test_archetype_condition() {
        let decision = Decision::new("Break it", "break_clock").for_archetype(Archetype::AgentOfChaos);

        let mut player = PlayerState::default();
        player.archetype = Archetype::SilentObserver;
        assert!(!decision.is_available_to(&player));

        player.archetype = Archetype::AgentOfChaos;
        assert!(decision.is_available_to(&player));
    }

    #[test]
    fn test_flag_condition() {
        let decision = Decision::new("Step through", "step_through").requires_flag("mirrorAltered");

        let mut player = PlayerState::default();
        assert!(!decision.is_available_to(&player));

        player.set_flag("mirrorAltered", false);
        assert!(!decision.is_available_to(&player));

        player.set_flag("mirrorAltered", true);
        assert!(decision.is_available_to(&player));
    }

    #[test]
    fn test_emotion_condition_needs_archetype_and_emotion() {
        let decision = Decision::new("Let it sing", "geode_sing")
            .requires_emotion(Archetype::EmotionEngine, "joy");

        let mut player = PlayerState::default();
        player.current_emotion = Some("joy".to_string());
        assert!(!decision.is_available_to(&player));

        player.archetype = Archetype::EmotionEngine;
        assert!(decision.is_available_to(&player));

        player.current_emotion = Some("grief".to_string());
        assert!(!decision.is_available_to(&player));
    }

    #[test]
    fn test_all_conditions_must_pass() {
        let decision = Decision::new("Rewrite the hour", "rewrite_hour")
            .for_archetype(Archetype::AgentOfChaos)
            .requires_flag("clockStopped");

        let mut player = PlayerState::default();
        player.archetype = Archetype::AgentOfChaos;
        assert!(!decision.is_available_to(&player));

        player.set_flag("clockStopped", true);
        assert!(decision.is_available_to(&player));
    }

    #[test]
    fn test_decisions_for_does_not_touch_template() {
        let template = NarrativeTemplate::with_text("A clock.")
            .decision(Decision::new("Wind it", "wind_clock"))
            .decision(Decision::new("Break it", "break_clock").for_archetype(Archetype::AgentOfChaos));

        let mut offered = template.decisions_for(&PlayerState::default());
        assert_eq!(offered.len(), 1);

        offered[0].context = Some("clock".to_string());
        assert!(template.decisions[0].context.is_none());
    }

    #[test]
    fn test_decision_json_shape() {
        let decision: Decision = serde_json::from_str(
            r#"{"text":"Smash","consequence":"smash","archetypeCondition":"Agent of Chaos"}"#,
        )
        .unwrap();
        assert_eq!(decision.archetype_condition, Some(Archetype::AgentOfChaos));
        assert!(decision.condition_flag.is_none());
    }
}
