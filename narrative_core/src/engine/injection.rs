//! Flag-triggered content injection: narration for an event grows extra text
//! and choices once a story flag is set.

use story_rules::{Decision, PlayerState};

/// Prepends text and appends a decision to an event while a flag is set.
///
/// Rules stack without interfering: a decision is only added if no decision
/// with the same consequence id is already on offer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentInjection {
    pub event_type: String,
    pub flag: String,
    pub prefix: String,
    pub decision: Decision,
}

impl ContentInjection {
    pub fn new(
        event_type: impl Into<String>,
        flag: impl Into<String>,
        prefix: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            flag: flag.into(),
            prefix: prefix.into(),
            decision,
        }
    }

    pub fn applies_to(&self, event_type: &str, player: &PlayerState) -> bool {
        self.event_type == event_type && player.flag(&self.flag)
    }

    pub fn apply(&self, text: &mut String, decisions: &mut Vec<Decision>) {
        if !self.prefix.is_empty() {
            text.insert_str(0, &self.prefix);
        }

        let already_offered = decisions
            .iter()
            .any(|d| d.consequence == self.decision.consequence);
        if !already_offered {
            decisions.push(self.decision.clone());
        }
    }
}

/// Rules shipped with the built-in story.
pub fn builtin_injections() -> Vec<ContentInjection> {
    vec![ContentInjection::new(
        "tree",
        "mirrorAltered",
        "The bark shimmers like the surface of the mirror you changed. ",
        Decision::new("Touch the rippling bark", "tree_mirror_touch"),
    )]
}
