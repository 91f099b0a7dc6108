//! Observer sinks: how the engine talks to the UI, the environment and
//! anything else that wants to react to the story.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use story_rules::Decision;

use crate::error::ObserverError;
use crate::story_log::LogEntry;

/// Presentation tag marking distorted ambient narration.
pub const GLITCH_EFFECT: &str = "glitch";

/// Text to narrate plus presentation tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryUpdate {
    pub text: String,
    pub effects: Vec<String>,
}

/// What triggered an environment change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentChangeKind {
    /// A consequence was resolved. Sent for every consequence.
    Consequence,
    /// A consequence declared a world event.
    WorldEvent,
}

/// Notification for the weather/lighting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentChange {
    #[serde(rename = "type")]
    pub kind: EnvironmentChangeKind,
    /// Consequence id, or world event id for [`EnvironmentChangeKind::WorldEvent`].
    pub consequence: String,
    /// 0.0 (calm) to 1.0 (unhinged), derived from the player's sanity.
    pub intensity: f64,
}

pub type ObserverResult = Result<(), ObserverError>;

/// Receiver of engine notifications. Every method defaults to a no-op.
///
/// Errors are logged by the engine and never interrupt the story.
pub trait StoryObserver {
    fn on_story_update(&mut self, _update: &StoryUpdate) -> ObserverResult {
        Ok(())
    }

    fn on_decision_required(&mut self, _decisions: &[Decision]) -> ObserverResult {
        Ok(())
    }

    fn on_environment_change(&mut self, _change: &EnvironmentChange) -> ObserverResult {
        Ok(())
    }

    fn on_log_entry(&mut self, _entry: &LogEntry) -> ObserverResult {
        Ok(())
    }
}

/// Everything a [`RecordingObserver`] has seen.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub updates: Vec<StoryUpdate>,
    pub decisions: Vec<Vec<Decision>>,
    pub environment: Vec<EnvironmentChange>,
    pub log_entries: Vec<LogEntry>,
}

/// Observer that keeps every notification. Clones share the same record, so
/// one clone can be handed to the engine and another inspected.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    recorded: Rc<RefCell<Recorded>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what has been recorded so far.
    pub fn recorded(&self) -> Recorded {
        self.recorded.borrow().clone()
    }

    pub fn update_texts(&self) -> Vec<String> {
        self.recorded
            .borrow()
            .updates
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn clear(&self) {
        *self.recorded.borrow_mut() = Recorded::default();
    }
}

impl StoryObserver for RecordingObserver {
    fn on_story_update(&mut self, update: &StoryUpdate) -> ObserverResult {
        self.recorded.borrow_mut().updates.push(update.clone());
        Ok(())
    }

    fn on_decision_required(&mut self, decisions: &[Decision]) -> ObserverResult {
        self.recorded.borrow_mut().decisions.push(decisions.to_vec());
        Ok(())
    }

    fn on_environment_change(&mut self, change: &EnvironmentChange) -> ObserverResult {
        self.recorded.borrow_mut().environment.push(change.clone());
        Ok(())
    }

    fn on_log_entry(&mut self, entry: &LogEntry) -> ObserverResult {
        self.recorded.borrow_mut().log_entries.push(entry.clone());
        Ok(())
    }
}
