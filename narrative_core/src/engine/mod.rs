//! Story engine - the state machine that owns the player and drives the
//! decision lifecycle.
//!
//! ```text
//! Idle --trigger_event (decisions offered)--> AwaitingChoice
//! AwaitingChoice --make_decision (valid index)--> Idle
//! Idle --advance--> Idle (schedules an ambient event)
//! ```
//!
//! Deferred narration is scheduled against the current epoch. The epoch moves
//! every time a choice is offered, so anything scheduled before that point is
//! dropped silently when it comes due. Pending consequence narration is also
//! cancelled outright at that point.

mod dispatch;
mod injection;
mod resolve;

pub use dispatch::*;
pub use injection::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use story_rules::{
    Archetype, Decision, NarrativeContentStore, NarrativeTemplate, PlayerState, BEGINNING_EVENT,
};

use crate::config::EngineConfig;
use crate::narrator::NarratorPersonality;
use crate::observer::{ObserverResult, StoryObserver, StoryUpdate, GLITCH_EFFECT};
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TaskId};
use crate::story_log::{LogEntry, LogEntryType, StoryLog};

/// Narration used when the content has no `beginning` template.
pub const DEFAULT_BEGINNING_TEXT: &str =
    "You open your eyes. The room has been waiting for you, and it is not patient.";

/// Ambient flavour delivered by [`StoryEngine::advance`].
pub const AMBIENT_EVENTS: [&str; 6] = [
    "The lights flicker, just for a moment.",
    "You hear footsteps that are not your own.",
    "A door closes somewhere far away.",
    "The air tastes faintly of static.",
    "For a second, the floor feels like it is tilting.",
    "Someone whispers your name, then thinks better of it.",
];

/// Where the decision lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryState {
    Idle,
    AwaitingChoice,
}

/// Narration waiting on the scheduler.
#[derive(Debug, Clone, PartialEq)]
enum DeferredNarration {
    Ambient { text: String },
    Consequence { consequence: String, text: String },
}

/// The narrative state machine.
pub struct StoryEngine {
    config: EngineConfig,
    content: NarrativeContentStore,
    player: PlayerState,
    narrator: NarratorPersonality,
    log: StoryLog,
    observers: Vec<Box<dyn StoryObserver>>,
    rng: Box<dyn RandomSource>,
    scheduler: Scheduler<DeferredNarration>,
    /// Consequence narrations not yet delivered or cancelled.
    pending_consequences: Vec<TaskId>,
    injections: Vec<ContentInjection>,
    available_decisions: Vec<Decision>,
    waiting_for_decision: bool,
    epoch: u64,
    session_id: Uuid,
}

impl StoryEngine {
    /// Create an engine over the given content, seeded from OS entropy.
    pub fn new(player: PlayerState, content: NarrativeContentStore, config: EngineConfig) -> Self {
        Self::with_random_source(player, content, config, Box::new(StdRng::from_entropy()))
    }

    /// Create an engine with a reproducible random sequence.
    pub fn with_seed(
        player: PlayerState,
        content: NarrativeContentStore,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        Self::with_random_source(player, content, config, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_random_source(
        player: PlayerState,
        content: NarrativeContentStore,
        config: EngineConfig,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            narrator: NarratorPersonality::new(config.narrator.clone()),
            config,
            content,
            player,
            log: StoryLog::new(),
            observers: Vec::new(),
            rng,
            scheduler: Scheduler::new(),
            pending_consequences: Vec::new(),
            injections: builtin_injections(),
            available_decisions: Vec::new(),
            waiting_for_decision: false,
            epoch: 0,
            session_id: Uuid::new_v4(),
        }
    }

    /// Engine over the built-in story with default configuration.
    pub fn builtin(player_name: impl Into<String>) -> Self {
        Self::new(
            PlayerState::new(player_name),
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
        )
    }

    /// Register an observer. Every observer receives every notification.
    pub fn add_observer(&mut self, observer: impl StoryObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Register an additional flag-triggered content rule.
    pub fn add_injection(&mut self, injection: ContentInjection) {
        self.injections.push(injection);
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Direct access for hosts restoring a session or scripting tests.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn narrator(&self) -> &NarratorPersonality {
        &self.narrator
    }

    pub fn log(&self) -> &StoryLog {
        &self.log
    }

    pub fn content(&self) -> &NarrativeContentStore {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> StoryState {
        if self.waiting_for_decision {
            StoryState::AwaitingChoice
        } else {
            StoryState::Idle
        }
    }

    pub fn is_waiting_for_decision(&self) -> bool {
        self.waiting_for_decision
    }

    pub fn available_decisions(&self) -> &[Decision] {
        &self.available_decisions
    }

    /// Number of pending deferred narrations.
    pub fn pending_narrations(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Virtual time until the next deferred narration comes due.
    pub fn next_narration_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    /// Virtual time elapsed through [`Self::tick`].
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Append to the story log and notify observers. Observer failures are
    /// logged and ignored.
    pub fn log_event(&mut self, content: impl Into<String>, entry_type: LogEntryType) {
        let entry = LogEntry {
            content: content.into(),
            entry_type,
            timestamp: chrono::Utc::now(),
            day: self.player.day,
            sanity: self.player.sanity,
        };

        notify_all(&mut self.observers, "log", |o| o.on_log_entry(&entry));
        self.log.push(entry);
    }

    /// Hand narration to observers. A no-op when none are registered.
    pub fn update_story(&mut self, text: impl Into<String>, effects: Vec<String>) {
        let update = StoryUpdate {
            text: text.into(),
            effects,
        };
        notify_all(&mut self.observers, "narration", |o| o.on_story_update(&update));
    }

    pub fn set_player_archetype(&mut self, archetype: Archetype) {
        info!(%archetype, "player archetype set");
        self.player.archetype = archetype;
        self.log_event(format!("Archetype chosen: {}", archetype), LogEntryType::System);
    }

    /// Narrate the opening. Falls back to a default text when the content has
    /// no beginning.
    pub fn begin_story(&mut self) {
        let (text, effects) = match self.content.get(BEGINNING_EVENT) {
            Some(template) => (
                pick_text(template, self.rng.as_mut()),
                template.effects.clone(),
            ),
            None => {
                warn!("no beginning template, using default narration");
                (DEFAULT_BEGINNING_TEXT.to_string(), Vec::new())
            }
        };

        info!(session = %self.session_id, player = %self.player.name, "story started");
        self.update_story(text.clone(), effects);
        self.log_event(text, LogEntryType::System);
    }

    pub fn can_advance(&self) -> bool {
        !self.waiting_for_decision
    }

    /// Schedule a random ambient event. Ignored while a choice is pending.
    /// Returns whether anything was scheduled.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            debug!("advance ignored while awaiting a decision");
            return false;
        }

        let text = AMBIENT_EVENTS[self.rng.next_index(AMBIENT_EVENTS.len())].to_string();
        let delay_ms = self
            .rng
            .range_inclusive(self.config.ambient_delay_min_ms, self.config.ambient_delay_max_ms);

        debug!(delay_ms, "ambient event scheduled");
        self.scheduler.schedule(
            Duration::from_millis(delay_ms),
            self.epoch,
            DeferredNarration::Ambient { text },
        );
        true
    }

    /// Move virtual time forward and deliver whatever has come due.
    /// Returns the number of narrations delivered.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let mut delivered = 0;

        for task in self.scheduler.advance(elapsed) {
            self.pending_consequences.retain(|id| *id != task.id);
            if task.epoch != self.epoch || self.waiting_for_decision {
                debug!(narration = ?task.task, epoch = task.epoch, "dropping stale narration");
                continue;
            }

            match task.task {
                DeferredNarration::Ambient { text } => {
                    self.update_story(text.clone(), vec![GLITCH_EFFECT.to_string()]);
                    self.log_event(text, LogEntryType::Random);
                }
                DeferredNarration::Consequence { consequence, text } => {
                    debug!(%consequence, "delivering consequence narration");
                    self.update_story(text.clone(), Vec::new());
                    self.log_event(text, LogEntryType::Consequence);
                }
            }
            delivered += 1;
        }

        delivered
    }

    /// Move to the next in-game day.
    pub fn advance_day(&mut self) {
        let day = self.player.advance_day();
        self.log_event(format!("Day {} begins.", day), LogEntryType::System);
    }

    /// Ask the narrator to comment on a consequence. The line is logged and
    /// returned.
    pub fn narrator_response(&mut self, consequence: &str) -> String {
        let line = self.narrator.respond(consequence, self.rng.as_mut());
        self.log_event(line.clone(), LogEntryType::Narrator);
        line
    }

    fn schedule_narration(&mut self, delay: Duration, narration: DeferredNarration) -> TaskId {
        self.scheduler.schedule(delay, self.epoch, narration)
    }

    /// Drop consequence narration that has not been delivered yet.
    fn cancel_pending_consequences(&mut self) {
        for id in self.pending_consequences.drain(..) {
            if self.scheduler.cancel(id) {
                debug!(?id, "cancelled consequence narration");
            }
        }
    }

    /// Sanity mapped to 0.0 (stable) .. 1.0 (gone).
    fn environment_intensity(&self) -> f64 {
        ((100.0 - self.player.sanity as f64) / 100.0).clamp(0.0, 1.0)
    }
}

/// Pick a template's text: a random variant if any, else the fixed text.
pub(crate) fn pick_text(template: &NarrativeTemplate, rng: &mut dyn RandomSource) -> String {
    if !template.texts.is_empty() {
        template.texts[rng.next_index(template.texts.len())].clone()
    } else {
        template.text.clone().unwrap_or_default()
    }
}

fn notify_all<F>(observers: &mut [Box<dyn StoryObserver>], channel: &'static str, mut notify: F)
where
    F: FnMut(&mut dyn StoryObserver) -> ObserverResult,
{
    for observer in observers.iter_mut() {
        if let Err(e) = notify(observer.as_mut()) {
            warn!(channel, error = %e, "observer failed, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;
    use crate::observer::RecordingObserver;
    use crate::random::ScriptedRandom;

    struct FailingObserver;

    impl StoryObserver for FailingObserver {
        fn on_story_update(&mut self, _update: &StoryUpdate) -> ObserverResult {
            Err(ObserverError::Rejected("renderer offline".to_string()))
        }

        fn on_log_entry(&mut self, _entry: &LogEntry) -> ObserverResult {
            Err(ObserverError::Rejected("log panel closed".to_string()))
        }
    }

    fn engine(values: Vec<f64>) -> (StoryEngine, RecordingObserver) {
        let mut engine = StoryEngine::with_random_source(
            PlayerState::new("Tester"),
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
            Box::new(ScriptedRandom::new(values)),
        );
        let recorder = RecordingObserver::new();
        engine.add_observer(recorder.clone());
        (engine, recorder)
    }

    #[test]
    fn test_begin_story_uses_template() {
        let (mut engine, recorder) = engine(vec![]);
        engine.begin_story();

        let texts = recorder.update_texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("You wake in a room"));
        assert_eq!(engine.log().len(), 1);
        assert_eq!(engine.log().entries()[0].entry_type, LogEntryType::System);
    }

    #[test]
    fn test_begin_story_falls_back_without_template() {
        let mut engine = StoryEngine::with_seed(
            PlayerState::default(),
            NarrativeContentStore::new(),
            EngineConfig::default(),
            1,
        );
        let recorder = RecordingObserver::new();
        engine.add_observer(recorder.clone());

        engine.begin_story();
        assert_eq!(recorder.update_texts(), vec![DEFAULT_BEGINNING_TEXT.to_string()]);
    }

    #[test]
    fn test_update_story_without_observers_is_noop() {
        let mut engine = StoryEngine::with_seed(
            PlayerState::default(),
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
            1,
        );
        engine.update_story("nobody is listening", Vec::new());
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_failing_observer_does_not_stop_story() {
        let (mut engine, recorder) = engine(vec![]);
        engine.add_observer(FailingObserver);

        engine.begin_story();
        engine.log_event("still logging", LogEntryType::Event);

        assert_eq!(engine.log().len(), 2);
        assert_eq!(recorder.recorded().log_entries.len(), 2);
    }

    #[test]
    fn test_failing_observer_does_not_stop_deferred_delivery() {
        // ambient text index, then delay roll at the bottom of the range
        let (mut engine, recorder) = engine(vec![ScriptedRandom::index(1, 6), 0.0]);
        engine.add_observer(FailingObserver);

        engine.trigger_event("tree", "Old Tree");
        assert!(engine.make_decision(0));
        assert_eq!(engine.tick(Duration::from_millis(1000)), 1);
        assert_eq!(engine.log().last().unwrap().entry_type, LogEntryType::Consequence);

        assert!(engine.advance());
        assert_eq!(engine.tick(Duration::from_millis(2000)), 1);
        let last = engine.log().last().unwrap();
        assert_eq!(last.entry_type, LogEntryType::Random);
        assert_eq!(last.content, AMBIENT_EVENTS[1]);
        assert_eq!(recorder.update_texts().last().map(String::as_str), Some(AMBIENT_EVENTS[1]));
    }

    #[test]
    fn test_next_narration_in_tracks_scheduler() {
        let (mut engine, _) = engine(vec![ScriptedRandom::index(0, 6), 0.0]);
        assert_eq!(engine.next_narration_in(), None);

        engine.advance();
        assert_eq!(engine.next_narration_in(), Some(Duration::from_millis(2000)));
        engine.tick(Duration::from_millis(500));
        assert_eq!(engine.next_narration_in(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_log_entry_snapshots_player() {
        let (mut engine, _) = engine(vec![]);
        engine.player_mut().sanity = 63;
        engine.advance_day();

        let entry = engine.log().last().unwrap();
        assert_eq!(entry.day, 2);
        assert_eq!(entry.sanity, 63);
        assert_eq!(entry.content, "Day 2 begins.");
    }

    #[test]
    fn test_set_archetype_logs_system_event() {
        let (mut engine, _) = engine(vec![]);
        engine.set_player_archetype(Archetype::GoldenMaskedOracle);

        assert_eq!(engine.player().archetype, Archetype::GoldenMaskedOracle);
        let entry = engine.log().last().unwrap();
        assert_eq!(entry.entry_type, LogEntryType::System);
        assert!(entry.content.contains("Golden Masked Oracle"));
    }

    #[test]
    fn test_advance_delivers_glitch_after_delay() {
        // ambient text index, then delay roll at the bottom of the range
        let (mut engine, recorder) = engine(vec![ScriptedRandom::index(2, 6), 0.0]);

        assert!(engine.advance());
        assert_eq!(engine.pending_narrations(), 1);

        assert_eq!(engine.tick(Duration::from_millis(1999)), 0);
        assert_eq!(engine.tick(Duration::from_millis(1)), 1);

        let recorded = recorder.recorded();
        assert_eq!(recorded.updates[0].text, AMBIENT_EVENTS[2]);
        assert_eq!(recorded.updates[0].effects, vec![GLITCH_EFFECT.to_string()]);
        assert_eq!(engine.log().last().unwrap().entry_type, LogEntryType::Random);
    }

    #[test]
    fn test_ambient_delay_stays_in_range() {
        let mut engine = StoryEngine::with_seed(
            PlayerState::default(),
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
            99,
        );

        for _ in 0..20 {
            assert!(engine.advance());
        }
        assert_eq!(engine.tick(Duration::from_millis(1999)), 0);
        assert_eq!(engine.tick(Duration::from_millis(3001)), 20);
    }

    #[test]
    fn test_advance_blocked_while_awaiting_choice() {
        let (mut engine, _) = engine(vec![]);
        engine.trigger_event("tree", "Old Tree");

        assert!(!engine.can_advance());
        assert!(!engine.advance());
        assert_eq!(engine.pending_narrations(), 0);
    }

    #[test]
    fn test_ambient_event_cancelled_by_decision() {
        let (mut engine, recorder) = engine(vec![ScriptedRandom::index(0, 6), 0.5]);

        assert!(engine.advance());
        engine.trigger_event("tree", "Old Tree");
        recorder.clear();

        assert_eq!(engine.tick(Duration::from_secs(10)), 0);
        assert!(recorder.recorded().updates.is_empty());
        assert_eq!(engine.log().count_of(LogEntryType::Random), 0);
    }

    #[test]
    fn test_narrator_response_is_logged() {
        let (mut engine, _) = engine(vec![]);
        let line = engine.narrator_response("observe_bark");

        assert!(!line.is_empty());
        let entry = engine.log().last().unwrap();
        assert_eq!(entry.entry_type, LogEntryType::Narrator);
        assert_eq!(entry.content, line);
    }
}
