//! Session export and end-of-story analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::info;
use uuid::Uuid;

use story_rules::{Archetype, BehaviorProfile, PlayerState};

use crate::engine::StoryEngine;
use crate::error::NarrativeError;
use crate::story_log::{LogEntry, LogEntryType, StoryLog};

/// Reported when no behaviour has been recorded yet.
pub const BALANCED_TRAIT: &str = "balanced";

/// Upper bound of [`story_complexity`].
pub const MAX_COMPLEXITY: f64 = 100.0;

/// Sanity under which an ending is narrated as fractured.
const FRACTURED_SANITY: i32 = 40;

/// Standing with the narrator, bucketed for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationshipTier {
    Devoted,
    Friendly,
    Neutral,
    Strained,
    Hostile,
}

impl RelationshipTier {
    pub fn from_relationship(relationship: i32) -> Self {
        if relationship > 50 {
            RelationshipTier::Devoted
        } else if relationship > 20 {
            RelationshipTier::Friendly
        } else if relationship > -20 {
            RelationshipTier::Neutral
        } else if relationship > -50 {
            RelationshipTier::Strained
        } else {
            RelationshipTier::Hostile
        }
    }
}

impl fmt::Display for RelationshipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipTier::Devoted => "Devoted",
            RelationshipTier::Friendly => "Friendly",
            RelationshipTier::Neutral => "Neutral",
            RelationshipTier::Strained => "Strained",
            RelationshipTier::Hostile => "Hostile",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryAnalysis {
    pub dominant_trait: String,
    pub relationship_tier: RelationshipTier,
    pub story_complexity: f64,
    pub total_entries: usize,
}

impl StoryAnalysis {
    pub fn new(player: &PlayerState, log: &StoryLog) -> Self {
        Self {
            dominant_trait: dominant_trait(&player.behavior_profile),
            relationship_tier: RelationshipTier::from_relationship(player.narrator_relationship),
            story_complexity: story_complexity(log),
            total_entries: log.len(),
        }
    }
}

fn dominant_trait(profile: &BehaviorProfile) -> String {
    profile
        .dominant()
        .map(|behavior| behavior.name().to_string())
        .unwrap_or_else(|| BALANCED_TRAIT.to_string())
}

/// Weighted count of meaningful log entries, capped at [`MAX_COMPLEXITY`].
pub fn story_complexity(log: &StoryLog) -> f64 {
    let decisions = log.count_of(LogEntryType::Decision) as f64;
    let consequences = log.count_of(LogEntryType::Consequence) as f64;
    let random = log.count_of(LogEntryType::Random) as f64;

    ((decisions * 3.0 + consequences * 2.0 + random) / 2.0).min(MAX_COMPLEXITY)
}

/// Closing line for the session.
pub fn generate_ending(player: &PlayerState, tier: RelationshipTier) -> String {
    let fractured = player.sanity < FRACTURED_SANITY;

    let opening = match (player.archetype, fractured) {
        (Archetype::SilentObserver, false) => "You watched everything and let nothing watch you back.",
        (Archetype::SilentObserver, true) => "You watched for so long that the room began watching for you.",
        (Archetype::AgentOfChaos, false) => "You broke what needed breaking and walked out whole.",
        (Archetype::AgentOfChaos, true) => "You broke everything, and the last thing to crack was you.",
        (Archetype::EmotionEngine, false) => "Every feeling you carried left a mark on the walls, and the walls are kinder for it.",
        (Archetype::EmotionEngine, true) => "Your feelings grew louder than the house, and now the house only echoes.",
        (Archetype::GoldenMaskedOracle, false) => "The mask showed you the paths, and you chose your own anyway.",
        (Archetype::GoldenMaskedOracle, true) => "The mask showed you every path at once, and you could no longer tell which one you walked.",
        (Archetype::Undefined, false) => "You leave the way you arrived: unnamed, and mostly intact.",
        (Archetype::Undefined, true) => "You leave without a name, and without quite all of yourself.",
    };

    let closing = match tier {
        RelationshipTier::Devoted => "The narrator will miss you. It says so, twice.",
        RelationshipTier::Friendly => "The narrator waves you off with something like fondness.",
        RelationshipTier::Neutral => "The narrator closes the book without comment.",
        RelationshipTier::Strained => "The narrator is relieved to see you go.",
        RelationshipTier::Hostile => "The narrator locks the door behind you and keeps the key.",
    };

    format!("{} {}", opening, closing)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedPlayer<'a> {
    name: &'a str,
    archetype: Archetype,
    day: u32,
    sanity: i32,
    relationship: i32,
    behavior_profile: &'a BehaviorProfile,
    events: &'a [String],
    autoplay: bool,
}

/// Snapshot of a whole session, ready for serialization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryExport<'a> {
    session_id: Uuid,
    player: ExportedPlayer<'a>,
    story_log: &'a [LogEntry],
    exported_at: DateTime<Utc>,
    ending: String,
    analysis: StoryAnalysis,
}

impl StoryEngine {
    pub fn analyze(&self) -> StoryAnalysis {
        StoryAnalysis::new(self.player(), self.log())
    }

    /// Build the export snapshot without serializing it.
    pub fn export(&self) -> StoryExport<'_> {
        let player = self.player();
        let analysis = self.analyze();

        StoryExport {
            session_id: self.session_id(),
            player: ExportedPlayer {
                name: &player.name,
                archetype: player.archetype,
                day: player.day,
                sanity: player.sanity,
                relationship: player.narrator_relationship,
                behavior_profile: &player.behavior_profile,
                events: &player.events,
                autoplay: player.autoplay,
            },
            story_log: self.log().entries(),
            exported_at: Utc::now(),
            ending: generate_ending(player, analysis.relationship_tier),
            analysis,
        }
    }

    /// Serialize the session as pretty JSON.
    pub fn export_story(&self) -> Result<String, NarrativeError> {
        let json = serde_json::to_string_pretty(&self.export())?;
        info!(session = %self.session_id(), entries = self.log().len(), "story exported");
        Ok(json)
    }
}
