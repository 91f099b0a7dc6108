//! Narrator personality - the adaptive voice commenting on the player.
//!
//! The model is pure derived state:
//! - **Mood** follows the narrator relationship score
//! - **Patience** drains with destructive and defiant behaviour
//! - **Deep personality** accumulates from remembered behaviour and selects
//!   the narrative style
//! - **Memory** is a bounded window that decides the favourite trait and nickname

mod memory;
mod responses;

pub use memory::*;
pub use responses::{humanize, nickname_for};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use story_rules::{BehaviorProfile, BehaviorTrait, PlayerState};

use crate::config::NarratorConfig;
use crate::random::RandomSource;

/// Step function of the narrator relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Fascinated,
    Amused,
    #[default]
    Neutral,
    Concerned,
    Frustrated,
}

impl Mood {
    pub fn from_relationship(relationship: i32) -> Self {
        if relationship > 50 {
            Mood::Fascinated
        } else if relationship > 20 {
            Mood::Amused
        } else if relationship > -20 {
            Mood::Neutral
        } else if relationship > -50 {
            Mood::Concerned
        } else {
            Mood::Frustrated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStyle {
    Hostile,
    Intimate,
    Chaotic,
    Possessive,
    #[default]
    Clinical,
}

/// Threshold a deep-personality trait must exceed to take over the style.
pub const STYLE_THRESHOLD: f64 = 7.0;

/// Slow-moving personality accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DeepPersonality {
    pub sarcasm: f64,
    pub empathy: f64,
    pub manipulation: f64,
    pub curiosity: f64,
    pub possessiveness: f64,
    pub playfulness: f64,
}

impl DeepPersonality {
    /// Style by first matching threshold: hostile, intimate, chaotic,
    /// possessive, otherwise clinical.
    pub fn style(&self) -> NarrativeStyle {
        if self.sarcasm > STYLE_THRESHOLD {
            NarrativeStyle::Hostile
        } else if self.empathy > STYLE_THRESHOLD {
            NarrativeStyle::Intimate
        } else if self.playfulness > STYLE_THRESHOLD {
            NarrativeStyle::Chaotic
        } else if self.possessiveness > STYLE_THRESHOLD {
            NarrativeStyle::Possessive
        } else {
            NarrativeStyle::Clinical
        }
    }
}

/// Starting patience before behaviour penalties.
pub const MAX_PATIENCE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorPersonality {
    pub mood: Mood,
    pub patience: u32,
    pub deep_personality: DeepPersonality,
    pub narrative_style: NarrativeStyle,
    pub memory: NarratorMemory,
    pub favorite_player_trait: Option<BehaviorTrait>,
    pub player_nickname: Option<String>,
    /// Lifetime count of remembered actions, unaffected by eviction.
    pub total_interactions: u32,
    #[serde(skip)]
    config: NarratorConfig,
}

impl Default for NarratorPersonality {
    fn default() -> Self {
        Self::new(NarratorConfig::default())
    }
}

impl NarratorPersonality {
    pub fn new(config: NarratorConfig) -> Self {
        Self {
            mood: Mood::Neutral,
            patience: MAX_PATIENCE,
            deep_personality: DeepPersonality::default(),
            narrative_style: NarrativeStyle::Clinical,
            memory: NarratorMemory::new(config.memory_capacity),
            favorite_player_trait: None,
            player_nickname: None,
            total_interactions: 0,
            config,
        }
    }

    /// Recompute mood and patience from the player's standing.
    pub fn update_mood(&mut self, relationship: i32, profile: &BehaviorProfile) {
        self.mood = Mood::from_relationship(relationship);

        let penalty = profile.destructive as i64 * 10 + profile.defiant as i64 * 5;
        self.patience = (MAX_PATIENCE as i64 - penalty).max(0) as u32;
    }

    /// Remember an action and refresh the favourite trait and nickname.
    /// Returns the category the action was filed under.
    pub fn update_memory(
        &mut self,
        consequence: &str,
        context: &str,
        player: &PlayerState,
    ) -> BehaviorTrait {
        let category = BehaviorTrait::classify(consequence);

        let mut emotional_impact = category.emotional_impact();
        if player.sanity < 40 {
            emotional_impact = (emotional_impact * 1.5).clamp(-1.0, 1.0);
        }

        self.memory.remember(MemoryRecord {
            consequence: consequence.to_string(),
            context: context.to_string(),
            timestamp: Utc::now(),
            category,
            emotional_impact,
        });
        self.total_interactions += 1;

        self.favorite_player_trait = self.memory.dominant_category(self.config.trait_window);
        self.player_nickname = self
            .favorite_player_trait
            .map(|behavior| nickname_for(behavior).to_string());

        category
    }

    /// Nudge the deep personality according to the behaviour observed.
    pub fn update_personality_drift(&mut self, behavior: BehaviorTrait) {
        let p = &mut self.deep_personality;
        match behavior {
            BehaviorTrait::Defiant => {
                p.sarcasm += 1.0;
                p.manipulation += 0.5;
            }
            BehaviorTrait::Compliant => {
                p.possessiveness += 1.0;
                p.manipulation += 0.5;
            }
            BehaviorTrait::Curious => {
                p.curiosity += 1.0;
                p.playfulness += 0.5;
            }
            BehaviorTrait::Destructive => {
                p.playfulness += 1.0;
                p.sarcasm += 0.5;
            }
            BehaviorTrait::Empathetic => {
                p.empathy += 1.0;
                p.possessiveness += 0.5;
            }
        }
    }

    pub fn update_narrative_style(&mut self) -> NarrativeStyle {
        self.narrative_style = self.deep_personality.style();
        self.narrative_style
    }

    /// Produce a narrator line about `consequence`.
    ///
    /// With a known dominant trait there is a configured chance of a curated
    /// line; otherwise a style-keyed line is built, with meta and temporal
    /// commentary once enough interactions have happened. The nickname is
    /// prefixed with a configured probability.
    pub fn generate_response(
        &self,
        consequence: &str,
        dominant_trait: Option<BehaviorTrait>,
        style: NarrativeStyle,
        nickname: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> String {
        let curated_line = dominant_trait.and_then(|behavior| {
            let lines = responses::curated(behavior);
            if !lines.is_empty() && rng.chance(self.config.curated_response_chance) {
                Some(lines[rng.next_index(lines.len())].to_string())
            } else {
                None
            }
        });

        let mut response = match curated_line {
            Some(line) => line,
            None => {
                let pool = responses::styled(style);
                let mut line = pool[rng.next_index(pool.len())]
                    .replace("{action}", &humanize(consequence));

                if self.total_interactions > self.config.meta_commentary_after {
                    line.push_str(
                        responses::META_COMMENTARY[rng.next_index(responses::META_COMMENTARY.len())],
                    );
                }
                if self.total_interactions > self.config.temporal_commentary_after
                    && rng.chance(self.config.temporal_chance)
                {
                    line.push_str(
                        responses::TEMPORAL_COMMENTARY
                            [rng.next_index(responses::TEMPORAL_COMMENTARY.len())],
                    );
                }
                line
            }
        };

        if let Some(nickname) = nickname {
            if rng.chance(self.config.nickname_chance) {
                response = format!("{}, {}", nickname, response);
            }
        }

        response
    }

    /// [`Self::generate_response`] using the narrator's own derived state.
    pub fn respond(&self, consequence: &str, rng: &mut dyn RandomSource) -> String {
        self.generate_response(
            consequence,
            self.favorite_player_trait,
            self.narrative_style,
            self.player_nickname.as_deref(),
            rng,
        )
    }
}
