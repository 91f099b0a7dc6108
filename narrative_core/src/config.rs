//! Engine configuration: pacing and the probability constants of every
//! random branch. Loaded from TOML; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the story engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay between resolving a decision and narrating its consequence.
    pub consequence_delay_ms: u64,

    /// Bounds of the random delay before an ambient event is delivered.
    pub ambient_delay_min_ms: u64,
    pub ambient_delay_max_ms: u64,

    /// Text corruption kicks in below this sanity.
    pub corruption_sanity_threshold: i32,

    /// Chance of scrambling words when corruption applies.
    pub scramble_chance: f64,

    /// Chance, after the scramble band, of appending an unsettling phrase.
    pub phrase_chance: f64,

    /// Per-word chance of being scrambled.
    pub word_scramble_chance: f64,

    /// Chance a Golden Masked Oracle glimpses an upcoming decision.
    pub oracle_glimpse_chance: f64,

    pub narrator: NarratorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            consequence_delay_ms: 1000,
            ambient_delay_min_ms: 2000,
            ambient_delay_max_ms: 5000,
            corruption_sanity_threshold: 40,
            scramble_chance: 0.4,
            phrase_chance: 0.3,
            word_scramble_chance: 0.25,
            oracle_glimpse_chance: 0.25,
            narrator: NarratorConfig::default(),
        }
    }
}

/// Configuration for the narrator personality model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Rolling memory size.
    pub memory_capacity: usize,

    /// How many recent memories decide the favourite trait.
    pub trait_window: usize,

    pub curated_response_chance: f64,

    /// Lifetime interactions before meta-commentary unlocks.
    pub meta_commentary_after: u32,

    /// Lifetime interactions before temporal commentary unlocks.
    pub temporal_commentary_after: u32,

    pub temporal_chance: f64,

    pub nickname_chance: f64,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 20,
            trait_window: 10,
            curated_response_chance: 0.3,
            meta_commentary_after: 20,
            temporal_commentary_after: 50,
            temporal_chance: 0.3,
            nickname_chance: 0.5,
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ambient_delay_min_ms > self.ambient_delay_max_ms {
            return Err(ConfigError::InvalidRange {
                field: "ambient_delay_ms",
                min: self.ambient_delay_min_ms,
                max: self.ambient_delay_max_ms,
            });
        }

        check_probability("scramble_chance", self.scramble_chance)?;
        check_probability("phrase_chance", self.phrase_chance)?;
        check_probability("scramble_chance + phrase_chance", self.scramble_chance + self.phrase_chance)?;
        check_probability("word_scramble_chance", self.word_scramble_chance)?;
        check_probability("oracle_glimpse_chance", self.oracle_glimpse_chance)?;
        check_probability("narrator.curated_response_chance", self.narrator.curated_response_chance)?;
        check_probability("narrator.temporal_chance", self.narrator.temporal_chance)?;
        check_probability("narrator.nickname_chance", self.narrator.nickname_chance)?;

        if self.narrator.memory_capacity == 0 {
            return Err(ConfigError::EmptyMemory);
        }
        Ok(())
    }

    pub fn consequence_delay(&self) -> Duration {
        Duration::from_millis(self.consequence_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.consequence_delay(), Duration::from_millis(1000));
        assert_eq!(config.narrator.memory_capacity, 20);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            consequence_delay_ms = 250
            oracle_glimpse_chance = 1.0

            [narrator]
            memory_capacity = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.consequence_delay_ms, 250);
        assert_eq!(config.oracle_glimpse_chance, 1.0);
        assert_eq!(config.narrator.memory_capacity, 5);
        assert_eq!(config.narrator.trait_window, 10);
        assert_eq!(config.scramble_chance, 0.4);
    }

    #[test]
    fn test_rejects_inverted_delay_range() {
        let result = EngineConfig::from_toml_str(
            "ambient_delay_min_ms = 6000\nambient_delay_max_ms = 1000",
        );
        assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let result = EngineConfig::from_toml_str("scramble_chance = 0.8\nphrase_chance = 0.5");
        assert!(matches!(result, Err(ConfigError::InvalidProbability { .. })));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = EngineConfig::from_toml_str("consequence_delay_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
