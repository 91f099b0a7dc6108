//! Player archetypes - the persona chosen at game start.

use serde::{Deserialize, Serialize};

/// Persona that gates content and alters consequence effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Archetype {
    #[default]
    Undefined,
    #[serde(rename = "Silent Observer")]
    SilentObserver,
    #[serde(rename = "Agent of Chaos")]
    AgentOfChaos,
    #[serde(rename = "Emotion Engine")]
    EmotionEngine,
    #[serde(rename = "Golden Masked Oracle")]
    GoldenMaskedOracle,
}

impl Archetype {
    /// All selectable archetypes, excluding `Undefined`.
    pub const PLAYABLE: [Archetype; 4] = [
        Archetype::SilentObserver,
        Archetype::AgentOfChaos,
        Archetype::EmotionEngine,
        Archetype::GoldenMaskedOracle,
    ];

    /// Display name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Undefined => "Undefined",
            Archetype::SilentObserver => "Silent Observer",
            Archetype::AgentOfChaos => "Agent of Chaos",
            Archetype::EmotionEngine => "Emotion Engine",
            Archetype::GoldenMaskedOracle => "Golden Masked Oracle",
        }
    }

    /// Parse a display name. Unknown names map to `Undefined`.
    pub fn from_name(name: &str) -> Self {
        Self::PLAYABLE
            .into_iter()
            .find(|a| a.name() == name)
            .unwrap_or(Archetype::Undefined)
    }

    pub fn is_defined(&self) -> bool {
        *self != Archetype::Undefined
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_serializes_display_name() {
        let json = serde_json::to_string(&Archetype::AgentOfChaos).unwrap();
        assert_eq!(json, "\"Agent of Chaos\"");

        let parsed: Archetype = serde_json::from_str("\"Golden Masked Oracle\"").unwrap();
        assert_eq!(parsed, Archetype::GoldenMaskedOracle);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Archetype::from_name("Silent Observer"), Archetype::SilentObserver);
        assert_eq!(Archetype::from_name("Emotion Engine"), Archetype::EmotionEngine);
        assert_eq!(Archetype::from_name("Bard"), Archetype::Undefined);
    }

    #[test]
    fn test_default_is_undefined() {
        assert!(!Archetype::default().is_defined());
        assert!(Archetype::SilentObserver.is_defined());
    }
}
