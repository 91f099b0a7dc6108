//! Narrative content store - immutable lookup of story text, decisions and
//! consequences.
//!
//! - **Templates** are keyed by event type and hold text variants and decisions
//! - **Consequences** are keyed by consequence id and hold outcome text and effects

mod builtin;
mod consequence;
mod template;

pub use consequence::*;
pub use template::*;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ContentError;

/// Event type whose template opens the story.
pub const BEGINNING_EVENT: &str = "beginning";

/// Read-only table of all narrative content, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct NarrativeContentStore {
    templates: HashMap<String, NarrativeTemplate>,
    consequences: HashMap<String, ConsequenceDefinition>,
}

/// File layout accepted by [`NarrativeContentStore::from_json_str`].
#[derive(Debug, Deserialize)]
struct ContentFile {
    #[serde(default)]
    templates: HashMap<String, NarrativeTemplate>,
    #[serde(default)]
    consequences: HashMap<String, ConsequenceRecord>,
}

impl NarrativeContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The story shipped with the engine.
    pub fn builtin() -> Self {
        builtin::story()
    }

    /// Parse content from JSON of the form `{ "templates": {..}, "consequences": {..} }`.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_json::from_str(json)?;

        if let Some((event_type, _)) = file.templates.iter().find(|(_, t)| !t.has_text()) {
            return Err(ContentError::EmptyTemplate(event_type.clone()));
        }

        Ok(Self {
            templates: file.templates,
            consequences: file
                .consequences
                .into_iter()
                .map(|(id, record)| (id, record.into()))
                .collect(),
        })
    }

    /// Read and parse a JSON content file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add a template.
    pub fn with_template(mut self, event_type: impl Into<String>, template: NarrativeTemplate) -> Self {
        self.templates.insert(event_type.into(), template);
        self
    }

    /// Add a consequence.
    pub fn with_consequence(
        mut self,
        id: impl Into<String>,
        consequence: ConsequenceDefinition,
    ) -> Self {
        self.consequences.insert(id.into(), consequence);
        self
    }

    /// Look up the template for an event type.
    pub fn get(&self, event_type: &str) -> Option<&NarrativeTemplate> {
        self.templates.get(event_type)
    }

    pub fn consequence(&self, id: &str) -> Option<&ConsequenceDefinition> {
        self.consequences.get(id)
    }

    /// Owned copy of a consequence, or the fallback for unknown ids.
    pub fn consequence_or_default(&self, id: &str) -> ConsequenceDefinition {
        self.consequence(id)
            .cloned()
            .unwrap_or_else(ConsequenceDefinition::fallback)
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn consequence_count(&self) -> usize {
        self.consequences.len()
    }

    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effect;

    #[test]
    fn test_unknown_consequence_is_stable_fallback() {
        let store = NarrativeContentStore::builtin();

        let a = store.consequence_or_default("nonexistent");
        let b = store.consequence_or_default("");
        assert_eq!(a, b);
        assert!(a.is_fallback());
    }

    #[test]
    fn test_builtin_has_beginning_and_scenario_content() {
        let store = NarrativeContentStore::builtin();
        assert!(store.get(BEGINNING_EVENT).is_some());
        assert!(store.get("locked_door_main").is_some());
        assert_eq!(store.get("clock").unwrap().decisions.len(), 3);
        assert!(store.consequence("tree_mirror_touch").is_some());
    }

    #[test]
    fn test_every_builtin_decision_resolves() {
        let store = NarrativeContentStore::builtin();
        for event_type in store.event_types() {
            let template = store.get(event_type).unwrap();
            assert!(template.has_text(), "{} has no text", event_type);
            for decision in &template.decisions {
                assert!(
                    store.consequence(&decision.consequence).is_some(),
                    "{} offers unknown consequence {}",
                    event_type,
                    decision.consequence
                );
            }
        }
    }

    #[test]
    fn test_from_json() {
        let store = NarrativeContentStore::from_json_str(
            r#"{
                "templates": {
                    "well": {
                        "texts": ["The well hums.", "The well is silent."],
                        "decisions": [{ "text": "Drop a coin", "consequence": "coin" }]
                    }
                },
                "consequences": {
                    "coin": {
                        "text": "Something below catches it.",
                        "effects": { "setFlags": { "coinDropped": true }, "changeSanity": -3 }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(store.template_count(), 1);
        assert_eq!(store.get("well").unwrap().texts.len(), 2);

        let coin = store.consequence("coin").unwrap();
        assert_eq!(
            coin.effects,
            vec![Effect::set_flag("coinDropped", true), Effect::change_sanity(-3)]
        );
    }

    #[test]
    fn test_from_json_rejects_empty_template() {
        let result = NarrativeContentStore::from_json_str(r#"{ "templates": { "void": {} } }"#);
        assert!(matches!(result, Err(ContentError::EmptyTemplate(name)) if name == "void"));
    }
}
