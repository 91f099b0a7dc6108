//! Plays a scripted session against the built-in story and prints the export.
//!
//! Usage: `headless_story [--config engine.toml] [--content story.json] [--archetype NAME]`

use narrative_core::{
    EngineConfig, EnvironmentChange, NarrativeError, ObserverResult, StoryEngine, StoryObserver,
    StoryUpdate,
};
use story_rules::{Archetype, Decision, NarrativeContentStore, PlayerState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// World interactions walked in order.
const ROUTE: [(&str, &str); 8] = [
    ("mirror", "Tall Mirror"),
    ("tree", "Old Tree"),
    ("clock", "Grandfather Clock"),
    ("locked_door_main", "Main Door"),
    ("lever_alpha", "Brass Lever"),
    ("locked_door_main", "Main Door"),
    ("geode", "Geode"),
    ("window", "Window"),
];

/// Prints narration to stdout.
struct ConsoleObserver;

impl StoryObserver for ConsoleObserver {
    fn on_story_update(&mut self, update: &StoryUpdate) -> ObserverResult {
        println!("> {}", update.text);
        Ok(())
    }

    fn on_decision_required(&mut self, decisions: &[Decision]) -> ObserverResult {
        for (i, decision) in decisions.iter().enumerate() {
            println!("  [{}] {}", i, decision.text);
        }
        Ok(())
    }

    fn on_environment_change(&mut self, change: &EnvironmentChange) -> ObserverResult {
        info!(consequence = %change.consequence, intensity = change.intensity, "environment shifts");
        Ok(())
    }
}

/// Command line options of the headless host.
#[derive(Debug, Clone, PartialEq)]
struct HostOptions {
    config: Option<String>,
    content: Option<String>,
    archetype: Archetype,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            config: None,
            content: None,
            archetype: Archetype::AgentOfChaos,
        }
    }
}

fn parse_options(args: &[String]) -> HostOptions {
    let mut options = HostOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if let Some(path) = args.get(i + 1) {
                    options.config = Some(path.clone());
                    i += 1;
                }
            }
            "--content" => {
                if let Some(path) = args.get(i + 1) {
                    options.content = Some(path.clone());
                    i += 1;
                }
            }
            "--archetype" => {
                if let Some(name) = args.get(i + 1) {
                    options.archetype = Archetype::from_name(name);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    options
}

/// Deliver everything the scheduler still holds.
fn drain_narration(engine: &mut StoryEngine) {
    while let Some(due) = engine.next_narration_in() {
        engine.tick(due);
    }
}

fn main() -> Result<(), NarrativeError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "narrative_core=info,headless_story=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_options(&args);

    let config = match &options.config {
        Some(path) => {
            info!(%path, "loading configuration");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    let content = match &options.content {
        Some(path) => NarrativeContentStore::load(path)?,
        None => NarrativeContentStore::builtin(),
    };
    info!(
        templates = content.template_count(),
        consequences = content.consequence_count(),
        "content loaded"
    );

    let mut engine = StoryEngine::new(PlayerState::new("Wanderer"), content, config);
    engine.add_observer(ConsoleObserver);

    engine.begin_story();
    engine.set_player_archetype(options.archetype);

    for (event_type, title) in ROUTE {
        engine.trigger_event(event_type, title);

        // Prefer the most specialised choice, which is listed last
        let choice = engine
            .available_decisions()
            .iter()
            .enumerate()
            .last()
            .map(|(index, decision)| (index, decision.consequence.clone()));

        if let Some((index, consequence)) = choice {
            engine.make_decision(index);
            drain_narration(&mut engine);

            let line = engine.narrator_response(&consequence);
            println!("~ {}", line);
        }

        engine.advance();
        drain_narration(&mut engine);
    }

    engine.advance_day();
    println!("{}", engine.export_story()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options_defaults() {
        let options = parse_options(&args(&["headless_story"]));
        assert_eq!(options, HostOptions::default());
    }

    #[test]
    fn test_parse_options_flags() {
        let options = parse_options(&args(&[
            "headless_story",
            "--content",
            "story.json",
            "--archetype",
            "Silent Observer",
            "--config",
        ]));

        assert_eq!(options.content.as_deref(), Some("story.json"));
        assert_eq!(options.archetype, Archetype::SilentObserver);
        // Trailing flag without a value is ignored
        assert_eq!(options.config, None);
    }

    #[test]
    fn test_missing_content_file_is_content_error() {
        let result: Result<NarrativeContentStore, NarrativeError> =
            NarrativeContentStore::load("/nonexistent/story.json").map_err(NarrativeError::from);
        assert!(matches!(result, Err(NarrativeError::Content(_))));
    }

    #[test]
    fn test_drain_narration_empties_scheduler() {
        let mut engine = StoryEngine::with_seed(
            PlayerState::new("Tester"),
            NarrativeContentStore::builtin(),
            EngineConfig::default(),
            5,
        );
        engine.advance();
        drain_narration(&mut engine);
        assert_eq!(engine.pending_narrations(), 0);
    }
}
