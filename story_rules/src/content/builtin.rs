//! The built-in story.

use serde_json::{json, Map, Value};

use super::{ConsequenceDefinition, Decision, NarrativeContentStore, NarrativeTemplate};
use crate::archetype::Archetype;
use crate::effects::Effect;

fn patch(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn node(name: &str, value: Value) -> Effect {
    Effect::set_node_state(name, patch(value))
}

pub(super) fn story() -> NarrativeContentStore {
    NarrativeContentStore::new()
        .with_template(
            "beginning",
            NarrativeTemplate::with_text(
                "You wake in a room that remembers you. Somewhere above the ceiling, a voice clears its throat.",
            ),
        )
        .with_template(
            "mirror",
            NarrativeTemplate::with_variants([
                "The mirror shows the room a moment late, as if it has to think about it first.",
                "Your reflection is already looking at you when you arrive.",
            ])
            .decision(Decision::new("Press your palm to the glass", "merge_reflection"))
            .decision(Decision::new("Smash the mirror", "smash_mirror"))
            .decision(
                Decision::new("Step through the altered glass", "step_through_mirror")
                    .requires_flag("mirrorAltered"),
            ),
        )
        .with_template(
            "tree",
            NarrativeTemplate::with_text(
                "An old tree grows straight through the floorboards. Its rings are visible, though nothing has cut it.",
            )
            .decision(Decision::new("Observe the bark", "observe_bark")),
        )
        .with_template(
            "clock",
            NarrativeTemplate::with_variants([
                "A grandfather clock ticks in a rhythm that is almost, but not quite, your heartbeat.",
                "The clock's hands point to an hour that does not exist.",
            ])
            .decision(Decision::new("Wind the clock", "wind_clock"))
            .decision(Decision::new("Stop the pendulum", "stop_clock"))
            .decision(
                Decision::new("Tear the hands from its face", "break_clock")
                    .for_archetype(Archetype::AgentOfChaos),
            ),
        )
        .with_template(
            "geode",
            NarrativeTemplate::with_text(
                "A split geode rests on a pedestal, its crystals pulsing with a faint inner light.",
            )
            .decision(Decision::new("Touch the crystals", "geode_touch"))
            .decision(Decision::new("Listen to the crystal hum", "geode_listen"))
            .decision(
                Decision::new("Let your joy resonate through it", "geode_resonate")
                    .requires_emotion(Archetype::EmotionEngine, "joy"),
            ),
        )
        .with_template(
            "lever_alpha",
            NarrativeTemplate::with_text(
                "A brass lever marked with the letter alpha juts from the wall, stiff with age.",
            )
            .decision(Decision::new("Pull the lever", "pull_lever_alpha")),
        )
        .with_template(
            "locked_door_main",
            NarrativeTemplate::with_text(
                "The great door swings open onto a corridor of impossible light.",
            )
            .decision(Decision::new("Walk into the light", "open_main_door")),
        )
        .with_template(
            "window",
            NarrativeTemplate::with_variants([
                "Outside the window, weather is happening to a different house.",
                "Rain streaks the glass from the inside.",
            ])
            .decision(Decision::new("Watch the weather", "observe_weather"))
            .decision(Decision::new("Refuse to look", "refuse_window")),
        )
        .with_template(
            "bookshelf",
            NarrativeTemplate::with_text(
                "One book on the shelf has no title. Its spine is warm.",
            )
            .effect("glitch")
            .decision(Decision::new("Read the unmarked book", "read_book"))
            .decision(Decision::new("Burn the book", "burn_book")),
        )
        .with_consequence(
            "merge_reflection",
            ConsequenceDefinition::new(
                "The glass gives like water. For a moment there are two of you, then there is one, and the mirror is different now.",
            )
            .with_effect(Effect::set_flag("mergedWithReflection", true))
            .with_effect(Effect::set_flag("mirrorAltered", true))
            .with_effect(node("mirror", json!({ "state": "merged" })))
            .with_effect(Effect::change_sanity_scaled(-5, 2.0)),
        )
        .with_consequence(
            "smash_mirror",
            ConsequenceDefinition::new(
                "The mirror shatters. Every shard shows a different room.",
            )
            .with_effect(Effect::set_flag("mirrorShattered", true))
            .with_effect(node("mirror", json!({ "state": "shattered" })))
            .with_effect(Effect::change_sanity(-15))
            .with_effect(Effect::trigger_world_event("glass_storm")),
        )
        .with_consequence(
            "step_through_mirror",
            ConsequenceDefinition::new(
                "You step through. The room on the other side is this room, seen from behind.",
            )
            .with_effect(node("mirror", json!({ "state": "traversed" })))
            .with_effect(Effect::change_sanity(-10)),
        )
        .with_consequence(
            "observe_bark",
            ConsequenceDefinition::new(
                "The bark is carved with initials. Some of them are yours.",
            )
            .with_effect(node("tree", json!({ "phase": "observed" }))),
        )
        .with_consequence(
            "tree_mirror_touch",
            ConsequenceDefinition::new(
                "The bark ripples under your hand and closes around your fingers, gently, like a held breath.",
            )
            .with_effect(Effect::set_flag("treeRemembers", true))
            .with_effect(node("tree", json!({ "phase": "p2" })))
            .with_effect(Effect::change_sanity(-5)),
        )
        .with_consequence(
            "wind_clock",
            ConsequenceDefinition::new("The clock ticks louder. The afternoon lasts a little longer.")
                .with_effect(node("clock", json!({ "running": true }))),
        )
        .with_consequence(
            "stop_clock",
            ConsequenceDefinition::new(
                "The pendulum stops. Somewhere, someone stops mid-sentence.",
            )
            .with_effect(Effect::set_flag("clockStopped", true))
            .with_effect(node("clock", json!({ "running": false })))
            .with_effect(Effect::trigger_world_event("time_stutter")),
        )
        .with_consequence(
            "break_clock",
            ConsequenceDefinition::new(
                "The hands come away in your fist. Time does not stop, but it does wince.",
            )
            .with_effect(Effect::set_flag("clockBroken", true))
            .with_effect(node("clock", json!({ "state": "broken" })))
            .with_effect(Effect::change_sanity(-10))
            .with_effect(Effect::trigger_world_event("time_fracture")),
        )
        .with_consequence(
            "geode_touch",
            ConsequenceDefinition::new("The crystals are warm, and they remember your touch.")
                .with_effect(node("geode", json!({ "touched": true })))
                .with_effect(Effect::change_sanity(5)),
        )
        .with_consequence(
            "geode_listen",
            ConsequenceDefinition::new(
                "The hum rises into something like laughter, and you find yourself smiling.",
            )
            .with_effect(node("geode", json!({ "humming": true })))
            .with_effect(Effect::set_emotion("joy")),
        )
        .with_consequence(
            "geode_resonate",
            ConsequenceDefinition::new(
                "The geode sings back at you. Light spills from every crystal at once.",
            )
            .with_effect(Effect::change_sanity_scaled(10, 2.0))
            .with_effect(Effect::trigger_world_event("crystal_resonance")),
        )
        .with_consequence(
            "pull_lever_alpha",
            ConsequenceDefinition::new(
                "The lever drops with a groan. Far away, something heavy unlocks.",
            )
            .with_effect(Effect::set_flag("lever_alpha_pulled", true))
            .with_effect(node("lever_alpha", json!({ "position": "down" })))
            .with_effect(Effect::trigger_world_event("distant_mechanism")),
        )
        .with_consequence(
            "open_main_door",
            ConsequenceDefinition::new(
                "You walk into the light. It is warmer than you expected, and it knows your name.",
            )
            .with_effect(Effect::set_flag("mainDoorOpened", true))
            .with_effect(node("locked_door_main", json!({ "open": true }))),
        )
        .with_consequence(
            "observe_weather",
            ConsequenceDefinition::new("The storm outside notices you watching, and politely moves on."),
        )
        .with_consequence(
            "refuse_window",
            ConsequenceDefinition::new("You turn away. The rain stops, offended.")
                .with_effect(Effect::set_flag("windowRefused", true)),
        )
        .with_consequence(
            "read_book",
            ConsequenceDefinition::new(
                "The book is a diary. The last entry is tomorrow's date.",
            )
            .with_effect(Effect::set_flag("bookRead", true))
            .with_effect(Effect::change_sanity(-5)),
        )
        .with_consequence(
            "burn_book",
            ConsequenceDefinition::new(
                "The pages curl and blacken. The words keep going for a while after the paper is gone.",
            )
            .with_effect(node("bookshelf", json!({ "state": "ashes" })))
            .with_effect(Effect::change_sanity_scaled(-10, 1.5))
            .with_effect(Effect::trigger_world_event("ember_drift")),
        )
}
