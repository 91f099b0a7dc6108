//! Narrator line pools.

use story_rules::BehaviorTrait;

use super::NarrativeStyle;

/// Hand-written lines for a player whose favourite trait is known.
pub fn curated(behavior: BehaviorTrait) -> &'static [&'static str] {
    match behavior {
        BehaviorTrait::Defiant => &[
            "Oh, you think you're the one writing this? Adorable.",
            "Every time you say no, I write it down. I have a very long list.",
            "Go on, resist. It makes for better reading.",
        ],
        BehaviorTrait::Compliant => &[
            "Good. Exactly as I hoped. You're making this easy.",
            "You follow so nicely. I could almost get used to it.",
            "Such a cooperative protagonist. Suspiciously cooperative.",
        ],
        BehaviorTrait::Curious => &[
            "Touching everything again? Some doors are closed for a reason.",
            "Your curiosity is the most predictable thing about you.",
            "Yes, look closer. I put that there for you.",
        ],
        BehaviorTrait::Destructive => &[
            "Another thing broken. I was fond of that one.",
            "You do know I have to rebuild all of this, don't you?",
            "Smash it, then. I'll narrate the pieces.",
        ],
        BehaviorTrait::Empathetic => &[
            "You care. It's almost enough to make me care back.",
            "Such a soft heart. Be careful where you put it down.",
            "Kindness, here? How unexpected. How inconvenient.",
        ],
    }
}

/// Templates keyed by narrative style. `{action}` is replaced with the
/// humanized consequence id.
pub fn styled(style: NarrativeStyle) -> &'static [&'static str] {
    match style {
        NarrativeStyle::Hostile => &[
            "So you chose to {action}. Naturally. Nothing I say matters, does it?",
            "{action}. Wonderful. Truly, a masterpiece of bad judgement.",
        ],
        NarrativeStyle::Intimate => &[
            "You chose to {action}. I felt that one too.",
            "{action}... I understand why. I think I always have.",
        ],
        NarrativeStyle::Chaotic => &[
            "{action}! Yes! Let's see what falls over next!",
            "You chose to {action} and the room giggled. Did you hear it?",
        ],
        NarrativeStyle::Possessive => &[
            "You chose to {action}. Remember who let you.",
            "{action}. Fine. But you're still mine to narrate.",
        ],
        NarrativeStyle::Clinical => &[
            "Subject chose to {action}. Noted.",
            "Action recorded: {action}. Proceeding.",
        ],
    }
}

/// Remarks about the narrator's own role, unlocked after enough play.
pub const META_COMMENTARY: [&str; 3] = [
    " I've been keeping notes on you, you know.",
    " Do you ever wonder who decides what the choices are?",
    " We've done this dance enough times that I know your steps.",
];

/// Remarks about how long the player has been here.
pub const TEMPORAL_COMMENTARY: [&str; 3] = [
    " How long have we been at this now? I've stopped counting.",
    " Time moves differently in here. You must have noticed.",
    " You've been here longer than most. Longer than you think.",
];

/// Nickname the narrator settles on for a favourite trait.
pub fn nickname_for(behavior: BehaviorTrait) -> &'static str {
    match behavior {
        BehaviorTrait::Defiant => "Rebel",
        BehaviorTrait::Compliant => "Good Listener",
        BehaviorTrait::Curious => "Little Explorer",
        BehaviorTrait::Destructive => "Wrecking Ball",
        BehaviorTrait::Empathetic => "Softheart",
    }
}

/// `break_clock` becomes `break clock`.
pub fn humanize(consequence: &str) -> String {
    consequence.replace('_', " ")
}
