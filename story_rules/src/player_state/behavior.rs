//! Behaviour tracking: how the player tends to act.

use serde::{Deserialize, Serialize};

/// Categories of player behaviour the narrator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorTrait {
    Defiant,
    Compliant,
    Curious,
    Destructive,
    Empathetic,
}

/// Keyword table used by [`BehaviorTrait::classify`], checked top to bottom.
const KEYWORDS: &[(BehaviorTrait, &[&str])] = &[
    (
        BehaviorTrait::Destructive,
        &["break", "smash", "destroy", "shatter", "burn", "crush", "tear"],
    ),
    (
        BehaviorTrait::Defiant,
        &["refuse", "ignore", "defy", "resist", "reject", "leave", "walk_away"],
    ),
    (
        BehaviorTrait::Empathetic,
        &["comfort", "help", "listen", "embrace", "console", "share", "hold"],
    ),
    (
        BehaviorTrait::Compliant,
        &["accept", "obey", "follow", "agree", "merge", "wait", "pull"],
    ),
    (
        BehaviorTrait::Curious,
        &["observe", "examine", "touch", "investigate", "inspect", "study", "read", "open"],
    ),
];

impl BehaviorTrait {
    /// Declaration order, used to break ties.
    pub const ALL: [BehaviorTrait; 5] = [
        BehaviorTrait::Defiant,
        BehaviorTrait::Compliant,
        BehaviorTrait::Curious,
        BehaviorTrait::Destructive,
        BehaviorTrait::Empathetic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorTrait::Defiant => "defiant",
            BehaviorTrait::Compliant => "compliant",
            BehaviorTrait::Curious => "curious",
            BehaviorTrait::Destructive => "destructive",
            BehaviorTrait::Empathetic => "empathetic",
        }
    }

    /// Categorize a consequence id by keyword. Keywords match whole
    /// `_`-separated tokens, so `threshold` does not count as `hold`.
    /// Unmatched ids count as curious.
    pub fn classify(consequence: &str) -> Self {
        let tokens: Vec<String> = consequence
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        let padded = format!("_{}_", tokens.join("_"));

        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| padded.contains(&format!("_{}_", w))))
            .map(|(behavior, _)| *behavior)
            .unwrap_or(BehaviorTrait::Curious)
    }

    /// Change to the narrator relationship when this behaviour is recorded.
    pub fn relationship_shift(&self) -> i32 {
        match self {
            BehaviorTrait::Compliant | BehaviorTrait::Empathetic => 2,
            BehaviorTrait::Curious => 1,
            BehaviorTrait::Defiant => -2,
            BehaviorTrait::Destructive => -3,
        }
    }

    /// Emotional weight attached to memories of this behaviour, -1.0 to 1.0.
    pub fn emotional_impact(&self) -> f64 {
        match self {
            BehaviorTrait::Empathetic => 0.8,
            BehaviorTrait::Compliant => 0.4,
            BehaviorTrait::Curious => 0.2,
            BehaviorTrait::Defiant => -0.5,
            BehaviorTrait::Destructive => -0.9,
        }
    }
}

impl std::fmt::Display for BehaviorTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Counters of how often each behaviour occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BehaviorProfile {
    pub defiant: u32,
    pub compliant: u32,
    pub curious: u32,
    pub destructive: u32,
    pub empathetic: u32,
}

impl BehaviorProfile {
    pub fn get(&self, behavior: BehaviorTrait) -> u32 {
        match behavior {
            BehaviorTrait::Defiant => self.defiant,
            BehaviorTrait::Compliant => self.compliant,
            BehaviorTrait::Curious => self.curious,
            BehaviorTrait::Destructive => self.destructive,
            BehaviorTrait::Empathetic => self.empathetic,
        }
    }

    pub fn increment(&mut self, behavior: BehaviorTrait) {
        let counter = match behavior {
            BehaviorTrait::Defiant => &mut self.defiant,
            BehaviorTrait::Compliant => &mut self.compliant,
            BehaviorTrait::Curious => &mut self.curious,
            BehaviorTrait::Destructive => &mut self.destructive,
            BehaviorTrait::Empathetic => &mut self.empathetic,
        };
        *counter += 1;
    }

    pub fn total(&self) -> u32 {
        BehaviorTrait::ALL.iter().map(|b| self.get(*b)).sum()
    }

    /// Most frequent behaviour; ties go to the earliest in declaration order.
    /// `None` when nothing has been recorded.
    pub fn dominant(&self) -> Option<BehaviorTrait> {
        let mut best: Option<(BehaviorTrait, u32)> = None;
        for behavior in BehaviorTrait::ALL {
            let count = self.get(behavior);
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((behavior, count));
            }
        }
        best.map(|(behavior, _)| behavior)
    }
}
