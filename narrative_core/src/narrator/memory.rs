//! Narrator memory: a bounded FIFO window of recent player actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use story_rules::BehaviorTrait;

/// One remembered player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub consequence: String,
    pub context: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub category: BehaviorTrait,
    /// -1.0 (hurtful) to 1.0 (warm), scaled up when the player is unstable.
    pub emotional_impact: f64,
}

/// Rolling window of memories. Oldest entries are evicted first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorMemory {
    capacity: usize,
    records: VecDeque<MemoryRecord>,
}

impl NarratorMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a record, evicting the oldest beyond capacity.
    pub fn remember(&mut self, record: MemoryRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter()
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter().skip(self.records.len().saturating_sub(n))
    }

    /// Most common category among the last `window` records. Ties go to the
    /// category encountered first, iterating oldest to newest.
    pub fn dominant_category(&self, window: usize) -> Option<BehaviorTrait> {
        let mut counts: Vec<(BehaviorTrait, usize)> = Vec::new();
        for record in self.recent(window) {
            match counts.iter_mut().find(|(c, _)| *c == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.category, 1)),
            }
        }

        let mut best: Option<(BehaviorTrait, usize)> = None;
        for (category, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((category, count));
            }
        }
        best.map(|(category, _)| category)
    }
}
