//! Injectable randomness. Every probabilistic branch in the engine draws from
//! a [`RandomSource`] so outcomes can be pinned.

use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// Source of uniform random values.
pub trait RandomSource {
    /// Uniform value in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform integer in `min..=max`.
    fn range_inclusive(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + ((self.next_f64() * span as f64) as u64).min(span - 1)
    }
}

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.gen()
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.gen_range(0..len)
        }
    }
}

/// Replays a fixed queue of values, then returns `fallback` forever.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    /// Script the given values. Once exhausted, 0.99 is returned, which fails
    /// every default probability check.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.99,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Value that makes `next_index(len)` return `index`.
    pub fn index(index: usize, len: usize) -> f64 {
        (index as f64 + 0.5) / len as f64
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
