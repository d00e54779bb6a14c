//! Missed-question resurfacing.
//!
//! A missed problem waits a random 3–5 questions and is then slipped back into
//! the deck at the cursor. Entries are kept in miss order; when several are due
//! at once the oldest miss comes back first.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Problem;

/// Delay range, in advances, before a missed problem is due.
pub const RESURFACE_DELAY: RangeInclusive<i32> = 3..=5;

/// A missed problem waiting to be reinserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResurfacingEntry {
    pub problem: Problem,
    /// Advances left until the entry is due. Due at zero or below.
    pub questions_until_due: i32,
}

impl ResurfacingEntry {
    pub fn is_due(&self) -> bool {
        self.questions_until_due <= 0
    }
}

/// FIFO list of missed problems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResurfacingQueue {
    entries: Vec<ResurfacingEntry>,
}

impl ResurfacingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a missed problem with a random delay.
    pub fn enqueue<R: Rng + ?Sized>(&mut self, problem: Problem, rng: &mut R) -> i32 {
        let delay = rng.gen_range(RESURFACE_DELAY);
        self.enqueue_with_delay(problem, delay);
        delay
    }

    /// Queue a missed problem with an explicit delay.
    pub fn enqueue_with_delay(&mut self, problem: Problem, questions_until_due: i32) {
        self.entries.push(ResurfacingEntry {
            problem,
            questions_until_due,
        });
    }

    /// Count one question advance against every entry.
    pub fn tick(&mut self) {
        for entry in &mut self.entries {
            entry.questions_until_due -= 1;
        }
    }

    /// Remove and return the oldest due problem, if any.
    pub fn take_due(&mut self) -> Option<Problem> {
        let index = self.entries.iter().position(ResurfacingEntry::is_due)?;
        Some(self.entries.remove(index).problem)
    }

    pub fn has_due(&self) -> bool {
        self.entries.iter().any(ResurfacingEntry::is_due)
    }

    pub fn entries(&self) -> &[ResurfacingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
