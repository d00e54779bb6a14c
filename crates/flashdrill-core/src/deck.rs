//! The ordered, length-capped sequence of problems for one session.

use serde::{Deserialize, Serialize};

use crate::model::Problem;

/// Hard ceiling on deck length and on questions delivered per session.
pub const DECK_CAP: usize = 100;

/// Ordered problems for a session. Never grows past [`DECK_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    problems: Vec<Problem>,
}

impl Deck {
    /// Build a deck, truncating anything past the cap.
    pub fn new(mut problems: Vec<Problem>) -> Self {
        problems.truncate(DECK_CAP);
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.problems.len() >= DECK_CAP
    }

    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    /// Insert a problem at `index`, shifting later entries right.
    ///
    /// Returns the problem back when the deck is full or `index` is past the end.
    pub fn insert(&mut self, index: usize, problem: Problem) -> Result<(), Problem> {
        if self.is_full() || index > self.problems.len() {
            return Err(problem);
        }
        self.problems.insert(index, problem);
        Ok(())
    }
}
