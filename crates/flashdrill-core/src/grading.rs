//! Accuracy-to-grade mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade for a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade for an accuracy percentage. Lower bounds are inclusive.
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Grade::A
        } else if accuracy >= 80.0 {
            Grade::B
        } else if accuracy >= 70.0 {
            Grade::C
        } else if accuracy >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// A, B and C pass; D and F fail.
    pub fn passed(self) -> bool {
        matches!(self, Grade::A | Grade::B | Grade::C)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Percentage of answered questions that were correct; 0 before any answer.
pub fn accuracy_percent(correct: u32, answered: usize) -> f64 {
    if answered == 0 {
        return 0.0;
    }
    f64::from(correct) / answered as f64 * 100.0
}

/// Grade and pass/fail outcome for an accuracy percentage.
pub fn grade(accuracy: f64) -> (Grade, bool) {
    let grade = Grade::from_accuracy(accuracy);
    (grade, grade.passed())
}
