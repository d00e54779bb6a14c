//! Problem generation for each problem set, plus multiple-choice options.
//!
//! All randomness flows through a caller-supplied [`Rng`], so a seeded
//! generator reproduces a run exactly.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::deck::{Deck, DECK_CAP};
use crate::model::{Operation, Problem, ProblemSet};

/// Factor range for the multiplication table.
pub const TABLE_RANGE: RangeInclusive<i64> = 1..=12;
/// Operand range for addition problems.
pub const ADDITION_RANGE: RangeInclusive<i64> = 1..=20;
/// Minuend range for subtraction problems.
pub const MINUEND_RANGE: RangeInclusive<i64> = 10..=50;
/// Distance of wrong options from the correct answer.
pub const OPTION_SPREAD: RangeInclusive<i64> = 1..=5;
/// Wrong options shown next to the correct answer.
pub const WRONG_OPTIONS: usize = 3;

/// Generate a full deck of [`DECK_CAP`] problems.
pub fn generate<R: Rng + ?Sized>(set: ProblemSet, rng: &mut R) -> Deck {
    generate_with_len(set, DECK_CAP, rng)
}

/// Generate a deck of `len` problems (clamped to the cap).
pub fn generate_with_len<R: Rng + ?Sized>(set: ProblemSet, len: usize, rng: &mut R) -> Deck {
    let len = len.min(DECK_CAP);
    let problems = match set {
        ProblemSet::Multiplication => {
            let mut table = multiplication_table();
            table.shuffle(rng);
            table.truncate(len);
            table
        }
        ProblemSet::Addition => (0..len)
            .map(|_| random_problem(Operation::Add, rng))
            .collect(),
        ProblemSet::Subtraction => (0..len)
            .map(|_| random_problem(Operation::Subtract, rng))
            .collect(),
        ProblemSet::Mixed => (0..len)
            .map(|_| {
                let op = Operation::ALL[rng.gen_range(0..Operation::ALL.len())];
                random_problem(op, rng)
            })
            .collect(),
    };
    tracing::debug!(%set, len = problems.len(), "generated deck");
    Deck::new(problems)
}

/// Every pair in the 12×12 table, in row order.
pub fn multiplication_table() -> Vec<Problem> {
    TABLE_RANGE
        .flat_map(|a| TABLE_RANGE.map(move |b| Problem::new(a, b, Operation::Multiply)))
        .collect()
}

/// One random problem for `op`, with operands drawn per that operation's rule.
pub fn random_problem<R: Rng + ?Sized>(op: Operation, rng: &mut R) -> Problem {
    match op {
        Operation::Multiply => Problem::new(
            rng.gen_range(TABLE_RANGE),
            rng.gen_range(TABLE_RANGE),
            op,
        ),
        Operation::Add => Problem::new(
            rng.gen_range(ADDITION_RANGE),
            rng.gen_range(ADDITION_RANGE),
            op,
        ),
        Operation::Subtract => {
            let a = rng.gen_range(MINUEND_RANGE);
            let b = rng.gen_range(1..=a);
            Problem::new(a, b, op)
        }
    }
}

/// Four shuffled choices: the answer plus three distinct positive near-misses.
pub fn answer_options<R: Rng + ?Sized>(answer: i64, rng: &mut R) -> Vec<i64> {
    let mut wrong = HashSet::with_capacity(WRONG_OPTIONS);
    // At least five positive candidates always exist within the spread, so this terminates.
    while wrong.len() < WRONG_OPTIONS {
        let offset = rng.gen_range(OPTION_SPREAD);
        let candidate = if rng.gen_bool(0.5) {
            answer + offset
        } else {
            answer - offset
        };
        if candidate > 0 && candidate != answer {
            wrong.insert(candidate);
        }
    }

    let mut options: Vec<i64> = std::iter::once(answer).chain(wrong).collect();
    options.shuffle(rng);
    options
}
