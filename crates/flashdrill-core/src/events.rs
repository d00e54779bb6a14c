//! Change notifications for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::model::{Avatar, GameMode, Problem};
use crate::report::GameResult;

/// Something observable happened to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        mode: GameMode,
        deck_len: usize,
    },
    /// A new question is up. `options` is empty for voice input.
    QuestionPresented {
        index: usize,
        problem: Problem,
        options: Vec<i64>,
    },
    AnsweredCorrectly {
        answer: i64,
        reward: u64,
        streak: u32,
    },
    /// The correct answer is on display until the dwell ends.
    AnsweredIncorrectly {
        given: i64,
        correct: i64,
    },
    HintRevealed {
        prefix: i64,
    },
    Skipped {
        index: usize,
    },
    /// A missed problem went back into the deck at `index`.
    Resurfaced {
        problem: Problem,
        index: usize,
    },
    BalanceChanged {
        balance: u64,
    },
    Completed {
        result: GameResult,
        new_high_score: bool,
    },
    Reset,
    AvatarChanged {
        avatar: Avatar,
    },
}

/// Subscriber to [`SessionEvent`]s.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}
