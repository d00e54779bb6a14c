//! Recording collaborators for testing the engine without a presentation layer.

use std::sync::{Mutex, PoisonError};

use flashdrill_core::events::{SessionEvent, SessionObserver};
use flashdrill_core::traits::FeedbackEffects;

/// One call made on a [`FeedbackEffects`] sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Correct { streak: u32 },
    Streak { streak: u32 },
    Milestone,
    Incorrect,
    HighScore,
    Hint,
}

/// Feedback sink that remembers every effect in order.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    effects: Mutex<Vec<Effect>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded effects matching `pred`.
    pub fn count(&self, pred: impl Fn(&Effect) -> bool) -> usize {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }

    fn record(&self, effect: Effect) {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }
}

impl FeedbackEffects for RecordingFeedback {
    fn celebrate_correct(&self, streak: u32) {
        self.record(Effect::Correct { streak });
    }

    fn celebrate_streak(&self, streak: u32) {
        self.record(Effect::Streak { streak });
    }

    fn celebrate_milestone(&self) {
        self.record(Effect::Milestone);
    }

    fn celebrate_incorrect(&self) {
        self.record(Effect::Incorrect);
    }

    fn celebrate_high_score(&self) {
        self.record(Effect::HighScore);
    }

    fn hint_purchased(&self) {
        self.record(Effect::Hint);
    }
}

/// Observer that keeps every event it is sent.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<SessionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
