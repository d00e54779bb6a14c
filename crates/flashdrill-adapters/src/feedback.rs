//! Feedback effects rendered as log lines.

use flashdrill_core::traits::FeedbackEffects;

/// Feedback sink that reports each effect through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackEffects for LogFeedback {
    fn celebrate_correct(&self, streak: u32) {
        tracing::info!(balloons = streak, "correct");
    }

    fn celebrate_streak(&self, streak: u32) {
        tracing::info!(streak, "lightning");
    }

    fn celebrate_milestone(&self) {
        tracing::info!("milestone: another ten correct");
    }

    fn celebrate_incorrect(&self) {
        tracing::info!("incorrect");
    }

    fn celebrate_high_score(&self) {
        tracing::info!("fireworks: new high score");
    }

    fn hint_purchased(&self) {
        tracing::debug!("hint purchased");
    }
}
