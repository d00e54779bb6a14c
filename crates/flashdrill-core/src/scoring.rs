//! Time-decaying rewards and the session wallet.
//!
//! Amounts are in cents: 100 units make one display dollar.
//! A question pays its full base reward when answered instantly and loses 1%
//! of it per elapsed 100 ms, reaching zero after ten seconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Stopwatch;
use crate::model::InputMethod;

/// Reward fraction at the start of every question.
pub const FULL_FRACTION: u32 = 100;
/// Time for the fraction to drop by one point.
pub const DECAY_STEP: Duration = Duration::from_millis(100);
/// Time after which a correct answer pays nothing.
pub const REWARD_WINDOW: Duration = Duration::from_secs(10);
/// Base reward for spoken answers.
pub const VOICE_BASE_REWARD: u64 = 1000;
/// Base reward for tapped answers.
pub const DISPLAY_BASE_REWARD: u64 = 500;
/// Price of a hint.
pub const HINT_COST: u64 = 200;
/// Price of skipping a question.
pub const SKIP_COST: u64 = 200;

/// Base reward for an input method.
pub fn base_reward(input: InputMethod) -> u64 {
    match input {
        InputMethod::Voice => VOICE_BASE_REWARD,
        InputMethod::Display => DISPLAY_BASE_REWARD,
    }
}

/// Reward fraction left after `elapsed` time on a question.
pub fn fraction_after(elapsed: Duration) -> u32 {
    let steps = elapsed.as_millis() / DECAY_STEP.as_millis();
    FULL_FRACTION.saturating_sub(steps.min(FULL_FRACTION as u128) as u32)
}

/// `floor(fraction * base / 100)`.
pub fn reward_amount(fraction: u32, base: u64) -> u64 {
    u64::from(fraction.min(FULL_FRACTION)) * base / u64::from(FULL_FRACTION)
}

/// Per-question reward countdown.
///
/// Started when a question is presented and cancelled the moment it resolves;
/// after cancellation the fraction stays frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardCountdown {
    stopwatch: Stopwatch,
    fraction: u32,
}

impl Default for RewardCountdown {
    fn default() -> Self {
        Self {
            stopwatch: Stopwatch::default(),
            fraction: FULL_FRACTION,
        }
    }
}

impl RewardCountdown {
    pub fn start(&mut self, now: Duration) {
        self.stopwatch.start(now);
        self.fraction = FULL_FRACTION;
    }

    /// Update the fraction from the clock. No-op once stopped.
    pub fn sample(&mut self, now: Duration) -> u32 {
        if self.stopwatch.is_running() {
            self.fraction = fraction_after(self.stopwatch.elapsed(now));
        }
        self.fraction
    }

    /// Take a final sample and stop counting down.
    pub fn stop(&mut self, now: Duration) -> u32 {
        let fraction = self.sample(now);
        self.stopwatch.cancel(now);
        fraction
    }

    pub fn is_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn fraction(&self) -> u32 {
        self.fraction
    }
}

/// Session balance plus the lifetime total it feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Spendable balance for the current session.
    pub balance: u64,
    /// Everything ever earned, across sessions. Spends never reduce it.
    pub lifetime: u64,
}

impl Wallet {
    pub fn new(balance: u64, lifetime: u64) -> Self {
        Self { balance, lifetime }
    }

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
        self.lifetime = self.lifetime.saturating_add(amount);
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.balance >= cost
    }

    /// Deduct `cost` if affordable. Returns whether the spend happened.
    pub fn try_spend(&mut self, cost: u64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance = self.balance.saturating_sub(cost);
        true
    }
}

/// Render cents as `$D.CC`.
pub fn format_money(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
