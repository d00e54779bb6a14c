//! Collaborator interfaces the engine talks to.
//!
//! Implementations live in `flashdrill-adapters` (stores, voice input,
//! feedback) or in the presentation layer.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::{StoreError, VoiceError};

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// A persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    Text(String),
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Int(v)
    }
}

impl From<u64> for StoredValue {
    fn from(v: u64) -> Self {
        StoredValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<u32> for StoredValue {
    fn from(v: u32) -> Self {
        StoredValue::Int(i64::from(v))
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::Text(v.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::Text(v)
    }
}

/// Keys the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    AvatarName,
    AvatarKind,
    Balance,
    HighBalance,
    LifetimeEarned,
    LastGameEarnings,
    BestStreak,
}

impl StoreKey {
    pub const ALL: [StoreKey; 7] = [
        StoreKey::AvatarName,
        StoreKey::AvatarKind,
        StoreKey::Balance,
        StoreKey::HighBalance,
        StoreKey::LifetimeEarned,
        StoreKey::LastGameEarnings,
        StoreKey::BestStreak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::AvatarName => "avatar.name",
            StoreKey::AvatarKind => "avatar.kind",
            StoreKey::Balance => "balance",
            StoreKey::HighBalance => "balance.high",
            StoreKey::LifetimeEarned => "earnings.lifetime",
            StoreKey::LastGameEarnings => "earnings.last_game",
            StoreKey::BestStreak => "streak.best",
        }
    }
}

/// Durable key-value storage. Reads are synchronous so defaults can be
/// restored at startup; writes are best-effort.
pub trait PersistenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<StoredValue>;

    fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError>;

    /// Integer value for `key`, if present and numeric.
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            StoredValue::Int(v) => Some(v),
            StoredValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Text value for `key`, if present.
    fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            StoredValue::Text(s) => Some(s),
            StoredValue::Int(v) => Some(v.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Voice input
// ---------------------------------------------------------------------------

/// Where a listening session delivers its number. One-shot by construction.
pub type NumberSink = oneshot::Sender<i64>;

/// Speech-to-number recognizer.
///
/// Each listening session delivers at most one number through its sink;
/// failures surface through [`VoiceInput::status_message`] instead.
pub trait VoiceInput: Send + Sync {
    /// Begin a listening session that reports into `sink`.
    fn start_listening(&self, sink: NumberSink) -> Result<(), VoiceError>;

    /// End the current session without delivering anything further.
    fn stop_listening(&self);

    fn is_listening(&self) -> bool;

    /// Best-effort transcript so far, for live display.
    fn partial_transcript(&self) -> String;

    /// Last non-fatal problem, e.g. "no valid number found".
    fn status_message(&self) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Feedback effects
// ---------------------------------------------------------------------------

/// Fire-and-forget presentation effects. Every method defaults to a no-op.
pub trait FeedbackEffects: Send + Sync {
    /// A correct answer; one balloon per streak point.
    fn celebrate_correct(&self, _streak: u32) {}

    /// Lightning for a streak of three or more.
    fn celebrate_streak(&self, _streak: u32) {}

    /// Every tenth correct answer in a session.
    fn celebrate_milestone(&self) {}

    /// A wrong answer.
    fn celebrate_incorrect(&self) {}

    /// A new all-time high balance at game end.
    fn celebrate_high_score(&self) {}

    /// A hint was bought.
    fn hint_purchased(&self) {}
}

/// Feedback sink that ignores everything.
pub struct NoopEffects;

impl FeedbackEffects for NoopEffects {}
