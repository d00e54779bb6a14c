//! The player's persisted profile: avatar, balances, best streak.

use serde::{Deserialize, Serialize};

use crate::model::{Avatar, CharacterKind};
use crate::traits::{PersistenceStore, StoreKey, StoredValue};

/// Everything that survives between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub avatar: Avatar,
    /// Balance as last written, in cents.
    pub balance: u64,
    /// All-time high final balance.
    pub high_balance: u64,
    /// Total ever earned.
    pub lifetime_earned: u64,
    /// Final balance of the most recent completed game.
    pub last_game_earnings: u64,
    /// Longest streak across all sessions.
    pub best_streak: u32,
}

impl PlayerProfile {
    /// Restore the profile, using defaults for anything missing or malformed.
    pub fn load(store: &dyn PersistenceStore) -> Self {
        let amount = |key: StoreKey| {
            store
                .get_int(key.as_str())
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(0)
        };

        let name = store
            .get_text(StoreKey::AvatarName.as_str())
            .unwrap_or_default();
        let kind = store
            .get_text(StoreKey::AvatarKind.as_str())
            .and_then(|k| k.parse::<CharacterKind>().ok())
            .unwrap_or_default();

        Self {
            avatar: Avatar::new(&name, kind),
            balance: amount(StoreKey::Balance),
            high_balance: amount(StoreKey::HighBalance),
            lifetime_earned: amount(StoreKey::LifetimeEarned),
            last_game_earnings: amount(StoreKey::LastGameEarnings),
            best_streak: u32::try_from(amount(StoreKey::BestStreak)).unwrap_or(u32::MAX),
        }
    }
}

/// Best-effort write: failures are logged and dropped.
pub(crate) fn persist(
    store: &dyn PersistenceStore,
    key: StoreKey,
    value: impl Into<StoredValue>,
) {
    if let Err(e) = store.set(key.as_str(), value.into()) {
        tracing::warn!(key = key.as_str(), "failed to persist value: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, StoredValue>>);

    impl PersistenceStore for MapStore {
        fn get(&self, key: &str) -> Option<StoredValue> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    struct BrokenStore;

    impl PersistenceStore for BrokenStore {
        fn get(&self, _: &str) -> Option<StoredValue> {
            None
        }

        fn set(&self, key: &str, _: StoredValue) -> Result<(), StoreError> {
            Err(StoreError::TypeMismatch { key: key.into() })
        }
    }

    #[test]
    fn empty_store_gives_defaults() {
        let profile = PlayerProfile::load(&MapStore::default());
        assert_eq!(profile, PlayerProfile::default());
        assert_eq!(profile.avatar.display_name, "Player");
        assert_eq!(profile.avatar.character_kind, CharacterKind::Cat);
    }

    #[test]
    fn persisted_values_load_back() {
        let store = MapStore::default();
        persist(&store, StoreKey::AvatarName, "Ada");
        persist(&store, StoreKey::AvatarKind, CharacterKind::Panda.as_str());
        persist(&store, StoreKey::Balance, 1_250u64);
        persist(&store, StoreKey::HighBalance, 48_000u64);
        persist(&store, StoreKey::LifetimeEarned, 310_000u64);
        persist(&store, StoreKey::LastGameEarnings, 1_250u64);
        persist(&store, StoreKey::BestStreak, 23u32);

        let expected = PlayerProfile {
            avatar: Avatar::new("Ada", CharacterKind::Panda),
            balance: 1_250,
            high_balance: 48_000,
            lifetime_earned: 310_000,
            last_game_earnings: 1_250,
            best_streak: 23,
        };
        assert_eq!(PlayerProfile::load(&store), expected);
    }

    #[test]
    fn malformed_values_fall_back() {
        let store = MapStore::default();
        store.set("balance", StoredValue::Int(-40)).unwrap();
        store.set("avatar.kind", "dragon".into()).unwrap();
        store.set("streak.best", "seven".into()).unwrap();

        let profile = PlayerProfile::load(&store);
        assert_eq!(profile.balance, 0);
        assert_eq!(profile.avatar.character_kind, CharacterKind::Cat);
        assert_eq!(profile.best_streak, 0);
    }

    #[test]
    fn persist_swallows_failures() {
        persist(&BrokenStore, StoreKey::Balance, 10u64);
        assert_eq!(PlayerProfile::load(&BrokenStore), PlayerProfile::default());
    }
}
