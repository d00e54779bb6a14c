//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flashdrill_core::deck::DECK_CAP;
use flashdrill_core::engine::EngineConfig;
use flashdrill_core::model::{GameMode, InputMethod, ProblemSet};
use flashdrill_core::traits::PersistenceStore;

use crate::store::{JsonFileStore, MemoryStore};

/// Environment variable that forces a file store at the given path.
pub const STORE_PATH_ENV: &str = "FLASHDRILL_STORE_PATH";

/// Where the player profile is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Nothing survives the process.
    Memory,
    /// A JSON document on disk.
    File { path: String },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: "./flashdrill-profile.json".to_string(),
        }
    }
}

/// Top-level flashdrill configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashdrillConfig {
    /// Profile storage.
    #[serde(default)]
    pub store: StoreConfig,
    /// Problem set used when `play` is given no `--mode`.
    #[serde(default = "default_mode")]
    pub default_mode: ProblemSet,
    /// Input method used when `play` is given no `--input`.
    #[serde(default = "default_input")]
    pub default_input: InputMethod,
    /// Problems per session (1..=100).
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,
    /// Timer sampling cadence in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// How long a listening session waits before finalizing.
    #[serde(default = "default_voice_timeout")]
    pub voice_timeout_ms: u64,
}

fn default_mode() -> ProblemSet {
    ProblemSet::Multiplication
}
fn default_input() -> InputMethod {
    InputMethod::Display
}
fn default_deck_size() -> usize {
    DECK_CAP
}
fn default_tick_interval() -> u64 {
    100
}
fn default_voice_timeout() -> u64 {
    2300
}

impl Default for FlashdrillConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_mode: default_mode(),
            default_input: default_input(),
            deck_size: default_deck_size(),
            tick_interval_ms: default_tick_interval(),
            voice_timeout_ms: default_voice_timeout(),
        }
    }
}

impl FlashdrillConfig {
    pub fn default_game_mode(&self) -> GameMode {
        GameMode::new(self.default_mode, self.default_input)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn voice_timeout(&self) -> Duration {
        Duration::from_millis(self.voice_timeout_ms)
    }

    /// Engine settings derived from this config.
    pub fn engine_config(&self, seed: Option<u64>) -> EngineConfig {
        EngineConfig {
            deck_size: self.deck_size,
            tick_interval: self.tick_interval(),
            seed,
            ..EngineConfig::default()
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `flashdrill.toml` in the current directory
/// 2. `~/.config/flashdrill/config.toml`
///
/// `FLASHDRILL_STORE_PATH` overrides the configured store.
pub fn load_config() -> Result<FlashdrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<FlashdrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("flashdrill.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<FlashdrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => FlashdrillConfig::default(),
    };

    if let Ok(path) = std::env::var(STORE_PATH_ENV) {
        config.store = StoreConfig::File { path };
    }

    if let StoreConfig::File { path } = &config.store {
        config.store = StoreConfig::File {
            path: resolve_env_vars(path),
        };
    }

    if config.deck_size == 0 || config.deck_size > DECK_CAP {
        anyhow::bail!(
            "deck_size must be between 1 and {DECK_CAP}, got {}",
            config.deck_size
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("flashdrill"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn PersistenceStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::File { path } => {
            let store = JsonFileStore::open(Path::new(path))
                .with_context(|| format!("failed to open profile store: {path}"))?;
            Ok(Arc::new(store))
        }
    }
}
