//! flashdrill-adapters — Collaborator implementations.
//!
//! Provides the persistence stores, the transcript-driven voice input, and
//! the feedback sinks that plug into the `flashdrill-core` engine, plus the
//! configuration that selects between them.

pub mod config;
pub mod feedback;
pub mod mock;
pub mod store;
pub mod transcript;
pub mod voice;

pub use config::{create_store, load_config, load_config_from, FlashdrillConfig, StoreConfig};
pub use feedback::LogFeedback;
pub use store::{JsonFileStore, MemoryStore};
pub use transcript::extract_number;
pub use voice::TranscriptVoice;
