//! flashdrill-core — Session engine, scoring, and grading.
//!
//! This crate defines the drill data model, the game session state machine,
//! and the collaborator traits (persistence, voice input, feedback effects)
//! that the rest of flashdrill plugs into.

pub mod clock;
pub mod deck;
pub mod engine;
pub mod error;
pub mod events;
pub mod generator;
pub mod grading;
pub mod model;
pub mod profile;
pub mod report;
pub mod resurfacing;
pub mod scoring;
pub mod traits;
