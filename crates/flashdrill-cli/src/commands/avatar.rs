//! The `flashdrill avatar` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use flashdrill_adapters::config::load_config_from;
use flashdrill_adapters::create_store;
use flashdrill_core::clock::SystemClock;
use flashdrill_core::engine::GameEngine;
use flashdrill_core::model::CharacterKind;
use flashdrill_core::traits::NoopEffects;

pub fn execute(name: String, kind: CharacterKind, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    let mut engine = GameEngine::new(
        config.engine_config(None),
        Arc::new(SystemClock::new()),
        store,
        Arc::new(NoopEffects),
    )?;

    let avatar = engine.create_avatar(&name, kind);
    println!(
        "Created {} the {}.",
        avatar.display_name, avatar.character_kind
    );
    Ok(())
}
