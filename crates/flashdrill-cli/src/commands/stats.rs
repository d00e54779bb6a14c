//! The `flashdrill stats` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use flashdrill_adapters::config::load_config_from;
use flashdrill_adapters::create_store;
use flashdrill_core::profile::PlayerProfile;
use flashdrill_core::scoring::format_money;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    let profile = PlayerProfile::load(store.as_ref());

    let mut table = Table::new();
    table.set_header(vec!["Stat", "Value"]);
    let rows = [
        ("Name", profile.avatar.display_name.clone()),
        ("Character", profile.avatar.character_kind.to_string()),
        ("Balance", format_money(profile.balance)),
        ("High balance", format_money(profile.high_balance)),
        ("Lifetime earned", format_money(profile.lifetime_earned)),
        ("Last game", format_money(profile.last_game_earnings)),
        ("Best streak", profile.best_streak.to_string()),
    ];
    for (stat, value) in rows {
        table.add_row(vec![Cell::new(stat), Cell::new(value)]);
    }

    println!("{table}");
    Ok(())
}
