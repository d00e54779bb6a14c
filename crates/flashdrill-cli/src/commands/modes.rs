//! The `flashdrill modes` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use flashdrill_core::model::{InputMethod, ProblemSet};
use flashdrill_core::scoring::{base_reward, format_money};

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Problem set", "Input", "Full reward"]);

    for set in ProblemSet::ALL {
        for input in [InputMethod::Display, InputMethod::Voice] {
            table.add_row(vec![
                Cell::new(set),
                Cell::new(input),
                Cell::new(format_money(base_reward(input))),
            ]);
        }
    }

    println!("{table}");
    println!("\nRewards shrink by 1% every 100ms and reach zero after 10 seconds.");
    Ok(())
}
