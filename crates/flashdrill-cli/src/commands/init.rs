//! The `flashdrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("flashdrill.toml").exists() {
        println!("flashdrill.toml already exists, skipping.");
    } else {
        std::fs::write("flashdrill.toml", SAMPLE_CONFIG)?;
        println!("Created flashdrill.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: flashdrill avatar --name <you> --kind owl");
    println!("  2. Run: flashdrill play --mode multiplication");
    println!("  3. Run: flashdrill stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# flashdrill configuration

default_mode = "multiplication"   # multiplication | addition | subtraction | mixed
default_input = "display"         # display | voice
deck_size = 100
tick_interval_ms = 100
voice_timeout_ms = 2300

[store]
type = "file"
path = "./flashdrill-profile.json"
"#;
