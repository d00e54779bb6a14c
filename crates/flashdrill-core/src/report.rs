//! Finished-game results with JSON persistence.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading::Grade;
use crate::model::GameMode;

/// Outcome of a completed session. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    /// Unique result identifier.
    pub id: Uuid,
    /// When the session completed.
    pub finished_at: DateTime<Utc>,
    /// Mode the session was played in.
    pub mode: GameMode,
    /// Wall-clock play time in milliseconds.
    pub elapsed_ms: u64,
    /// Correct answers over questions answered, as a percentage.
    pub accuracy_percent: f64,
    pub grade: Grade,
    pub passed: bool,
    /// Balance at completion, in cents.
    pub final_balance: u64,
    /// Longest correct streak in this session.
    pub max_streak: u32,
    pub correct_count: u32,
    pub questions_answered: u32,
}

impl GameResult {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Save the result as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse result JSON")
    }
}

/// Render a duration as `MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InputMethod, ProblemSet};

    fn sample() -> GameResult {
        GameResult {
            id: Uuid::new_v4(),
            finished_at: Utc::now(),
            mode: GameMode::new(ProblemSet::Mixed, InputMethod::Voice),
            elapsed_ms: 125_400,
            accuracy_percent: 87.0,
            grade: Grade::B,
            passed: true,
            final_balance: 41_250,
            max_streak: 14,
            correct_count: 87,
            questions_answered: 100,
        }
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(125_400)), "02:05");
        assert_eq!(format_elapsed(Duration::from_secs(3_725)), "62:05");
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.json");
        let result = sample();
        result.save_json(&path).unwrap();

        let loaded = GameResult::load_json(&path).unwrap();
        assert_eq!(loaded, result);
        assert_eq!(loaded.elapsed(), Duration::from_millis(125_400));
    }

    #[test]
    fn load_missing_file_has_context() {
        let err = GameResult::load_json(Path::new("/nonexistent/result.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read result"));
    }
}
