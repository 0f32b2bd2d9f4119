//! High score leaderboard
//!
//! Persisted as JSON, tracks the top 10 scores. The best entry seeds the
//! high score readout when the game starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LanderError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the game
    pub score: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_score(&mut self, score: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };

        // Sorted descending; ties keep the older entry first
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard, starting fresh if the file is missing or corrupt
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Could not read {}: {}", path.display(), e);
                }
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("Ignoring corrupt leaderboard {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Save the leaderboard
    pub fn save(&self, path: &Path) -> Result<(), LanderError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Seconds since the Unix epoch, 0 if the clock is before it
pub fn now_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_add_keeps_order_and_limit() {
        let mut scores = HighScores::new();
        for s in 1..=12u32 {
            scores.add_score(s * 100, s as u64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1200));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));
        assert!(!scores.qualifies(300));
        assert_eq!(scores.add_score(650, 99), Some(7));
    }

    #[test]
    fn test_ties_rank_behind_older_entries() {
        let mut scores = HighScores::new();
        scores.add_score(500, 1);
        assert_eq!(scores.add_score(500, 2), Some(2));
        assert_eq!(scores.entries[0].timestamp, 1);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = std::env::temp_dir().join(format!(
            "jupiter-lander-corrupt-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(HighScores::load(&path).top_score(), None);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "jupiter-lander-scores-{}.json",
            std::process::id()
        ));
        let mut scores = HighScores::new();
        scores.add_score(5510, 10);
        scores.add_score(195, 20);
        scores.save(&path).unwrap();
        assert_eq!(HighScores::load(&path), scores);
        let _ = std::fs::remove_file(&path);
    }
}
