//! High score leaderboard
//!
//! Keeps the top 10 finished games. Storage is up to the host; the board
//! only knows how to turn itself into JSON and back.

use serde::{Deserialize, Serialize};

use crate::sim::Outcome;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level the game was played on
    pub level: u32,
    /// Whether the grid was cleared
    pub won: bool,
}

impl From<&Outcome> for HighScoreEntry {
    fn from(outcome: &Outcome) -> Self {
        Self {
            score: outcome.score,
            level: outcome.level,
            won: outcome.won,
        }
    }
}

/// High score leaderboard (sorted by score, highest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished game
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    /// Ties go below the existing entry.
    pub fn add_outcome(&mut self, outcome: &Outcome) -> Option<usize> {
        let rank = self.potential_rank(outcome.score)?;
        self.entries.insert(rank - 1, HighScoreEntry::from(outcome));
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!(
            "Level {} score {} entered the leaderboard at #{}",
            outcome.level,
            outcome.score,
            rank
        );
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a saved board, keeping it sorted and within size
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(score: u64, level: u32) -> Outcome {
        Outcome {
            level,
            score,
            won: score > 100,
            shots_remaining: 0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_outcome(&outcome(50, 1)), Some(1));
        assert_eq!(scores.add_outcome(&outcome(200, 2)), Some(1));
        assert_eq!(scores.add_outcome(&outcome(50, 3)), Some(3));
        assert_eq!(scores.add_outcome(&outcome(120, 4)), Some(2));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![200, 120, 50, 50]);
        assert_eq!(scores.top_score(), Some(200));
        assert!(scores.entries[0].won);
    }

    #[test]
    fn test_full_board_drops_lowest() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_outcome(&outcome(i * 10, 1));
        }
        assert_eq!(scores.potential_rank(10), None);
        assert_eq!(scores.add_outcome(&outcome(15, 1)), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    #[test]
    fn test_json_round_trip_resorts() {
        let json = r#"{"entries":[
            {"score":5,"level":1,"won":false},
            {"score":90,"level":3,"won":true}
        ]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_score(), Some(90));
        let again = HighScores::from_json(&scores.to_json().unwrap()).unwrap();
        assert_eq!(again, scores);
    }
}
