//! High score leaderboard
//!
//! Sorted by score descending; equal scores keep the earliest run first.
//! Only named runs are recorded.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_NAME_LEN;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 50;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Recording order, for tie breaks
    pub seq: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(default)]
    next_seq: u64,
}

/// Plain space plus anything that renders: no control, format or other
/// separator characters
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    let format = matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    );
    !(c.is_control() || c.is_whitespace() || format)
}

/// Trim a player name, keep only printable characters and cap its length.
/// Returns `None` for a name that ends up blank.
pub fn sanitize_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|&c| is_printable(c))
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore ordering, the size cap and the sequence counter after loading
    pub fn normalize(mut self) -> Self {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.seq.cmp(&b.seq)));
        self.entries.truncate(MAX_HIGH_SCORES);
        let max_seq = self.entries.iter().map(|e| e.seq + 1).max().unwrap_or(0);
        self.next_seq = self.next_seq.max(max_seq);
        self
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties lose to the earlier entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a run. Returns the rank achieved (1-indexed), or None if the
    /// name is blank or the score didn't make the table.
    pub fn record(&mut self, name: &str, score: u64) -> Option<usize> {
        let name = sanitize_name(name)?;
        let rank = self.potential_rank(score)?;

        let entry = HighScoreEntry {
            name,
            score,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        // Ranks land after every entry with an equal or higher score
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// The best `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
