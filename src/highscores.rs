//! High score leaderboard system
//!
//! Persisted to LocalStorage as a plain JSON array, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_KEY;
use crate::persistence::{self, PersistError};
use crate::platform::Storage;
use crate::sim::GameEvent;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest accepted display name (characters)
pub const MAX_NAME_LEN: usize = 20;
/// Name used when the player gives none
pub const DEFAULT_NAME: &str = "Guest";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms) when submitted
    #[serde(rename = "ts")]
    pub timestamp: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// Trim, default and cap a display name
pub fn normalize_name(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Score descending, earlier timestamp first on ties; keep the top 10
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.timestamp.total_cmp(&b.timestamp))
        });
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Add an entry and return its rank (1-indexed) if it stayed in the top 10
    pub fn submit(&mut self, name: Option<&str>, score: u32, timestamp: f64) -> Option<usize> {
        let entry = LeaderboardEntry {
            name: normalize_name(name),
            score,
            timestamp,
        };
        self.entries.push(entry.clone());
        self.normalize();
        self.entries
            .iter()
            .position(|e| *e == entry)
            .map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// One display line per entry: "1. Name — 500"
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} \u{2014} {}", i + 1, e.name, e.score))
            .collect()
    }

    /// Decode stored data; errors are left to the caller
    pub fn try_load(storage: &dyn Storage) -> Result<Self, PersistError> {
        let mut board: Leaderboard =
            persistence::load_json(storage, LEADERBOARD_KEY)?.unwrap_or_default();
        board.normalize();
        Ok(board)
    }

    /// Load the leaderboard; missing or corrupt data yields an empty board
    pub fn load(storage: &dyn Storage) -> Self {
        match Self::try_load(storage) {
            Ok(board) => {
                log::info!("Loaded {} high scores", board.entries.len());
                board
            }
            Err(e) => {
                log::warn!("High scores unreadable, starting fresh: {e}");
                Self::new()
            }
        }
    }

    /// Persist the leaderboard
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistError> {
        persistence::save_json(storage, LEADERBOARD_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Something that can ask the player for a display name
pub trait NamePrompt {
    /// `None` when the player dismissed the prompt
    fn request_name(&mut self, default: &str) -> Option<String>;
}

/// Always answers with the same name (tests, headless runs)
#[derive(Debug, Clone)]
pub struct FixedName(pub Option<String>);

impl NamePrompt for FixedName {
    fn request_name(&mut self, _default: &str) -> Option<String> {
        self.0.clone()
    }
}

/// Pending leaderboard submission created when a session ends
///
/// The browser resolves it from an async task after the game-over overlay has
/// painted; tests resolve it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRequest {
    pub score: u32,
    pub level: u32,
    pub timestamp: f64,
}

impl NameRequest {
    /// Build a request from a `GameOver` event
    pub fn from_event(event: &GameEvent, timestamp: f64) -> Option<Self> {
        match *event {
            GameEvent::GameOver { score, level } => Some(Self {
                score,
                level,
                timestamp,
            }),
            _ => None,
        }
    }

    /// Ask for a name. Needs no access to the board, so a blocking prompt can
    /// run while nothing else is borrowed.
    pub fn ask(&self, prompt: &mut dyn NamePrompt) -> Option<String> {
        prompt.request_name(DEFAULT_NAME)
    }

    /// Ask for a name and record the entry. Returns the rank achieved.
    pub fn resolve(self, prompt: &mut dyn NamePrompt, board: &mut Leaderboard) -> Option<usize> {
        let name = self.ask(prompt);
        self.submit(name.as_deref(), board)
    }

    /// Record the entry under an already chosen name
    pub fn submit(self, name: Option<&str>, board: &mut Leaderboard) -> Option<usize> {
        let rank = board.submit(name, self.score, self.timestamp);
        match rank {
            Some(rank) => log::info!("Score {} placed #{rank}", self.score),
            None => log::info!("Score {} did not make the board", self.score),
        }
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_order_with_timestamp_tiebreak() {
        let mut board = Leaderboard::new();
        board.submit(Some("A"), 500, 1.0);
        board.submit(Some("B"), 800, 2.0);
        board.submit(Some("C"), 500, 3.0);

        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(board.top_score(), Some(800));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut board = Leaderboard::new();
        for i in 0..15u32 {
            board.submit(Some("p"), i * 10, f64::from(i));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries[0].score, 140);
        assert_eq!(board.entries[9].score, 50);

        // Too low to stay; a tie with the lowest loses to the older entry
        assert_eq!(board.submit(Some("late"), 10, 100.0), None);
        assert_eq!(board.submit(Some("tie"), 50, 100.0), None);
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.submit(Some("new"), 145, 101.0), Some(1));
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name(None), "Guest");
        assert_eq!(normalize_name(Some("   ")), "Guest");
        assert_eq!(normalize_name(Some("  Gosha ")), "Gosha");
        let long = "x".repeat(40);
        assert_eq!(normalize_name(Some(&long)).chars().count(), MAX_NAME_LEN);
        // Multibyte names are cut on character boundaries
        let cyrillic = "Гусь".repeat(10);
        assert_eq!(normalize_name(Some(&cyrillic)).chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(LEADERBOARD_KEY, "[{\"name\": 12").unwrap();
        assert!(Leaderboard::load(&storage).is_empty());
        assert!(Leaderboard::try_load(&storage).is_err());

        let missing = MemoryStorage::new();
        assert!(Leaderboard::load(&missing).is_empty());
    }

    #[test]
    fn test_reads_legacy_array_format() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                LEADERBOARD_KEY,
                r#"[{"name":"Low","score":100,"ts":5},{"name":"High","score":900,"ts":7}]"#,
            )
            .unwrap();
        let board = Leaderboard::load(&storage);
        assert_eq!(board.entries[0].name, "High");
        assert_eq!(board.entries[1].timestamp, 5.0);
    }

    #[test]
    fn test_save_writes_plain_array() {
        let mut storage = MemoryStorage::new();
        let mut board = Leaderboard::new();
        board.submit(Some("Gosha"), 120, 42.0);
        board.save(&mut storage).unwrap();

        let raw = storage.get(LEADERBOARD_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"ts\":42"));
        assert_eq!(Leaderboard::load(&storage), board);
    }

    #[test]
    fn test_name_request_resolves_with_injected_name() {
        let event = GameEvent::GameOver {
            score: 250,
            level: 3,
        };
        let request = NameRequest::from_event(&event, 1000.0).unwrap();
        let mut board = Leaderboard::new();

        let rank = request.resolve(&mut FixedName(Some("Gosha".into())), &mut board);
        assert_eq!(rank, Some(1));
        assert_eq!(board.entries[0].name, "Gosha");
        assert_eq!(board.entries[0].score, 250);

        // Dismissed prompt falls back to the default name
        let request = NameRequest::from_event(&event, 2000.0).unwrap();
        request.resolve(&mut FixedName(None), &mut board);
        assert_eq!(board.entries[1].name, DEFAULT_NAME);
    }

    /// Prompt that checks the board is free while it is asking
    struct CheckingPrompt(Rc<RefCell<Leaderboard>>);

    impl NamePrompt for CheckingPrompt {
        fn request_name(&mut self, _default: &str) -> Option<String> {
            assert!(self.0.try_borrow_mut().is_ok(), "board borrowed during prompt");
            Some("Lena".into())
        }
    }

    #[test]
    fn test_prompt_runs_before_board_is_borrowed() {
        let board = Rc::new(RefCell::new(Leaderboard::new()));
        let event = GameEvent::GameOver {
            score: 90,
            level: 1,
        };
        let request = NameRequest::from_event(&event, 5.0).unwrap();

        let name = request.ask(&mut CheckingPrompt(board.clone()));
        let rank = request.submit(name.as_deref(), &mut board.borrow_mut());
        assert_eq!(rank, Some(1));
        assert_eq!(board.borrow().entries[0].name, "Lena");
    }

    #[test]
    fn test_only_game_over_makes_requests() {
        assert!(NameRequest::from_event(&GameEvent::Started, 0.0).is_none());
        assert!(NameRequest::from_event(&GameEvent::Hit { lives: 1 }, 0.0).is_none());
    }

    #[test]
    fn test_display_lines() {
        let mut board = Leaderboard::new();
        board.submit(Some("A"), 30, 1.0);
        assert_eq!(board.lines(), vec!["1. A \u{2014} 30".to_string()]);
    }
}
