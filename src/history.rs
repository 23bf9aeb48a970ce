//! Directory history and the single-slot undo log
//!
//! The history is a bounded FIFO of absolute paths pushed by `cd` and
//! `take`; `cdh` recalls entries by number or letter. The undo log holds at
//! most one entry, consumed by `ctrlz`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of remembered directories
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no such history entry: {0}")]
    SelectionOutOfRange(String),
}

/// One line of the `cdh` listing.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryLine<'a> {
    /// 1-based, counting down the printed list (newest shown = 1)
    pub number: usize,
    /// `'a'` is the oldest shown; letters run opposite to the numbers
    pub letter: char,
    pub path: &'a Path,
}

/// Bounded FIFO of previously visited directories, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryHistory {
    entries: VecDeque<PathBuf>,
}

impl DirectoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a visited directory, evicting the oldest entry at capacity
    pub fn push(&mut self, path: PathBuf) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    /// The `cdh` listing: every entry except the newest (that is the
    /// directory the user is already in), printed newest-first. Numbers
    /// count 1, 2, … down the list; letters end at `'a'` on the oldest.
    pub fn listing(&self) -> Vec<HistoryLine<'_>> {
        let shown = self.len().saturating_sub(1);
        (0..shown)
            .map(|line| HistoryLine {
                number: line + 1,
                letter: (b'a' + (shown - 1 - line) as u8) as char,
                path: &self.entries[self.len() - 2 - line],
            })
            .collect()
    }

    /// Resolve a `cdh` selection (a decimal number or a letter) to the
    /// stored path it addresses. Rejects anything outside the listed range.
    pub fn select(&self, input: &str) -> Result<&Path, HistoryError> {
        let shown = self.len().saturating_sub(1);
        let out_of_range = || HistoryError::SelectionOutOfRange(input.to_string());

        let mut chars = input.chars();
        if let (Some(letter @ 'a'..='z'), None) = (chars.next(), chars.next()) {
            let index = (letter as u8 - b'a') as usize;
            if index < shown {
                return Ok(&self.entries[index]);
            }
            return Err(out_of_range());
        }

        let number: usize = input.parse().map_err(|_| out_of_range())?;
        if number >= 1 && number <= shown {
            Ok(&self.entries[self.len() - 1 - number])
        } else {
            Err(out_of_range())
        }
    }
}

/// What `ctrlz` reverses: the last mutating navigation built-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// A successful `cd`: where we were, and the history as it looked then
    DirectoryChange {
        previous_path: PathBuf,
        previous_history: DirectoryHistory,
    },
    /// A directory `take` actually created (the deepest one)
    DirectoryCreated { path: PathBuf },
}

/// Single-slot undo log; each mutating built-in overwrites the slot.
#[derive(Debug, Default)]
pub struct UndoLog {
    entry: Option<UndoEntry>,
}

impl UndoLog {
    pub fn record(&mut self, entry: UndoEntry) {
        self.entry = Some(entry);
    }

    pub fn take(&mut self) -> Option<UndoEntry> {
        self.entry.take()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> PathBuf {
        PathBuf::from(format!("/dir{}", n))
    }

    #[test]
    fn eleven_pushes_keep_the_last_ten() {
        let mut history = DirectoryHistory::new();
        for n in 0..11 {
            history.push(path(n));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let entries: Vec<&Path> = history.iter().collect();
        let expected: Vec<PathBuf> = (1..11).map(path).collect();
        assert_eq!(
            entries,
            expected.iter().map(PathBuf::as_path).collect::<Vec<_>>()
        );
    }

    #[test]
    fn any_push_sequence_is_capped() {
        let mut history = DirectoryHistory::new();
        for n in 0..37 {
            history.push(path(n));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        // Content is the suffix of the push sequence
        assert_eq!(history.iter().next(), Some(path(27).as_path()));
        assert_eq!(history.iter().last(), Some(path(36).as_path()));
    }

    #[test]
    fn listing_skips_newest_and_runs_newest_first() {
        let mut history = DirectoryHistory::new();
        for n in 0..4 {
            history.push(path(n));
        }
        // Entries 0..=3; 3 is the current directory, so 2, 1, 0 are shown
        let listing = history.listing();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].number, 1);
        assert_eq!(listing[0].letter, 'c');
        assert_eq!(listing[0].path, path(2).as_path());
        assert_eq!(listing[2].number, 3);
        assert_eq!(listing[2].letter, 'a');
        assert_eq!(listing[2].path, path(0).as_path());
    }

    #[test]
    fn listing_of_single_entry_is_empty() {
        let mut history = DirectoryHistory::new();
        history.push(path(0));
        assert!(history.listing().is_empty());
    }

    #[test]
    fn select_by_number_counts_from_newest_shown() {
        let mut history = DirectoryHistory::new();
        for n in 0..4 {
            history.push(path(n));
        }
        assert_eq!(history.select("1").unwrap(), path(2).as_path());
        assert_eq!(history.select("3").unwrap(), path(0).as_path());
    }

    #[test]
    fn select_by_letter_counts_from_oldest() {
        let mut history = DirectoryHistory::new();
        for n in 0..4 {
            history.push(path(n));
        }
        assert_eq!(history.select("a").unwrap(), path(0).as_path());
        assert_eq!(history.select("c").unwrap(), path(2).as_path());
    }

    #[test]
    fn number_and_letter_address_the_same_line() {
        let mut history = DirectoryHistory::new();
        for n in 0..5 {
            history.push(path(n));
        }
        for line in history.listing() {
            let by_number = history.select(&line.number.to_string()).unwrap();
            let by_letter = history.select(&line.letter.to_string()).unwrap();
            assert_eq!(by_number, by_letter);
            assert_eq!(by_number, line.path);
        }
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let mut history = DirectoryHistory::new();
        for n in 0..3 {
            history.push(path(n));
        }
        // Two entries shown: 1..=2 and 'a'..='b'
        assert!(history.select("0").is_err());
        assert!(history.select("3").is_err());
        assert!(history.select("c").is_err());
        assert!(history.select("17").is_err());
        assert!(history.select("").is_err());
        assert!(history.select("zz").is_err());
    }

    #[test]
    fn undo_log_holds_a_single_entry() {
        let mut undo = UndoLog::default();
        assert!(undo.is_empty());

        undo.record(UndoEntry::DirectoryCreated { path: path(1) });
        undo.record(UndoEntry::DirectoryCreated { path: path(2) });

        assert_eq!(
            undo.take(),
            Some(UndoEntry::DirectoryCreated { path: path(2) })
        );
        assert!(undo.is_empty());
        assert_eq!(undo.take(), None);
    }

    #[test]
    fn snapshot_restores_exactly() {
        let mut history = DirectoryHistory::new();
        history.push(path(0));
        let snapshot = history.clone();

        history.push(path(1));
        history.push(path(2));
        assert_ne!(history, snapshot);

        history = snapshot.clone();
        assert_eq!(history.len(), 1);
        assert_eq!(history.iter().next(), Some(path(0).as_path()));
    }
}
