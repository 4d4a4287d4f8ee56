use serde::{Deserialize, Serialize};

use crate::error::{AnimetrackError, Result};
use crate::types::{AnimeId, AnimeSummary, TopEntry, TopEntryId};

/// A position write needed to make the server match the local order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionCorrection {
    pub entry_id: TopEntryId,
    pub new_position: u32,
}

/// The locally held, visually ordered top list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopList {
    entries: Vec<TopEntry>,
}

impl TopList {
    /// Builds the list from a server snapshot, ordered by `position`.
    #[must_use]
    pub fn from_server(mut entries: Vec<TopEntry>) -> Self {
        entries.sort_by_key(|e| e.position);
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TopEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TopEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn contains_anime(&self, anime_id: AnimeId) -> bool {
        self.entries.iter().any(|e| e.anime_id == anime_id)
    }

    #[must_use]
    pub fn index_of(&self, entry_id: TopEntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == Some(entry_id))
    }

    /// Anime ids in visual order.
    #[must_use]
    pub fn anime_ids(&self) -> Vec<AnimeId> {
        self.entries.iter().map(|e| e.anime_id).collect()
    }

    pub fn push(&mut self, entry: TopEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::IndexOutOfBounds` past the end of the list.
    pub fn remove_at(&mut self, index: usize) -> Result<TopEntry> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Moves the entry at `from` so that it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::IndexOutOfBounds` if either index is past the end.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        Ok(())
    }

    /// Position writes needed after a local reorder, in ascending index order.
    ///
    /// Pending entries have no server id yet and are skipped.
    #[must_use]
    pub fn position_corrections(&self) -> Vec<PositionCorrection> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(index, entry)| entry.position as usize != *index)
            .filter_map(|(index, entry)| {
                entry.id.map(|entry_id| PositionCorrection {
                    entry_id,
                    new_position: index as u32,
                })
            })
            .collect()
    }

    /// Records a position the server accepted.
    pub fn set_position(&mut self, entry_id: TopEntryId, position: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == Some(entry_id)) {
            entry.position = position;
        }
    }

    /// Swaps the pending entry for `created.anime_id` with the server's copy.
    pub fn acknowledge(&mut self, created: TopEntry) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.is_pending() && e.anime_id == created.anime_id)
        {
            *entry = created;
        }
    }

    /// Drops every entry past `len`, returning how many were dropped.
    pub fn truncate(&mut self, len: usize) -> usize {
        let dropped = self.entries.len().saturating_sub(len);
        self.entries.truncate(len);
        dropped
    }

    /// `true` when positions are exactly `0..len` in visual order.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, entry)| entry.position as usize == index)
    }

    /// Animes from `animes` that could be added: not already ranked, and with
    /// a title containing `query` (case-insensitive). A blank query matches nothing.
    #[must_use]
    pub fn candidates<'a>(&self, animes: &'a [AnimeSummary], query: &str) -> Vec<&'a AnimeSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        animes
            .iter()
            .filter(|anime| !self.contains_anime(anime.id))
            .filter(|anime| anime.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(AnimetrackError::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}
