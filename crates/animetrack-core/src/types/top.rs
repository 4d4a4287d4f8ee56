use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AnimeId, AnimeSummary, TopEntryId};
use crate::error::{AnimetrackError, Result};

/// One anime's membership in a user's ranked favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntry {
    /// Server id of the membership. `None` while an add is still in flight.
    #[serde(default)]
    pub id: Option<TopEntryId>,
    #[serde(alias = "animeId")]
    pub anime_id: AnimeId,
    /// Zero-based rank. Unique and contiguous within one user's list.
    pub position: u32,
    #[serde(default)]
    pub anime: Option<AnimeSummary>,
}

impl TopEntry {
    /// An entry added locally that the server has not acknowledged yet.
    #[must_use]
    pub fn pending(anime_id: AnimeId, position: u32) -> Self {
        Self {
            id: None,
            anime_id,
            position,
            anime: None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.id.is_none()
    }

    /// Title for display, falling back to the anime id.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.anime {
            Some(anime) => anime.title.clone(),
            None => format!("anime #{}", self.anime_id),
        }
    }
}

/// Maximum number of entries a user allows in their top list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// The sizes offered as one-click choices.
    pub const PRESETS: [Capacity; 4] = [Capacity(3), Capacity(5), Capacity(10), Capacity(16)];

    /// A custom capacity.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::InvalidCapacity` for zero.
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(AnimetrackError::InvalidCapacity(limit));
        }
        Ok(Self(limit))
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn is_preset(self) -> bool {
        Self::PRESETS.contains(&self)
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u32> for Capacity {
    type Error = AnimetrackError;

    fn try_from(limit: u32) -> Result<Self> {
        Self::new(limit)
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Top {}", self.0)
    }
}
