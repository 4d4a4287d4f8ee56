//! Contracts for the remote collaborator that persists ratings and the top list.
//!
//! The HTTP implementation lives in `animetrack-client`; tests supply
//! in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::rating::Rating;
use crate::types::{AnimeId, Episode, EpisodeId, MusicId, MusicRating, TopEntry, TopEntryId};

/// Persistence of the ranked favorites list. The server is the source of truth.
#[async_trait]
pub trait TopListApi: Send + Sync {
    /// The user's entries, ordered by position.
    async fn fetch_top(&self) -> Result<Vec<TopEntry>>;

    /// Creates an entry for `anime_id` at `position`.
    async fn add_to_top(&self, anime_id: AnimeId, position: u32) -> Result<TopEntry>;

    async fn remove_from_top(&self, entry_id: TopEntryId) -> Result<()>;

    /// Moves one entry; the server does not touch siblings.
    async fn update_position(&self, entry_id: TopEntryId, new_position: u32) -> Result<TopEntry>;
}

/// Persistence of per-user ratings. A second rating by the same user overwrites the first.
#[async_trait]
pub trait RatingApi: Send + Sync {
    async fn rate_episode(
        &self,
        episode_id: EpisodeId,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<Episode>;

    /// Saves `comment` on an episode without touching its rating.
    async fn comment_episode(&self, episode_id: EpisodeId, comment: &str) -> Result<Episode>;

    async fn rate_music(
        &self,
        music_id: MusicId,
        rating: Rating,
        comment: Option<&str>,
    ) -> Result<Vec<MusicRating>>;
}
