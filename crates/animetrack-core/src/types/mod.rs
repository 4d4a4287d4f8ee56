pub mod anime;
pub mod list;
pub mod music;
pub mod top;

pub use anime::{AnimeDetail, AnimeSummary, Episode, Season};
pub use list::{AnimeList, ListDraft, ListItem};
pub use music::{Music, MusicKind, MusicRating};
pub use top::{Capacity, TopEntry};

/// Server-assigned anime identifier.
pub type AnimeId = i64;
/// Server-assigned episode identifier.
pub type EpisodeId = i64;
/// Server-assigned OP/ED identifier.
pub type MusicId = i64;
/// Identifier of a top-list membership, distinct from the anime id.
pub type TopEntryId = i64;
/// Server-assigned user list identifier.
pub type ListId = i64;
/// Server-assigned user identifier.
pub type UserId = i64;
