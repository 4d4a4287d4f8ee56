//! # AnimeTracker Core
//!
//! Domain logic for the AnimeTracker client: the rating normalizer shared by
//! every rating input, two-level score aggregation, and the reconciler that
//! keeps a user's ranked top list in step with the server.
//!
//! ## Quick Start
//!
//! ```rust
//! use animetrack_core::rating::{AggregateScore, Precision, normalize_rating};
//!
//! let rating = normalize_rating("73").unwrap();
//! assert_eq!(rating.value(), 7.3);
//!
//! let season = AggregateScore::mean([8.0, 6.0], Precision::Season);
//! assert_eq!(season.format(Precision::Season), "7.00");
//! ```
pub mod api;
pub mod error;
pub mod rating;
pub mod top;
pub mod types;

// Re-export primary API
pub use api::{RatingApi, TopListApi};
pub use error::{AnimetrackError, Result};
pub use rating::{
    AggregateScore, AnimeScores, BandScale, Precision, Rating, RatingBand, RatingSubject,
    normalize_rating, submit_comment, submit_rating,
};
pub use top::{
    AddOutcome, DragEnd, DropLocation, Reconciler, ReorderOutcome, SyncState, TopList, TopSnapshot,
};
pub use types::{
    AnimeDetail, AnimeList, AnimeSummary, Capacity, Episode, ListDraft, ListItem, Music,
    MusicRating, Season, TopEntry,
};
