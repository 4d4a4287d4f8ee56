//! # AnimeTracker
//!
//! Umbrella crate re-exporting the domain core and the HTTP client.

pub use animetrack_client as client;
pub use animetrack_core as domain;

pub use animetrack_client::{ApiClient, ClientConfig, TokenStore};
pub use animetrack_core::{
    AggregateScore, AnimeList, AnimetrackError, Capacity, ListDraft, Rating, Reconciler, Result,
    normalize_rating, submit_comment, submit_rating,
};
