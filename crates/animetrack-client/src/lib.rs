//! # AnimeTracker Client
//!
//! HTTP implementation of the [`TopListApi`](animetrack_core::TopListApi) and
//! [`RatingApi`](animetrack_core::RatingApi) contracts. Requests carry the
//! stored bearer token; a 401 response clears it so the user logs in again.
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{TokenStore, default_token_path};
pub use error::{ClientError, ClientResult};
