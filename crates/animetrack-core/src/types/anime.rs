use serde::{Deserialize, Serialize};

use super::{AnimeId, EpisodeId};

/// Minimal anime card, as shown in lists and the top-list search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub id: AnimeId,
    pub title: String,
    #[serde(default, alias = "coverImg")]
    pub cover_img: Option<String>,
}

/// An anime with its seasons and the requesting user's episode ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    pub id: AnimeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "coverImg")]
    pub cover_img: Option<String>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// A season groups episodes for score aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    #[serde(alias = "animeId")]
    pub anime_id: AnimeId,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    /// The requesting user's rating. Absent until they rate it.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
}
