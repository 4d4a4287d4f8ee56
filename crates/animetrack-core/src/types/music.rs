use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MusicId, UserId};
use crate::rating::{AggregateScore, Precision, Rating};

/// Whether a theme song plays at the start or the end of episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicKind {
    #[serde(rename = "OP")]
    Opening,
    #[serde(rename = "ED")]
    Ending,
    #[serde(other)]
    Other,
}

impl fmt::Display for MusicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => write!(f, "OP"),
            Self::Ending => write!(f, "ED"),
            Self::Other => write!(f, "--"),
        }
    }
}

/// One user's rating of a theme song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicRating {
    #[serde(alias = "userId")]
    pub user_id: UserId,
    pub rating: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// An opening or ending theme attached to a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub id: MusicId,
    #[serde(rename = "type")]
    pub kind: MusicKind,
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, alias = "startEpisode")]
    pub start_episode: Option<u32>,
    #[serde(default, alias = "endEpisode")]
    pub end_episode: Option<u32>,
    #[serde(default)]
    pub ratings: Vec<MusicRating>,
}

impl Music {
    /// Badge average over every user's rating.
    #[must_use]
    pub fn average(&self) -> AggregateScore {
        AggregateScore::mean(self.ratings.iter().map(|r| r.rating), Precision::Badge)
    }

    /// The rating `user` gave this song, if any.
    #[must_use]
    pub fn rating_by(&self, user: UserId) -> Option<&MusicRating> {
        self.ratings.iter().find(|r| r.user_id == user)
    }

    /// Records `user`'s rating, replacing any earlier one.
    pub fn upsert_rating(&mut self, user: UserId, rating: Rating, comment: Option<String>) {
        match self.ratings.iter_mut().find(|r| r.user_id == user) {
            Some(existing) => {
                existing.rating = rating.value();
                existing.comment = comment;
            }
            None => self.ratings.push(MusicRating {
                user_id: user,
                rating: rating.value(),
                comment,
            }),
        }
    }
}
