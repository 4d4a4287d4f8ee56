use std::fmt;

use serde::{Deserialize, Serialize};

use super::normalizer::round_half_away;
use crate::types::AnimeDetail;

/// Placeholder rendered when there is nothing to average.
pub const UNSET_PLACEHOLDER: &str = "-";

/// How many decimals an aggregate keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    /// Season and anime level scores: two decimals.
    Season,
    /// Small display badges (OP/ED averages): one decimal.
    Badge,
}

impl Precision {
    /// Number of decimal places.
    #[must_use]
    pub fn decimals(self) -> u32 {
        match self {
            Self::Season => 2,
            Self::Badge => 1,
        }
    }
}

/// A derived mean rating. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AggregateScore {
    /// No rating contributed. Distinct from a score of zero.
    #[default]
    Unset,
    /// Mean of at least one rating, already rounded.
    Scored(f64),
}

impl AggregateScore {
    /// Arithmetic mean of `values`, rounded to `precision`.
    #[must_use]
    pub fn mean<I>(values: I, precision: Precision) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return Self::Unset;
        }
        Self::Scored(round_half_away(sum / count as f64, precision.decimals()))
    }

    /// Anime-level score from its season scores.
    ///
    /// Averages seasons rather than episodes so long seasons do not dominate.
    /// Unset seasons are skipped; a single scored season is passed through.
    #[must_use]
    pub fn of_seasons<I>(seasons: I) -> Self
    where
        I: IntoIterator<Item = AggregateScore>,
    {
        let scored: Vec<f64> = seasons.into_iter().filter_map(Self::value).collect();
        match scored.as_slice() {
            [] => Self::Unset,
            [only] => Self::Scored(*only),
            _ => Self::mean(scored, Precision::Season),
        }
    }

    /// The score, if any.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Unset => None,
            Self::Scored(v) => Some(v),
        }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Renders with an explicit number of decimals, or the placeholder.
    #[must_use]
    pub fn format(self, precision: Precision) -> String {
        match self {
            Self::Unset => UNSET_PLACEHOLDER.to_string(),
            Self::Scored(v) => format!("{v:.prec$}", prec = precision.decimals() as usize),
        }
    }
}

/// Badge format: one decimal. Season and anime scores go through
/// [`AggregateScore::format`] with [`Precision::Season`] instead.
impl fmt::Display for AggregateScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(Precision::Badge))
    }
}

/// Season and anime scores for one anime, as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeScores {
    /// One entry per season, in the order the anime lists them.
    pub seasons: Vec<AggregateScore>,
    /// Mean of the scored seasons.
    pub anime: AggregateScore,
}

impl AnimeScores {
    /// Computes scores from the user's episode ratings.
    ///
    /// Only episodes carrying an explicit rating contribute.
    #[must_use]
    pub fn compute(anime: &AnimeDetail) -> Self {
        let seasons: Vec<AggregateScore> = anime
            .seasons
            .iter()
            .map(|season| {
                AggregateScore::mean(
                    season.episodes.iter().filter_map(|ep| ep.rating),
                    Precision::Season,
                )
            })
            .collect();
        let anime = AggregateScore::of_seasons(seasons.iter().copied());
        Self { seasons, anime }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Episode, Season};

    fn episode(id: i64, rating: Option<f64>) -> Episode {
        Episode {
            id,
            number: id as u32,
            title: None,
            rating,
            comment: None,
        }
    }

    fn season(id: i64, ratings: &[Option<f64>]) -> Season {
        Season {
            id,
            anime_id: 1,
            number: id as u32,
            episodes: ratings
                .iter()
                .enumerate()
                .map(|(i, r)| episode(id * 100 + i as i64, *r))
                .collect(),
        }
    }

    fn anime(seasons: Vec<Season>) -> AnimeDetail {
        AnimeDetail {
            id: 1,
            title: "Frieren".into(),
            description: None,
            cover_img: None,
            seasons,
        }
    }

    #[test]
    fn empty_set_is_unset_not_zero() {
        let score = AggregateScore::mean(Vec::new(), Precision::Season);
        assert_eq!(score, AggregateScore::Unset);
        assert_eq!(score.to_string(), "-");
        assert_eq!(score.format(Precision::Season), "-");
        assert_eq!(score.value(), None);
    }

    #[test]
    fn mean_of_eight_and_six() {
        let badge = AggregateScore::mean([8.0, 6.0], Precision::Badge);
        assert_eq!(badge, AggregateScore::Scored(7.0));
        assert_eq!(badge.format(Precision::Badge), "7.0");

        let season = AggregateScore::mean([8.0, 6.0], Precision::Season);
        assert_eq!(season.format(Precision::Season), "7.00");
    }

    #[test]
    fn mean_rounds_to_precision() {
        let score = AggregateScore::mean([7.0, 7.0, 6.0], Precision::Season);
        assert_eq!(score, AggregateScore::Scored(6.67));

        let score = AggregateScore::mean([7.0, 7.0, 6.0], Precision::Badge);
        assert_eq!(score, AggregateScore::Scored(6.7));
    }

    #[test]
    fn anime_score_is_mean_of_seasons() {
        let score =
            AggregateScore::of_seasons([AggregateScore::Scored(7.0), AggregateScore::Scored(9.0)]);
        assert_eq!(score.format(Precision::Season), "8.00");
    }

    #[test]
    fn single_scored_season_passes_through() {
        let score = AggregateScore::of_seasons([
            AggregateScore::Unset,
            AggregateScore::Scored(6.67),
            AggregateScore::Unset,
        ]);
        assert_eq!(score, AggregateScore::Scored(6.67));
    }

    #[test]
    fn no_scored_season_is_unset() {
        let score = AggregateScore::of_seasons([AggregateScore::Unset, AggregateScore::Unset]);
        assert!(score.is_unset());
    }

    #[test]
    fn two_level_average_differs_from_flat_average() {
        // Season 1: four episodes at 6, season 2: one episode at 10.
        let detail = anime(vec![
            season(1, &[Some(6.0), Some(6.0), Some(6.0), Some(6.0)]),
            season(2, &[Some(10.0)]),
        ]);
        let scores = AnimeScores::compute(&detail);
        assert_eq!(
            scores.seasons,
            vec![AggregateScore::Scored(6.0), AggregateScore::Scored(10.0)]
        );
        // Flat mean would be 6.8.
        assert_eq!(scores.anime, AggregateScore::Scored(8.0));
    }

    #[test]
    fn unrated_episodes_do_not_count() {
        let detail = anime(vec![season(1, &[Some(8.0), None, Some(6.0), None])]);
        let scores = AnimeScores::compute(&detail);
        assert_eq!(scores.seasons, vec![AggregateScore::Scored(7.0)]);
        assert_eq!(scores.anime, AggregateScore::Scored(7.0));
    }

    #[test]
    fn anime_without_ratings_is_unset() {
        let detail = anime(vec![season(1, &[None, None]), season(2, &[])]);
        let scores = AnimeScores::compute(&detail);
        assert!(scores.seasons.iter().all(|s| s.is_unset()));
        assert!(scores.anime.is_unset());
    }

    #[test]
    fn display_is_the_badge_format() {
        let season = AggregateScore::mean([7.0, 6.0, 7.0], Precision::Season);
        assert_eq!(season, AggregateScore::Scored(6.67));
        assert_eq!(season.format(Precision::Season), "6.67");
        assert_eq!(season.to_string(), "6.7");
        assert_eq!(AggregateScore::Unset.to_string(), "-");
    }
}
