use std::fmt;

use serde::{Deserialize, Serialize};

/// Which thresholds to band a rating with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandScale {
    /// Episode, season and anime scores.
    Episode,
    /// OP/ED ratings, which are banded more leniently.
    Music,
}

/// Coarse quality band used to colour a rating cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingBand {
    /// Nothing rated yet.
    Unrated,
    Low,
    Fair,
    Good,
    Excellent,
}

impl RatingBand {
    /// Bands `value` on the given scale. `None`, zero and negatives are unrated.
    #[must_use]
    pub fn classify(value: Option<f64>, scale: BandScale) -> Self {
        let Some(v) = value.filter(|v| *v > 0.0) else {
            return Self::Unrated;
        };
        let (good, fair) = match scale {
            BandScale::Episode => (6.0, 4.0),
            BandScale::Music => (5.0, 3.0),
        };
        if v >= 8.0 {
            Self::Excellent
        } else if v >= good {
            Self::Good
        } else if v >= fair {
            Self::Fair
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrated => write!(f, "unrated"),
            Self::Low => write!(f, "low"),
            Self::Fair => write!(f, "fair"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_scale_thresholds() {
        let band = |v| RatingBand::classify(Some(v), BandScale::Episode);
        assert_eq!(band(10.0), RatingBand::Excellent);
        assert_eq!(band(8.0), RatingBand::Excellent);
        assert_eq!(band(7.9), RatingBand::Good);
        assert_eq!(band(6.0), RatingBand::Good);
        assert_eq!(band(5.0), RatingBand::Fair);
        assert_eq!(band(3.9), RatingBand::Low);
        assert_eq!(band(0.1), RatingBand::Low);
    }

    #[test]
    fn music_scale_is_more_lenient() {
        let band = |v| RatingBand::classify(Some(v), BandScale::Music);
        assert_eq!(band(5.0), RatingBand::Good);
        assert_eq!(band(3.0), RatingBand::Fair);
        assert_eq!(band(2.9), RatingBand::Low);
    }

    #[test]
    fn missing_or_zero_is_unrated() {
        assert_eq!(RatingBand::classify(None, BandScale::Episode), RatingBand::Unrated);
        assert_eq!(RatingBand::classify(Some(0.0), BandScale::Music), RatingBand::Unrated);
    }

    #[test]
    fn bands_are_ordered() {
        assert!(RatingBand::Excellent > RatingBand::Good);
        assert!(RatingBand::Low > RatingBand::Unrated);
    }
}
