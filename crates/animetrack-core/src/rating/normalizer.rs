use std::fmt;

use serde::Serialize;

/// Lowest rating a user can give. There is no zero rating.
pub const MIN_RATING: f64 = 0.1;

/// Highest rating a user can give.
pub const MAX_RATING: f64 = 10.0;

/// A canonical user rating in `(0.1, 10.0]` with one decimal of precision.
///
/// The only way to obtain a `Rating` is [`normalize_rating`], so every value
/// that reaches the API has already been clamped and rounded.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// The rating as a plain float.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Rounds `value` to `decimals` places, halves away from zero.
#[must_use]
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Turns the digits typed into a rating cell into a canonical [`Rating`].
///
/// The caller strips non-digit characters first. Returns `None` when nothing
/// parseable was entered, in which case no rating must be sent.
///
/// Two or more digits are read as `first.second`: `"73"` is 7.3 and `"05"`
/// is 0.5. Digits past the second are dropped, so `"129"` is 1.2. `"10"` is
/// the only way to reach the maximum.
#[must_use]
pub fn normalize_rating(raw: &str) -> Option<Rating> {
    let parsed: f64 = raw.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }

    let value = if raw == "10" || raw == "10.0" {
        MAX_RATING
    } else if let Some((first, second)) = leading_digit_pair(raw) {
        f64::from(first) + f64::from(second) / 10.0
    } else {
        parsed
    };

    let clamped = value.clamp(MIN_RATING, MAX_RATING);
    Some(Rating(round_half_away(clamped, 1)))
}

/// Returns the first two digits when `raw` is made of two or more ASCII digits.
fn leading_digit_pair(raw: &str) -> Option<(u8, u8)> {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some((bytes[0] - b'0', bytes[1] - b'0'))
}
