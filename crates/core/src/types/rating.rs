//! Product rating.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when creating a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RatingError {
    /// The score is NaN or infinite.
    #[error("rating must be a finite number")]
    NotFinite,
    /// The score is outside `[0, 5]`.
    #[error("rating must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// The rejected score.
        value: f32,
        /// Lowest allowed score.
        min: f32,
        /// Highest allowed score.
        max: f32,
    },
}

/// A product's review score, in `[0, 5]`.
///
/// Products without a score display [`Rating::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Rating(f32);

impl Rating {
    /// Lowest score.
    pub const MIN: f32 = 0.0;
    /// Highest score.
    pub const MAX: f32 = 5.0;
    /// Score shown for products that were never rated.
    pub const DEFAULT: Self = Self(3.5);

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the score is not finite or outside `[0, 5]`.
    pub fn new(score: f32) -> Result<Self, RatingError> {
        if !score.is_finite() {
            return Err(RatingError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&score) {
            return Err(RatingError::OutOfRange {
                value: score,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(score))
    }

    /// Returns the score.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Rating {
    type Error = RatingError;

    fn try_from(score: f32) -> Result<Self, Self::Error> {
        Self::new(score)
    }
}

impl From<Rating> for f32 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
