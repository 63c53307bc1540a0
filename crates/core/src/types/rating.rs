//! Product rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The value is above the maximum number of stars.
    #[error("rating must be at most {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: u8,
        /// Maximum allowed rating.
        max: u8,
    },
}

/// Aggregate product rating, an integer number of stars out of five.
///
/// Parsing enforces the range, so a rating that made it past the API
/// boundary is always displayable.
///
/// ## Examples
///
/// ```
/// use qkart_core::Rating;
///
/// assert!(Rating::new(0).is_ok());
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Maximum number of stars.
    pub const MAX: u8 = 5;

    /// Create a rating, rejecting values above [`Rating::MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::OutOfRange`] if `stars > 5`.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars > Self::MAX {
            return Err(RatingError::OutOfRange {
                value: stars,
                max: Self::MAX,
            });
        }
        Ok(Self(stars))
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX - self.0);
        write!(f, "{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}
