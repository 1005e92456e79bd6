//! Product reviews and star ratings.
//!
//! Reviews live only for the session; nothing here is persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Highest star rating.
pub const MAX_STARS: u8 = 5;

/// Errors from submitting a review.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please select a rating")]
    MissingRating,
    #[error("Rating must be between 1 and {MAX_STARS}, got {0}")]
    RatingOutOfRange(u8),
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub date: NaiveDate,
    pub text: String,
}

/// Reviews shown on a product page, newest first.
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    reviews: Vec<Review>,
}

impl ReviewBoard {
    /// The sample reviews every product page starts with.
    #[must_use]
    pub fn sample() -> Self {
        let review = |name: &str, rating, (y, m, d), text: &str| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| Review {
                name: name.to_string(),
                rating,
                date,
                text: text.to_string(),
            })
        };

        let reviews = [
            review(
                "John D.",
                5,
                (2024, 1, 15),
                "Excellent product! Exactly what I was looking for. Great quality and fast shipping.",
            ),
            review(
                "Sarah M.",
                4,
                (2024, 1, 10),
                "Good product overall. Works as expected. The only minor issue is the packaging could be better.",
            ),
            review(
                "Mike R.",
                5,
                (2024, 1, 5),
                "Amazing quality! Highly recommend this to anyone looking for a reliable product.",
            ),
        ];

        Self {
            reviews: reviews.into_iter().flatten().collect(),
        }
    }

    /// Add a review to the top of the board.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::MissingRating` when no star was picked (0) and
    /// `ReviewError::RatingOutOfRange` above five stars.
    pub fn submit(
        &mut self,
        name: &str,
        text: &str,
        rating: u8,
        date: NaiveDate,
    ) -> Result<Review, ReviewError> {
        if rating == 0 {
            return Err(ReviewError::MissingRating);
        }
        if rating > MAX_STARS {
            return Err(ReviewError::RatingOutOfRange(rating));
        }

        let review = Review {
            name: name.trim().to_string(),
            rating,
            date,
            text: text.trim().to_string(),
        };
        self.reviews.insert(0, review.clone());
        tracing::debug!(rating, "Review added");
        Ok(review)
    }

    /// Reviews, newest first.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Number of reviews.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Whether there are no reviews yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Full, half and empty star counts for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Break a `[0, 5]` rating into stars. Any fractional part shows a half star.
    #[must_use]
    pub fn from_rating(rating: Decimal) -> Self {
        let max = Decimal::from(MAX_STARS);
        let rating = rating.clamp(Decimal::ZERO, max);
        let full = rating.floor().to_u8().unwrap_or(0);
        let ceil = rating.ceil().to_u8().unwrap_or(MAX_STARS);

        Self {
            full,
            half: !rating.fract().is_zero(),
            empty: MAX_STARS - ceil,
        }
    }

    /// Render as text, e.g. `★★★★½`.
    #[must_use]
    pub fn render(self) -> String {
        let mut out = "★".repeat(usize::from(self.full));
        if self.half {
            out.push('½');
        }
        out.push_str(&"☆".repeat(usize::from(self.empty)));
        out
    }
}
