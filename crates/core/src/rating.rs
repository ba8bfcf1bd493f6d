//! Running-average rating aggregation for movies.
//!
//! The blend rule is intentionally not a true arithmetic mean: after the first
//! rating, every new rating is weighted at 50% regardless of how many ratings
//! came before it. Downstream consumers depend on the exact sequence of
//! averages this produces, so the formula must not be "fixed".

use crate::error::CoreError;

/// Lowest accepted rating value.
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating value.
pub const MAX_RATING: i32 = 5;

/// A movie's derived rating state: the running average and the number of
/// reviews folded into it.
///
/// The only writer of these two fields is [`RatingAggregate::apply`], invoked
/// from the review-creation transaction. Clients can never set them directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub count: i32,
}

impl RatingAggregate {
    /// Aggregate state of a movie that has never been rated.
    pub fn empty() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }

    /// Fold one newly validated rating into the aggregate.
    ///
    /// - First rating: the average becomes the rating itself.
    /// - Subsequent ratings: `average = (average + rating) / 2`.
    /// - The count increments by one either way.
    ///
    /// The rating is trusted to have passed [`validate_rating`] already; this
    /// function itself cannot fail.
    pub fn apply(self, rating: i32) -> Self {
        let average = if self.count == 0 {
            f64::from(rating)
        } else {
            (self.average + f64::from(rating)) / 2.0
        };
        Self {
            average,
            count: self.count + 1,
        }
    }
}

/// Validate that a rating falls on the accepted 1..=5 scale.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn first_rating_becomes_the_average() {
        let agg = RatingAggregate::empty().apply(4);
        assert_eq!(agg.average, 4.0);
        assert_eq!(agg.count, 1);
    }

    #[test]
    fn later_ratings_blend_at_half_weight() {
        let agg = RatingAggregate {
            average: 4.0,
            count: 3,
        }
        .apply(2);
        assert_eq!(agg.average, 3.0);
        assert_eq!(agg.count, 4);
    }

    #[test]
    fn blend_is_not_a_true_mean() {
        // 5, 5, 1 would have a true mean of 11/3; the blend gives 3.0.
        let agg = RatingAggregate::empty().apply(5).apply(5).apply(1);
        assert_eq!(agg.average, 3.0);
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn count_increments_even_when_average_is_unchanged() {
        let agg = RatingAggregate {
            average: 3.0,
            count: 7,
        }
        .apply(3);
        assert_eq!(agg.average, 3.0);
        assert_eq!(agg.count, 8);
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(MIN_RATING).is_ok());
        assert!(validate_rating(MAX_RATING).is_ok());
        assert_matches!(validate_rating(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(6), Err(CoreError::Validation(_)));
        assert_matches!(validate_rating(-1), Err(CoreError::Validation(_)));
    }
}
