//! Repository for the `reviews` table.
//!
//! Review creation is the one multi-write path in the system: it folds the
//! new rating into the movie's aggregate and inserts the review in a single
//! transaction, with the movie row locked for the duration so concurrent
//! submissions cannot lose an update.

use sqlx::PgPool;
use watchbase_core::rating::RatingAggregate;
use watchbase_core::review::DUPLICATE_REVIEW_MESSAGE;
use watchbase_core::types::DbId;

use crate::models::review::{CreateReview, Review, ReviewFilter, ReviewWithAuthor, UpdateReview};

/// Column list for reviews queries.
const COLUMNS: &str =
    "id, movie_id, user_id, rating, description, active, created_at, updated_at";

/// Column list for reviews joined with the author's username, aliased to the
/// `reviews` table.
const JOINED_COLUMNS: &str = "r.id, r.movie_id, r.user_id, r.rating, r.description, \
    r.active, r.created_at, r.updated_at, u.username AS review_user";

/// Failure modes of the review-creation transaction.
#[derive(Debug, thiserror::Error)]
pub enum ReviewCreateError {
    #[error("movie not found")]
    MovieNotFound,

    #[error("{DUPLICATE_REVIEW_MESSAGE}")]
    Duplicate,

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Create a review for `(user, movie)`, updating the movie's rating
    /// aggregate in the same transaction.
    ///
    /// The movie row is locked with `FOR UPDATE`, then the uniqueness guard
    /// runs, the aggregate is recomputed, and both writes commit together.
    /// A concurrent duplicate that slips past the guard trips the
    /// `uq_reviews_user_movie` constraint and surfaces as
    /// [`ReviewCreateError::Duplicate`] all the same.
    pub async fn create_for_movie(
        pool: &PgPool,
        movie_id: DbId,
        user_id: DbId,
        input: &CreateReview,
    ) -> Result<ReviewWithAuthor, ReviewCreateError> {
        let mut tx = pool.begin().await?;

        let aggregate = sqlx::query_as::<_, (f64, i32)>(
            "SELECT avg_rating, number_rating FROM movies WHERE id = $1 FOR UPDATE",
        )
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(|(average, count)| RatingAggregate { average, count })
        .ok_or(ReviewCreateError::MovieNotFound)?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM reviews WHERE movie_id = $1 AND user_id = $2",
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if existing > 0 {
            return Err(ReviewCreateError::Duplicate);
        }

        let updated = aggregate.apply(input.rating);

        sqlx::query(
            "UPDATE movies SET avg_rating = $2, number_rating = $3, updated_at = now()
             WHERE id = $1",
        )
        .bind(movie_id)
        .bind(updated.average)
        .bind(updated.count)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO reviews (movie_id, user_id, rating, description, active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(movie_id)
            .bind(user_id)
            .bind(input.rating)
            .bind(&input.description)
            .bind(input.active)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err)
                    if db_err.constraint() == Some("uq_reviews_user_movie") =>
                {
                    ReviewCreateError::Duplicate
                }
                _ => ReviewCreateError::Db(e),
            })?;

        let review_user =
            sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        tracing::info!(
            movie_id,
            user_id,
            rating = input.rating,
            avg_rating = updated.average,
            number_rating = updated.count,
            "Review created"
        );

        Ok(ReviewWithAuthor {
            review,
            review_user,
        })
    }

    /// Find a review by id, joined with the author's username.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a movie's reviews in creation order, optionally filtered by
    /// author username and active flag.
    pub async fn list_by_movie(
        pool: &PgPool,
        movie_id: DbId,
        filter: &ReviewFilter,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.movie_id = $1
               AND ($2::text IS NULL OR u.username = $2)
               AND ($3::boolean IS NULL OR r.active = $3)
             ORDER BY r.created_at, r.id"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(movie_id)
            .bind(&filter.username)
            .bind(filter.active)
            .fetch_all(pool)
            .await
    }

    /// List every review authored by the given username, in creation order.
    pub async fn list_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE u.username = $1
             ORDER BY r.created_at, r.id"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(username)
            .fetch_all(pool)
            .await
    }

    /// Update a review by id, returning the updated row with its author.
    ///
    /// Updates do not re-run the aggregate; only creation feeds the movie's
    /// running average.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<ReviewWithAuthor>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE reviews SET
                    rating = COALESCE($2, rating),
                    description = COALESCE($3, description),
                    active = COALESCE($4, active),
                    updated_at = now()
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM updated r
             JOIN users u ON u.id = r.user_id"
        );
        sqlx::query_as::<_, ReviewWithAuthor>(&query)
            .bind(id)
            .bind(input.rating)
            .bind(&input.description)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review by id. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
