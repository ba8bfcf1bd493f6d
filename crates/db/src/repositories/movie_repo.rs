//! Repository for the `movies` table.

use sqlx::PgPool;
use watchbase_core::types::DbId;

use crate::models::movie::{CreateMovie, Movie, MovieWithPlatform, UpdateMovie};

/// Column list for movies queries.
const COLUMNS: &str =
    "id, platform_id, title, storyline, active, avg_rating, number_rating, created_at, updated_at";

/// Column list for movies joined with the owning platform's name, aliased to
/// the `movies` table.
const JOINED_COLUMNS: &str = "m.id, m.platform_id, m.title, m.storyline, m.active, \
    m.avg_rating, m.number_rating, m.created_at, m.updated_at, p.name AS platform";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Create a new movie. Aggregate fields start at zero regardless of input.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (platform_id, title, storyline, active)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(input.platform_id)
            .bind(&input.title)
            .bind(&input.storyline)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by id, joined with its platform name.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovieWithPlatform>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movies m
             JOIN platforms p ON p.id = m.platform_id
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MovieWithPlatform>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all movies ordered by id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MovieWithPlatform>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movies m
             JOIN platforms p ON p.id = m.platform_id
             ORDER BY m.id"
        );
        sqlx::query_as::<_, MovieWithPlatform>(&query)
            .fetch_all(pool)
            .await
    }

    /// List all movies in creation order (the cursor strategy's ordering).
    pub async fn list_by_created(pool: &PgPool) -> Result<Vec<MovieWithPlatform>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movies m
             JOIN platforms p ON p.id = m.platform_id
             ORDER BY m.created_at, m.id"
        );
        sqlx::query_as::<_, MovieWithPlatform>(&query)
            .fetch_all(pool)
            .await
    }

    /// List a platform's movies ordered by id.
    pub async fn list_by_platform(
        pool: &PgPool,
        platform_id: DbId,
    ) -> Result<Vec<MovieWithPlatform>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movies m
             JOIN platforms p ON p.id = m.platform_id
             WHERE m.platform_id = $1
             ORDER BY m.id"
        );
        sqlx::query_as::<_, MovieWithPlatform>(&query)
            .bind(platform_id)
            .fetch_all(pool)
            .await
    }

    /// Update a movie by id, returning the updated row.
    ///
    /// Aggregate fields are not updatable here; only the review-creation
    /// transaction writes them.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                platform_id = COALESCE($2, platform_id),
                title = COALESCE($3, title),
                storyline = COALESCE($4, storyline),
                active = COALESCE($5, active),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(input.platform_id)
            .bind(&input.title)
            .bind(&input.storyline)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a movie by id. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
