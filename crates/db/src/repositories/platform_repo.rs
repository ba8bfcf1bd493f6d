//! Repository for the `platforms` table.

use sqlx::PgPool;
use watchbase_core::types::DbId;

use crate::models::platform::{CreatePlatform, Platform, PlatformWithMovies, UpdatePlatform};
use crate::repositories::MovieRepo;

/// Column list for platforms queries.
const COLUMNS: &str = "id, name, about, website, created_at, updated_at";

/// Provides CRUD operations for platforms.
pub struct PlatformRepo;

impl PlatformRepo {
    /// Create a new platform, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlatform) -> Result<Platform, sqlx::Error> {
        let query = format!(
            "INSERT INTO platforms (name, about, website)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Platform>(&query)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.website)
            .fetch_one(pool)
            .await
    }

    /// Find a platform by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Platform>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM platforms WHERE id = $1");
        sqlx::query_as::<_, Platform>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a platform by id, with the movies it owns embedded.
    pub async fn find_with_movies(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlatformWithMovies>, sqlx::Error> {
        let Some(platform) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let movies = MovieRepo::list_by_platform(pool, id).await?;
        Ok(Some(PlatformWithMovies { platform, movies }))
    }

    /// List all platforms with their movies embedded, ordered by id.
    pub async fn list_with_movies(pool: &PgPool) -> Result<Vec<PlatformWithMovies>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM platforms ORDER BY id");
        let platforms = sqlx::query_as::<_, Platform>(&query).fetch_all(pool).await?;

        let mut out = Vec::with_capacity(platforms.len());
        for platform in platforms {
            let movies = MovieRepo::list_by_platform(pool, platform.id).await?;
            out.push(PlatformWithMovies { platform, movies });
        }
        Ok(out)
    }

    /// Update a platform by id, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlatform,
    ) -> Result<Option<Platform>, sqlx::Error> {
        let query = format!(
            "UPDATE platforms SET
                name = COALESCE($2, name),
                about = COALESCE($3, about),
                website = COALESCE($4, website),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Platform>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }

    /// Delete a platform by id. Owned movies cascade at the schema level.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM platforms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
