//! Movie model.
//!
//! `avg_rating` and `number_rating` are derived state: the review-creation
//! transaction is their only writer, so neither the create nor the update DTO
//! carries them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use watchbase_core::types::{DbId, Timestamp};

/// A row from the `movies` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub platform_id: DbId,
    pub title: String,
    pub storyline: String,
    pub active: bool,
    pub avg_rating: f64,
    pub number_rating: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movie joined with its owning platform's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovieWithPlatform {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movie: Movie,
    /// The owning platform's name.
    pub platform: String,
}

/// DTO for creating a movie.
#[derive(Debug, Deserialize)]
pub struct CreateMovie {
    pub platform_id: DbId,
    pub title: String,
    #[serde(default)]
    pub storyline: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating a movie. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateMovie {
    pub platform_id: Option<DbId>,
    pub title: Option<String>,
    pub storyline: Option<String>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}
