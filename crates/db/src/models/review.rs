//! Review model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use watchbase_core::types::{DbId, Timestamp};

/// A row from the `reviews` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: DbId,
    pub movie_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub description: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review joined with its author's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    /// The authoring user's username.
    pub review_user: String,
}

/// DTO for creating a review. The movie and author come from the route and
/// the authenticated identity, never from the body.
#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub rating: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// DTO for updating a review. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Filters accepted by the per-movie review list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    /// Restrict to reviews authored by this username.
    pub username: Option<String>,
    /// Restrict by the review's active flag.
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}
