//! Streaming platform model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use watchbase_core::types::{DbId, Timestamp};

use crate::models::movie::MovieWithPlatform;

/// A row from the `platforms` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Platform {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub website: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A platform together with the movies it owns, as rendered by the platform
/// list and detail endpoints.
#[derive(Debug, Serialize)]
pub struct PlatformWithMovies {
    #[serde(flatten)]
    pub platform: Platform,
    pub movies: Vec<MovieWithPlatform>,
}

/// DTO for creating a platform.
#[derive(Debug, Deserialize)]
pub struct CreatePlatform {
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub website: String,
}

/// DTO for updating a platform. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePlatform {
    pub name: Option<String>,
    pub about: Option<String>,
    pub website: Option<String>,
}
