//! User model. Credentials are resolved by the auth layer; the rest of the
//! system references users by immutable id.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use watchbase_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// The password hash never leaves this crate's consumers; it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
