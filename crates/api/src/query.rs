//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Cursor pagination parameters (`?record=`).
#[derive(Debug, Default, Deserialize)]
pub struct CursorParams {
    pub record: Option<String>,
}
