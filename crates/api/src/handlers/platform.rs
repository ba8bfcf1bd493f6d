//! Handlers for the `/stream` resource (streaming platforms).
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use watchbase_core::error::CoreError;
use watchbase_core::types::DbId;
use watchbase_db::models::platform::{CreatePlatform, UpdatePlatform};
use watchbase_db::repositories::PlatformRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stream
///
/// List all platforms with their movies embedded.
pub async fn list_platforms(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let platforms = PlatformRepo::list_with_movies(&state.pool).await?;
    Ok(Json(DataResponse { data: platforms }))
}

/// POST /api/v1/stream
///
/// Create a platform. Admin only.
pub async fn create_platform(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePlatform>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Platform name must not be empty".into(),
        )));
    }

    let platform = PlatformRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        platform_id = platform.id,
        name = %platform.name,
        "Platform created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: platform })))
}

/// GET /api/v1/stream/{id}
///
/// Fetch one platform with its movies embedded.
pub async fn get_platform(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let platform = PlatformRepo::find_with_movies(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Platform",
            id,
        }))?;
    Ok(Json(DataResponse { data: platform }))
}

/// PUT /api/v1/stream/{id}
///
/// Update a platform. Admin only.
pub async fn update_platform(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlatform>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Platform name must not be empty".into(),
            )));
        }
    }

    let platform = PlatformRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Platform",
            id,
        }))?;

    tracing::info!(user_id = admin.user_id, platform_id = id, "Platform updated");

    Ok(Json(DataResponse { data: platform }))
}

/// DELETE /api/v1/stream/{id}
///
/// Delete a platform and, by cascade, its movies. Admin only.
pub async fn delete_platform(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PlatformRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Platform",
            id,
        }));
    }

    tracing::info!(user_id = admin.user_id, platform_id = id, "Platform deleted");

    Ok(StatusCode::NO_CONTENT)
}
