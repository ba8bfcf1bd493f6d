//! Handlers for movie listing and CRUD.
//!
//! `/list` is the unpaginated listing; `/list2` serves the same collection
//! through cursor pagination in creation order. Writes require the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use watchbase_core::error::CoreError;
use watchbase_core::pagination::{CursorPagination, Paginator, WindowParams, CURSOR_PAGE_SIZE};
use watchbase_core::types::DbId;
use watchbase_db::models::movie::{CreateMovie, UpdateMovie};
use watchbase_db::repositories::MovieRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::CursorParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Windowing strategy for `/list2`.
const MOVIE_LIST_PAGINATOR: Paginator = Paginator::Cursor(CursorPagination {
    page_size: CURSOR_PAGE_SIZE,
});

/// GET /api/v1/list
///
/// List all movies, unpaginated, ordered by id.
pub async fn list_movies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movies = MovieRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /api/v1/list2?record=
///
/// List movies through cursor pagination, ordered by creation time.
pub async fn list_movies_cursor(
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
) -> AppResult<impl IntoResponse> {
    let movies = MovieRepo::list_by_created(&state.pool).await?;
    let window = WindowParams {
        record: params.record,
        ..Default::default()
    };
    let page = MOVIE_LIST_PAGINATOR.paginate(
        movies,
        |m| m.movie.created_at.timestamp_micros(),
        &window,
    )?;
    Ok(Json(PageResponse::from(page)))
}

/// POST /api/v1/list
///
/// Create a movie under a platform. Admin only.
pub async fn create_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Movie title must not be empty".into(),
        )));
    }

    let movie = MovieRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        movie_id = movie.id,
        platform_id = movie.platform_id,
        title = %movie.title,
        "Movie created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: movie })))
}

/// GET /api/v1/{movie_id}
///
/// Fetch a single movie with its platform name.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;
    Ok(Json(DataResponse { data: movie }))
}

/// PUT /api/v1/{movie_id}
///
/// Update a movie. Admin only. The rating aggregates are not client-writable;
/// the update DTO simply has no fields for them.
pub async fn update_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Movie title must not be empty".into(),
            )));
        }
    }

    let movie = MovieRepo::update(&state.pool, movie_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    tracing::info!(user_id = admin.user_id, movie_id, "Movie updated");

    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/{movie_id}
///
/// Delete a movie and, by cascade, its reviews. Admin only.
pub async fn delete_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = MovieRepo::delete(&state.pool, movie_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }));
    }

    tracing::info!(user_id = admin.user_id, movie_id, "Movie deleted");

    Ok(StatusCode::NO_CONTENT)
}
