//! Handlers for reviews: creation with aggregate update, listing, and
//! author-only detail operations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use watchbase_core::error::CoreError;
use watchbase_core::pagination::{
    LimitOffsetPagination, PageNumberPagination, PageSelector, Paginator, WindowParams,
    DEFAULT_LIMIT, DEFAULT_PAGE_SIZE, MAX_LIMIT, MAX_PAGE_SIZE,
};
use watchbase_core::rating::validate_rating;
use watchbase_core::review::{validate_description, DUPLICATE_REVIEW_MESSAGE};
use watchbase_core::types::DbId;
use watchbase_db::models::review::{CreateReview, ReviewFilter, UpdateReview};
use watchbase_db::repositories::{ReviewCreateError, ReviewRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Windowing strategy for `/{movie_id}/reviews`.
const MOVIE_REVIEWS_PAGINATOR: Paginator = Paginator::PageNumber(PageNumberPagination {
    page_size: DEFAULT_PAGE_SIZE,
    max_page_size: MAX_PAGE_SIZE,
});

/// Windowing strategy for `/reviews`.
const USER_REVIEWS_PAGINATOR: Paginator = Paginator::LimitOffset(LimitOffsetPagination {
    default_limit: DEFAULT_LIMIT,
    max_limit: MAX_LIMIT,
});

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the per-movie review list: author/active filters plus
/// page-number pagination keys.
#[derive(Debug, Deserialize)]
pub struct MovieReviewParams {
    pub username: Option<String>,
    pub active: Option<bool>,
    pub p: Option<String>,
    pub size: Option<usize>,
}

/// Query parameters for the per-user review list: the author plus
/// limit-offset pagination keys.
#[derive(Debug, Deserialize)]
pub struct UserReviewParams {
    pub username: Option<String>,
    pub limit: Option<usize>,
    pub start: Option<usize>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/{movie_id}/review-create
///
/// Create a review for a movie as the authenticated user. Runs the
/// uniqueness guard and folds the rating into the movie's aggregate inside
/// one transaction.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    validate_rating(input.rating)?;
    validate_description(&input.description)?;

    let review = ReviewRepo::create_for_movie(&state.pool, movie_id, auth.user_id, &input)
        .await
        .map_err(|e| match e {
            ReviewCreateError::MovieNotFound => AppError::Core(CoreError::NotFound {
                entity: "Movie",
                id: movie_id,
            }),
            ReviewCreateError::Duplicate => {
                AppError::Core(CoreError::Validation(DUPLICATE_REVIEW_MESSAGE.into()))
            }
            ReviewCreateError::Db(e) => AppError::Database(e),
        })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/{movie_id}/reviews?username=&active=&p=&size=
///
/// List a movie's reviews with optional author/active filters, windowed by
/// page-number pagination. An unknown movie id yields an empty list.
pub async fn list_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Query(params): Query<MovieReviewParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ReviewFilter {
        username: params.username,
        active: params.active,
    };
    let reviews = ReviewRepo::list_by_movie(&state.pool, movie_id, &filter).await?;

    let window = WindowParams {
        page: params.p.as_deref().map(PageSelector::parse),
        size: params.size,
        ..Default::default()
    };
    let page = MOVIE_REVIEWS_PAGINATOR.paginate(
        reviews,
        |r| r.review.created_at.timestamp_micros(),
        &window,
    )?;
    Ok(Json(PageResponse::from(page)))
}

/// GET /api/v1/reviews?username=&limit=&start=
///
/// List every review authored by the given user, windowed by limit-offset
/// pagination.
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Query(params): Query<UserReviewParams>,
) -> AppResult<impl IntoResponse> {
    let username = params.username.as_deref().unwrap_or("").trim();
    if username.is_empty() {
        return Err(AppError::BadRequest(
            "Query parameter 'username' is required".into(),
        ));
    }

    let reviews = ReviewRepo::list_by_username(&state.pool, username).await?;

    let window = WindowParams {
        limit: params.limit,
        start: params.start,
        ..Default::default()
    };
    let page = USER_REVIEWS_PAGINATOR.paginate(
        reviews,
        |r| r.review.created_at.timestamp_micros(),
        &window,
    )?;
    Ok(Json(PageResponse::from(page)))
}

/// GET /api/v1/review/{id}
///
/// Fetch one review. Public.
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;
    Ok(Json(DataResponse { data: review }))
}

/// PUT /api/v1/review/{id}
///
/// Update a review. Only the authoring user may modify it; updates do not
/// re-run the rating aggregate.
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }
    if let Some(ref description) = input.description {
        validate_description(description)?;
    }

    require_author(&state, id, &auth).await?;

    let review = ReviewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    tracing::info!(user_id = auth.user_id, review_id = id, "Review updated");

    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/review/{id}
///
/// Delete a review. Only the authoring user may delete it.
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_author(&state, id, &auth).await?;

    let deleted = ReviewRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }));
    }

    tracing::info!(user_id = auth.user_id, review_id = id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Object-level check: the review exists and `auth` is its author.
async fn require_author(state: &AppState, review_id: DbId, auth: &AuthUser) -> AppResult<()> {
    let review = ReviewRepo::find_by_id(&state.pool, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    if review.review.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the review's author may modify it".into(),
        )));
    }
    Ok(())
}
