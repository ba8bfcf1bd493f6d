//! DB-backed integration tests for the review-creation transaction: the
//! aggregate fold, the uniqueness guard, and the author-only lifecycle.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use watchbase_core::review::DUPLICATE_REVIEW_MESSAGE;
use watchbase_core::roles::{ROLE_ADMIN, ROLE_USER};
use watchbase_db::models::movie::CreateMovie;
use watchbase_db::models::platform::CreatePlatform;
use watchbase_db::models::user::CreateUser;
use watchbase_db::repositories::{MovieRepo, PlatformRepo, UserRepo};

use common::{build_test_app_with_pool, mint_token, send};

/// Insert a user and mint a matching access token.
async fn seed_user(pool: &PgPool, username: &str, role: &str) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "unused-in-these-tests".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("seed user");
    let token = mint_token(user.id, username, role);
    (user.id, token)
}

/// Insert one platform with one movie, returning the movie id.
async fn seed_movie(pool: &PgPool, title: &str) -> i64 {
    let platform = PlatformRepo::create(
        pool,
        &CreatePlatform {
            name: format!("{title} platform"),
            about: String::new(),
            website: String::new(),
        },
    )
    .await
    .expect("seed platform");

    let movie = MovieRepo::create(
        pool,
        &CreateMovie {
            platform_id: platform.id,
            title: title.to_string(),
            storyline: String::new(),
            active: true,
        },
    )
    .await
    .expect("seed movie");
    movie.id
}

/// Fetch a movie's aggregate fields through the API.
async fn movie_aggregates(app: &axum::Router, movie_id: i64) -> (f64, i64) {
    let (status, json) = send(app, Method::GET, &format!("/api/v1/{movie_id}"), None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    (
        json["data"]["avg_rating"].as_f64().unwrap(),
        json["data"]["number_rating"].as_i64().unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Aggregate fold
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn first_review_sets_average_and_count(pool: PgPool) {
    let app = build_test_app_with_pool(pool.clone());
    let (_, alice) = seed_user(&pool, "alice", ROLE_USER).await;
    let movie_id = seed_movie(&pool, "First").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 5, "description": "Great pacing" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["rating"], 5);
    assert_eq!(json["data"]["review_user"], "alice");

    assert_eq!(movie_aggregates(&app, movie_id).await, (5.0, 1));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn later_reviews_blend_at_half_weight(pool: PgPool) {
    let app = build_test_app_with_pool(pool.clone());
    let (_, alice) = seed_user(&pool, "alice", ROLE_USER).await;
    let (_, bob) = seed_user(&pool, "bob", ROLE_USER).await;
    let movie_id = seed_movie(&pool, "Blend").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 5, "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&bob),
        None,
        Some(json!({ "rating": 2, "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // (5 + 2) / 2 per the blend rule.
    assert_eq!(movie_aggregates(&app, movie_id).await, (3.5, 2));
}

// ---------------------------------------------------------------------------
// Uniqueness guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_review_is_rejected_and_aggregates_unchanged(pool: PgPool) {
    let app = build_test_app_with_pool(pool.clone());
    let (_, alice) = seed_user(&pool, "alice", ROLE_USER).await;
    let movie_id = seed_movie(&pool, "Dup").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 5, "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 1, "description": "changed my mind" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], DUPLICATE_REVIEW_MESSAGE);

    // The rejected attempt must not have touched the fold.
    assert_eq!(movie_aggregates(&app, movie_id).await, (5.0, 1));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn review_for_unknown_movie_is_404(pool: PgPool) {
    let app = build_test_app_with_pool(pool.clone());
    let (_, alice) = seed_user(&pool, "alice", ROLE_USER).await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/999999/review-create",
        Some(&alice),
        None,
        Some(json!({ "rating": 3, "description": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// End-to-end lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn review_lifecycle_end_to_end(pool: PgPool) {
    let app = build_test_app_with_pool(pool.clone());
    let (_, admin) = seed_user(&pool, "root", ROLE_ADMIN).await;
    let (_, alice) = seed_user(&pool, "alice", ROLE_USER).await;
    let (_, bob) = seed_user(&pool, "bob", ROLE_USER).await;

    // Admin creates the catalog.
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/stream",
        Some(&admin),
        None,
        Some(json!({ "name": "Netflix" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let platform_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/list",
        Some(&admin),
        None,
        Some(json!({ "platform_id": platform_id, "title": "Example Movie" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let movie_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = send(&app, Method::GET, "/api/v1/list", None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let movies = json["data"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "Example Movie");
    assert_eq!(movies[0]["platform"], "Netflix");

    // Alice reviews it once; the second attempt is rejected.
    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 5, "description": "A classic" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(movie_aggregates(&app, movie_id).await, (5.0, 1));

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/{movie_id}/review-create"),
        Some(&alice),
        None,
        Some(json!({ "rating": 4, "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Only the author may delete.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/review/{review_id}"),
        Some(&bob),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/review/{review_id}"),
        Some(&alice),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/review/{review_id}"),
        None,
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
