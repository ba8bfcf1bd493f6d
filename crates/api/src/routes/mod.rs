pub mod health;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::routing::{get, post};
use axum::Router;
use watchbase_core::policy::{
    AuthPolicy, RoutePolicy, ThrottleScope, THROTTLE_REVIEW_CREATE, THROTTLE_REVIEW_DETAIL,
    THROTTLE_REVIEW_LIST,
};

use crate::handlers;
use crate::middleware::throttle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Route policies
// ---------------------------------------------------------------------------
//
// One policy constant per route group. The throttle axis is enforced here via
// a `route_layer`; the auth axis is realized by the extractor each handler
// takes (`AuthUser` for AuthenticatedOnly, `RequireAdmin` on the write
// handlers of PublicReadAdminWrite groups, an in-handler author check for
// PublicReadAuthorWrite).

/// `/auth/*`: open endpoints, shared default budget.
const AUTH_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::Public,
    throttle: ThrottleScope::Default,
};

/// `/list`, `/list2`, `/{movie_id}`: public reads, admin writes.
const MOVIE_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::PublicReadAdminWrite,
    throttle: ThrottleScope::Default,
};

/// `/stream`, `/stream/{id}`: public reads, admin writes.
const PLATFORM_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::PublicReadAdminWrite,
    throttle: ThrottleScope::Default,
};

/// `/{movie_id}/review-create`: any authenticated user, tight budget.
const REVIEW_CREATE_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::AuthenticatedOnly,
    throttle: ThrottleScope::Scoped(THROTTLE_REVIEW_CREATE),
};

/// `/{movie_id}/reviews` and `/reviews`: public list endpoints.
const REVIEW_LIST_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::Public,
    throttle: ThrottleScope::Scoped(THROTTLE_REVIEW_LIST),
};

/// `/review/{id}`: public read, author-only write.
const REVIEW_DETAIL_POLICY: RoutePolicy = RoutePolicy {
    auth: AuthPolicy::PublicReadAuthorWrite,
    throttle: ThrottleScope::Scoped(THROTTLE_REVIEW_DETAIL),
};

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
///
/// /list                               list movies, create movie (admin)
/// /list2                              cursor-paginated movie list
/// /{movie_id}                         get, update (admin), delete (admin)
///
/// /stream                             list platforms, create (admin)
/// /stream/{id}                        get, update (admin), delete (admin)
///
/// /{movie_id}/review-create           create review (authenticated)
/// /{movie_id}/reviews                 list a movie's reviews
/// /review/{id}                        get, update (author), delete (author)
/// /reviews?username=                  list a user's reviews
/// ```
///
/// The `state` parameter feeds the throttle layers; handler state is still
/// provided by the caller via `with_state`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let throttled = |policy: RoutePolicy| {
        let scope = policy.throttle;
        middleware::from_fn_with_state(
            state.clone(),
            move |s: State<AppState>, req: Request, next: Next| throttle::enforce(scope, s, req, next),
        )
    };

    let auth_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route_layer(throttled(AUTH_POLICY));

    let movie_routes = Router::new()
        .route(
            "/list",
            get(handlers::movie::list_movies).post(handlers::movie::create_movie),
        )
        .route("/list2", get(handlers::movie::list_movies_cursor))
        .route(
            "/{movie_id}",
            get(handlers::movie::get_movie)
                .put(handlers::movie::update_movie)
                .delete(handlers::movie::delete_movie),
        )
        .route_layer(throttled(MOVIE_POLICY));

    let platform_routes = Router::new()
        .route(
            "/stream",
            get(handlers::platform::list_platforms).post(handlers::platform::create_platform),
        )
        .route(
            "/stream/{id}",
            get(handlers::platform::get_platform)
                .put(handlers::platform::update_platform)
                .delete(handlers::platform::delete_platform),
        )
        .route_layer(throttled(PLATFORM_POLICY));

    let review_create_routes = Router::new()
        .route(
            "/{movie_id}/review-create",
            post(handlers::review::create_review),
        )
        .route_layer(throttled(REVIEW_CREATE_POLICY));

    let review_list_routes = Router::new()
        .route(
            "/{movie_id}/reviews",
            get(handlers::review::list_movie_reviews),
        )
        .route("/reviews", get(handlers::review::list_user_reviews))
        .route_layer(throttled(REVIEW_LIST_POLICY));

    let review_detail_routes = Router::new()
        .route(
            "/review/{id}",
            get(handlers::review::get_review)
                .put(handlers::review::update_review)
                .delete(handlers::review::delete_review),
        )
        .route_layer(throttled(REVIEW_DETAIL_POLICY));

    Router::new()
        .merge(auth_routes)
        .merge(movie_routes)
        .merge(platform_routes)
        .merge(review_create_routes)
        .merge(review_list_routes)
        .merge(review_detail_routes)
}
