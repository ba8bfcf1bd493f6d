//! Per-endpoint request throttling.
//!
//! Routes attach a [`ThrottleClass`] from `watchbase_core::policy` via
//! [`enforce`]; the [`ThrottleRegistry`] in [`AppState`] keeps fixed-window
//! request counts per `(class, requester)` pair for the life of the process.
//!
//! The requester key is the validated user identity when the request carries
//! a Bearer token that checks out, and the originating address otherwise.
//! A token that fails validation counts against the per-address anon budget
//! like any other unauthenticated request, so unverified credentials cannot
//! buy a looser budget or a fresh counter.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use watchbase_core::error::CoreError;
use watchbase_core::policy::{ThrottleClass, ThrottleScope};

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Entry count above which expired windows are swept on insert.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counters keyed by `(class name, requester key)`.
#[derive(Debug, Default)]
pub struct ThrottleRegistry {
    windows: Mutex<HashMap<(&'static str, String), Window>>,
}

impl ThrottleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request against `class` for `key`, rejecting it if the
    /// class's budget for the current window is already spent.
    pub fn check(&self, class: &ThrottleClass, key: &str) -> Result<(), CoreError> {
        self.check_at(class, key, Instant::now())
    }

    fn check_at(&self, class: &ThrottleClass, key: &str, now: Instant) -> Result<(), CoreError> {
        let window_len = Duration::from_secs(class.window_secs);
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        if windows.len() > PRUNE_THRESHOLD {
            // One hour bounds every configured window length.
            let horizon = Duration::from_secs(3600);
            windows.retain(|_, w| now.duration_since(w.started) < horizon);
        }

        let window = windows
            .entry((class.name, key.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now.duration_since(window.started) >= window_len {
            window.started = now;
            window.count = 0;
        }

        if window.count >= class.max_requests {
            tracing::warn!(class = class.name, key, "Request throttled");
            return Err(CoreError::RateLimited(class.name));
        }

        window.count += 1;
        Ok(())
    }
}

/// Axum middleware enforcing one route's throttle scope.
///
/// Attach per route group:
///
/// ```ignore
/// .route_layer(middleware::from_fn_with_state(state, move |s, req, next| {
///     enforce(REVIEW_CREATE_POLICY.throttle, s, req, next)
/// }))
/// ```
pub async fn enforce(
    scope: ThrottleScope,
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (key, authenticated) = requester_key(&req, &state.config.jwt);
    let class = scope.class(authenticated);
    if let Err(e) = state.throttle.check(&class, &key) {
        return AppError::Core(e).into_response();
    }
    next.run(req).await
}

/// Derive the throttle key for a request, plus whether it carries a verified
/// credential.
///
/// Only a Bearer token that validates keys by user identity; an absent or
/// invalid token falls through to `x-forwarded-for`, then the peer address.
fn requester_key(req: &Request, jwt: &JwtConfig) -> (String, bool) {
    if let Some(token) = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        if let Ok(claims) = validate_token(token, jwt) {
            return (format!("user:{}", claims.sub), true);
        }
    }
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        return (format!("ip:{}", forwarded.trim()), false);
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return (format!("ip:{}", addr.ip()), false);
    }
    ("ip:unknown".to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::Body;
    use watchbase_core::policy::THROTTLE_ANON;
    use watchbase_core::roles::ROLE_USER;

    use crate::auth::jwt::generate_access_token;

    const TEST_CLASS: ThrottleClass = ThrottleClass {
        name: "test",
        max_requests: 3,
        window_secs: 60,
    };

    #[test]
    fn allows_up_to_the_budget_then_rejects() {
        let registry = ThrottleRegistry::new();
        let t0 = Instant::now();

        for _ in 0..3 {
            assert!(registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).is_ok());
        }
        assert_matches!(
            registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0),
            Err(CoreError::RateLimited("test"))
        );
    }

    #[test]
    fn budget_resets_after_the_window() {
        let registry = ThrottleRegistry::new();
        let t0 = Instant::now();

        for _ in 0..3 {
            registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).unwrap();
        }
        assert!(registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).is_err());

        let later = t0 + Duration::from_secs(TEST_CLASS.window_secs);
        assert!(registry.check_at(&TEST_CLASS, "ip:1.2.3.4", later).is_ok());
    }

    #[test]
    fn budgets_are_tracked_per_key() {
        let registry = ThrottleRegistry::new();
        let t0 = Instant::now();

        for _ in 0..3 {
            registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).unwrap();
        }
        assert!(registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).is_err());
        assert!(registry.check_at(&TEST_CLASS, "ip:5.6.7.8", t0).is_ok());
    }

    #[test]
    fn budgets_are_tracked_per_class() {
        let registry = ThrottleRegistry::new();
        let t0 = Instant::now();

        for _ in 0..3 {
            registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).unwrap();
        }
        assert!(registry.check_at(&TEST_CLASS, "ip:1.2.3.4", t0).is_err());
        assert!(registry.check_at(&THROTTLE_ANON, "ip:1.2.3.4", t0).is_ok());
    }

    fn test_jwt() -> JwtConfig {
        JwtConfig {
            secret: "throttle-test-secret".into(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn valid_token_keys_by_user_identity() {
        let jwt = test_jwt();
        let token = generate_access_token(7, "alice", ROLE_USER, &jwt).unwrap();

        let req = Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();

        assert_eq!(requester_key(&req, &jwt), ("user:7".to_string(), true));
    }

    #[test]
    fn invalid_token_falls_back_to_the_address_key() {
        let req = Request::builder()
            .header("authorization", "Bearer not-a-jwt")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            requester_key(&req, &test_jwt()),
            ("ip:1.2.3.4".to_string(), false)
        );
    }

    #[test]
    fn token_signed_with_another_secret_counts_as_anonymous() {
        let other = JwtConfig {
            secret: "a-different-secret".into(),
            access_token_expiry_mins: 60,
        };
        let token = generate_access_token(7, "alice", ROLE_USER, &other).unwrap();

        let req = Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            requester_key(&req, &test_jwt()),
            ("ip:1.2.3.4".to_string(), false)
        );
    }
}
