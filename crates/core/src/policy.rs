//! Declarative per-endpoint access policy: an authorization variant plus a
//! throttle class, attached to each route definition and evaluated by the
//! HTTP boundary before the handler's core logic runs.
//!
//! The core only declares which policy applies where; credential resolution
//! and throttle bookkeeping live in the boundary layer.

/// Authorization rule for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No credential required for any method.
    Public,
    /// Anyone may read; only admins may write.
    PublicReadAdminWrite,
    /// Anyone may read; only the owning author may modify or delete.
    PublicReadAuthorWrite,
    /// Any valid credential required.
    AuthenticatedOnly,
}

/// A named request-rate budget: at most `max_requests` within a fixed
/// `window_secs` window, tracked per requester key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleClass {
    /// Stable class name; budgets are shared by every endpoint naming the
    /// same class.
    pub name: &'static str,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Coarse budget for unauthenticated traffic, keyed by originating address.
pub const THROTTLE_ANON: ThrottleClass = ThrottleClass {
    name: "anon",
    max_requests: 20,
    window_secs: 60,
};

/// Looser budget for authenticated users, keyed by user identity.
pub const THROTTLE_USER: ThrottleClass = ThrottleClass {
    name: "user",
    max_requests: 60,
    window_secs: 60,
};

/// Scoped budget for review creation.
pub const THROTTLE_REVIEW_CREATE: ThrottleClass = ThrottleClass {
    name: "review-create",
    max_requests: 5,
    window_secs: 60,
};

/// Scoped budget shared by review list endpoints.
pub const THROTTLE_REVIEW_LIST: ThrottleClass = ThrottleClass {
    name: "review-list",
    max_requests: 30,
    window_secs: 60,
};

/// Scoped budget shared by review detail operations (GET/PUT/DELETE).
pub const THROTTLE_REVIEW_DETAIL: ThrottleClass = ThrottleClass {
    name: "review-detail",
    max_requests: 30,
    window_secs: 60,
};

/// Which budget a route draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleScope {
    /// Per-request selection: [`THROTTLE_USER`] when a credential is present,
    /// [`THROTTLE_ANON`] otherwise.
    Default,
    /// One fixed class regardless of credential.
    Scoped(ThrottleClass),
}

impl ThrottleScope {
    /// Resolve the class this scope draws from for a requester that does or
    /// does not carry a credential.
    pub fn class(self, authenticated: bool) -> ThrottleClass {
        match self {
            ThrottleScope::Scoped(class) => class,
            ThrottleScope::Default if authenticated => THROTTLE_USER,
            ThrottleScope::Default => THROTTLE_ANON,
        }
    }
}

/// Policy attachment for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub auth: AuthPolicy,
    pub throttle: ThrottleScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_classes_have_distinct_names() {
        let names = [
            THROTTLE_ANON.name,
            THROTTLE_USER.name,
            THROTTLE_REVIEW_CREATE.name,
            THROTTLE_REVIEW_LIST.name,
            THROTTLE_REVIEW_DETAIL.name,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn anon_budget_is_coarser_than_user_budget() {
        assert!(THROTTLE_ANON.max_requests < THROTTLE_USER.max_requests);
    }

    #[test]
    fn default_scope_resolves_by_credential() {
        assert_eq!(ThrottleScope::Default.class(false), THROTTLE_ANON);
        assert_eq!(ThrottleScope::Default.class(true), THROTTLE_USER);
        assert_eq!(
            ThrottleScope::Scoped(THROTTLE_REVIEW_CREATE).class(true),
            THROTTLE_REVIEW_CREATE
        );
    }
}
