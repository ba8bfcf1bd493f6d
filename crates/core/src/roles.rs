//! Role names stored in the `users.role` column and embedded in JWT claims.

/// Full write access to platforms and movies.
pub const ROLE_ADMIN: &str = "admin";

/// Regular authenticated user; may author reviews.
pub const ROLE_USER: &str = "user";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Check whether a role name is one of the known roles.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
