//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod movie_repo;
pub mod platform_repo;
pub mod review_repo;
pub mod user_repo;

pub use movie_repo::MovieRepo;
pub use platform_repo::PlatformRepo;
pub use review_repo::{ReviewCreateError, ReviewRepo};
pub use user_repo::UserRepo;
