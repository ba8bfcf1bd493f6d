pub mod auth;
pub mod movie;
pub mod platform;
pub mod review;
