pub mod movie;
pub mod platform;
pub mod review;
pub mod user;
