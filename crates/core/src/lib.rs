//! Domain logic for the watchbase movie-review catalog.
//!
//! This crate has no internal dependencies and no I/O. It holds the pieces of
//! the system that are pure logic: the rating aggregation rule, review
//! validation, the three pagination strategies, and the per-endpoint access
//! policy declarations that the HTTP boundary evaluates.

pub mod error;
pub mod pagination;
pub mod policy;
pub mod rating;
pub mod review;
pub mod roles;
pub mod types;
