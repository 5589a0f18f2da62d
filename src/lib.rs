//! Movie Rater client library
//!
//! This library provides a typed client for the movie rating REST API,
//! including the session/token store, catalog and rating queries,
//! authentication, and the view-state layer used by front ends.

pub mod api;
pub mod auth;
pub mod core;
pub mod views;

// Re-export commonly used types
pub use crate::core::{Config, RaterError, Result};
pub use api::models::{Movie, MovieFilters, NewMovie, Page, Rating};
pub use api::MovieRaterClient;
pub use auth::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
