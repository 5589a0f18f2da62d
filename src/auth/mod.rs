//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Session context and bearer token storage
//! - User registration and login
//! - Local logout

pub mod handlers;
pub mod models;
pub mod session;

pub use handlers::AuthApi;
pub use models::{TokenResponse, User};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
