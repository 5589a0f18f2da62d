//! Core infrastructure module
//!
//! This module provides the ambient layer shared by the API clients and views:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Request sequencing for superseded fetches

pub mod config;
pub mod error;
pub mod logging;
pub mod sequence;

pub use config::{Config, ConfigArgs};
pub use error::{RaterError, Result};
pub use logging::Logger;
pub use sequence::{RequestSequencer, Ticket};
