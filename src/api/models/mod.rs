pub mod common;
pub mod movies;
pub mod ratings;

pub use common::*;
pub use movies::*;
pub use ratings::*;
