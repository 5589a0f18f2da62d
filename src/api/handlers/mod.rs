pub mod movies;
pub mod ratings;

pub use movies::CatalogApi;
pub use ratings::RatingApi;
