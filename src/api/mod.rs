//! REST API client module
//!
//! Provides the HTTP wrapper, the typed models, and the catalog and rating
//! layers, plus [`MovieRaterClient`] which wires them to a single session.

pub mod client;
pub mod handlers;
pub mod models;

pub use client::HttpClient;
pub use handlers::{CatalogApi, RatingApi};

use crate::auth::{AuthApi, Session};
use crate::core::config::{ApiConfig, Config};
use crate::core::error::Result;
use models::{Movie, Page, Rating};

/// All API layers sharing one HTTP client and one session
#[derive(Debug, Clone)]
pub struct MovieRaterClient {
    http: HttpClient,
    catalog: CatalogApi,
    ratings: RatingApi,
    auth: AuthApi,
}

impl MovieRaterClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self> {
        let http = HttpClient::new(config, session)?;
        Ok(Self {
            catalog: CatalogApi::new(http.clone(), config.default_page_size),
            ratings: RatingApi::new(http.clone()),
            auth: AuthApi::new(http.clone()),
            http,
        })
    }

    /// Build the client and the configured token store
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api, Session::from_config(&config.session))
    }

    pub fn catalog(&self) -> &CatalogApi {
        &self.catalog
    }

    pub fn ratings(&self) -> &RatingApi {
        &self.ratings
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    /// Fetch a movie and the first page of its ratings concurrently.
    /// Both must succeed; the first error is returned.
    pub async fn movie_with_ratings(&self, movie_id: u64, page: u32, limit: u32) -> Result<(Movie, Page<Rating>)> {
        tokio::try_join!(
            self.catalog.get_movie(movie_id),
            self.ratings.list_movie_ratings(movie_id, page, limit),
        )
    }
}
