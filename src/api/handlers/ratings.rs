use super::movies::{not_found_as, positive_id};
use crate::api::client::HttpClient;
use crate::api::models::{normalize_page, Page, PageRequest, RateMovieRequest, RateMovieResponse, Rating};
use crate::core::error::Result;

/// Rating calls scoped to a movie or a user
#[derive(Debug, Clone)]
pub struct RatingApi {
    client: HttpClient,
}

impl RatingApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// POST /movies/{id}/ratings/ - Rate a movie (requires login).
    ///
    /// `rating` is forwarded unclamped; the backend answers out-of-range
    /// values with a validation error. Rating the same movie again replaces
    /// the caller's earlier rating. Aggregates are not recomputed here:
    /// re-fetch the movie to see them.
    pub async fn rate_movie(&self, movie_id: u64, rating: i64, review: Option<&str>) -> Result<Rating> {
        let id = positive_id("movie", movie_id)?;
        self.client.require_token()?;

        let req = RateMovieRequest::new(rating, review);
        tracing::info!(movie_id, rating, has_review = req.review.is_some(), "Submitting rating");

        let response: RateMovieResponse = self
            .client
            .post_json(&["movies", &id, "ratings"], &req)
            .await
            .map_err(|e| not_found_as(e, || format!("Movie {} not found", movie_id)))?;

        let rating = response.into_rating();
        tracing::info!(movie_id, rating_id = rating.id, "Rating saved");
        Ok(rating)
    }

    /// GET /movies/{id}/ratings/ - Ratings for one movie
    pub async fn list_movie_ratings(&self, movie_id: u64, page: u32, limit: u32) -> Result<Page<Rating>> {
        let id = positive_id("movie", movie_id)?;
        self.list(&["movies", &id, "ratings"], PageRequest::new(page, limit)?)
            .await
            .map_err(|e| not_found_as(e, || format!("Movie {} not found", movie_id)))
    }

    /// GET /users/{id}/ratings/ - Ratings written by one user
    pub async fn list_user_ratings(&self, user_id: u64, page: u32, limit: u32) -> Result<Page<Rating>> {
        let id = positive_id("user", user_id)?;
        self.list(&["users", &id, "ratings"], PageRequest::new(page, limit)?)
            .await
            .map_err(|e| not_found_as(e, || format!("User {} not found", user_id)))
    }

    async fn list(&self, segments: &[&str], requested: PageRequest) -> Result<Page<Rating>> {
        let body = self.client.get_value(segments, &requested.to_query()).await?;
        normalize_page(body, requested)
    }
}
