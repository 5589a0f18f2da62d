//! Movie detail page state: the movie, its ratings, and the rating form

use crate::api::models::{Movie, Page, Rating, DEFAULT_PAGE_SIZE, MAX_RATING, MIN_RATING};
use crate::api::MovieRaterClient;
use crate::core::error::{RaterError, Result};

/// Rating form input
#[derive(Debug, Clone, Default)]
pub struct RatingForm {
    /// Selected star value; `None` until the user picks one
    pub rating: Option<i64>,
    pub review: String,
    pub submitting: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl RatingForm {
    /// Input-control check: a value must be picked and lie in 1..=5
    pub fn validate(&self) -> Result<i64> {
        match self.rating {
            None => Err(RaterError::InvalidInput("Please select a rating.".to_string())),
            Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(RaterError::InvalidInput(format!(
                "Rating must be between {} and {}.",
                MIN_RATING, MAX_RATING
            ))),
            Some(r) => Ok(r),
        }
    }

    fn reset_input(&mut self) {
        self.rating = None;
        self.review.clear();
    }
}

#[derive(Debug)]
pub struct MovieDetailView {
    pub movie_id: u64,
    pub movie: Option<Movie>,
    pub ratings: Page<Rating>,
    pub ratings_page: u32,
    pub ratings_limit: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub form: RatingForm,
    pub deleting: bool,
    pub deleted: bool,
}

impl MovieDetailView {
    pub fn new(movie_id: u64) -> Self {
        Self {
            movie_id,
            movie: None,
            ratings: Page::empty(),
            ratings_page: 1,
            ratings_limit: DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
            form: RatingForm::default(),
            deleting: false,
            deleted: false,
        }
    }

    /// Fetch movie and ratings concurrently; both must succeed
    pub async fn load(&mut self, client: &MovieRaterClient) {
        self.loading = true;
        self.error = None;

        match client
            .movie_with_ratings(self.movie_id, self.ratings_page, self.ratings_limit)
            .await
        {
            Ok((movie, ratings)) => {
                self.movie = Some(movie);
                self.ratings = ratings;
            }
            Err(e) => {
                tracing::warn!(movie_id = self.movie_id, error = %e, "Failed to load movie details");
                self.error = Some(e.user_message());
            }
        }

        self.loading = false;
    }

    /// Submit the rating form, then re-fetch so aggregates and the ratings
    /// list reflect the new rating. Returns whether the rating was saved.
    pub async fn submit_rating(&mut self, client: &MovieRaterClient) -> bool {
        if self.form.submitting {
            return false;
        }

        let rating = match self.form.validate() {
            Ok(r) => r,
            Err(e) => {
                self.form.error = Some(e.user_message());
                return false;
            }
        };

        self.form.submitting = true;
        self.form.error = None;
        self.form.notice = None;

        let review = self.form.review.clone();
        let saved = client
            .ratings()
            .rate_movie(self.movie_id, rating, Some(&review))
            .await;

        let ok = match saved {
            Ok(_) => {
                self.form.reset_input();
                self.form.notice = Some("Thanks! Your rating was saved.".to_string());
                self.load(client).await;
                true
            }
            Err(e) => {
                tracing::warn!(movie_id = self.movie_id, error = %e, "Rating submission failed");
                self.form.error = Some(e.user_message());
                false
            }
        };

        self.form.submitting = false;
        ok
    }

    /// Delete the movie (creator only)
    pub async fn delete_movie(&mut self, client: &MovieRaterClient) -> bool {
        if self.deleting {
            return false;
        }
        self.deleting = true;
        self.error = None;

        let result = client.catalog().delete_movie(self.movie_id).await;
        match &result {
            Ok(()) => {
                self.deleted = true;
                self.movie = None;
            }
            Err(RaterError::Unauthorized(_)) => {
                self.error = Some("You are not allowed to delete this movie.".to_string());
            }
            Err(e) => self.error = Some(e.user_message()),
        }

        self.deleting = false;
        result.is_ok()
    }
}
