use crate::api::client::HttpClient;
use crate::api::models::{normalize_page, Movie, MovieFilters, NewMovie, Page};
use crate::core::error::{RaterError, Result};

/// Movie catalog calls against `/movies/`
#[derive(Debug, Clone)]
pub struct CatalogApi {
    client: HttpClient,
    default_limit: u32,
}

impl CatalogApi {
    pub fn new(client: HttpClient, default_limit: u32) -> Self {
        Self {
            client,
            default_limit,
        }
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// GET /movies/ - Filtered, paginated movie list
    pub async fn list_movies(&self, filters: &MovieFilters) -> Result<Page<Movie>> {
        let requested = filters.page_request(self.default_limit)?;
        let query = filters.to_query(self.default_limit)?;

        tracing::debug!(page = requested.page, limit = requested.limit, filtering = filters.is_filtering(), "Listing movies");

        let body = self.client.get_value(&["movies"], &query).await?;
        let page: Page<Movie> = normalize_page(body, requested)?;

        tracing::debug!(returned = page.items.len(), total = page.total, pages = page.pages, "Movies listed");
        Ok(page)
    }

    /// GET /movies/{id}/ - Single movie
    pub async fn get_movie(&self, id: u64) -> Result<Movie> {
        let id = positive_id("movie", id)?;
        self.client
            .get_json(&["movies", &id])
            .await
            .map_err(|e| not_found_as(e, || format!("Movie {} not found", id)))
    }

    /// POST /movies/ - Add a movie (requires login).
    ///
    /// Returns the created movie only; lists must be re-queried to show it.
    pub async fn create_movie(&self, movie: &NewMovie) -> Result<Movie> {
        self.client.require_token()?;

        tracing::info!(title = %movie.title, genre = %movie.genre, release_year = movie.release_year, "Creating movie");
        let created: Movie = self.client.post_json(&["movies"], movie).await?;
        tracing::info!(movie_id = created.id, "Movie created");
        Ok(created)
    }

    /// DELETE /movies/{id}/ - Remove a movie (creator only)
    pub async fn delete_movie(&self, id: u64) -> Result<()> {
        let id = positive_id("movie", id)?;
        self.client.require_token()?;

        tracing::info!(movie_id = %id, "Deleting movie");
        self.client
            .delete(&["movies", &id])
            .await
            .map_err(|e| not_found_as(e, || format!("Movie {} not found", id)))?;
        tracing::info!(movie_id = %id, "Movie deleted");
        Ok(())
    }
}

/// Reject id 0 locally and render the id as a path segment
pub(crate) fn positive_id(kind: &str, id: u64) -> Result<String> {
    if id == 0 {
        Err(RaterError::InvalidInput(format!("{} id must be a positive integer", kind)))
    } else {
        Ok(id.to_string())
    }
}

/// Replace the backend's generic 404 text with one naming the resource
pub(crate) fn not_found_as(err: RaterError, message: impl FnOnce() -> String) -> RaterError {
    match err {
        RaterError::NotFound(_) => RaterError::NotFound(message()),
        other => other,
    }
}
