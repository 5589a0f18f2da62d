use super::common::{
    deserialize_count, deserialize_lenient_decimal, deserialize_optional_text, PageRequest,
    DEFAULT_PAGE_SIZE,
};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Genres offered as suggestions by the add-movie form; any string is accepted
pub const SUGGESTED_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Horror",
    "Romance",
    "Sci-Fi",
    "Thriller",
];

/// A movie as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    pub release_year: i32,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
    /// Server-computed average; only meaningful when `ratings_count > 0`
    #[serde(default, alias = "average_rating", deserialize_with = "deserialize_lenient_decimal")]
    pub ratings_avg: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub ratings_count: u64,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Movie {
    /// Average rating if there is at least one rating to average
    pub fn average(&self) -> Option<f64> {
        if self.ratings_count == 0 {
            None
        } else {
            self.ratings_avg
        }
    }

    pub fn is_rated(&self) -> bool {
        self.average().is_some()
    }
}

/// Body for `POST /movies/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filters for the movie list.
///
/// Only filters that are set and non-empty reach the query string; an unset
/// filter is omitted entirely rather than sent as an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilters {
    /// Exact genre match
    pub genre: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Title substring
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl MovieFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn years(mut self, min_year: Option<i32>, max_year: Option<i32>) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Pagination after defaults (page 1, `default_limit`) are applied
    pub fn page_request(&self, default_limit: u32) -> Result<PageRequest> {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
    }

    /// Whether any content filter (not pagination) is active
    pub fn is_filtering(&self) -> bool {
        non_empty(&self.genre).is_some()
            || self.min_year.is_some()
            || self.max_year.is_some()
            || non_empty(&self.search).is_some()
    }

    /// Query pairs for `GET /movies/`; `page` and `limit` are always present
    pub fn to_query(&self, default_limit: u32) -> Result<Vec<(&'static str, String)>> {
        let mut query = self.page_request(default_limit)?.to_query();

        if let Some(genre) = non_empty(&self.genre) {
            query.push(("genre", genre.to_string()));
        }
        if let Some(min_year) = self.min_year {
            query.push(("min_year", min_year.to_string()));
        }
        if let Some(max_year) = self.max_year {
            query.push(("max_year", max_year.to_string()));
        }
        if let Some(search) = non_empty(&self.search) {
            query.push(("search", search.to_string()));
        }

        Ok(query)
    }

    /// Query with the library default page size
    pub fn default_query(&self) -> Result<Vec<(&'static str, String)>> {
        self.to_query(DEFAULT_PAGE_SIZE)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_movie_from_backend_payload() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 4,
            "title": "Top Gun",
            "genre": "Action",
            "release_year": 1986,
            "description": "",
            "created_by": 1,
            "ratings_avg": "4.50",
            "ratings_count": 2,
            "created_at": "2025-09-30T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(movie.id, 4);
        assert_eq!(movie.description, None);
        assert_eq!(movie.ratings_avg, Some(4.5));
        assert_eq!(movie.average(), Some(4.5));
        assert_eq!(movie.created_by, Some(1));
    }

    #[test]
    fn test_movie_without_aggregates() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 9,
            "title": "Fresh",
            "genre": "Drama",
            "release_year": 2024
        }))
        .unwrap();

        assert_eq!(movie.ratings_count, 0);
        assert_eq!(movie.ratings_avg, None);
        assert!(!movie.is_rated());
    }

    #[test]
    fn test_zero_count_hides_average() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 9, "title": "Fresh", "genre": "Drama", "release_year": 2024,
            "ratings_avg": "0.00", "ratings_count": 0
        }))
        .unwrap();
        assert_eq!(movie.average(), None);
    }

    #[test]
    fn test_defaults_in_query() {
        let query = MovieFilters::new().to_query(12).unwrap();
        assert_eq!(query, vec![("page", "1".to_string()), ("limit", "12".to_string())]);
    }

    #[test]
    fn test_empty_strings_are_omitted() {
        let filters = MovieFilters {
            genre: Some(String::new()),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let query = filters.default_query().unwrap();
        assert!(query.iter().all(|(k, _)| *k != "genre" && *k != "search"));
        assert!(!filters.is_filtering());
    }

    #[test]
    fn test_all_filters_present() {
        let filters = MovieFilters::new()
            .genre("Action")
            .years(Some(1980), Some(1990))
            .search("Gun")
            .page(2)
            .limit(5);
        let query = filters.default_query().unwrap();
        assert_eq!(
            query,
            vec![
                ("page", "2".to_string()),
                ("limit", "5".to_string()),
                ("genre", "Action".to_string()),
                ("min_year", "1980".to_string()),
                ("max_year", "1990".to_string()),
                ("search", "Gun".to_string()),
            ]
        );
    }

    #[test]
    fn test_inverted_year_range_is_forwarded() {
        let query = MovieFilters::new().years(Some(2000), Some(1990)).default_query().unwrap();
        assert!(query.contains(&("min_year", "2000".to_string())));
        assert!(query.contains(&("max_year", "1990".to_string())));
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(MovieFilters::new().page(0).default_query().is_err());
    }

    #[test]
    fn test_new_movie_omits_missing_description() {
        let body = serde_json::to_value(NewMovie {
            title: "T".into(),
            genre: "Action".into(),
            release_year: 1990,
            description: None,
        })
        .unwrap();
        assert_eq!(body, json!({"title": "T", "genre": "Action", "release_year": 1990}));
    }

    proptest! {
        #[test]
        fn prop_only_non_empty_filters_in_query(
            genre in proptest::option::of("[ a-zA-Z-]{0,8}"),
            search in proptest::option::of("[ a-z]{0,8}"),
            min_year in proptest::option::of(1900i32..2030),
            max_year in proptest::option::of(1900i32..2030),
            page in 1u32..50,
        ) {
            let filters = MovieFilters {
                genre: genre.clone(),
                min_year,
                max_year,
                search: search.clone(),
                page: Some(page),
                limit: None,
            };
            let query = filters.default_query().unwrap();

            for (_, value) in &query {
                prop_assert!(!value.is_empty());
            }

            let has = |key: &str| query.iter().any(|(k, _)| *k == key);
            prop_assert_eq!(has("genre"), genre.map_or(false, |g| !g.trim().is_empty()));
            prop_assert_eq!(has("search"), search.map_or(false, |s| !s.trim().is_empty()));
            prop_assert_eq!(has("min_year"), min_year.is_some());
            prop_assert_eq!(has("max_year"), max_year.is_some());
            prop_assert!(has("page") && has("limit"));
        }
    }
}
