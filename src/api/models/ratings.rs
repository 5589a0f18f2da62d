use super::common::deserialize_optional_text;
use super::movies::Movie;
use serde::{Deserialize, Deserializer, Serialize};

/// Lowest accepted rating value
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating value
pub const MAX_RATING: i64 = 5;

/// A single user's rating of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: u64,
    pub rating: i64,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub review: Option<String>,
    #[serde(default)]
    pub user: RatingAuthor,
    #[serde(default)]
    pub movie: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Rating {
    /// Whether the value lies in the accepted range
    pub fn in_range(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

/// Who wrote a rating.
///
/// The backend sends either the username, the numeric id, or an object with
/// both; all three shapes land here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingAuthor {
    pub id: Option<u64>,
    pub username: Option<String>,
}

impl RatingAuthor {
    pub fn display_name(&self) -> String {
        match (&self.username, self.id) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(id)) => format!("user #{}", id),
            _ => "anonymous".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorShape {
    Name(String),
    Id(u64),
    Full {
        #[serde(default, alias = "user_id")]
        id: Option<u64>,
        #[serde(default, alias = "name")]
        username: Option<String>,
    },
}

impl<'de> Deserialize<'de> for RatingAuthor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let shape: Option<AuthorShape> = Deserialize::deserialize(deserializer)?;
        Ok(match shape {
            Some(AuthorShape::Name(username)) => RatingAuthor {
                id: None,
                username: Some(username),
            },
            Some(AuthorShape::Id(id)) => RatingAuthor {
                id: Some(id),
                username: None,
            },
            Some(AuthorShape::Full { id, username }) => RatingAuthor { id, username },
            None => RatingAuthor::default(),
        })
    }
}

/// Body for `POST /movies/{id}/ratings/`.
///
/// `rating` is forwarded exactly as given; range checks belong to the
/// backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateMovieRequest {
    pub rating: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

impl RateMovieRequest {
    /// An empty review is the same as no review
    pub fn new(rating: i64, review: Option<&str>) -> Self {
        Self {
            rating,
            review: review
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }
    }
}

/// Response of a rating submission: the bare rating, or the rating wrapped
/// together with the movie's refreshed aggregates
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RateMovieResponse {
    Wrapped {
        rating: Rating,
        #[allow(dead_code)]
        #[serde(default)]
        movie: Option<Movie>,
    },
    Bare(Rating),
}

impl RateMovieResponse {
    pub(crate) fn into_rating(self) -> Rating {
        match self {
            RateMovieResponse::Wrapped { rating, .. } => rating,
            RateMovieResponse::Bare(rating) => rating,
        }
    }
}
