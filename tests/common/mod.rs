//! In-process mock of the movie rating backend
//!
//! Serves the same routes (trailing slashes included), envelopes and error
//! bodies as the real service, backed by in-memory tables. Every request's
//! `Authorization` and `X-Request-Id` headers and query string are recorded
//! for assertions.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use movie_rater::auth::Session;
use movie_rater::core::config::ApiConfig;
use movie_rater::MovieRaterClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Barrier;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct StoredMovie {
    pub id: u64,
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub description: String,
    pub created_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct StoredRating {
    pub id: u64,
    pub movie_id: u64,
    pub user_id: u64,
    pub rating: i64,
    pub review: String,
}

/// A request as seen by the mock
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub users: Vec<StoredUser>,
    pub movies: Vec<StoredMovie>,
    pub ratings: Vec<StoredRating>,
    pub tokens: HashMap<String, u64>,
    pub seen: Vec<SeenRequest>,
    /// Answer list endpoints with a bare JSON array instead of an envelope
    pub bare_lists: bool,
    /// Movie-detail and movie-ratings handlers both wait here before answering
    pub detail_barrier: Option<Arc<Barrier>>,
    /// Answer movie-ratings listings with this status instead of the data
    pub ratings_status: Option<StatusCode>,
    pub next_id: u64,
}

impl Backend {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<u64> {
        let value = headers.get("authorization")?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.get(token).copied()
    }

    fn username(&self, user_id: u64) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn movie_json(&self, movie: &StoredMovie) -> Value {
        let values: Vec<i64> = self
            .ratings
            .iter()
            .filter(|r| r.movie_id == movie.id)
            .map(|r| r.rating)
            .collect();
        let avg = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<i64>() as f64 / values.len() as f64
        };

        json!({
            "id": movie.id,
            "title": movie.title,
            "genre": movie.genre,
            "release_year": movie.release_year,
            "description": movie.description,
            "created_by": movie.created_by,
            "created_at": "2024-03-01T12:00:00Z",
            "ratings_avg": format!("{:.2}", avg),
            "ratings_count": values.len(),
        })
    }

    fn rating_json(&self, rating: &StoredRating) -> Value {
        json!({
            "id": rating.id,
            "user": self.username(rating.user_id),
            "movie": rating.movie_id,
            "rating": rating.rating,
            "review": rating.review,
            "created_at": "2024-03-02T08:30:00Z",
            "updated_at": "2024-03-02T08:30:00Z",
        })
    }

    fn paginate(&self, items: Vec<Value>, query: &HashMap<String, String>) -> Value {
        if self.bare_lists {
            return Value::Array(items);
        }

        let page = query
            .get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        let limit = query
            .get("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(10);
        let total = items.len();
        let slice: Vec<Value> = items.into_iter().skip((page - 1) * limit).take(limit).collect();

        json!({ "items": slice, "page": page, "limit": limit, "total": total })
    }
}

pub type Shared = Arc<Mutex<Backend>>;

/// Running mock server; aborted on drop
pub struct MockServer {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with(Backend::default()).await
    }

    pub async fn start_with(backend: Backend) -> Self {
        let state: Shared = Arc::new(Mutex::new(backend));
        let router = build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
            handle,
        }
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.lock().expect("backend lock")
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::with_base_url(self.base_url.clone())
    }

    /// Client with a fresh in-memory session
    pub fn client(&self) -> MovieRaterClient {
        self.client_with(Session::in_memory())
    }

    pub fn client_with(&self, session: Session) -> MovieRaterClient {
        MovieRaterClient::new(&self.config(), session).expect("client")
    }

    pub fn seed_user(&self, username: &str, email: &str, password: &str) -> u64 {
        let mut backend = self.backend();
        let id = backend.next_id();
        backend.users.push(StoredUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub fn seed_movie(&self, title: &str, genre: &str, release_year: i32) -> u64 {
        self.seed_movie_by(title, genre, release_year, None)
    }

    pub fn seed_movie_by(&self, title: &str, genre: &str, release_year: i32, created_by: Option<u64>) -> u64 {
        let mut backend = self.backend();
        let id = backend.next_id();
        backend.movies.push(StoredMovie {
            id,
            title: title.to_string(),
            genre: genre.to_string(),
            release_year,
            description: format!("About {}", title),
            created_by,
        });
        id
    }

    pub fn seed_rating(&self, movie_id: u64, user_id: u64, rating: i64, review: &str) -> u64 {
        let mut backend = self.backend();
        let id = backend.next_id();
        backend.ratings.push(StoredRating {
            id,
            movie_id,
            user_id,
            rating,
            review: review.to_string(),
        });
        id
    }

    pub fn last_request(&self) -> SeenRequest {
        self.backend().seen.last().cloned().expect("no request seen")
    }

    pub fn requests_to(&self, path_prefix: &str) -> Vec<SeenRequest> {
        self.backend()
            .seen
            .iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .cloned()
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn build_router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/register/", post(register))
        .route("/api/auth/login/", post(login))
        .route("/api/movies/", get(list_movies).post(create_movie))
        .route("/api/movies/:id/", get(get_movie).delete(delete_movie))
        .route("/api/movies/:id/ratings/", get(list_movie_ratings).post(rate_movie))
        .route("/api/users/:id/ratings/", get(list_user_ratings))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let seen = SeenRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        request_id: request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().expect("backend lock").seen.push(seen);
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthenticated() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Authentication credentials were not provided.")
}

fn text<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().expect("backend lock");

    let mut errors = serde_json::Map::new();
    for field in ["username", "email", "password"] {
        if text(&body, field).is_empty() {
            errors.insert(field.to_string(), json!(["This field is required."]));
        }
    }
    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(Value::Object(errors))).into_response();
    }

    let username = text(&body, "username").to_string();
    let email = text(&body, "email").to_string();
    if backend.users.iter().any(|u| u.email == email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "email": ["user with this email already exists."] })),
        )
            .into_response();
    }
    if backend.users.iter().any(|u| u.username == username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "username": ["A user with that username already exists."] })),
        )
            .into_response();
    }

    let id = backend.next_id();
    backend.users.push(StoredUser {
        id,
        username: username.clone(),
        email: email.clone(),
        password: text(&body, "password").to_string(),
    });
    (StatusCode::CREATED, Json(json!({ "id": id, "username": username, "email": email }))).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().expect("backend lock");

    let user = backend
        .users
        .iter()
        .find(|u| u.email == text(&body, "email") && u.password == body["password"].as_str().unwrap_or(""))
        .map(|u| u.id);

    match user {
        Some(user_id) => {
            let token = format!("token-{}-{}", user_id, uuid::Uuid::new_v4().simple());
            backend.tokens.insert(token.clone(), user_id);
            Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
        }
        None => detail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn list_movies(State(state): State<Shared>, Query(query): Query<HashMap<String, String>>) -> Response {
    let backend = state.lock().expect("backend lock");

    let genre = query.get("genre").map(|g| g.to_lowercase());
    let search = query.get("search").map(|s| s.to_lowercase());
    let min_year = query.get("min_year").and_then(|y| y.parse::<i32>().ok());
    let max_year = query.get("max_year").and_then(|y| y.parse::<i32>().ok());

    let items: Vec<Value> = backend
        .movies
        .iter()
        .filter(|m| genre.as_ref().map_or(true, |g| m.genre.to_lowercase() == *g))
        .filter(|m| search.as_ref().map_or(true, |s| m.title.to_lowercase().contains(s.as_str())))
        .filter(|m| min_year.map_or(true, |y| m.release_year >= y))
        .filter(|m| max_year.map_or(true, |y| m.release_year <= y))
        .map(|m| backend.movie_json(m))
        .collect();

    Json(backend.paginate(items, &query)).into_response()
}

async fn create_movie(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut backend = state.lock().expect("backend lock");
    let Some(user_id) = backend.user_for(&headers) else {
        return unauthenticated();
    };

    if text(&body, "title").is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "title": ["This field is required."] }))).into_response();
    }
    let Some(release_year) = body.get("release_year").and_then(Value::as_i64) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "release_year": ["A valid integer is required."] })),
        )
            .into_response();
    };

    let id = backend.next_id();
    let movie = StoredMovie {
        id,
        title: text(&body, "title").to_string(),
        genre: text(&body, "genre").to_string(),
        release_year: release_year as i32,
        description: text(&body, "description").to_string(),
        created_by: Some(user_id),
    };
    let body = backend.movie_json(&movie);
    backend.movies.push(movie);
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Wait on the detail barrier, if one is set, without holding the lock
async fn rendezvous(state: &Shared) {
    let barrier = state.lock().expect("backend lock").detail_barrier.clone();
    if let Some(barrier) = barrier {
        barrier.wait().await;
    }
}

async fn get_movie(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    rendezvous(&state).await;
    let backend = state.lock().expect("backend lock");
    match backend.movies.iter().find(|m| m.id == id) {
        Some(movie) => Json(backend.movie_json(movie)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Not found."),
    }
}

async fn delete_movie(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    let mut backend = state.lock().expect("backend lock");
    let Some(user_id) = backend.user_for(&headers) else {
        return unauthenticated();
    };

    let Some(index) = backend.movies.iter().position(|m| m.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Not found.");
    };
    if backend.movies[index].created_by != Some(user_id) {
        return detail(StatusCode::FORBIDDEN, "You can only delete movies you created.");
    }

    backend.movies.remove(index);
    backend.ratings.retain(|r| r.movie_id != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_movie_ratings(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    rendezvous(&state).await;
    let backend = state.lock().expect("backend lock");
    if !backend.movies.iter().any(|m| m.id == id) {
        return detail(StatusCode::NOT_FOUND, "Not found.");
    }
    if let Some(status) = backend.ratings_status {
        return detail(status, "Ratings are unavailable.");
    }

    let items: Vec<Value> = backend
        .ratings
        .iter()
        .filter(|r| r.movie_id == id)
        .map(|r| backend.rating_json(r))
        .collect();
    Json(backend.paginate(items, &query)).into_response()
}

async fn rate_movie(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().expect("backend lock");
    let Some(user_id) = backend.user_for(&headers) else {
        return unauthenticated();
    };
    if !backend.movies.iter().any(|m| m.id == id) {
        return detail(StatusCode::NOT_FOUND, "Not found.");
    }

    let value = match body.get("rating").and_then(Value::as_i64) {
        Some(v) if (1..=5).contains(&v) => v,
        _ => return detail(StatusCode::BAD_REQUEST, "Rating must be between 1 and 5."),
    };
    let review = text(&body, "review").to_string();

    let existing = backend
        .ratings
        .iter()
        .position(|r| r.movie_id == id && r.user_id == user_id);
    let (index, status) = match existing {
        Some(index) => {
            backend.ratings[index].rating = value;
            backend.ratings[index].review = review;
            (index, StatusCode::OK)
        }
        None => {
            let rating_id = backend.next_id();
            backend.ratings.push(StoredRating {
                id: rating_id,
                movie_id: id,
                user_id,
                rating: value,
                review,
            });
            (backend.ratings.len() - 1, StatusCode::CREATED)
        }
    };

    let rating = backend.rating_json(&backend.ratings[index]);
    let movie = backend
        .movies
        .iter()
        .find(|m| m.id == id)
        .map(|m| backend.movie_json(m))
        .unwrap_or(Value::Null);
    (status, Json(json!({ "rating": rating, "movie": movie }))).into_response()
}

async fn list_user_ratings(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let backend = state.lock().expect("backend lock");
    let items: Vec<Value> = backend
        .ratings
        .iter()
        .filter(|r| r.user_id == id)
        .map(|r| backend.rating_json(r))
        .collect();
    Json(backend.paginate(items, &query)).into_response()
}
