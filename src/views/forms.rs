//! Login, registration and add-movie form state

use crate::api::models::{Movie, NewMovie};
use crate::api::CatalogApi;
use crate::auth::{AuthApi, User};
use crate::core::error::{RaterError, Result};
use chrono::Datelike;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Log in; the token is stored before this returns `true`
    pub async fn submit(&mut self, auth: &AuthApi) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;

        let result = auth.login(&self.email, &self.password).await;
        let ok = match result {
            Ok(_) => {
                self.password.clear();
                true
            }
            Err(RaterError::Unauthorized(_)) => {
                self.error = Some("Invalid email or password.".to_string());
                false
            }
            Err(e) => {
                self.error = Some(e.user_message());
                false
            }
        };

        self.submitting = false;
        ok
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
    pub registered: Option<User>,
}

impl RegisterForm {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub async fn submit(&mut self, auth: &AuthApi) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;

        let result = auth.register(&self.username, &self.email, &self.password).await;
        let ok = match result {
            Ok(user) => {
                self.registered = Some(user);
                self.password.clear();
                true
            }
            Err(e) => {
                self.error = Some(e.user_message());
                false
            }
        };

        self.submitting = false;
        ok
    }
}

#[derive(Debug, Clone)]
pub struct AddMovieForm {
    pub title: String,
    pub genre: String,
    pub release_year: i32,
    pub description: String,
    pub submitting: bool,
    pub error: Option<String>,
    pub created: Option<Movie>,
}

impl Default for AddMovieForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            genre: String::new(),
            release_year: chrono::Utc::now().year(),
            description: String::new(),
            submitting: false,
            error: None,
            created: None,
        }
    }
}

impl AddMovieForm {
    /// Required-field check; an empty description is left out of the request
    pub fn to_request(&self) -> Result<NewMovie> {
        if self.title.trim().is_empty() {
            return Err(RaterError::field("title", "This field is required."));
        }
        if self.genre.trim().is_empty() {
            return Err(RaterError::field("genre", "This field is required."));
        }
        if self.release_year <= 0 {
            return Err(RaterError::field("release_year", "Enter a valid year."));
        }

        let description = self.description.trim();
        Ok(NewMovie {
            title: self.title.trim().to_string(),
            genre: self.genre.trim().to_string(),
            release_year: self.release_year,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        })
    }

    pub async fn submit(&mut self, catalog: &CatalogApi) -> bool {
        if self.submitting {
            return false;
        }

        let request = match self.to_request() {
            Ok(r) => r,
            Err(e) => {
                self.error = Some(e.user_message());
                return false;
            }
        };

        self.submitting = true;
        self.error = None;

        let ok = match catalog.create_movie(&request).await {
            Ok(movie) => {
                self.created = Some(movie);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create movie");
                self.error = Some(format!("Failed to create movie: {}", e.user_message()));
                false
            }
        };

        self.submitting = false;
        ok
    }
}
