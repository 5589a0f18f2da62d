//! Authentication API calls

use crate::api::client::HttpClient;
use crate::auth::models::{LoginRequest, RegisterRequest, TokenResponse, User};
use crate::core::error::{RaterError, Result};

/// Register, login and logout against `/auth/*`
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: HttpClient,
}

impl AuthApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// POST /auth/register - Create an account.
    ///
    /// Only required-field presence is checked locally; duplicate
    /// username/email and malformed email come back from the backend as
    /// `ValidationError`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        require("username", username)?;
        require("email", email)?;
        require("password", password)?;

        tracing::info!(username = %username, email = %email, "User registration attempt");

        let req = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let user: User = self.client.post_json(&["auth", "register"], &req).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered successfully");
        Ok(user)
    }

    /// POST /auth/login - Exchange credentials for a bearer token.
    ///
    /// The token is written to the session before this returns, so the next
    /// authenticated call carries it.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        require("email", email)?;
        require("password", password)?;

        tracing::info!(email = %email, "Login attempt");

        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let token: TokenResponse = self.client.post_json(&["auth", "login"], &req).await?;
        if token.access_token.trim().is_empty() {
            return Err(RaterError::DeserializationError(
                "Login response carried an empty token".to_string(),
            ));
        }

        self.client.session().set_token(token.access_token.trim())?;
        tracing::info!(email = %email, "Login successful");
        Ok(token)
    }

    /// Forget the stored token. Local only; the token stays valid server-side.
    pub fn logout(&self) -> Result<()> {
        self.client.session().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.session().is_authenticated()
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(RaterError::field(field, "This field is required."))
    } else {
        Ok(())
    }
}
