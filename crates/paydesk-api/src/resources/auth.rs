// Authentication endpoints.

use tracing::{debug, info};

use crate::client::{ApiClient, decode};
use crate::error::Error;
use crate::types::{AuthTokens, LoginRequest};

impl ApiClient {
    /// Exchange credentials for tokens.
    ///
    /// `POST /auth/login` with `{"email", "password"}`. A 2xx response that
    /// carries neither an access nor a refresh token is rejected. The
    /// returned tokens are not attached to the client; callers decide
    /// whether to trust them first.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, Error> {
        debug!(email, "logging in");
        let data = self
            .post_anonymous("/auth/login", &LoginRequest { email, password })
            .await?;

        let tokens: AuthTokens = if data.is_object() {
            decode(data)?
        } else {
            AuthTokens::default()
        };

        if tokens.access_token.is_none() && tokens.refresh_token.is_none() {
            return Err(Error::Request {
                status: None,
                message: "invalid response format from server".into(),
            });
        }

        info!(email, "login accepted");
        Ok(tokens)
    }

    /// End the server-side session.
    ///
    /// `POST /auth/logout`. The bearer credential is dropped even when the
    /// server rejects the call.
    pub async fn logout(&self) -> Result<(), Error> {
        let result = self.post_empty("/auth/logout").await;
        self.clear_bearer();
        result.map(|_| ())
    }
}
