//! Authentication operations against the portal backend

mod session;
mod types;

use reqwest::Client;
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::token;

pub use session::{Session, SessionController};
pub(crate) use session::AuthDecision;
pub use types::*;

/// Client for portal authentication
pub struct Auth {
    /// The base URL of the portal backend
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,

    /// The session controller fed by sign-in/sign-out
    session: Arc<SessionController>,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        options: ClientOptions,
        session: Arc<SessionController>,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            options,
            session,
        }
    }

    fn get_auth_url(&self, path: &str) -> String {
        format!("{}/api/v1/auth{}", self.url, path)
    }

    /// Sign in with email and password.
    ///
    /// On success the returned credentials are persisted and the session
    /// becomes authenticated. Network and server errors propagate to the
    /// caller for user-visible messaging; no navigation happens here.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        let url = self.get_auth_url("/sign-in");

        let credentials = SignInCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let result = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(&credentials)?
            .execute::<AuthResponse>()
            .await?;

        self.session
            .login(result.tokens.clone(), result.user.clone());

        Ok(result)
    }

    /// Sign out the current user.
    ///
    /// Notifies the backend when a usable access token is still held, then
    /// clears the session locally either way. A network failure propagates
    /// to the caller and leaves the local session intact for retry.
    pub async fn sign_out(&self) -> Result<(), Error> {
        if let Some(access) = self.session.access_token() {
            if !token::is_expired(&access) {
                let url = self.get_auth_url("/sign-out");

                Fetch::post(&self.client, &url)
                    .header("X-Client-Info", &self.options.client_info)
                    .bearer_auth(&access)
                    .execute_raw()
                    .await?;
            }
        }

        self.session.logout();
        Ok(())
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.session()
    }
}
