//! Error handling for the portal client

use std::fmt;
use thiserror::Error;

use crate::nav::Route;

/// Unified error type for the portal client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success response from the backend
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The session was terminated by an interceptor and the embedder has
    /// been redirected to the given login route. Terminal for the request
    /// that triggered it; there is nothing for the caller to recover.
    #[error("session expired, redirecting to {redirect}")]
    SessionExpired { redirect: Route },
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new API error from a response status and body
    pub fn api<T: fmt::Display>(status: u16, message: T) -> Self {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }
}
