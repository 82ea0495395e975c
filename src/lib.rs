//! Member Portal Client Library
//!
//! A Rust client for the membership portal REST API, centred on session
//! management: credential persistence, access-token expiry handling,
//! request/response interception, and role-based route guarding.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod nav;
pub mod store;
pub mod token;

use reqwest::Client;
use std::sync::Arc;

use crate::auth::{Auth, Session, SessionController};
use crate::config::ClientOptions;
use crate::fetch::{Fetch, FetchBuilder};
use crate::guard::{GuardDecision, RequiredRole};
use crate::nav::{Navigator, NoopNavigator};
use crate::store::{MemoryStorage, Storage, TokenStore};

/// The main entry point for the portal client
pub struct Portal {
    /// The base URL of the portal backend
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    /// Auth client for sign-in, sign-out and session access
    auth: Auth,
    /// The session controller shared with the fetch layer
    session: Arc<SessionController>,
}

impl Portal {
    /// Create a new portal client with in-memory session storage.
    ///
    /// The stored session is hydrated before this returns, so guard
    /// decisions never observe a half-initialized session.
    ///
    /// # Example
    ///
    /// ```
    /// use member_portal::Portal;
    ///
    /// let portal = Portal::new("https://portal.example.org");
    /// assert!(!portal.session().is_loading);
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new portal client with custom options
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Self {
        Self::new_with_parts(
            base_url,
            options,
            Arc::new(MemoryStorage::default()),
            Arc::new(NoopNavigator),
        )
    }

    /// Create a new portal client with a custom storage backend and
    /// navigator.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use member_portal::config::ClientOptions;
    /// use member_portal::nav::NoopNavigator;
    /// use member_portal::store::FileStorage;
    /// use member_portal::Portal;
    ///
    /// let portal = Portal::new_with_parts(
    ///     "https://portal.example.org",
    ///     ClientOptions::default(),
    ///     Arc::new(FileStorage::open("session.json")),
    ///     Arc::new(NoopNavigator),
    /// );
    /// ```
    pub fn new_with_parts(
        base_url: &str,
        options: ClientOptions,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let store = TokenStore::new(storage, &options.storage_prefix);
        let session = Arc::new(SessionController::new(store, navigator));
        session.hydrate();

        let auth = Auth::new(base_url, http_client.clone(), options.clone(), session.clone());

        Self {
            url: base_url.to_string(),
            http_client,
            options,
            auth,
            session,
        }
    }

    /// Get a reference to the auth client for sign-in and sign-out
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the session controller for direct login/logout
    /// and state inspection
    pub fn session_controller(&self) -> &SessionController {
        &self.session
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session.session()
    }

    /// Decide whether a subtree behind the given role requirement may render
    /// right now
    pub fn guard(&self, required: Option<RequiredRole>) -> GuardDecision {
        guard::evaluate(&self.session(), required)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.url, path)
    }

    /// Start a GET request against the portal API, passing through the
    /// session interceptors
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::get(&self.http_client, &self.api_url(path)).with_session(&self.session)
    }

    /// Start a POST request against the portal API, passing through the
    /// session interceptors
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::post(&self.http_client, &self.api_url(path)).with_session(&self.session)
    }

    /// Start a PUT request against the portal API, passing through the
    /// session interceptors
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::put(&self.http_client, &self.api_url(path)).with_session(&self.session)
    }

    /// Start a PATCH request against the portal API, passing through the
    /// session interceptors
    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::patch(&self.http_client, &self.api_url(path)).with_session(&self.session)
    }

    /// Start a DELETE request against the portal API, passing through the
    /// session interceptors
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::delete(&self.http_client, &self.api_url(path)).with_session(&self.session)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{PaymentStatus, User};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::guard::{GuardDecision, RequiredRole};
    pub use crate::nav::Route;
    pub use crate::Portal;
}
