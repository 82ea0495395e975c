//! Session state machine and the single owner of persisted credentials

use std::sync::{Arc, Mutex};

use crate::nav::{Navigator, Route};
use crate::store::TokenStore;
use crate::token::{self, TokenPair};

use super::types::User;

/// Where the session lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Hydrating,
    Authenticated,
    Unauthenticated,
}

/// Read-only view of the current session, handed to guards and callers
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// What the request interceptor should do with the next outbound call
#[derive(Debug)]
pub(crate) enum AuthDecision {
    /// No session; send the request without an Authorization header
    Anonymous,
    /// Attach `Authorization: Bearer <token>`
    Bearer(String),
    /// Token expired; the session was torn down and the request must abort
    Expired(Route),
}

struct Inner {
    state: State,
    user: Option<User>,
    tokens: Option<TokenPair>,
}

/// Owns the session: the in-memory state machine and the token store behind
/// it. Interceptors and guards read session state through this controller
/// rather than re-reading storage, so there is exactly one source of truth.
///
/// States: `Hydrating -> {Authenticated, Unauthenticated}`, then
/// `Authenticated <-> Unauthenticated` via login/logout or forced logout.
pub struct SessionController {
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    inner: Mutex<Inner>,
}

impl SessionController {
    /// Create a controller in the `Hydrating` state. Call [`hydrate`]
    /// before asking for guard decisions.
    ///
    /// [`hydrate`]: SessionController::hydrate
    pub fn new(store: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            inner: Mutex::new(Inner {
                state: State::Hydrating,
                user: None,
                tokens: None,
            }),
        }
    }

    /// Rebuild session state from the token store.
    ///
    /// A stored user with an unexpired access token becomes an authenticated
    /// session and storage is left untouched. Anything else, including
    /// malformed or partial records, clears storage and lands in
    /// `Unauthenticated`. Never errors; the loading flag drops exactly once.
    pub fn hydrate(&self) {
        let mut inner = self.inner.lock().unwrap();

        match self.store.load() {
            Some((tokens, user)) if !token::is_expired(&tokens.access) => {
                tracing::debug!(email = %user.email, "session restored from storage");
                inner.state = State::Authenticated;
                inner.user = Some(user);
                inner.tokens = Some(tokens);
            }
            loaded => {
                if loaded.is_some() {
                    tracing::debug!("stored access token expired, clearing session");
                }
                self.store.clear();
                inner.state = State::Unauthenticated;
                inner.user = None;
                inner.tokens = None;
            }
        }
    }

    /// Persist the credentials and mark the session authenticated.
    ///
    /// Does not navigate; callers decide post-login routing.
    pub fn login(&self, tokens: TokenPair, user: User) {
        self.store.save(&tokens, &user);

        let mut inner = self.inner.lock().unwrap();
        inner.state = State::Authenticated;
        inner.user = Some(user);
        inner.tokens = Some(tokens);
    }

    /// End the session locally: both the in-memory state and the token store
    /// are cleared, so a reload cannot silently re-authenticate and no stale
    /// credentials get attached to later requests.
    pub fn logout(&self) {
        self.store.clear();

        let mut inner = self.inner.lock().unwrap();
        inner.state = State::Unauthenticated;
        inner.user = None;
        inner.tokens = None;
    }

    /// Tear the session down and send the embedder to the login route
    /// matching the cached user's role.
    ///
    /// Shared by both interceptors. Safe to hit from two failing requests at
    /// once: clearing an empty store is a no-op and the first navigation
    /// wins.
    pub(crate) fn force_logout(&self) -> Route {
        let route = {
            let mut inner = self.inner.lock().unwrap();
            let was_admin = inner
                .user
                .as_ref()
                .map(|user| user.is_admin)
                .unwrap_or(false);

            self.store.clear();
            inner.state = State::Unauthenticated;
            inner.user = None;
            inner.tokens = None;

            Route::login_for(was_admin)
        };

        tracing::warn!(%route, "session terminated, redirecting to login");
        self.navigator.navigate(route);
        route
    }

    /// Forced-logout path for a server-side credential rejection
    pub(crate) fn on_unauthorized(&self) -> Route {
        tracing::warn!("server rejected credentials");
        self.force_logout()
    }

    /// Request-interceptor decision for the next outbound call
    pub(crate) fn authorize_request(&self) -> AuthDecision {
        let tokens = {
            let inner = self.inner.lock().unwrap();
            inner.tokens.clone()
        };

        match tokens {
            None => AuthDecision::Anonymous,
            Some(pair) if token::is_expired(&pair.access) => {
                tracing::warn!("access token expired before request");
                AuthDecision::Expired(self.force_logout())
            }
            Some(pair) => AuthDecision::Bearer(pair.access),
        }
    }

    /// Current access token, if the session holds one
    pub(crate) fn access_token(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.tokens.as_ref().map(|pair| pair.access.clone())
    }

    /// Snapshot of the current session state
    pub fn session(&self) -> Session {
        let inner = self.inner.lock().unwrap();
        Session {
            user: inner.user.clone(),
            is_authenticated: inner.state == State::Authenticated,
            is_loading: inner.state == State::Hydrating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PaymentStatus;
    use crate::nav::NoopNavigator;
    use crate::store::{MemoryStorage, Storage};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn jwt_expiring_in(secs: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        encode(
            &Header::default(),
            &crate::token::Claims { exp: now + secs },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn member(is_admin: bool) -> User {
        User {
            full_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            profile_picture: None,
            is_admin,
            payment_status: PaymentStatus::Paid,
        }
    }

    fn tokens_expiring_in(secs: i64) -> TokenPair {
        TokenPair {
            access: jwt_expiring_in(secs),
            refresh: "refresh.jwt".to_string(),
        }
    }

    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl RecordingNavigator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                routes: Mutex::new(Vec::new()),
            })
        }

        fn routes(&self) -> Vec<Route> {
            self.routes.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn controller_with(
        navigator: Arc<dyn Navigator>,
    ) -> (Arc<MemoryStorage>, TokenStore, SessionController) {
        let storage = Arc::new(MemoryStorage::default());
        let store = TokenStore::new(storage.clone(), "portal.session");
        let controller = SessionController::new(store.clone(), navigator);
        (storage, store, controller)
    }

    #[test]
    fn starts_hydrating() {
        let (_, _, controller) = controller_with(Arc::new(NoopNavigator));
        let session = controller.session();
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
    }

    #[test]
    fn hydrate_with_empty_storage_is_unauthenticated() {
        let (_, _, controller) = controller_with(Arc::new(NoopNavigator));
        controller.hydrate();

        let session = controller.session();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert!(session.user.is_none());
    }

    #[test]
    fn hydrate_with_valid_token_is_authenticated_and_leaves_storage_alone() {
        let (_, store, controller) = controller_with(Arc::new(NoopNavigator));
        store.save(&tokens_expiring_in(3600), &member(false));

        controller.hydrate();

        let session = controller.session();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.user, Some(member(false)));
        assert!(store.load().is_some(), "hydration must not touch storage");
    }

    #[test]
    fn hydrate_with_expired_token_clears_storage() {
        let (_, store, controller) = controller_with(Arc::new(NoopNavigator));
        store.save(&tokens_expiring_in(-1), &member(false));

        controller.hydrate();

        let session = controller.session();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert!(store.load().is_none());
    }

    #[test]
    fn hydrate_with_malformed_storage_is_unauthenticated() {
        let (storage, _, controller) = controller_with(Arc::new(NoopNavigator));
        storage.set("portal.session.tokens", "{broken");
        storage.set("portal.session.user", "{broken");

        controller.hydrate();

        assert!(!controller.session().is_authenticated);
        assert!(storage.get("portal.session.tokens").is_none());
    }

    #[test]
    fn login_persists_and_authenticates_without_navigating() {
        let navigator = RecordingNavigator::new();
        let (_, store, controller) = controller_with(navigator.clone());
        controller.hydrate();

        controller.login(tokens_expiring_in(3600), member(false));

        assert!(controller.session().is_authenticated);
        assert!(store.load().is_some());
        assert!(navigator.routes().is_empty());
    }

    #[test]
    fn logout_clears_memory_and_storage_together() {
        let (_, store, controller) = controller_with(Arc::new(NoopNavigator));
        controller.hydrate();
        controller.login(tokens_expiring_in(3600), member(false));

        controller.logout();

        assert!(!controller.session().is_authenticated);
        assert!(
            store.load().is_none(),
            "logout must clear persisted credentials as well"
        );
    }

    #[test]
    fn expired_token_aborts_request_and_redirects_to_member_login() {
        let navigator = RecordingNavigator::new();
        let (_, store, controller) = controller_with(navigator.clone());
        controller.hydrate();
        controller.login(tokens_expiring_in(0), member(false));

        match controller.authorize_request() {
            AuthDecision::Expired(route) => assert_eq!(route, Route::SignIn),
            other => panic!("expected forced logout, got {:?}", other),
        }
        assert!(store.load().is_none());
        assert_eq!(navigator.routes(), vec![Route::SignIn]);
    }

    #[test]
    fn expired_admin_session_redirects_to_admin_login() {
        let navigator = RecordingNavigator::new();
        let (_, _, controller) = controller_with(navigator.clone());
        controller.hydrate();
        controller.login(tokens_expiring_in(0), member(true));

        match controller.authorize_request() {
            AuthDecision::Expired(route) => assert_eq!(route, Route::AdminLogin),
            other => panic!("expected forced logout, got {:?}", other),
        }
        assert_eq!(navigator.routes(), vec![Route::AdminLogin]);
    }

    #[test]
    fn anonymous_session_sends_no_header() {
        let (_, _, controller) = controller_with(Arc::new(NoopNavigator));
        controller.hydrate();

        assert!(matches!(
            controller.authorize_request(),
            AuthDecision::Anonymous
        ));
    }

    #[test]
    fn valid_session_attaches_bearer_token() {
        let (_, _, controller) = controller_with(Arc::new(NoopNavigator));
        controller.hydrate();
        let tokens = tokens_expiring_in(3600);
        controller.login(tokens.clone(), member(false));

        match controller.authorize_request() {
            AuthDecision::Bearer(token) => assert_eq!(token, tokens.access),
            other => panic!("expected bearer token, got {:?}", other),
        }
    }

    #[test]
    fn concurrent_forced_logouts_are_idempotent() {
        let navigator = RecordingNavigator::new();
        let (_, store, controller) = controller_with(navigator.clone());
        controller.hydrate();
        controller.login(tokens_expiring_in(3600), member(false));

        controller.force_logout();
        controller.force_logout();

        assert!(store.load().is_none());
        assert!(!controller.session().is_authenticated);
        // Second navigation is harmless; the first one wins.
        assert_eq!(navigator.routes().len(), 2);
    }
}
