//! Logical routes and the navigation seam to the embedding application

use std::fmt;

/// The fixed routes the auth subsystem depends on existing in the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Member sign-in page
    SignIn,
    /// Admin login page
    AdminLogin,
    /// Landing page for authenticated members
    MemberDashboard,
    /// Landing page for authenticated admins
    AdminDashboard,
}

impl Route {
    /// Path understood by the portal's routing layer
    pub fn path(self) -> &'static str {
        match self {
            Route::SignIn => "/auth/sign-in",
            Route::AdminLogin => "/admin/login",
            Route::MemberDashboard => "/member/dashboard",
            Route::AdminDashboard => "/admin/dashboard",
        }
    }

    /// Login route for a session whose cached user was or was not an admin
    pub fn login_for(is_admin: bool) -> Self {
        if is_admin {
            Route::AdminLogin
        } else {
            Route::SignIn
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Seam to the embedding application's routing layer.
///
/// `navigate` fires on forced logout and carries hard-navigation semantics:
/// the embedder is expected to drop all in-memory application state, not just
/// swap views. Two navigations in quick succession are possible when two
/// requests fail simultaneously; the first one wins and the second is
/// harmless.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that does nothing, for embedders that react to the returned
/// session-expired errors and guard decisions instead
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_depends_on_cached_role() {
        assert_eq!(Route::login_for(true), Route::AdminLogin);
        assert_eq!(Route::login_for(false), Route::SignIn);
    }

    #[test]
    fn routes_render_their_paths() {
        assert_eq!(Route::SignIn.to_string(), "/auth/sign-in");
        assert_eq!(Route::AdminDashboard.path(), "/admin/dashboard");
    }
}
