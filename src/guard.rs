//! Role-based route guarding

use crate::auth::Session;
use crate::nav::Route;

/// Role a guarded subtree requires, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    Member,
    Admin,
}

/// Outcome of evaluating a guard against the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session is still hydrating; render nothing definitive yet
    Pending,
    /// Render the guarded subtree
    Allow,
    /// Navigate away, optionally surfacing a warning first
    Redirect {
        route: Route,
        notice: Option<String>,
    },
}

/// Decide whether a subtree may render for the given session and role
/// requirement.
///
/// Pure function of the session snapshot; it holds no state and is
/// re-evaluated on every render. Unauthenticated sessions go to the login
/// route matching the requirement; authenticated users on the wrong side of
/// the member/admin split are warned and sent to their own dashboard.
pub fn evaluate(session: &Session, required: Option<RequiredRole>) -> GuardDecision {
    if session.is_loading {
        return GuardDecision::Pending;
    }

    let user = match session.user.as_ref() {
        Some(user) if session.is_authenticated => user,
        _ => {
            let route = match required {
                Some(RequiredRole::Admin) => Route::AdminLogin,
                _ => Route::SignIn,
            };
            return GuardDecision::Redirect {
                route,
                notice: None,
            };
        }
    };

    match required {
        Some(RequiredRole::Member) if user.is_admin => GuardDecision::Redirect {
            route: Route::AdminDashboard,
            notice: Some("This page is for members. Taking you to the admin dashboard.".to_string()),
        },
        Some(RequiredRole::Admin) if !user.is_admin => GuardDecision::Redirect {
            route: Route::MemberDashboard,
            notice: Some("You do not have access to the admin area.".to_string()),
        },
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PaymentStatus, User};

    fn user(is_admin: bool) -> User {
        User {
            full_name: "Jo Member".to_string(),
            email: "jo@example.com".to_string(),
            phone: None,
            profile_picture: None,
            is_admin,
            payment_status: PaymentStatus::Pending,
        }
    }

    fn session(user: Option<User>, is_authenticated: bool, is_loading: bool) -> Session {
        Session {
            user,
            is_authenticated,
            is_loading,
        }
    }

    #[test]
    fn hydrating_session_is_pending() {
        let s = session(None, false, true);
        assert_eq!(evaluate(&s, Some(RequiredRole::Admin)), GuardDecision::Pending);
    }

    #[test]
    fn unauthenticated_member_guard_redirects_to_sign_in() {
        let s = session(None, false, false);
        assert_eq!(
            evaluate(&s, Some(RequiredRole::Member)),
            GuardDecision::Redirect {
                route: Route::SignIn,
                notice: None,
            }
        );
    }

    #[test]
    fn unauthenticated_admin_guard_redirects_to_admin_login() {
        let s = session(None, false, false);
        assert_eq!(
            evaluate(&s, Some(RequiredRole::Admin)),
            GuardDecision::Redirect {
                route: Route::AdminLogin,
                notice: None,
            }
        );
    }

    #[test]
    fn unauthenticated_open_route_redirects_to_sign_in() {
        let s = session(None, false, false);
        assert_eq!(
            evaluate(&s, None),
            GuardDecision::Redirect {
                route: Route::SignIn,
                notice: None,
            }
        );
    }

    #[test]
    fn non_admin_on_admin_guard_is_warned_and_sent_to_member_dashboard() {
        let s = session(Some(user(false)), true, false);
        match evaluate(&s, Some(RequiredRole::Admin)) {
            GuardDecision::Redirect { route, notice } => {
                assert_eq!(route, Route::MemberDashboard);
                assert!(notice.is_some());
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn admin_on_member_guard_is_warned_and_sent_to_admin_dashboard() {
        let s = session(Some(user(true)), true, false);
        match evaluate(&s, Some(RequiredRole::Member)) {
            GuardDecision::Redirect { route, notice } => {
                assert_eq!(route, Route::AdminDashboard);
                assert!(notice.is_some());
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn matching_role_renders() {
        let member = session(Some(user(false)), true, false);
        assert_eq!(
            evaluate(&member, Some(RequiredRole::Member)),
            GuardDecision::Allow
        );

        let admin = session(Some(user(true)), true, false);
        assert_eq!(
            evaluate(&admin, Some(RequiredRole::Admin)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn authenticated_user_passes_role_free_guard() {
        let s = session(Some(user(true)), true, false);
        assert_eq!(evaluate(&s, None), GuardDecision::Allow);
    }
}
