//! Route guarding.
//!
//! `guard` is a pure decision over a session and an allowed role set;
//! `resolve` applies it to the whole route table. Neither touches storage.

use serde::{Deserialize, Serialize};

use super::route::Route;
use crate::auth::{Role, Session};

/// Outcome of guarding a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "role", rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum GuardDecision {
    /// The session has not finished restoring; show a loading screen.
    Loading,
    Render,
    RedirectToLogin,
    /// Authenticated, but the route belongs to another role.
    RedirectToHome(Role),
}

impl GuardDecision {
    /// Route to navigate to instead of the requested one, if any.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            GuardDecision::RedirectToLogin => Some(Route::Login),
            GuardDecision::RedirectToHome(role) => Some(role.home()),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }
}

/// Decide whether `session` may render a route limited to `allowed` roles.
/// `None` admits any authenticated role.
pub fn guard(session: &Session, allowed: Option<&[Role]>) -> GuardDecision {
    if session.is_loading {
        return GuardDecision::Loading;
    }

    let Some(role) = session.role() else {
        return GuardDecision::RedirectToLogin;
    };

    match allowed {
        Some(roles) if !roles.contains(&role) => GuardDecision::RedirectToHome(role),
        _ => GuardDecision::Render,
    }
}

/// Navigation result for a location path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "route", rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Navigation {
    Loading,
    Render(Route),
    Redirect(Route),
}

/// Resolve `path` against the route table for `session`.
pub fn resolve(path: &str, session: &Session) -> Navigation {
    let route = Route::parse(path);
    match route {
        Route::Root => {
            if session.is_loading {
                return Navigation::Loading;
            }
            match session.role() {
                Some(role) => Navigation::Redirect(role.home()),
                None => Navigation::Redirect(Route::Login),
            }
        }
        Route::Section { role, .. } => {
            let decision = guard(session, Some(&[role][..]));
            match decision.redirect() {
                Some(target) => Navigation::Redirect(target),
                None if decision == GuardDecision::Loading => Navigation::Loading,
                None => Navigation::Render(route),
            }
        }
        Route::Login | Route::VerifyOtp | Route::ForgotPassword | Route::NotFound => {
            Navigation::Render(route)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::auth::Identity;
    use crate::routes::Page;

    fn session_for(role: Role) -> Session {
        Session::authenticated(Identity {
            email: format!("{}@test.com", role),
            name: role.display_name().to_string(),
            role,
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    #[test]
    fn test_guard_redirects_anonymous_to_login() {
        let session = Session::anonymous();
        assert_eq!(guard(&session, Some(&[Role::Admin][..])), GuardDecision::RedirectToLogin);
        assert_eq!(guard(&session, None), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_guard_redirects_wrong_role_home() {
        let session = session_for(Role::Employee);
        let decision = guard(&session, Some(&[Role::Admin][..]));
        assert_eq!(decision, GuardDecision::RedirectToHome(Role::Employee));
        assert_eq!(decision.redirect(), Some(Role::Employee.home()));
    }

    #[test]
    fn test_guard_renders_allowed_roles() {
        for role in Role::ALL {
            let session = session_for(role);
            assert_eq!(guard(&session, Some(&[role][..])), GuardDecision::Render);
            assert_eq!(guard(&session, Some(&Role::ALL[..])), GuardDecision::Render);
            assert_eq!(guard(&session, None), GuardDecision::Render);
        }
    }

    #[test]
    fn test_guard_empty_allowed_set_renders_nothing() {
        let session = session_for(Role::SuperAdmin);
        assert_eq!(
            guard(&session, Some(&[][..])),
            GuardDecision::RedirectToHome(Role::SuperAdmin)
        );
    }

    #[test]
    fn test_guard_waits_while_loading() {
        let session = Session::default();
        assert_eq!(guard(&session, Some(&[Role::Admin][..])), GuardDecision::Loading);
        assert_eq!(GuardDecision::Loading.redirect(), None);
    }

    #[test]
    fn test_resolve_root() {
        assert_eq!(
            resolve("/", &Session::anonymous()),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            resolve("/", &session_for(Role::Admin)),
            Navigation::Redirect(Role::Admin.home())
        );
        assert_eq!(resolve("/", &Session::default()), Navigation::Loading);
    }

    #[test]
    fn test_resolve_section_pages() {
        let employee = session_for(Role::Employee);
        assert_eq!(
            resolve("/employee/payslips", &employee),
            Navigation::Render(Route::Section {
                role: Role::Employee,
                page: Page::Payslips
            })
        );
        assert_eq!(
            resolve("/admin/reports", &employee),
            Navigation::Redirect(Role::Employee.home())
        );
        assert_eq!(
            resolve("/superadmin/subscriptions", &Session::anonymous()),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(resolve("/admin/employees", &Session::default()), Navigation::Loading);
    }

    #[test]
    fn test_resolve_public_pages_always_render() {
        for session in [Session::anonymous(), session_for(Role::Admin), Session::default()] {
            assert_eq!(resolve("/login", &session), Navigation::Render(Route::Login));
            assert_eq!(resolve("/verify-otp", &session), Navigation::Render(Route::VerifyOtp));
            assert_eq!(resolve("/nope", &session), Navigation::Render(Route::NotFound));
        }
    }

    #[test]
    fn test_decisions_serialize_with_tags() {
        let json = serde_json::to_value(GuardDecision::RedirectToHome(Role::Admin)).unwrap();
        assert_eq!(json["decision"], "redirect_to_home");
        assert_eq!(json["role"], "admin");
    }
}
