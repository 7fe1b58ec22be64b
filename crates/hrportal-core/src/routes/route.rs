use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Page inside a role section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Page {
    Dashboard,
    // Employee
    Profile,
    Leave,
    Timesheet,
    Payslips,
    // Admin
    Employees,
    LeaveApprovals,
    TimesheetApprovals,
    Reports,
    OrganizationChart,
    // Super admin
    Companies,
    Subscriptions,
}

impl Page {
    /// Path segment under the section prefix.
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Profile => "profile",
            Page::Leave => "leave",
            Page::Timesheet => "timesheet",
            Page::Payslips => "payslips",
            Page::Employees => "employees",
            Page::LeaveApprovals => "leave-approvals",
            Page::TimesheetApprovals => "timesheet-approvals",
            Page::Reports => "reports",
            Page::OrganizationChart => "organization-chart",
            Page::Companies => "companies",
            Page::Subscriptions => "subscriptions",
        }
    }

    /// Navigation label.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Profile => "My Profile",
            Page::Leave => "Leave Management",
            Page::Timesheet => "Timesheet",
            Page::Payslips => "Payslips",
            Page::Employees => "Employees",
            Page::LeaveApprovals => "Leave Approvals",
            Page::TimesheetApprovals => "Timesheet Approvals",
            Page::Reports => "Reports & Analytics",
            Page::OrganizationChart => "Organization Chart",
            Page::Companies => "Company Management",
            Page::Subscriptions => "Subscriptions",
        }
    }
}

/// Every place the portal can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Route {
    /// `/`, which only ever redirects.
    Root,
    Login,
    VerifyOtp,
    ForgotPassword,
    /// A page inside a role-gated section.
    Section { role: Role, page: Page },
    NotFound,
}

impl Route {
    /// Map a location path onto the route table.
    ///
    /// Trailing slashes are ignored and a bare section path (`/admin`) lands
    /// on that section's dashboard. Pages from another role's section, like
    /// `/employee/reports`, are not found.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        if !trimmed.is_empty() && !trimmed.starts_with('/') {
            return Route::NotFound;
        }
        let mut segments = trimmed.split('/').skip(1);

        let (first, second, rest) = (segments.next(), segments.next(), segments.next());
        if rest.is_some() {
            return Route::NotFound;
        }

        match (first, second) {
            (None, _) => Route::Root,
            (Some("login"), None) => Route::Login,
            (Some("verify-otp"), None) => Route::VerifyOtp,
            (Some("forgot-password"), None) => Route::ForgotPassword,
            (Some(section), page) => {
                let Ok(role) = section.parse::<Role>() else {
                    return Route::NotFound;
                };
                let page = match page {
                    None => Some(Page::Dashboard),
                    Some(slug) => role.pages().iter().copied().find(|p| p.slug() == slug),
                };
                page.map_or(Route::NotFound, |page| Route::Section { role, page })
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::VerifyOtp => "/verify-otp".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::Section { role, page } => format!("/{}/{}", role.as_str(), page.slug()),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Role allowed to render this route. `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Section { role, .. } => Some(*role),
            _ => None,
        }
    }

    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::VerifyOtp | Route::ForgotPassword)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Root => "HR Portal",
            Route::Login => "Welcome Back",
            Route::VerifyOtp => "Verify OTP",
            Route::ForgotPassword => "Forgot Password",
            Route::Section { page, .. } => page.label(),
            Route::NotFound => "Page Not Found",
        }
    }
}
