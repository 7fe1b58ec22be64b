use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::routes::{Page, Route};

/// Portal role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Role {
    Employee,
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Admin, Role::SuperAdmin];

    /// Wire name, as stored in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    /// Landing route after login and the target of role redirects.
    pub fn home(&self) -> Route {
        Route::Section {
            role: *self,
            page: Page::Dashboard,
        }
    }

    /// Pages available in this role's section, in menu order.
    pub fn pages(&self) -> &'static [Page] {
        match self {
            Role::Employee => &[
                Page::Dashboard,
                Page::Profile,
                Page::Leave,
                Page::Timesheet,
                Page::Payslips,
            ],
            Role::Admin => &[
                Page::Dashboard,
                Page::Employees,
                Page::LeaveApprovals,
                Page::TimesheetApprovals,
                Page::Reports,
                Page::OrganizationChart,
            ],
            Role::SuperAdmin => &[Page::Dashboard, Page::Companies, Page::Subscriptions],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}
