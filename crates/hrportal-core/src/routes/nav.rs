use serde::Serialize;

use super::route::Route;
use crate::auth::Role;

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NavLink {
    pub path: String,
    pub label: String,
}

/// Sidebar entries for `role`, in display order.
pub fn nav_links(role: Role) -> Vec<NavLink> {
    role.pages()
        .iter()
        .map(|&page| {
            let route = Route::Section { role, page };
            NavLink {
                path: route.path(),
                label: page.label().to_string(),
            }
        })
        .collect()
}

/// Header title for `path` as seen by `role`; falls back to "Dashboard"
/// for paths outside the role's menu.
pub fn page_title(role: Role, path: &str) -> &'static str {
    role.pages()
        .iter()
        .find(|&&page| Route::Section { role, page }.path() == path)
        .map_or("Dashboard", |page| page.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_menu() {
        let labels: Vec<_> = nav_links(Role::Admin).into_iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard",
                "Employees",
                "Leave Approvals",
                "Timesheet Approvals",
                "Reports & Analytics",
                "Organization Chart",
            ]
        );
    }

    #[test]
    fn test_menu_paths_stay_in_section() {
        for role in Role::ALL {
            let prefix = format!("/{}/", role.as_str());
            assert!(nav_links(role).iter().all(|l| l.path.starts_with(&prefix)));
        }
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(Role::Employee, "/employee/leave"), "Leave Management");
        assert_eq!(page_title(Role::SuperAdmin, "/superadmin/companies"), "Company Management");
        assert_eq!(page_title(Role::Employee, "/admin/reports"), "Dashboard");
    }
}
