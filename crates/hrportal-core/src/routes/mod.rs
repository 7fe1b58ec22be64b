//! Application routes and role-based navigation.
//!
//! This module provides:
//! - `Route` / `Page`: the route table and path parsing
//! - `guard` / `resolve`: navigation decisions for a session
//! - `nav_links`: per-role sidebar menus

pub mod guard;
pub mod nav;
pub mod route;

pub use guard::{guard, resolve, GuardDecision, Navigation};
pub use nav::{nav_links, page_title, NavLink};
pub use route::{Page, Route};
