//! Acceptance scenarios for the storefront demo application.
//!
//! Seven groups: four driving the REST API directly and three driving the
//! browser UI. UI groups are skipped automatically when the runner has no
//! driver factory, so the API portion of the suite runs anywhere.
//!
//! Group order matters only in that API groups run first; within a group,
//! scenarios execute sequentially and may build on each other (the cart
//! groups accumulate state deliberately).

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod selectors;

mod api_auth;
mod api_catalog;
mod api_orders;
mod api_reviews;
mod ui_cart;
mod ui_catalog;
mod ui_login;

use vitrina::Group;

/// Every group of the suite, in execution order
#[must_use]
pub fn all_groups() -> Vec<Group> {
    vec![
        api_auth::group(),
        api_catalog::group(),
        api_orders::group(),
        api_reviews::group(),
        ui_login::group(),
        ui_catalog::group(),
        ui_cart::group(),
    ]
}

/// Names of every group, in execution order
#[must_use]
pub fn group_names() -> Vec<&'static str> {
    vec![
        api_auth::NAME,
        api_catalog::NAME,
        api_orders::NAME,
        api_reviews::NAME,
        ui_login::NAME,
        ui_catalog::NAME,
        ui_cart::NAME,
    ]
}

/// A single group by name, if the suite defines it
#[must_use]
pub fn find_group(name: &str) -> Option<Group> {
    all_groups().into_iter().find(|g| g.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_consistent() {
        let groups = all_groups();
        let names = group_names();
        assert_eq!(groups.len(), names.len());
        for (group, name) in groups.iter().zip(&names) {
            assert_eq!(&group.name, name);
        }
    }

    #[test]
    fn group_names_are_unique() {
        let mut names = group_names();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn find_group_resolves_known_names() {
        assert!(find_group("api: orders").is_some());
        assert!(find_group("ui: cart").is_some());
        assert!(find_group("nonexistent").is_none());
    }

    #[test]
    fn every_group_has_scenarios() {
        for group in all_groups() {
            assert!(group.scenario_count() > 0, "{} is empty", group.name);
        }
    }

    #[test]
    fn ui_groups_are_flagged() {
        for group in all_groups() {
            let is_ui = group.name.starts_with("ui:");
            assert_eq!(group.requires_ui, is_ui, "{}", group.name);
        }
    }

    #[test]
    fn scenario_names_are_unique_within_each_group() {
        for group in all_groups() {
            let mut names = group.scenario_names();
            let len = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), len, "{} repeats a scenario name", group.name);
        }
    }
}
