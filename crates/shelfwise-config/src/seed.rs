//! Startup dataset import.
//!
//! - `SEED_ON_STARTUP`: import on boot (default true)
//! - `SEED_BOOKS_URL`, `SEED_USERS_URL`, `SEED_TRANSACTIONS_URL`: CSV sources
//! - `SEED_DEPARTMENTS`: comma separated departments assigned at random to
//!   imported patrons

use crate::{env_lookup, parse_bool_or};

const DATASET_BASE: &str =
    "https://customer-assets.emergentagent.com/job_5edf4d13-8af0-4ee5-a665-c1ddf41e0200/artifacts";

pub const DEFAULT_DEPARTMENTS: [&str; 6] = [
    "Computer Science",
    "Electronics",
    "Mechanical",
    "Civil",
    "MBA",
    "Arts",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedConfig {
    pub on_startup: bool,
    pub books_url: String,
    pub users_url: String,
    pub transactions_url: String,
    pub departments: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            books_url: format!("{DATASET_BASE}/d40kxosw_Datasets%20-%20books.csv.csv"),
            users_url: format!("{DATASET_BASE}/n8l5t7yt_Datasets%20-%20users.csv.csv"),
            transactions_url: format!(
                "{DATASET_BASE}/a8soib4o_Datasets%20-%20transactions.csv.csv"
            ),
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let departments = non_empty("SEED_DEPARTMENTS")
            .map(|raw| {
                raw.split(',')
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|d| !d.is_empty())
            .unwrap_or(defaults.departments);

        Self {
            on_startup: parse_bool_or(&lookup, "SEED_ON_STARTUP", defaults.on_startup),
            books_url: non_empty("SEED_BOOKS_URL").unwrap_or(defaults.books_url),
            users_url: non_empty("SEED_USERS_URL").unwrap_or(defaults.users_url),
            transactions_url: non_empty("SEED_TRANSACTIONS_URL")
                .unwrap_or(defaults.transactions_url),
            departments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_defaults() {
        let config = SeedConfig::from_lookup(lookup_from(&[]));
        assert!(config.on_startup);
        assert_eq!(config.departments.len(), 6);
        assert!(config.books_url.ends_with("books.csv.csv"));
    }

    #[test]
    fn test_overrides() {
        let config = SeedConfig::from_lookup(lookup_from(&[
            ("SEED_ON_STARTUP", "false"),
            ("SEED_USERS_URL", "http://localhost/users.csv"),
            ("SEED_DEPARTMENTS", "Physics, Law"),
        ]));
        assert!(!config.on_startup);
        assert_eq!(config.users_url, "http://localhost/users.csv");
        assert_eq!(config.departments, vec!["Physics", "Law"]);
    }
}
