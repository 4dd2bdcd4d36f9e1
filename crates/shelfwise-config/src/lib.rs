//! # Shelfwise Config
//!
//! Configuration types for the Shelfwise API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`server`]: Listen addresses for the API and the metrics exporter
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`fines`]: Grace period and tier table for late fees
//! - [`seed`]: Startup dataset import
//! - [`observability`]: Log files, OpenTelemetry export, metrics toggle
//! - [`report`]: Spreadsheet report settings
//!
//! Every struct exposes `from_env()` plus a `from_lookup()` that takes any
//! `Fn(&str) -> Option<String>`, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_config::{CorsConfig, FineConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let cors = CorsConfig::from_env();
//! let policy = FineConfig::from_env()?.into_policy()?;
//! ```

pub mod cors;
pub mod errors;
pub mod fines;
pub mod observability;
pub mod report;
pub mod seed;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use errors::ConfigError;
pub use fines::FineConfig;
pub use observability::ObservabilityConfig;
pub use report::ReportConfig;
pub use seed::SeedConfig;
pub use server::{ServerConfig, StorageBackend};

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: std::collections::HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}
