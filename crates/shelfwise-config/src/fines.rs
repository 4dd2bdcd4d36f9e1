//! Late-fee policy configuration.
//!
//! - `FINE_GRACE_PERIOD_DAYS`: whole days past due before fines start (default 5)
//! - `FINE_TIERS`: tier table as `start-end:rate`, comma separated, the last
//!   tier open-ended (default `1-7:2,8-14:5,15-:10`)

use shelfwise_fines::FinePolicy;
use shelfwise_fines::policy::DEFAULT_GRACE_PERIOD_DAYS;

use crate::env_lookup;
use crate::errors::ConfigError;

pub const DEFAULT_FINE_TIERS: &str = "1-7:2,8-14:5,15-:10";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FineConfig {
    pub grace_period_days: u32,
    pub tiers: String,
}

impl Default for FineConfig {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            tiers: DEFAULT_FINE_TIERS.to_string(),
        }
    }
}

impl FineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// A malformed grace period is an error, not a fallback to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grace_period_days = match lookup("FINE_GRACE_PERIOD_DAYS") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "FINE_GRACE_PERIOD_DAYS",
                        value: raw.clone(),
                        expected: "a non-negative integer",
                    })?
            }
            _ => DEFAULT_GRACE_PERIOD_DAYS,
        };

        let tiers = lookup("FINE_TIERS")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FINE_TIERS.to_string());

        Ok(Self {
            grace_period_days,
            tiers,
        })
    }

    pub fn into_policy(self) -> Result<FinePolicy, ConfigError> {
        let tiers = FinePolicy::parse_tiers(&self.tiers)?;
        Ok(FinePolicy::new(self.grace_period_days, tiers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_default_matches_builtin_policy() {
        let policy = FineConfig::from_lookup(lookup_from(&[]))
            .unwrap()
            .into_policy()
            .unwrap();
        assert_eq!(policy, FinePolicy::default());
    }

    #[test]
    fn test_custom_policy() {
        let policy = FineConfig::from_lookup(lookup_from(&[
            ("FINE_GRACE_PERIOD_DAYS", "2"),
            ("FINE_TIERS", "1-3:1.5, 4-:4"),
        ]))
        .unwrap()
        .into_policy()
        .unwrap();
        assert_eq!(policy.grace_period_days(), 2);
        assert_eq!(policy.tiers().len(), 2);
        assert_eq!(policy.tiers()[1].days_end, None);
    }

    #[test]
    fn test_bad_grace_is_rejected() {
        let result = FineConfig::from_lookup(lookup_from(&[("FINE_GRACE_PERIOD_DAYS", "-1")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_gapped_tiers_are_rejected() {
        let result = FineConfig::from_lookup(lookup_from(&[("FINE_TIERS", "1-7:2,9-:5")]))
            .unwrap()
            .into_policy();
        assert!(matches!(result, Err(ConfigError::Policy(_))));
    }
}
