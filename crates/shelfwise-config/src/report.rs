use crate::{env_lookup, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub currency_symbol: String,
    pub top_borrowers: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            top_borrowers: 20,
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            currency_symbol: lookup("REPORT_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            top_borrowers: parse_or(&lookup, "REPORT_TOP_BORROWERS", defaults.top_borrowers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_report_defaults() {
        let config = ReportConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.top_borrowers, 20);
    }
}
