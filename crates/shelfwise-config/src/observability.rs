use crate::{env_lookup, parse_bool_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Prometheus metrics and the metrics listener.
    pub enabled: bool,
    pub log_dir: String,
    /// OTLP collector; tracing export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: "storage/logs".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            enabled: parse_bool_or(&lookup, "OBSERVABILITY_ENABLED", defaults.enabled),
            log_dir: lookup("LOG_DIR")
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(defaults.log_dir),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup_from;

    #[test]
    fn test_otlp_only_when_set() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[]));
        assert!(config.otlp_endpoint.is_none());
        assert!(config.enabled);

        let config = ObservabilityConfig::from_lookup(lookup_from(&[
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
            ("OBSERVABILITY_ENABLED", "0"),
        ]));
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
        assert!(!config.enabled);
    }
}
