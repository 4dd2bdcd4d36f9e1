#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    /// `CORS_ORIGINS` is a comma separated list; `*` (the default) allows any
    /// origin.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_origins = if origins.iter().any(|o| o == "*") {
            Vec::new()
        } else {
            origins
        };

        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}
