use serde::{Deserialize, Deserializer};

/// Treats an empty query-string value (`?genre=`) the same as an absent one.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

pub fn deserialize_optional_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        search: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_usize")]
        limit: Option<usize>,
    }

    #[test]
    fn test_empty_values_become_none() {
        let params: Params = serde_json::from_str(r#"{"search": "  ", "limit": ""}"#).unwrap();
        assert!(params.search.is_none());
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_values_are_trimmed_and_parsed() {
        let params: Params = serde_json::from_str(r#"{"search": " dune ", "limit": "5"}"#).unwrap();
        assert_eq!(params.search.as_deref(), Some("dune"));
        assert_eq!(params.limit, Some(5));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert!(params.search.is_none());
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let result = serde_json::from_str::<Params>(r#"{"limit": "ten"}"#);
        assert!(result.is_err());
    }
}
