//! Query-string helpers that treat empty values as absent.
//!
//! Browsers and form builders send `?month=&year=2024`; these deserializers
//! turn the empty `month` into `None` instead of failing the whole request.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
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
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        subject_id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_i32")]
        month: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        limit: Option<i64>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let params: Params =
            serde_json::from_str(r#"{"subject_id":"","month":"","limit":" "}"#).unwrap();
        assert!(params.subject_id.is_none());
        assert!(params.month.is_none());
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_values_are_parsed() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"subject_id":"{}","month":"3","limit":"25"}}"#, id);
        let params: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(params.subject_id, Some(id));
        assert_eq!(params.month, Some(3));
        assert_eq!(params.limit, Some(25));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let params: Params = serde_json::from_str("{}").unwrap();
        assert!(params.subject_id.is_none());
        assert!(params.month.is_none());
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result: Result<Params, _> = serde_json::from_str(r#"{"month":"march"}"#);
        assert!(result.is_err());
    }
}
