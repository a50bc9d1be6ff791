//! Shallow merge of a snapshot over a default value.
//!
//! `{ ...default, ...incoming }`: every top-level field present in the
//! snapshot replaces the default's, everything else keeps the default. Nested
//! objects are replaced whole, never merged. `null` fields in the snapshot are
//! skipped, since the store never holds nulls and a null must not wipe a
//! default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// One-level field overlay of `incoming` onto `base`.
pub fn overlay(base: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in incoming {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Merge `incoming` over `default` and decode the result.
///
/// Fails if `incoming` is not an object or the merged fields do not fit `T`.
pub fn merge_defaults<T>(default: &T, incoming: &Value) -> serde_json::Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(incoming) = incoming else {
        return Err(serde::de::Error::custom(format!(
            "expected an object, found {}",
            kind(incoming)
        )));
    };

    let base = match serde_json::to_value(default)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    serde_json::from_value(Value::Object(overlay(&base, incoming)))
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreatorInfo, Profile};
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_overlay_keeps_unspecified_fields() {
        let merged = overlay(&map(json!({"a": 0, "b": 2})), &map(json!({"a": 1})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_overlay_is_shallow() {
        let merged = overlay(
            &map(json!({"nested": {"x": 1, "y": 2}})),
            &map(json!({"nested": {"x": 5}})),
        );
        assert_eq!(Value::Object(merged), json!({"nested": {"x": 5}}));
    }

    #[test]
    fn test_overlay_skips_nulls() {
        let merged = overlay(&map(json!({"a": 0})), &map(json!({"a": null})));
        assert_eq!(Value::Object(merged), json!({"a": 0}));
    }

    #[test]
    fn test_merge_profile() {
        let profile: Profile =
            merge_defaults(&Profile::default(), &json!({"name": "Ada", "yearsExperience": 7}))
                .unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.years_experience, 7.0);
        assert_eq!(profile.headline1, "");
        assert_eq!(profile.clients_worked, 0.0);
    }

    #[test]
    fn test_merge_keeps_non_empty_default() {
        let info: CreatorInfo =
            merge_defaults(&CreatorInfo::default(), &json!({"link": "https://studio.example"}))
                .unwrap();
        assert_eq!(info.name, "SABAN PRODUCTIONS");
        assert_eq!(info.link, "https://studio.example");
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let err = merge_defaults(&Profile::default(), &json!("Ada")).unwrap_err();
        assert!(err.to_string().contains("expected an object, found a string"));
    }

    #[test]
    fn test_merge_tolerates_mistyped_fields() {
        let profile: Profile = merge_defaults(
            &Profile::default(),
            &json!({"name": "Ada", "yearsExperience": "10", "clientsWorked": "many"}),
        )
        .unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.years_experience, 10.0);
        assert_eq!(profile.clients_worked, 0.0);
    }
}
