//! Snapshot projection: raw store values into entity state.

use serde_json::Value;
use tracing::warn;

use super::merge::{kind, merge_defaults};
use crate::model::{Record, Singleton};
use crate::{Error, Result};

/// Merge a singleton snapshot over the entity's default.
pub fn project_singleton<T: Singleton>(value: &Value) -> Result<T> {
    merge_defaults(&T::default(), value).map_err(|err| Error::decode(T::PATH, err))
}

/// Turn a keyed collection snapshot into display-ordered records.
///
/// Each child is tagged with its key as `id` (overriding any `id` the child
/// carries). Array snapshots are keyed by index. Null children and children
/// rejected by [`Record::keep`] are dropped; children that fail to decode are
/// skipped with a warning.
pub fn project_collection<T: Record>(value: &Value) -> Result<Vec<T>> {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => {
            return Err(Error::decode(
                T::PATH,
                format!("expected a keyed collection, found {}", kind(other)),
            ));
        }
    };

    let mut records = Vec::with_capacity(children.len());
    for (key, child) in children {
        if child.is_null() || !T::keep(child) {
            continue;
        }
        match decode_child::<T>(&key, child) {
            Ok(record) => records.push(record),
            Err(err) => warn!(%err, "skipping record"),
        }
    }

    T::arrange(&mut records);
    Ok(records)
}

fn decode_child<T: Record>(key: &str, child: &Value) -> Result<T> {
    let path = format!("{}/{}", T::PATH, key);
    let Value::Object(fields) = child else {
        return Err(Error::decode(
            &path,
            format!("expected an object, found {}", kind(child)),
        ));
    };

    let mut fields = fields.clone();
    fields.insert("id".to_string(), Value::String(key.to_string()));
    serde_json::from_value(Value::Object(fields)).map_err(|err| Error::decode(&path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreatorInfo, Post, Profile, Skill, Testimonial};
    use serde_json::json;

    #[test]
    fn test_keys_become_ids() {
        let skills: Vec<Skill> =
            project_collection(&json!({"k1": {"x": 1}, "k2": {"x": 2}})).unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].id, "k1");
        assert_eq!(skills[0].extra.get("x"), Some(&json!(1)));
        assert_eq!(skills[1].id, "k2");
        assert_eq!(skills[1].extra.get("x"), Some(&json!(2)));
    }

    #[test]
    fn test_key_wins_over_child_id() {
        let skills: Vec<Skill> = project_collection(&json!({"k1": {"id": "other"}})).unwrap();
        assert_eq!(skills[0].id, "k1");
    }

    #[test]
    fn test_array_snapshot_keyed_by_index() {
        let skills: Vec<Skill> =
            project_collection(&json!([null, {"name": "Rust"}, {"name": "Go"}])).unwrap();
        let ids: Vec<&str> = skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_testimonial_filter() {
        let list: Vec<Testimonial> = project_collection(&json!({
            "1": {"name": "A", "approved": false},
            "2": {"name": "B", "approved": true},
            "3": {"name": "C"}
        }))
        .unwrap();
        let ids: Vec<&str> = list.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_post_order() {
        let posts: Vec<Post> = project_collection(&json!({
            "a": {"title": "Old", "date": "2023-01-01"},
            "b": {"title": "New", "date": "2024-06-01"},
            "c": {"title": "Mid", "date": "2023-06-15"}
        }))
        .unwrap();
        let dates: Vec<&str> = posts.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2023-06-15", "2023-01-01"]);
    }

    #[test]
    fn test_bad_child_skipped() {
        let posts: Vec<Post> = project_collection(&json!({
            "a": {"title": "Fine", "date": "2024-01-01"},
            "b": "not a record",
            "c": ["not", "a", "record"]
        }))
        .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "a");
    }

    #[test]
    fn test_mistyped_fields_keep_record() {
        let posts: Vec<Post> = project_collection(&json!({
            "a": {"title": "Dated by number", "date": 1717200000000u64},
            "b": {"title": "Old", "date": "2023-01-01"}
        }))
        .unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let reviews: Vec<Testimonial> =
            project_collection(&json!({"t1": {"name": "Jon", "stars": "5"}})).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].stars, 5.0);
    }

    #[test]
    fn test_scalar_collection_rejected() {
        let result: Result<Vec<Post>> = project_collection(&json!("oops"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_singleton_projection() {
        let profile: Profile = project_singleton(&json!({"intro": "Hi"})).unwrap();
        assert_eq!(profile.intro, "Hi");
        assert_eq!(profile.name, "");

        let info: CreatorInfo = project_singleton(&json!({})).unwrap();
        assert_eq!(info, CreatorInfo::default());

        let err = project_singleton::<Profile>(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().starts_with("cannot decode snapshot at 'profile'"));
    }
}
