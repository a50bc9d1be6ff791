//! Realtime store capability.
//!
//! Everything the hooks know about the remote store is the [`DataSource`]
//! trait: subscribe to a logical path, get called back with the latest value
//! every time it changes, and receive an unsubscribe function.
//!
//! Two implementations live here:
//! - [`MemoryStore`] - in-process document tree with a notification queue
//! - [`FileFeed`] - seeds a `MemoryStore` from a JSON export and reloads it
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::source::{DataSource, MemoryStore, paths};
//!
//! let store = MemoryStore::new();
//! let unsubscribe = store.subscribe(paths::POSTS, Box::new(|snapshot| {
//!     println!("posts: {:?}", snapshot);
//! }));
//!
//! store.set("posts/p1", serde_json::json!({ "title": "Hello" }))?;
//! store.flush(); // callback runs here
//!
//! unsubscribe();
//! ```

mod file;
mod memory;

pub use file::FileFeed;
pub use memory::MemoryStore;

use serde_json::Value;

// =============================================================================
// Capability
// =============================================================================

/// Latest value at a path. `None` means nothing is stored there.
pub type Snapshot = Option<Value>;

/// Callback invoked with each new snapshot.
pub type ValueCallback = Box<dyn Fn(Snapshot)>;

/// Tears a subscription down. Call exactly once.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// A realtime store reachable by logical path.
pub trait DataSource {
    /// Subscribe to `path`. `on_value` runs whenever the value there changes,
    /// including once for the value present at subscription time.
    fn subscribe(&self, path: &str, on_value: ValueCallback) -> Unsubscribe;
}

// =============================================================================
// Paths
// =============================================================================

/// Store paths read by the hooks.
pub mod paths {
    pub const CONNECTED: &str = ".info/connected";
    pub const PROFILE: &str = "profile";
    pub const SKILLS: &str = "skills";
    pub const SERVICES: &str = "services";
    pub const PROJECTS: &str = "projects";
    pub const TESTIMONIALS: &str = "testimonials";
    pub const POSTS: &str = "posts";
    pub const SOCIAL_LINKS: &str = "socialLinks";
    pub const CREATOR_INFO: &str = "creatorInfo";
}

// =============================================================================
// Value helpers
// =============================================================================

/// Truthiness of a stored value, the way the store's web clients judge it.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; objects and arrays are
/// truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The snapshot's value if it counts as present data.
pub fn present(snapshot: &Snapshot) -> Option<&Value> {
    snapshot.as_ref().filter(|value| is_truthy(value))
}

/// Split a slash separated path into segments. The empty path is the root.
pub(crate) fn split_path(path: &str) -> crate::Result<Vec<&str>> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    let invalid = segments
        .iter()
        .any(|s| s.is_empty() || s.contains(['#', '$', '[', ']']));
    if invalid {
        return Err(crate::Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_present() {
        assert!(present(&None).is_none());
        assert!(present(&Some(Value::Null)).is_none());
        assert_eq!(present(&Some(json!({"a": 1}))), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("").unwrap(), Vec::<&str>::new());
        assert_eq!(split_path("/").unwrap(), Vec::<&str>::new());
        assert_eq!(split_path("posts/p1").unwrap(), vec!["posts", "p1"]);
        assert_eq!(split_path("/posts/").unwrap(), vec!["posts"]);
        assert_eq!(split_path(paths::CONNECTED).unwrap(), vec![".info", "connected"]);
        assert!(split_path("posts//p1").is_err());
        assert!(split_path("posts/$bad").is_err());
    }
}
