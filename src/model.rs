//! Portfolio entities.
//!
//! Singletons (profile, social links, creator info) are stored as one object
//! and always have a usable default. Collections are stored as a map from
//! child key to record; the key becomes the record's `id`.
//!
//! Wire names are camelCase (`bannerImage`, `yearsExperience`).
//!
//! Field decoding is lenient. Numbers and numeric strings convert into each
//! other, a numeric post date is read as epoch milliseconds, and any other
//! mismatch falls back to the field's default. One bad field never drops the
//! record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::source::paths;

// =============================================================================
// Entity traits
// =============================================================================

/// Anything a hook can hold, tied to the store path it lives at.
pub trait Entity: Clone + PartialEq + DeserializeOwned + 'static {
    const PATH: &'static str;
}

/// One object per store, merged over its default.
pub trait Singleton: Entity + Default + Serialize {}

/// One record per child key.
pub trait Record: Entity {
    /// The child key this record was stored under.
    fn id(&self) -> &str;

    /// Whether a raw child should be shown at all.
    fn keep(_raw: &Value) -> bool {
        true
    }

    /// Put a freshly decoded snapshot in display order.
    fn arrange(_records: &mut Vec<Self>) {}
}

// =============================================================================
// Singletons
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub headline1: String,
    #[serde(deserialize_with = "lenient::text")]
    pub headline2: String,
    #[serde(deserialize_with = "lenient::text")]
    pub intro: String,
    #[serde(deserialize_with = "lenient::text")]
    pub picture: String,
    #[serde(deserialize_with = "lenient::text")]
    pub banner_image: String,
    #[serde(deserialize_with = "lenient::number")]
    pub years_experience: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub clients_worked: f64,
}

impl Entity for Profile {
    const PATH: &'static str = paths::PROFILE;
}
impl Singleton for Profile {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub linkedin: String,
    #[serde(deserialize_with = "lenient::text")]
    pub facebook: String,
    #[serde(deserialize_with = "lenient::text")]
    pub instagram: String,
}

impl SocialLinks {
    /// Non-empty links as (label, target) pairs, in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Email", self.email.as_str()),
            ("LinkedIn", self.linkedin.as_str()),
            ("Facebook", self.facebook.as_str()),
            ("Instagram", self.instagram.as_str()),
        ]
        .into_iter()
        .filter(|(_, target)| !target.is_empty())
        .collect()
    }
}

impl Entity for SocialLinks {
    const PATH: &'static str = paths::SOCIAL_LINKS;
}
impl Singleton for SocialLinks {}

pub const DEFAULT_CREATOR: &str = "SABAN PRODUCTIONS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub link: String,
}

impl Default for CreatorInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_CREATOR.to_string(),
            link: String::new(),
        }
    }
}

impl Entity for CreatorInfo {
    const PATH: &'static str = paths::CREATOR_INFO;
}
impl Singleton for CreatorInfo {}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Skill {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Skill {
    const PATH: &'static str = paths::SKILLS;
}

impl Record for Skill {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Service {
    const PATH: &'static str = paths::SERVICES;
}

impl Record for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Project {
    const PATH: &'static str = paths::PROJECTS;
}

impl Record for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Testimonial {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub stars: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub feedback: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub approved: Option<bool>,
}

impl Entity for Testimonial {
    const PATH: &'static str = paths::TESTIMONIALS;
}

impl Record for Testimonial {
    fn id(&self) -> &str {
        &self.id
    }

    /// Only an explicit `approved: false` hides a testimonial.
    fn keep(raw: &Value) -> bool {
        raw.get("approved") != Some(&Value::Bool(false))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub image: Option<String>,
}

impl Post {
    pub fn published(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }
}

impl Entity for Post {
    const PATH: &'static str = paths::POSTS;
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }

    /// Most recent first; undated posts sink to the end.
    fn arrange(records: &mut Vec<Self>) {
        records.sort_by_cached_key(|post| std::cmp::Reverse(post.published()));
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse an ISO-8601 date or date-time. Date-only and zone-less values are
/// taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Lenient field decoding
// =============================================================================

mod lenient {
    use super::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(scalar(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(scalar(Value::deserialize(deserializer)?))
    }

    /// Finite numbers, from a number or a numeric string. Anything else is 0.
    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(parsed.filter(|n| n.is_finite()).unwrap_or_default())
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            _ => None,
        })
    }

    /// Strings pass through; numbers are epoch milliseconds.
    pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Value::Number(n) = &value {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
            if let Some(dt) = millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
                return Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
        }
        Ok(scalar(value).unwrap_or_default())
    }
}

/// `Some` only for a non-blank string.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: &str, date: &str) -> Post {
        Post {
            id: id.to_string(),
            title: String::new(),
            content: String::new(),
            date: date.to_string(),
            image: None,
        }
    }

    #[test]
    fn test_parse_date_forms() {
        let day = parse_date("2024-06-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-06-01T00:00:00+00:00");

        let zoned = parse_date("2024-06-01T10:00:00+02:00").unwrap();
        assert_eq!(zoned.to_rfc3339(), "2024-06-01T08:00:00+00:00");

        assert!(parse_date("2024-06-01T10:30:00").is_some());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_posts_arrange_most_recent_first() {
        let mut posts = vec![
            post("a", "2023-01-01"),
            post("b", "2024-06-01"),
            post("c", "2023-06-15"),
        ];
        Post::arrange(&mut posts);
        let dates: Vec<&str> = posts.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2023-06-15", "2023-01-01"]);
    }

    #[test]
    fn test_undated_posts_sink() {
        let mut posts = vec![post("x", "soon"), post("a", "2023-01-01")];
        Post::arrange(&mut posts);
        assert_eq!(posts[0].id, "a");
        assert_eq!(posts[1].id, "x");
    }

    #[test]
    fn test_testimonial_keep() {
        assert!(!Testimonial::keep(&json!({"approved": false})));
        assert!(Testimonial::keep(&json!({"approved": true})));
        assert!(Testimonial::keep(&json!({})));
        assert!(Testimonial::keep(&json!({"approved": "false"})));
    }

    #[test]
    fn test_creator_default() {
        assert_eq!(CreatorInfo::default().name, "SABAN PRODUCTIONS");
        assert_eq!(CreatorInfo::default().link, "");
    }

    #[test]
    fn test_profile_wire_names() {
        let value = serde_json::to_value(Profile::default()).unwrap();
        assert!(value.get("bannerImage").is_some());
        assert!(value.get("yearsExperience").is_some());
        assert!(value.get("clientsWorked").is_some());
    }

    #[test]
    fn test_social_entries_skip_empty() {
        let links = SocialLinks {
            email: "me@example.com".into(),
            instagram: "https://instagram.com/me".into(),
            ..Default::default()
        };
        let labels: Vec<&str> = links.entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Email", "Instagram"]);
    }

    #[test]
    fn test_skill_keeps_extra_fields() {
        let skill: Skill = serde_json::from_value(json!({
            "id": "s1", "name": "Rust", "level": 90
        }))
        .unwrap();
        assert_eq!(skill.name, "Rust");
        assert_eq!(skill.extra.get("level"), Some(&json!(90)));
    }

    #[test]
    fn test_profile_numeric_strings() {
        let profile: Profile = serde_json::from_value(json!({
            "name": "Ada", "yearsExperience": "10", "clientsWorked": 7.5
        }))
        .unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.years_experience, 10.0);
        assert_eq!(profile.clients_worked, 7.5);
    }

    #[test]
    fn test_mismatched_field_falls_back() {
        let profile: Profile = serde_json::from_value(json!({
            "name": 42, "intro": {"nested": true}, "clientsWorked": "many"
        }))
        .unwrap();
        assert_eq!(profile.name, "42");
        assert_eq!(profile.intro, "");
        assert_eq!(profile.clients_worked, 0.0);
    }

    #[test]
    fn test_post_numeric_date() {
        let post: Post = serde_json::from_value(json!({
            "id": "p1", "title": "Launch", "date": 1717200000000u64
        }))
        .unwrap();
        assert_eq!(post.date, "2024-06-01T00:00:00.000Z");
        assert_eq!(post.published().unwrap().to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_testimonial_string_stars() {
        let review: Testimonial = serde_json::from_value(json!({
            "id": "t1", "name": "Jon", "stars": "5", "approved": "yes"
        }))
        .unwrap();
        assert_eq!(review.stars, 5.0);
        assert_eq!(review.approved, None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("a.png".into())), Some("a.png"));
        assert_eq!(non_empty(&Some("  ".into())), None);
        assert_eq!(non_empty(&None), None);
    }
}
