//! Domain entities. Pure data structures for the core business.
//!
//! Field names on the wire follow the storefront's JSON layout (camelCase, `duration`,
//! `image`, `lessons`); Rust names say what the value is.

use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A purchasable course. Owned by the catalog and never mutated by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    #[serde(rename = "duration")]
    pub duration_label: String,
    pub level: Level,
    /// Whole currency units.
    pub price: u64,
    /// Present only when a discount applies; never below `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    /// 0.0 ..= 5.0
    pub rating: f64,
    pub students_count: u64,
    pub category: String,
    #[serde(rename = "lessons")]
    pub lessons_count: u32,
    #[serde(rename = "image")]
    pub image_ref: String,
}

impl Course {
    /// Percentage off the original price, rounded to the nearest whole percent.
    /// `None` when the course is not discounted.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|&o| o > self.price)?;
        let ratio = 1.0 - self.price as f64 / original as f64;
        Some((ratio * 100.0).round() as u32)
    }

    /// Amount saved against the original price (0 when not discounted).
    pub fn savings(&self) -> u64 {
        self.original_price
            .map(|o| o.saturating_sub(self.price))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown level: {}", s))
    }
}

/// A course in the cart plus the instant it was added.
///
/// Persisted flat: every course field plus `addedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(flatten)]
    pub course: Course,
    #[serde(deserialize_with = "added_at::deserialize")]
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    pub fn new(course: Course, added_at: DateTime<Utc>) -> Self {
        Self { course, added_at }
    }

    pub fn id(&self) -> &str {
        &self.course.id
    }
}

/// `addedAt` is written as RFC 3339. Older payloads may carry epoch milliseconds,
/// either as a number or as a string.
mod added_at {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => from_millis(ms).map_err(D::Error::custom),
            Raw::Text(s) => {
                if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
                    return Ok(dt.with_timezone(&Utc));
                }
                let ms = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| D::Error::custom(format!("invalid addedAt: {}", s)))?;
                from_millis(ms).map_err(D::Error::custom)
            }
        }
    }

    fn from_millis(ms: i64) -> Result<DateTime<Utc>, String> {
        DateTime::from_timestamp_millis(ms).ok_or_else(|| format!("addedAt out of range: {}", ms))
    }
}

/// Ordered, read-only course list fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Like `new`, but rejects duplicate ids, ratings outside 0..=5, and an
    /// `original_price` below `price`.
    pub fn validated(courses: Vec<Course>) -> Result<Self, DomainError> {
        for (i, c) in courses.iter().enumerate() {
            if courses[..i].iter().any(|p| p.id == c.id) {
                return Err(DomainError::Catalog(format!("duplicate course id: {}", c.id)));
            }
            if !(0.0..=5.0).contains(&c.rating) {
                return Err(DomainError::Catalog(format!(
                    "course {}: rating {} outside 0..=5",
                    c.id, c.rating
                )));
            }
            if c.original_price.is_some_and(|o| o < c.price) {
                return Err(DomainError::Catalog(format!(
                    "course {}: original price below price",
                    c.id
                )));
            }
        }
        Ok(Self { courses })
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn find(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// Signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn course(price: u64, original: Option<u64>) -> Course {
        Course {
            id: "7".to_string(),
            title: "Rust in Practice".to_string(),
            description: "Ownership, traits and async".to_string(),
            instructor: "Ada".to_string(),
            duration_label: "12 hours".to_string(),
            level: Level::Intermediate,
            price,
            original_price: original,
            rating: 4.7,
            students_count: 1200,
            category: "Web Development".to_string(),
            lessons_count: 40,
            image_ref: "https://example.com/rust.jpg".to_string(),
        }
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(course(2999, Some(4999)).discount_percent(), Some(40));
        assert_eq!(course(100, Some(100)).discount_percent(), None);
        assert_eq!(course(100, None).discount_percent(), None);
        assert_eq!(course(2999, Some(4999)).savings(), 2000);
        assert_eq!(course(100, None).savings(), 0);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("advanced".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!(" Beginner ".parse::<Level>().unwrap(), Level::Beginner);
        assert!("expert".parse::<Level>().is_err());
    }

    #[test]
    fn test_cart_entry_wire_layout() {
        let added = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let entry = CartEntry::new(course(2999, Some(4999)), added);
        let v = serde_json::to_value(&entry).unwrap();

        assert_eq!(v["id"], "7");
        assert_eq!(v["duration"], "12 hours");
        assert_eq!(v["originalPrice"], 4999);
        assert_eq!(v["studentsCount"], 1200);
        assert_eq!(v["lessons"], 40);
        assert_eq!(v["image"], "https://example.com/rust.jpg");
        assert_eq!(v["level"], "Intermediate");
        assert!(v["addedAt"].as_str().unwrap().starts_with("2024-03-01T12:30:00"));
    }

    #[test]
    fn test_cart_entry_added_at_formats() {
        let base = serde_json::json!({
            "id": "1", "title": "t", "description": "d", "instructor": "i",
            "duration": "1h", "level": "Beginner", "price": 10, "rating": 4.0,
            "studentsCount": 3, "category": "Design", "lessons": 2, "image": "x.png",
            "someFutureField": true
        });
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for raw in [
            serde_json::json!("2024-01-01T00:00:00.000Z"),
            serde_json::json!(1704067200000i64),
            serde_json::json!("1704067200000"),
        ] {
            let mut v = base.clone();
            v["addedAt"] = raw;
            let entry: CartEntry = serde_json::from_value(v).unwrap();
            assert_eq!(entry.added_at, expected);
            assert_eq!(entry.course.original_price, None);
        }
    }

    #[test]
    fn test_catalog_validation() {
        assert!(Catalog::validated(vec![course(10, Some(20))]).is_ok());
        assert!(Catalog::validated(vec![course(10, None), course(20, None)]).is_err());
        assert!(Catalog::validated(vec![course(30, Some(20))]).is_err());
        let mut bad = course(10, None);
        bad.rating = 5.5;
        assert!(matches!(
            Catalog::validated(vec![bad]),
            Err(DomainError::Catalog(_))
        ));
    }

    #[test]
    fn test_catalog_find() {
        let catalog = Catalog::new(vec![course(10, None)]);
        assert!(catalog.find("7").is_some());
        assert!(catalog.find("8").is_none());
        assert_eq!(catalog.len(), 1);
    }
}
