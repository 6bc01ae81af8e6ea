//! Catalog query pipeline: filter then stable sort.
//!
//! Pure functions over the catalog. Safe to call on every keystroke.

use crate::domain::{Catalog, Course, Level};
use std::cmp::Ordering;
use std::fmt;

/// Category filter. `All` is the sentinel for "no category selected".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// "All" (any case) or an empty string maps to the sentinel.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }

    fn matches(&self, course: &Course) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => course.category == *c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    fn matches(self, course: &Course) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(l) => course.level == l,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Popularity,
        SortKey::Rating,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Newest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Popularity => "Most Popular",
            SortKey::Rating => "Highest Rated",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::Newest => "Newest First",
        }
    }

    fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            SortKey::Popularity => b.students_count.cmp(&a.students_count),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::Newest => b.id.cmp(&a.id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-selected filter and sort parameters. Default matches the whole catalog by popularity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryCriteria {
    pub search_text: String,
    pub category: CategoryFilter,
    pub level: LevelFilter,
    pub sort_key: SortKey,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }
}

fn matches_text(course: &Course, needle: &str) -> bool {
    needle.is_empty()
        || course.title.to_lowercase().contains(needle)
        || course.description.to_lowercase().contains(needle)
        || course.instructor.to_lowercase().contains(needle)
}

/// Filters (text AND category AND level) then sorts. `sort_by` is stable, so ties keep
/// catalog order.
pub fn query(catalog: &[Course], criteria: &QueryCriteria) -> Vec<Course> {
    let needle = criteria.search_text.to_lowercase();
    let mut out: Vec<Course> = catalog
        .iter()
        .filter(|c| {
            matches_text(c, &needle) && criteria.category.matches(c) && criteria.level.matches(c)
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| criteria.sort_key.compare(a, b));
    out
}

/// Distinct categories in first-seen catalog order.
pub fn categories(catalog: &Catalog) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for c in catalog.courses() {
        if !seen.contains(&c.category) {
            seen.push(c.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, title: &str, category: &str, level: Level, price: u64) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("All about {}", title),
            instructor: "Jane Doe".to_string(),
            duration_label: "10 hours".to_string(),
            level,
            price,
            original_price: None,
            rating: 4.5,
            students_count: 100,
            category: category.to_string(),
            lessons_count: 20,
            image_ref: String::new(),
        }
    }

    fn sample() -> Vec<Course> {
        let mut a = course("1", "Complete Python Bootcamp", "Data Science", Level::Beginner, 300);
        a.students_count = 500;
        a.rating = 4.8;
        let mut b = course("2", "React Fundamentals", "Web Development", Level::Intermediate, 100);
        b.students_count = 900;
        b.rating = 4.2;
        let mut c = course("3", "UI Design Basics", "Design", Level::Beginner, 300);
        c.students_count = 900;
        c.instructor = "Guido PYTHONista".to_string();
        let mut d = course("4", "Advanced ML", "Data Science", Level::Advanced, 200);
        d.description = "Uses python and numpy".to_string();
        d.rating = 4.9;
        vec![a, b, c, d]
    }

    fn ids(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_empty_catalog() {
        assert!(query(&[], &QueryCriteria::default()).is_empty());
    }

    #[test]
    fn test_default_criteria_sorts_by_popularity_stably() {
        let out = query(&sample(), &QueryCriteria::default());
        // 2 and 3 tie on students; catalog order is kept.
        assert_eq!(ids(&out), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn test_text_search_case_insensitive_across_fields() {
        let out = query(&sample(), &QueryCriteria::new().search("python"));
        assert_eq!(out.len(), 3);
        for c in &out {
            let hay = format!("{} {} {}", c.title, c.description, c.instructor).to_lowercase();
            assert!(hay.contains("python"));
        }
        assert!(!ids(&out).contains(&"2"));
    }

    #[test]
    fn test_category_and_level_are_and_combined() {
        let criteria = QueryCriteria::new()
            .category(CategoryFilter::parse("Data Science"))
            .level(LevelFilter::Only(Level::Advanced));
        assert_eq!(ids(&query(&sample(), &criteria)), vec!["4"]);

        let none = QueryCriteria::new()
            .search("react")
            .category(CategoryFilter::parse("Design"));
        assert!(query(&sample(), &none).is_empty());
    }

    #[test]
    fn test_category_parse_sentinel() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Design"),
            CategoryFilter::Only("Design".to_string())
        );
    }

    #[test]
    fn test_price_asc_non_decreasing_and_stable() {
        let out = query(&sample(), &QueryCriteria::new().sort_by(SortKey::PriceAsc));
        assert!(out.windows(2).all(|w| w[0].price <= w[1].price));
        // 1 and 3 tie at 300.
        assert_eq!(ids(&out), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_price_desc_rating_newest() {
        let catalog = sample();
        let out = query(&catalog, &QueryCriteria::new().sort_by(SortKey::PriceDesc));
        assert_eq!(ids(&out), vec!["1", "3", "4", "2"]);

        let out = query(&catalog, &QueryCriteria::new().sort_by(SortKey::Rating));
        assert_eq!(ids(&out), vec!["4", "1", "3", "2"]);

        let out = query(&catalog, &QueryCriteria::new().sort_by(SortKey::Newest));
        assert_eq!(ids(&out), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn test_query_does_not_touch_catalog() {
        let catalog = sample();
        let before = catalog.clone();
        let _ = query(&catalog, &QueryCriteria::new().sort_by(SortKey::Newest));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::new(sample());
        assert_eq!(
            categories(&catalog),
            vec!["Data Science", "Web Development", "Design"]
        );
    }
}
