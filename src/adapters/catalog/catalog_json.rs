//! Implements CatalogPort from a JSON array of courses on disk.

use crate::domain::{Catalog, Course, DomainError};
use crate::ports::CatalogPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct CatalogJson {
    path: PathBuf,
}

impl CatalogJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse and validate catalog JSON. File order becomes catalog order.
    pub fn parse(raw: &str) -> Result<Catalog, DomainError> {
        let courses: Vec<Course> = serde_json::from_str(raw)
            .map_err(|e| DomainError::Catalog(format!("invalid catalog JSON: {}", e)))?;
        Catalog::validated(courses)
    }
}

#[async_trait::async_trait]
impl CatalogPort for CatalogJson {
    async fn load_catalog(&self) -> Result<Catalog, DomainError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Catalog(format!("read {}: {}", self.path.display(), e)))?;
        let catalog = Self::parse(&raw)?;
        info!(
            path = %self.path.display(),
            courses = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COURSES: &str = r#"[
        {"id": "2", "title": "Data Science with Python", "description": "Pandas and plots",
         "instructor": "Dr. Lee", "duration": "30 hours", "level": "Intermediate",
         "price": 3499, "originalPrice": 5999, "rating": 4.8, "studentsCount": 8900,
         "image": "ds.jpg", "category": "Data Science", "lessons": 120},
        {"id": "1", "title": "HTML Basics", "description": "Tags and forms",
         "instructor": "Sam", "duration": "8 hours", "level": "Beginner",
         "price": 999, "rating": 4.2, "studentsCount": 1500,
         "image": "html.jpg", "category": "Web Development", "lessons": 30}
    ]"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let catalog = CatalogJson::parse(TWO_COURSES).unwrap();
        let ids: Vec<&str> = catalog.courses().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(catalog.find("2").unwrap().original_price, Some(5999));
        assert_eq!(catalog.find("1").unwrap().original_price, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            CatalogJson::parse("{\"id\": 1}"),
            Err(DomainError::Catalog(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        std::fs::write(&path, TWO_COURSES).unwrap();
        let catalog = CatalogJson::new(&path).load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);

        let missing = CatalogJson::new(dir.path().join("nope.json"));
        assert!(missing.load_catalog().await.is_err());
    }
}
