//! YAML catalog reader.
//!
//! Reads category sections from a YAML file:
//!
//! ```yaml
//! categories:
//!   - name: MARRIAGE EXPECTATIONS AND INVENTORY ON RESPONSIBLE PARENTHOOD
//!     questions:
//!       - text: We agree on how to discipline our children
//!       - text: Regarding household duties
//!         sub_questions:
//!           - Cooking is shared
//!           - Cleaning is shared
//! ```
//!
//! The file is re-read on every load so edits are picked up by the next
//! training run.

use async_trait::async_trait;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::catalog::{Catalog, CatalogSection};
use crate::ports::{CatalogError, CatalogReader};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CatalogSection>,
}

/// Loads the catalog from a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlCatalogReader {
    path: PathBuf,
}

impl YamlCatalogReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CatalogReader for YamlCatalogReader {
    async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let yaml = fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CatalogError::Unavailable(format!("{} not found", self.path.display()))
            } else {
                CatalogError::Unavailable(e.to_string())
            }
        })?;

        let file: CatalogFile =
            serde_yaml::from_str(&yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let catalog = Catalog::from_sections(&file.categories)?;

        debug!(
            path = %self.path.display(),
            categories = catalog.category_count(),
            questions = catalog.question_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CategoryId;
    use tempfile::TempDir;

    const CATALOG_YAML: &str = r#"
categories:
  - name: MARRIAGE EXPECTATIONS AND INVENTORY ON RESPONSIBLE PARENTHOOD
    questions:
      - text: We agree on discipline
      - text: Household duties
        sub_questions:
          - Cooking is shared
          - Cleaning is shared
  - name: MARRIAGE EXPECTATIONS AND INVENTORY ON PLANNING THE FAMILY
    questions:
      - text: We agree on the number of children
"#;

    async fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("catalog.yaml");
        fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn loads_sections_with_sub_questions() {
        let dir = TempDir::new().unwrap();
        let reader = YamlCatalogReader::new(write(&dir, CATALOG_YAML).await);

        let catalog = reader.load_catalog().await.unwrap();

        assert_eq!(
            catalog.categories(),
            &["Responsible Parenthood".to_string(), "Planning The Family".to_string()]
        );
        assert_eq!(catalog.question_count(), 4);
        assert_eq!(catalog.category_of(3), Some(CategoryId::new(1).unwrap()));
        assert_eq!(catalog.category_of(4), Some(CategoryId::new(2).unwrap()));
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let reader = YamlCatalogReader::new(dir.path().join("absent.yaml"));

        let err = reader.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let reader = YamlCatalogReader::new(write(&dir, "categories: [unterminated").await);

        let err = reader.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn catalog_without_categories_is_invalid() {
        let dir = TempDir::new().unwrap();
        let reader = YamlCatalogReader::new(write(&dir, "categories: []\n").await);

        let err = reader.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }
}
