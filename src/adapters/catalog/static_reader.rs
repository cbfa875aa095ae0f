//! Static catalog reader serving a fixed catalog.

use async_trait::async_trait;

use crate::domain::catalog::Catalog;
use crate::ports::{CatalogError, CatalogReader};

/// Serves a catalog held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalogReader {
    catalog: Catalog,
}

impl StaticCatalogReader {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Reader for the built-in four-category catalog.
    pub fn fallback() -> Self {
        Self::new(Catalog::fallback())
    }
}

#[async_trait]
impl CatalogReader for StaticCatalogReader {
    async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        Ok(self.catalog.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_reader_serves_four_categories() {
        let catalog = StaticCatalogReader::fallback().load_catalog().await.unwrap();
        assert_eq!(catalog.category_count(), 4);
        assert_eq!(catalog.question_count(), 4);
    }
}
