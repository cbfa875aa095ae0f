//! In-memory couple store for tests and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{CoupleRecord, CoupleStoreError, CoupleStoreReader};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCoupleStore {
    couples: Arc<RwLock<Vec<CoupleRecord>>>,
}

impl InMemoryCoupleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_couples(couples: Vec<CoupleRecord>) -> Self {
        Self {
            couples: Arc::new(RwLock::new(couples)),
        }
    }

    pub async fn add(&self, couple: CoupleRecord) {
        self.couples.write().await.push(couple);
    }
}

#[async_trait]
impl CoupleStoreReader for InMemoryCoupleStore {
    async fn list_couples(&self) -> Result<Vec<CoupleRecord>, CoupleStoreError> {
        Ok(self.couples.read().await.clone())
    }
}
