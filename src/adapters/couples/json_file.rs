//! JSON file couple store.
//!
//! Reads a JSON array of couple records. A missing file means no couples
//! have been recorded yet and yields an empty list.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::ports::{CoupleRecord, CoupleStoreError, CoupleStoreReader};

#[derive(Debug, Clone)]
pub struct JsonCoupleStore {
    path: PathBuf,
}

impl JsonCoupleStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CoupleStoreReader for JsonCoupleStore {
    async fn list_couples(&self) -> Result<Vec<CoupleRecord>, CoupleStoreError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No couple file, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(CoupleStoreError::Unavailable(e.to_string())),
        };

        serde_json::from_str(&json).map_err(|e| CoupleStoreError::Parse(e.to_string()))
    }
}
