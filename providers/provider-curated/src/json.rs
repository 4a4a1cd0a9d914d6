//! JSON catalog files.
//!
//! The file holds a single JSON array of records using the catalog keys
//! (`id`, `type`, `title`, `excerpt`, `videoId`, `mediaUrl`, `thumbnail`,
//! `tags`, `updatedAt`, `channel`). Array order is display order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vitalfeed_core::prelude::*;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<CatalogError> for ContentError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Read { .. } => ContentError::Io(err.to_string()),
            CatalogError::Parse { .. } => ContentError::Parse(err.to_string()),
        }
    }
}

/// A catalog loaded from a JSON file on disk.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse catalog JSON text.
    pub fn parse(&self, content: &str) -> std::result::Result<Vec<ContentRecord>, CatalogError> {
        serde_json::from_str(content).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl ContentSource for JsonCatalog {
    fn id(&self) -> &'static str {
        "json"
    }

    fn name(&self) -> &'static str {
        "JSON Catalog"
    }

    async fn load(&self) -> Result<Vec<ContentRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })?;

        let records = self.parse(&content)?;

        let undated = records.iter().filter(|r| r.updated_at.is_none()).count();
        if undated > 0 {
            tracing::debug!(
                "{} record(s) in {} have no usable updatedAt",
                undated,
                self.path.display()
            );
        }

        tracing::info!(
            "Loaded {} record(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}
