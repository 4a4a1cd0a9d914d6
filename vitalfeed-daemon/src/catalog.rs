//! # Catalog Loading
//!
//! Selects the content source named by the configuration and loads the
//! session's records from it, once, at startup.

use anyhow::{Context, Result};
use provider_curated::{CuratedCatalog, JsonCatalog};
use tracing::info;
use vitalfeed_core::{ContentRecord, ContentSource};

use crate::config::CatalogConfig;

/// The content source for `config`: a JSON file when a path is configured,
/// the built-in curated catalog otherwise.
pub fn source_for(config: &CatalogConfig) -> Box<dyn ContentSource> {
    match &config.path {
        Some(path) => Box::new(JsonCatalog::new(path)),
        None => Box::new(CuratedCatalog::new()),
    }
}

/// Load all records from `source`, in display order.
pub async fn load_records(source: &dyn ContentSource) -> Result<Vec<ContentRecord>> {
    info!("Loading catalog from source '{}' ({})", source.id(), source.name());

    let records = source
        .load()
        .await
        .with_context(|| format!("Failed to load catalog from source '{}'", source.id()))?;

    info!("Loaded {} record(s)", records.len());
    Ok(records)
}
