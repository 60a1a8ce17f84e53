use crate::errors::FetchError;
use crate::models::{EntryDocument, Manifest};
use crate::source::DataSource;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

pub const MANIFEST_NAME: &str = "manifest.json";
pub const SCHEMA_NAME: &str = "schema.json";
pub const DEFAULT_DATA_FILE: &str = "2025-09.json";

pub async fn fetch_manifest(source: &DataSource) -> Result<Manifest, FetchError> {
    source.fetch_json(MANIFEST_NAME).await
}

/// Data file names to load. Falls back to the single default file when the
/// manifest cannot be read.
pub async fn load_manifest(source: &DataSource) -> Vec<String> {
    match fetch_manifest(source).await {
        Ok(manifest) => manifest.files,
        Err(err) => {
            warn!("manifest unavailable, using {DEFAULT_DATA_FILE}: {err}");
            vec![DEFAULT_DATA_FILE.to_string()]
        }
    }
}

pub async fn fetch_document(source: &DataSource, name: &str) -> Result<EntryDocument, FetchError> {
    source.fetch_json(name).await
}

pub async fn load_document(source: &DataSource, name: &str) -> EntryDocument {
    match fetch_document(source, name).await {
        Ok(document) => {
            debug!("loaded {} entries from {name}", document.entries.len());
            document
        }
        Err(err) => {
            warn!("skipping data file: {err}");
            EntryDocument::default()
        }
    }
}

/// Fetches every file at once and returns the documents in `files` order.
pub async fn load_documents(source: &DataSource, files: &[String]) -> Vec<EntryDocument> {
    join_all(files.iter().map(|name| load_document(source, name))).await
}

pub async fn load_schema(source: &DataSource) -> Option<Value> {
    match source.fetch_json(SCHEMA_NAME).await {
        Ok(schema) => Some(schema),
        Err(err) => {
            debug!("schema not shown: {err}");
            None
        }
    }
}
