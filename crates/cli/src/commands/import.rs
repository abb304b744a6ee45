//! Bulk import from a JSON file.
//!
//! The file holds the same body `POST /products/bulk-insert/` accepts and is
//! applied through the same transactional reconciler.
//!
//! # Usage
//!
//! ```bash
//! # Validate only
//! catalog-cli import products.json --dry-run
//!
//! # Apply
//! catalog-cli import products.json
//! ```

use std::path::Path;

use catalog_server::config::{CatalogConfig, ConfigError};
use catalog_server::db;
use catalog_server::services::catalog::{self, CatalogError, ProductCommand, payload};

/// Errors from importing a bulk payload.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Import rejected: {0}")]
    Catalog(#[from] CatalogError),
}

/// Read and decode a bulk payload file.
///
/// # Errors
///
/// Returns `ImportError::Read` if the file cannot be read and
/// `ImportError::Catalog` if it is not a valid bulk payload.
pub fn load(path: &Path) -> Result<Vec<ProductCommand>, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;

    Ok(payload::parse_bulk(&bytes)?)
}

/// Import a bulk payload file.
///
/// With `dry_run` the file is only decoded and validated; no connection is
/// opened.
///
/// # Errors
///
/// Returns `ImportError` if the file is invalid or the transaction fails.
pub async fn run(path: &Path, dry_run: bool) -> Result<(), ImportError> {
    let commands = load(path)?;
    tracing::info!(path = %path.display(), products = commands.len(), "Payload decoded");

    if dry_run {
        tracing::info!("Dry run, nothing written");
        return Ok(());
    }

    let config = CatalogConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, 1).await?;

    let summary = catalog::bulk_upsert(&pool, commands).await?;
    tracing::info!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "Import complete"
    );

    Ok(())
}
