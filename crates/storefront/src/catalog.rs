//! Loading the product listing from disk.
//!
//! The listing is read once at startup and shared read-only by every page
//! session. See [`bazaar_core::catalog`] for the file format.

use std::path::Path;
use std::sync::Arc;

use bazaar_core::{Catalog, CatalogError, CatalogFile, InitialCartRow};
use thiserror::Error;

/// Errors loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// The catalog plus the rows every fresh page starts with.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalog: Arc<Catalog>,
    initial_cart: Arc<Vec<InitialCartRow>>,
}

impl CatalogStore {
    /// Load the listing file.
    ///
    /// A missing file yields an empty catalog so the page still renders.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        if !path.exists() {
            tracing::warn!("Catalog file does not exist: {:?}", path);
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&json)?;

        tracing::info!(
            products = store.catalog.len(),
            initial_rows = store.initial_cart.len(),
            "Loaded catalog from {:?}",
            path
        );
        Ok(store)
    }

    /// Build a store from listing JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_file(CatalogFile::from_json(json)?))
    }

    #[must_use]
    pub fn from_file(file: CatalogFile) -> Self {
        Self {
            catalog: Arc::new(Catalog::from_listings(file.products)),
            initial_cart: Arc::new(file.initial_cart),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn initial_cart(&self) -> &[InitialCartRow] {
        &self.initial_cart
    }
}
