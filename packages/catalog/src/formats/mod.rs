//! Catalog formatters.
//!
//! A formatter turns a catalog into its persistent on-disk representation
//! and back. The engine is agnostic to the concrete format behind the
//! trait; PO is the one shipped here.

mod po;
mod po_file;

pub use po::PoFormat;
pub use po_file::{PoFile, PoItem};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::message::Catalog;

/// Per-write serialization options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatOptions {
    /// Language tag written into the catalog header; absent when writing
    /// a template.
    #[serde(skip)]
    pub locale: Option<String>,
    /// Emit source references.
    pub origins: bool,
    /// Include line numbers in source references.
    pub line_numbers: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            locale: None,
            origins: true,
            line_numbers: true,
        }
    }
}

/// Bidirectional serialization contract for catalog files.
pub trait CatalogFormat {
    /// File extension including the leading dot.
    fn catalog_extension(&self) -> &'static str;

    /// Serialize `catalog` to `path`. An existing file's header block is
    /// preserved; the body is regenerated.
    fn write(&self, path: &Path, catalog: &Catalog, options: &FormatOptions) -> Result<()>;

    /// Deserialize the catalog stored at `path`.
    fn read(&self, path: &Path) -> Result<Catalog>;
}

/// Resolve a configured format name to its implementation.
pub fn get_format(name: &str) -> Result<Box<dyn CatalogFormat>> {
    match name {
        "po" => Ok(Box::new(PoFormat)),
        _ => Err(CatalogError::UnknownFormat {
            name: name.to_string(),
        }),
    }
}
