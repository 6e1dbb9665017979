//! Error taxonomy
//!
//! Structural and configuration problems abort the run; data-quality
//! issues surface as `tracing` warnings instead and never reach this enum.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two extraction records disagree on the default text for one id.
    /// Ambiguous source intent must not be resolved silently.
    #[error(
        "encountered different defaults for message \"{id}\"\n  {prev_origin}: {prev_defaults:?}\n  {next_origin}: {next_defaults:?}"
    )]
    ConflictingDefaults {
        id: String,
        prev_defaults: String,
        next_defaults: String,
        prev_origin: String,
        next_origin: String,
    },

    /// The same id is a plain message in one extraction fragment and a
    /// context bucket in another.
    #[error("\"{id}\" is a message in one extraction fragment and a context in another")]
    ConflictingEntryShapes { id: String },

    #[error("invalid catalog path \"{path}\": {reason}")]
    InvalidCatalogPath { path: String, reason: String },

    /// Ordering by origin requires every message to carry at least one.
    #[error("message \"{id}\" has no origin; catalog was not produced with origin tracking")]
    MissingOrigin { id: String },

    #[error("unknown catalog format \"{name}\"")]
    UnknownFormat { name: String },

    /// Malformed PO document.
    #[error("malformed catalog file at line {line}: {message}")]
    Po { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
