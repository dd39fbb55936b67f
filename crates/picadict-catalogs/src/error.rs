//! Error types for catalog loading.

use picadict_core::SchemaError;
use thiserror::Error;

/// Errors raised while loading a catalog description.
///
/// Every variant is a defect in the catalog data or its environment;
/// none of them occur once a catalog has loaded successfully.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog description is not valid JSON, or does not match
    /// the expected shape.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field could not be registered.
    #[error("catalog schema error: {0}")]
    Schema(#[from] SchemaError),

    /// An `inherit` or `related` entry names a field that is neither
    /// defined earlier in the same catalog nor present in any base
    /// registry.
    #[error("unknown reference '{reference}' from field '{field}' in catalog '{catalog}'")]
    UnknownReference {
        /// Catalog being loaded.
        catalog: String,
        /// Compact key of the field holding the reference.
        field: String,
        /// The unresolved key.
        reference: String,
    },

    /// A field declares more than one behavior variant.
    #[error("field '{field}' in catalog '{catalog}' declares more than one behavior variant")]
    VariantConflict {
        /// Catalog being loaded.
        catalog: String,
        /// Compact key of the offending field.
        field: String,
    },

    /// A subfield declares a whitespace or null code, or a blank
    /// label, and could never be addressed or displayed.
    #[error("subfield {code:?} of field '{field}' in catalog '{catalog}' has a blank code or label")]
    BlankSubfield {
        /// Catalog being loaded.
        catalog: String,
        /// Compact key of the field holding the subfield.
        field: String,
        /// The declared subfield code.
        code: char,
    },
}
