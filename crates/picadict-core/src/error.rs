//! Error types for registry construction.
//!
//! Lookup misses are not errors: every query on a frozen registry
//! returns an `Option` or an empty collection. The variants here only
//! surface while a catalog is being populated, where they indicate a
//! defect in the catalog data itself.

use thiserror::Error;

use crate::registry::Notation;

/// Errors raised while registering fields into a catalog.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A notation key is already taken in the catalog.
    #[error("duplicate {notation} key '{key}' in catalog '{catalog}'")]
    DuplicateKey {
        /// Name of the catalog being populated.
        catalog: String,
        /// Key space the collision was detected in.
        notation: Notation,
        /// The colliding key.
        key: String,
    },

    /// A field declared a blank key, or no key at all, for a notation
    /// that requires one.
    #[error("empty {notation} key for field '{label}' in catalog '{catalog}'")]
    EmptyKey {
        /// Name of the catalog being populated.
        catalog: String,
        /// Key space the blank key belongs to.
        notation: Notation,
        /// Label of the offending field.
        label: String,
    },

    /// A key sorts between the members of a force-ordered key pair
    /// without an override entry of its own, leaving the catalog order
    /// dependent on insertion order.
    #[error("key '{key}' in catalog '{catalog}' sorts between force-ordered keys '{first}' and '{second}' without an override entry")]
    OrderingConflict {
        /// Name of the catalog being populated.
        catalog: String,
        /// The key breaking the pair.
        key: String,
        /// Pair member forced first.
        first: String,
        /// Pair member forced second.
        second: String,
    },
}
