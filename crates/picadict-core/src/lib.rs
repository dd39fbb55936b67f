//! Picadict core: a schema registry for PICA cataloging formats.
//!
//! Library catalogs in the PICA world address the same logical field
//! through three notations at once: the compact Pica3 key catalogers
//! type, the expanded Pica+ key stored in records, and an optional
//! MARC 21 mapping for interchange. This crate models field and
//! subfield definitions as immutable, `Arc`-shared values and resolves
//! them through a frozen [`FieldRegistry`]:
//!
//! - [`SubfieldDef`]: one coded component of a field, with label,
//!   repeatability, and compact-notation rendering hints.
//! - [`FieldDef`]: a field across all three notations, with subfield
//!   inheritance, an opt-in related fallback, and behavior variants
//!   (alternate subfield sets, enumerated values, occurrence-templated
//!   holdings fields).
//! - [`RegistryBuilder`] / [`FieldRegistry`]: fallible registration
//!   under every declared key, then a frozen registry with point,
//!   range, and pattern lookups.
//!
//! ```
//! use picadict_core::{FieldDef, RegistryBuilder, Repeatability, SubfieldDef};
//!
//! let mut builder = RegistryBuilder::new("example");
//! let title = builder
//!     .register(
//!         FieldDef::new("4000", "021A", "Haupttitel").with_subfield(SubfieldDef::new(
//!             'a',
//!             "Haupttitel",
//!             Repeatability::NonRepeatable,
//!         )),
//!     )
//!     .unwrap();
//! let registry = builder.build();
//!
//! assert!(std::sync::Arc::ptr_eq(registry.field("021A").unwrap(), &title));
//! assert_eq!(registry.subfield("4000", 'a').unwrap().label(), "Haupttitel");
//! ```

pub mod error;
pub mod field;
pub mod order;
pub mod registry;
pub mod subfield;

pub use error::SchemaError;
pub use field::{FieldDef, FieldKind, MarcKey, DEFAULT_OCCURRENCES};
pub use registry::{FieldRegistry, Notation, RegistryBuilder};
pub use subfield::{Repeatability, SubfieldDef};
