//! Built-in PICA catalogs and a JSON catalog loader.
//!
//! Ships three embedded catalog descriptions, GND-flavored authority
//! data, K10plus-flavored bibliographic data, and a small
//! classification catalog, each loaded once on first access and frozen
//! into a [`FieldRegistry`]. The bibliographic catalog links into the
//! authority catalog: its linked fields share `Arc` instances with the
//! authority definitions instead of copying them.
//!
//! Custom catalogs load through [`load_str`] or [`load_file`] with any
//! set of base registries:
//!
//! ```
//! use picadict_catalogs as catalogs;
//!
//! let titles = catalogs::bibliographic();
//! let field = titles.field("4000").unwrap();
//! assert_eq!(field.picaplus(), "021A");
//! assert_eq!(field.subfield('a', false).unwrap().label(), "Haupttitel");
//! ```

pub mod error;
pub mod loader;

pub use error::CatalogError;
pub use loader::{load_file, load_str};

use std::sync::LazyLock;

use picadict_core::FieldRegistry;

static AUTHORITY: LazyLock<FieldRegistry> = LazyLock::new(|| {
    load_str(include_str!("../data/authority.json"), &[])
        .unwrap_or_else(|err| panic!("embedded authority catalog failed to load: {err}"))
});

static BIBLIOGRAPHIC: LazyLock<FieldRegistry> = LazyLock::new(|| {
    load_str(include_str!("../data/bibliographic.json"), &[authority()])
        .unwrap_or_else(|err| panic!("embedded bibliographic catalog failed to load: {err}"))
});

static CLASSIFICATION: LazyLock<FieldRegistry> = LazyLock::new(|| {
    load_str(include_str!("../data/classification.json"), &[])
        .unwrap_or_else(|err| panic!("embedded classification catalog failed to load: {err}"))
});

/// GND-flavored authority field definitions.
///
/// Loaded from the embedded description on first access and cached for
/// the life of the process.
///
/// # Panics
///
/// Panics on first access if the embedded description fails to load.
/// That is a defect in the shipped data, not a runtime condition.
pub fn authority() -> &'static FieldRegistry {
    &AUTHORITY
}

/// K10plus-flavored bibliographic field definitions.
///
/// Linked fields (persons, corporate bodies, subject terms) reference
/// the [`authority`] catalog; accessing this registry loads that one
/// too.
///
/// # Panics
///
/// Panics on first access if the embedded description fails to load.
pub fn bibliographic() -> &'static FieldRegistry {
    &BIBLIOGRAPHIC
}

/// Basisklassifikation field definitions.
///
/// # Panics
///
/// Panics on first access if the embedded description fails to load.
pub fn classification() -> &'static FieldRegistry {
    &CLASSIFICATION
}
