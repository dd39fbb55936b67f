//! The field registry: multi-key registration and lookup.
//!
//! A registry is populated through [`RegistryBuilder`] and frozen into
//! a [`FieldRegistry`] by [`RegistryBuilder::build`]. The frozen form
//! exposes no registration methods at all, so post-load mutation is
//! ruled out by the type system rather than checked at runtime, and
//! the registry can be shared between threads without locking.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;

use crate::error::SchemaError;
use crate::field::FieldDef;
use crate::order;
use crate::subfield::SubfieldDef;

/// The notation key spaces a field can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// Compact internal notation (Pica3).
    Pica3,
    /// Expanded internal notation (Pica+).
    PicaPlus,
    /// External interchange notation (MARC 21).
    Marc21,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Pica3 => write!(f, "pica3"),
            Notation::PicaPlus => write!(f, "pica+"),
            Notation::Marc21 => write!(f, "marc21"),
        }
    }
}

/// Accumulates field registrations for one catalog.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    name: String,
    pica3: HashMap<String, Arc<FieldDef>>,
    picaplus: HashMap<String, Arc<FieldDef>>,
    marc: HashMap<String, Arc<FieldDef>>,
    unified: HashMap<String, Arc<FieldDef>>,
}

impl RegistryBuilder {
    /// Start an empty registry for the named catalog.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Catalog name, used in error messages and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fields registered so far.
    pub fn len(&self) -> usize {
        self.pica3.len()
    }

    /// Whether no field has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.pica3.is_empty()
    }

    /// Register a field under every notation key it declares.
    ///
    /// Every key is validated against every key space before anything
    /// is inserted, so a rejected field leaves the builder exactly as
    /// it was. On success the shared handle is returned, ready for
    /// later fields to inherit from or relate to. Accepts an existing
    /// `Arc` directly when a field built for one catalog is registered
    /// into another.
    pub fn register(
        &mut self,
        field: impl Into<Arc<FieldDef>>,
    ) -> Result<Arc<FieldDef>, SchemaError> {
        let field = field.into();
        let picaplus_keys = field.picaplus_keys();

        if picaplus_keys.is_empty() {
            // A holdings field with an inverted occurrence range would
            // otherwise register without any expanded key.
            return Err(self.empty_key(Notation::PicaPlus, &field));
        }

        self.ensure_free(Notation::Pica3, field.pica3(), &field)?;
        for key in &picaplus_keys {
            self.ensure_free(Notation::PicaPlus, key, &field)?;
        }
        let marc_key = field.marc().map(|marc| marc.to_string());
        if let Some(key) = &marc_key {
            self.ensure_free(Notation::Marc21, key, &field)?;
        }
        // Keys that sort between the members of an ordering override
        // pair without an entry of their own would make the catalog
        // order depend on insertion order; reject them here, where the
        // offending registration can still be named.
        if let Some((key, first, second)) =
            order::override_conflict(field.pica3(), self.pica3.keys().map(String::as_str))
        {
            return Err(SchemaError::OrderingConflict {
                catalog: self.name.clone(),
                key,
                first: first.to_string(),
                second: second.to_string(),
            });
        }

        self.pica3.insert(field.pica3().to_string(), field.clone());
        self.unified.insert(field.pica3().to_string(), field.clone());
        for key in picaplus_keys {
            self.picaplus.insert(key.clone(), field.clone());
            self.unified.insert(key, field.clone());
        }
        if let Some(key) = marc_key {
            self.marc.insert(key, field.clone());
        }
        Ok(field)
    }

    /// Reject blank keys, keys already taken in their own key space,
    /// and unified-map collisions with a different field.
    fn ensure_free(
        &self,
        notation: Notation,
        key: &str,
        field: &Arc<FieldDef>,
    ) -> Result<(), SchemaError> {
        if key.trim().is_empty() {
            return Err(self.empty_key(notation, field));
        }
        let own_space = match notation {
            Notation::Pica3 => &self.pica3,
            Notation::PicaPlus => &self.picaplus,
            Notation::Marc21 => &self.marc,
        };
        if own_space.contains_key(key) {
            return Err(self.duplicate(notation, key));
        }
        // The unified map spans the two internal key spaces; the same
        // text resolving to different fields depending on key space
        // would make unified lookup ambiguous. A field reusing its own
        // key across both spaces is fine.
        if notation != Notation::Marc21 {
            if let Some(existing) = self.unified.get(key) {
                if !Arc::ptr_eq(existing, field) {
                    return Err(self.duplicate(notation, key));
                }
            }
        }
        Ok(())
    }

    fn duplicate(&self, notation: Notation, key: &str) -> SchemaError {
        SchemaError::DuplicateKey {
            catalog: self.name.clone(),
            notation,
            key: key.to_string(),
        }
    }

    fn empty_key(&self, notation: Notation, field: &FieldDef) -> SchemaError {
        SchemaError::EmptyKey {
            catalog: self.name.clone(),
            notation,
            label: field.label().to_string(),
        }
    }

    /// Freeze the registry.
    ///
    /// The sorted compact-notation index is materialized here, once;
    /// range and pattern queries run against it, so their order is
    /// fixed for the life of the registry.
    pub fn build(self) -> FieldRegistry {
        let mut ordered: Vec<(String, Arc<FieldDef>)> = self
            .pica3
            .iter()
            .map(|(key, field)| (key.clone(), field.clone()))
            .collect();
        ordered.sort_by(|a, b| order::compare(&a.0, &b.0));

        debug!(catalog = %self.name, fields = ordered.len(), "registry frozen");

        FieldRegistry {
            name: self.name,
            pica3: self.pica3,
            picaplus: self.picaplus,
            marc: self.marc,
            unified: self.unified,
            ordered,
        }
    }
}

/// A frozen catalog of field definitions.
///
/// All lookups are read-only; misses return `None` or an empty vector,
/// never an error.
#[derive(Debug)]
pub struct FieldRegistry {
    name: String,
    pica3: HashMap<String, Arc<FieldDef>>,
    picaplus: HashMap<String, Arc<FieldDef>>,
    marc: HashMap<String, Arc<FieldDef>>,
    unified: HashMap<String, Arc<FieldDef>>,
    ordered: Vec<(String, Arc<FieldDef>)>,
}

impl FieldRegistry {
    /// Catalog name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the registry holds no fields.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Unified lookup across the two internal key spaces. Callers with
    /// a key of unknown provenance use this instead of probing each
    /// notation in turn.
    pub fn field(&self, key: &str) -> Option<&Arc<FieldDef>> {
        self.unified.get(key)
    }

    /// Exact lookup in one notation's key space.
    pub fn field_by(&self, notation: Notation, key: &str) -> Option<&Arc<FieldDef>> {
        match notation {
            Notation::Pica3 => self.pica3.get(key),
            Notation::PicaPlus => self.picaplus.get(key),
            Notation::Marc21 => self.marc.get(key),
        }
    }

    /// Resolve a subfield through a field key in one step, with the
    /// related-field fallback enabled.
    pub fn subfield(&self, field_key: &str, code: char) -> Option<&Arc<SubfieldDef>> {
        self.field(field_key)
            .and_then(|field| field.subfield(code, true))
    }

    /// All fields whose compact-notation key lies in the inclusive
    /// range `from..=to` under catalog order, in that order. An
    /// inverted range is empty.
    pub fn range(&self, from: &str, to: &str) -> Vec<Arc<FieldDef>> {
        self.ordered
            .iter()
            .filter(|(key, _)| {
                order::compare(key, from) != Ordering::Less
                    && order::compare(key, to) != Ordering::Greater
            })
            .map(|(_, field)| field.clone())
            .collect()
    }

    /// All fields whose compact or expanded key matches `pattern`, in
    /// catalog order. Matching is a substring search; anchor the
    /// pattern with `^...$` for whole-key matches. Holdings fields
    /// match on any of their expanded occurrence keys.
    pub fn find_matching(&self, pattern: &Regex) -> Vec<Arc<FieldDef>> {
        self.ordered
            .iter()
            .filter(|(key, field)| {
                pattern.is_match(key)
                    || field
                        .picaplus_keys()
                        .iter()
                        .any(|picaplus| pattern.is_match(picaplus))
            })
            .map(|(_, field)| field.clone())
            .collect()
    }

    /// Bulk lookup over the unified key space. Unknown keys are
    /// skipped; a field referenced through several of its keys appears
    /// once, at its first hit.
    pub fn fields_for_keys<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Arc<FieldDef>> {
        let mut out: Vec<Arc<FieldDef>> = Vec::new();
        for key in keys {
            if let Some(field) = self.field(key) {
                if !out.iter().any(|seen| Arc::ptr_eq(seen, field)) {
                    out.push(field.clone());
                }
            }
        }
        out
    }

    /// Iterate all fields in catalog order.
    pub fn fields(&self) -> impl Iterator<Item = &Arc<FieldDef>> {
        self.ordered.iter().map(|(_, field)| field)
    }
}
