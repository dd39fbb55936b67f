//! Synthetic catalog generation for benchmarks.
//!
//! Generators are seeded so every run measures the same catalog.

use std::sync::Arc;

use picadict_core::{
    FieldDef, FieldRegistry, MarcKey, RegistryBuilder, Repeatability, SubfieldDef,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scale factor for synthetic catalogs.
#[derive(Clone, Copy, Debug)]
pub enum Scale {
    /// ~100 fields, quick iteration.
    Small,
    /// ~2,000 fields, the default measuring point. Real PICA catalogs
    /// sit around this size.
    Medium,
    /// ~10,000 fields, stress scale.
    Large,
}

impl Scale {
    /// Number of fields generated at this scale.
    pub fn count(&self) -> usize {
        match self {
            Scale::Small => 100,
            Scale::Medium => 2_000,
            Scale::Large => 10_000,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Medium
    }
}

/// Compact key of the `i`-th synthetic field.
pub fn pica3_key(i: usize) -> String {
    format!("{i:04}")
}

/// Expanded key of the `i`-th synthetic field.
pub fn picaplus_key(i: usize) -> String {
    let letter = char::from(b'A' + (i % 26) as u8);
    format!("{:03}{letter}", i / 26)
}

const SUBFIELD_POOL: &[(char, &str)] = &[
    ('a', "Haupteintrag"),
    ('b', "Untergliederung"),
    ('c', "Ergänzung"),
    ('d', "Datum"),
    ('e', "Einleitung"),
    ('f', "Fußnote"),
    ('g', "Zusatz"),
    ('h', "Verantwortlichkeit"),
];

/// Build a frozen synthetic catalog with `scale.count()` fields.
///
/// Every third field carries a MARC mapping, every fifth inherits from
/// a random earlier field, every seventh relates to one, and every
/// ninety-seventh is a holdings field with twenty occurrences.
pub fn synthetic_catalog(scale: Scale) -> FieldRegistry {
    let mut rng = StdRng::seed_from_u64(42);
    let mut builder = RegistryBuilder::new("synthetic");
    let mut handles: Vec<Arc<FieldDef>> = Vec::with_capacity(scale.count());

    for i in 0..scale.count() {
        let mut field = FieldDef::new(pica3_key(i), picaplus_key(i), format!("Feld {i}"));

        let subfield_count = 2 + i % (SUBFIELD_POOL.len() - 2);
        for &(code, label) in &SUBFIELD_POOL[..subfield_count] {
            let repeat = if rng.gen_bool(0.5) {
                Repeatability::Repeatable
            } else {
                Repeatability::NonRepeatable
            };
            field = field.with_subfield(SubfieldDef::new(code, label, repeat));
        }

        if i % 3 == 0 {
            let mut marc = MarcKey::new(format!("{:03}", i % 1000));
            if i >= 1000 {
                marc = marc.with_ind1(char::from(b'0' + (i / 1000) as u8));
            }
            field = field.with_marc(marc);
        }
        if i % 5 == 4 {
            let parent = rng.gen_range(0..i);
            field = field.inherit(handles[parent].clone());
        }
        if i % 7 == 6 {
            let target = rng.gen_range(0..i);
            field = field.with_related(handles[target].clone());
        }
        if i % 97 == 96 {
            field = field.holdings(1..=20);
        }

        let handle = builder
            .register(field)
            .unwrap_or_else(|err| panic!("synthetic catalog: {err}"));
        handles.push(handle);
    }

    builder.build()
}

/// A registry holding one inheritance chain of `depth` fields. Only
/// the root carries the `z` subfield, so resolving it from the last
/// link walks the whole chain; every link carries its own `o`.
pub fn chain_catalog(depth: usize) -> FieldRegistry {
    assert!(depth > 0);
    let mut builder = RegistryBuilder::new("chain");
    let mut previous: Option<Arc<FieldDef>> = None;

    for i in 0..depth {
        let mut field = FieldDef::new(pica3_key(i), picaplus_key(i), format!("Glied {i}"));
        match previous {
            Some(parent) => field = field.inherit(parent),
            None => {
                field = field.with_subfield(SubfieldDef::new(
                    'z',
                    "Wurzel",
                    Repeatability::NonRepeatable,
                ));
            }
        }
        field = field.with_subfield(SubfieldDef::new(
            'o',
            format!("Eigen {i}"),
            Repeatability::Repeatable,
        ));
        previous = Some(
            builder
                .register(field)
                .unwrap_or_else(|err| panic!("chain catalog: {err}")),
        );
    }

    builder.build()
}
