//! JSON catalog loader.
//!
//! Catalogs are described declaratively: one JSON document per catalog,
//! listing fields in definition order. `inherit` and `related` entries
//! reference other fields by either internal key, compact or expanded;
//! a reference resolves against fields defined earlier in the same
//! document first, then against the supplied base registries in order.
//! Because references can only point backwards or into already-frozen
//! registries, loaded definition graphs are acyclic by construction.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use picadict_core::{
    FieldDef, FieldRegistry, MarcKey, RegistryBuilder, Repeatability, SubfieldDef,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogSpec {
    name: String,
    #[serde(default)]
    fields: Vec<FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FieldSpec {
    pica3: String,
    picaplus: String,
    label: String,
    #[serde(default)]
    marc: Option<MarcSpec>,
    #[serde(default)]
    repeat: Repeatability,
    #[serde(default)]
    subfields: Vec<SubfieldSpec>,
    #[serde(default)]
    inherit: Vec<String>,
    #[serde(default)]
    related: Option<String>,
    #[serde(default)]
    ignorable: Option<char>,
    #[serde(default)]
    default_first: Option<char>,
    #[serde(default)]
    alternate: Vec<SubfieldSpec>,
    #[serde(default)]
    separator: Option<String>,
    #[serde(default)]
    occurrences: Option<OccurrenceSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MarcSpec {
    tag: String,
    #[serde(default)]
    ind1: Option<char>,
    #[serde(default)]
    ind2: Option<char>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubfieldSpec {
    code: char,
    label: String,
    #[serde(default)]
    repeat: Repeatability,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default)]
    nested: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OccurrenceSpec {
    from: u8,
    to: u8,
}

/// Load a catalog from its JSON description.
///
/// `bases` supplies already-frozen registries whose fields may be
/// referenced by `inherit` and `related` entries; this is how the
/// bibliographic catalog links into authority definitions. The
/// returned registry is frozen.
pub fn load_str(json: &str, bases: &[&FieldRegistry]) -> Result<FieldRegistry, CatalogError> {
    let CatalogSpec { name, fields } = serde_json::from_str(json)?;
    let mut builder = RegistryBuilder::new(name.clone());
    let mut local: HashMap<String, Arc<FieldDef>> = HashMap::new();

    for spec in fields {
        let field = build_field(spec, &name, &local, bases)?;
        let handle = builder.register(field)?;
        local.insert(handle.pica3().to_string(), handle.clone());
        for key in handle.picaplus_keys() {
            local.insert(key, handle.clone());
        }
    }

    info!(catalog = %name, fields = builder.len(), "catalog loaded");
    Ok(builder.build())
}

/// Load a catalog from a JSON file on disk.
pub fn load_file(
    path: impl AsRef<Path>,
    bases: &[&FieldRegistry],
) -> Result<FieldRegistry, CatalogError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading catalog file");
    let json = fs::read_to_string(path)?;
    load_str(&json, bases)
}

fn build_field(
    spec: FieldSpec,
    catalog: &str,
    local: &HashMap<String, Arc<FieldDef>>,
    bases: &[&FieldRegistry],
) -> Result<FieldDef, CatalogError> {
    let variant_count = usize::from(!spec.alternate.is_empty())
        + usize::from(spec.separator.is_some())
        + usize::from(spec.occurrences.is_some());
    if variant_count > 1 {
        return Err(CatalogError::VariantConflict {
            catalog: catalog.to_string(),
            field: spec.pica3,
        });
    }

    let pica3 = spec.pica3;
    let mut field =
        FieldDef::new(pica3.clone(), spec.picaplus, spec.label).with_repeat(spec.repeat);

    if let Some(marc) = spec.marc {
        let mut key = MarcKey::new(marc.tag);
        if let Some(ind1) = marc.ind1 {
            key = key.with_ind1(ind1);
        }
        if let Some(ind2) = marc.ind2 {
            key = key.with_ind2(ind2);
        }
        field = field.with_marc(key);
    }

    for subfield in spec.subfields {
        field = field.with_subfield(build_subfield(subfield, catalog, &pica3)?);
    }
    for reference in &spec.inherit {
        field = field.inherit(resolve(reference, catalog, &pica3, local, bases)?);
    }
    if let Some(reference) = &spec.related {
        field = field.with_related(resolve(reference, catalog, &pica3, local, bases)?);
    }
    if let Some(code) = spec.ignorable {
        field = field.with_ignorable(code);
    }
    if let Some(code) = spec.default_first {
        field = field.with_default_first(code);
    }
    for subfield in spec.alternate {
        field = field.with_alternate_subfield(build_subfield(subfield, catalog, &pica3)?);
    }
    if let Some(separator) = spec.separator {
        field = field.enumerated(separator);
    }
    if let Some(occurrences) = spec.occurrences {
        field = field.holdings(occurrences.from..=occurrences.to);
    }
    Ok(field)
}

fn build_subfield(
    spec: SubfieldSpec,
    catalog: &str,
    field: &str,
) -> Result<SubfieldDef, CatalogError> {
    // SubfieldDef only debug-asserts these, so a release build would
    // otherwise admit unaddressable subfields from catalog files.
    if spec.code.is_whitespace() || spec.code == '\0' || spec.label.trim().is_empty() {
        return Err(CatalogError::BlankSubfield {
            catalog: catalog.to_string(),
            field: field.to_string(),
            code: spec.code,
        });
    }
    let mut subfield = SubfieldDef::new(spec.code, spec.label, spec.repeat);
    if let Some(prefix) = spec.prefix {
        subfield = subfield.with_prefix(prefix);
    }
    if let Some(suffix) = spec.suffix {
        subfield = subfield.with_suffix(suffix);
    }
    if spec.nested {
        subfield = subfield.with_nested();
    }
    Ok(subfield)
}

fn resolve(
    key: &str,
    catalog: &str,
    field: &str,
    local: &HashMap<String, Arc<FieldDef>>,
    bases: &[&FieldRegistry],
) -> Result<Arc<FieldDef>, CatalogError> {
    if let Some(found) = local.get(key) {
        return Ok(found.clone());
    }
    for base in bases {
        if let Some(found) = base.field(key) {
            return Ok(found.clone());
        }
    }
    Err(CatalogError::UnknownReference {
        catalog: catalog.to_string(),
        field: field.to_string(),
        reference: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use picadict_core::Notation;
    use std::io::Write;

    #[test]
    fn test_load_minimal_catalog() {
        let registry = load_str(
            r#"{
                "name": "mini",
                "fields": [
                    {
                        "pica3": "4000",
                        "picaplus": "021A",
                        "label": "Haupttitel",
                        "repeat": "non-repeatable",
                        "marc": { "tag": "245", "ind1": "1", "ind2": "0" },
                        "default-first": "a",
                        "subfields": [
                            { "code": "a", "label": "Haupttitel", "repeat": "non-repeatable" },
                            { "code": "d", "label": "Zusatz", "repeat": "repeatable", "prefix": " : " }
                        ]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap();

        assert_eq!(registry.name(), "mini");
        assert_eq!(registry.len(), 1);
        let field = registry.field("4000").unwrap();
        assert_eq!(field.label(), "Haupttitel");
        assert_eq!(field.repeat(), Repeatability::NonRepeatable);
        assert_eq!(field.marc().unwrap().to_string(), "245 10");
        assert_eq!(field.default_first(), Some('a'));
        assert_eq!(field.subfield('d', false).unwrap().prefix(), Some(" : "));
        assert!(registry.field_by(Notation::Marc21, "245 10").is_some());
    }

    #[test]
    fn test_references_resolve_within_document() {
        let registry = load_str(
            r#"{
                "name": "refs",
                "fields": [
                    {
                        "pica3": "100",
                        "picaplus": "028A",
                        "label": "Person",
                        "subfields": [
                            { "code": "a", "label": "Nachname" }
                        ]
                    },
                    {
                        "pica3": "400",
                        "picaplus": "028@",
                        "label": "Abweichender Name",
                        "inherit": ["100"]
                    },
                    {
                        "pica3": "500",
                        "picaplus": "028R",
                        "label": "Beziehung",
                        "related": "028A"
                    }
                ]
            }"#,
            &[],
        )
        .unwrap();

        // Inherit by pica3 key, relate by pica+ key.
        assert_eq!(
            registry.subfield("400", 'a').unwrap().label(),
            "Nachname"
        );
        let relation = registry.field("500").unwrap();
        assert!(relation.subfield('a', false).is_none());
        assert_eq!(relation.subfield('a', true).unwrap().label(), "Nachname");
    }

    #[test]
    fn test_references_resolve_against_bases() {
        let base = load_str(
            r#"{
                "name": "base",
                "fields": [
                    {
                        "pica3": "150",
                        "picaplus": "041A",
                        "label": "Sachbegriff",
                        "subfields": [{ "code": "a", "label": "Benennung" }]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap();

        let registry = load_str(
            r#"{
                "name": "derived",
                "fields": [
                    {
                        "pica3": "5100",
                        "picaplus": "041A",
                        "label": "Erstes Schlagwort",
                        "related": "150"
                    }
                ]
            }"#,
            &[&base],
        )
        .unwrap();

        let field = registry.field("5100").unwrap();
        assert!(Arc::ptr_eq(
            field.related().unwrap(),
            base.field("150").unwrap()
        ));
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let err = load_str(
            r#"{
                "name": "broken",
                "fields": [
                    {
                        "pica3": "400",
                        "picaplus": "028@",
                        "label": "Abweichender Name",
                        "inherit": ["100"]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();

        match err {
            CatalogError::UnknownReference {
                catalog,
                field,
                reference,
            } => {
                assert_eq!(catalog, "broken");
                assert_eq!(field, "400");
                assert_eq!(reference, "100");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_forward_references_are_rejected() {
        // References resolve against earlier fields only, which is what
        // keeps loaded graphs acyclic.
        let err = load_str(
            r#"{
                "name": "forward",
                "fields": [
                    {
                        "pica3": "400",
                        "picaplus": "028@",
                        "label": "Abweichender Name",
                        "inherit": ["100"]
                    },
                    {
                        "pica3": "100",
                        "picaplus": "028A",
                        "label": "Person"
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownReference { .. }));
    }

    #[test]
    fn test_variant_conflict_is_rejected() {
        let err = load_str(
            r#"{
                "name": "conflict",
                "fields": [
                    {
                        "pica3": "7100",
                        "picaplus": "209A",
                        "label": "Signatur",
                        "separator": ";",
                        "occurrences": { "from": 1, "to": 20 }
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();

        match err {
            CatalogError::VariantConflict { catalog, field } => {
                assert_eq!(catalog, "conflict");
                assert_eq!(field, "7100");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_keys_surface_as_schema_errors() {
        let err = load_str(
            r#"{
                "name": "dupes",
                "fields": [
                    { "pica3": "4000", "picaplus": "021A", "label": "Haupttitel" },
                    { "pica3": "4000", "picaplus": "021B", "label": "Noch einmal" }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Schema(_)));
        assert!(err.to_string().contains("duplicate pica3 key '4000'"));
    }

    #[test]
    fn test_key_breaking_catalog_order_is_rejected() {
        // 650C sorts between the force-ordered keyword keys without an
        // override entry of its own.
        let err = load_str(
            r#"{
                "name": "local",
                "fields": [
                    { "pica3": "6500", "picaplus": "047A", "label": "Freie Schlagwörter" },
                    { "pica3": "650A", "picaplus": "047B", "label": "Lokale Schlagwörter" },
                    { "pica3": "650C", "picaplus": "047D", "label": "Weitere Schlagwörter" }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Schema(_)));
        assert!(err.to_string().contains("without an override entry"));
    }

    #[test]
    fn test_references_use_internal_keys_only() {
        // A MARC key identifies the field externally but is not a
        // reference target.
        let err = load_str(
            r#"{
                "name": "marcref",
                "fields": [
                    {
                        "pica3": "100",
                        "picaplus": "028A",
                        "label": "Person",
                        "marc": { "tag": "100", "ind1": "1" }
                    },
                    {
                        "pica3": "400",
                        "picaplus": "028@",
                        "label": "Abweichender Name",
                        "inherit": ["100 1"]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownReference { .. }));
    }

    #[test]
    fn test_blank_subfield_is_rejected() {
        let err = load_str(
            r#"{
                "name": "blank",
                "fields": [
                    {
                        "pica3": "4000",
                        "picaplus": "021A",
                        "label": "Haupttitel",
                        "subfields": [{ "code": " ", "label": "Titel" }]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        match err {
            CatalogError::BlankSubfield {
                catalog,
                field,
                code,
            } => {
                assert_eq!(catalog, "blank");
                assert_eq!(field, "4000");
                assert_eq!(code, ' ');
            }
            other => panic!("unexpected error: {other}"),
        }

        // A whitespace-only label is just as unaddressable.
        let err = load_str(
            r#"{
                "name": "blank",
                "fields": [
                    {
                        "pica3": "4000",
                        "picaplus": "021A",
                        "label": "Haupttitel",
                        "alternate": [{ "code": "f", "label": "   " }]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::BlankSubfield { .. }));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            load_str("{ not json", &[]),
            Err(CatalogError::Parse(_))
        ));
        // Unknown keys are rejected too, so typos in catalog files
        // cannot silently drop data.
        assert!(matches!(
            load_str(r#"{ "name": "x", "fieldz": [] }"#, &[]),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_holdings_and_enumerated_variants() {
        let registry = load_str(
            r#"{
                "name": "variants",
                "fields": [
                    {
                        "pica3": "1500",
                        "picaplus": "010@",
                        "label": "Sprachcodes",
                        "separator": ";",
                        "subfields": [{ "code": "a", "label": "Sprachcode", "repeat": "repeatable" }]
                    },
                    {
                        "pica3": "7100",
                        "picaplus": "209A",
                        "label": "Signatur",
                        "occurrences": { "from": 1, "to": 3 }
                    },
                    {
                        "pica3": "4000",
                        "picaplus": "021A",
                        "label": "Haupttitel",
                        "alternate": [{ "code": "f", "label": "Titel in Altdaten" }]
                    }
                ]
            }"#,
            &[],
        )
        .unwrap();

        assert_eq!(registry.field("1500").unwrap().separator(), Some(";"));
        assert!(registry.field("209A/03").is_some());
        assert!(registry.field("209A/04").is_none());
        assert_eq!(
            registry
                .field("4000")
                .unwrap()
                .alternate_subfields()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_load_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "ondisk",
                "fields": [
                    {{ "pica3": "4000", "picaplus": "021A", "label": "Haupttitel" }}
                ]
            }}"#
        )
        .unwrap();

        let registry = load_file(file.path(), &[]).unwrap();
        assert_eq!(registry.name(), "ondisk");
        assert!(registry.field("021A").is_some());

        let err = load_file("/definitely/not/there.json", &[]).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
