//! Field inspector: a tour of the built-in picadict catalogs.
//!
//! Prints what a record editor would ask the registry for: field
//! lookups under any notation, subfield resolution with inheritance
//! and linked authority data, holdings occurrences, and range and
//! pattern listings.
//!
//! Run with: cargo run --release
//! Set RUST_LOG=debug to watch the catalog loader at work.

use picadict_catalogs as catalogs;
use picadict_core::{FieldRegistry, Notation};
use regex::Regex;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let authority = catalogs::authority();
    let bibliographic = catalogs::bibliographic();

    heading("Catalogs");
    println!(
        "authority: {} fields, bibliographic: {} fields, classification: {} fields",
        authority.len(),
        bibliographic.len(),
        catalogs::classification().len()
    );

    point_lookups(bibliographic);
    inheritance(authority);
    linked_fields(bibliographic);
    holdings(bibliographic);
    listings(bibliographic);
}

fn point_lookups(registry: &FieldRegistry) {
    heading("One field, three notations");
    let title = registry.field("4000").expect("4000 is a built-in field");
    println!("pica3  4000   -> {title}");
    println!("pica+  021A   -> {}", registry.field("021A").expect("021A is a built-in key"));
    if let Some(marc) = title.marc() {
        let via_marc = registry
            .field_by(Notation::Marc21, &marc.to_string())
            .expect("mapped MARC key resolves");
        println!("marc21 {marc} -> {via_marc}");
    }
    println!();
    println!("subfields of 4000:");
    for subfield in title.own_subfields().values() {
        println!("  {subfield}");
    }
}

fn inheritance(registry: &FieldRegistry) {
    heading("Inheritance: variant names reuse the preferred-name schema");
    let preferred = registry.field("100").expect("100 is a built-in field");
    let variant = registry.field("400").expect("400 is a built-in field");
    println!(
        "100 ({}) declares {} subfields",
        preferred.label(),
        preferred.own_subfields().len()
    );
    println!(
        "400 ({}) declares {} of its own and resolves {}",
        variant.label(),
        variant.own_subfields().len(),
        variant.all_subfields().len()
    );
    let vorname = variant.subfield('d', false).expect("inherited subfield");
    println!("400 $d -> {vorname}, inherited from 100");
}

fn linked_fields(registry: &FieldRegistry) {
    heading("Linked authority data is opt-in");
    let creator = registry.field("3000").expect("3000 is a built-in field");
    println!("3000 ({})", creator.label());
    println!("  $a without linked data: {}", describe(creator.subfield('a', false)));
    println!("  $a with linked data:    {}", describe(creator.subfield('a', true)));
    println!(
        "  $8 is dropped when projecting to pica3: {}",
        creator.is_ignorable('8')
    );
}

fn describe(subfield: Option<&std::sync::Arc<picadict_core::SubfieldDef>>) -> String {
    subfield
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "(not defined)".to_string())
}

fn holdings(registry: &FieldRegistry) {
    heading("Holdings fields answer under every occurrence");
    let signature = registry.field("209A/01").expect("209A/01 is a built-in key");
    println!(
        "{} registers {} occurrence keys",
        signature,
        signature.picaplus_keys().len()
    );
    for key in ["209A/01", "209A/17", "209A/21"] {
        match registry.field(key) {
            Some(field) => println!("  {key} -> {}", field.label()),
            None => println!("  {key} -> no such occurrence"),
        }
    }
}

fn listings(registry: &FieldRegistry) {
    heading("Range listing 3000 to 4030");
    for field in registry.range("3000", "4030") {
        println!("  {field}");
    }

    heading("Pattern listing ^02 over both notations");
    let pattern = Regex::new("^02").expect("valid pattern");
    for field in registry.find_matching(&pattern) {
        println!("  {field}");
    }
}

fn heading(text: &str) {
    println!();
    println!("=== {text} ===");
}
