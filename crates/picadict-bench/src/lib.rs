//! Benchmark suite for the picadict crates.
//!
//! # Benchmark categories
//!
//! - **Lookup**: point lookups per key space, subfield resolution over
//!   inheritance chains, bulk key lists
//! - **Queries**: range and regex pattern queries over the sorted
//!   catalog index
//! - **Loading**: JSON catalog loading and synthetic registry
//!   construction

pub mod fixtures;

pub use fixtures::{chain_catalog, pica3_key, picaplus_key, synthetic_catalog, Scale};
