//! Table model, CSV codec, and schema enricher for Cravey.
//!
//! The enricher takes an arbitrary restaurant-listing table and guarantees
//! the fixed enrichment schema on output without touching existing data.

pub mod codec;
pub mod columns;
pub mod enricher;
pub mod table;

pub use enricher::{CsvProcessor, SchemaEnricher, enrich, enrich_csv, enrich_file};
pub use table::{Column, Table, Value};
