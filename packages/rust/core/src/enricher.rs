//! Schema enricher.
//!
//! Guarantees every column in [`crate::columns`] is present on the output
//! table. Columns already in the input are left exactly as they were; only
//! absent columns are appended, filled with their constant default.

use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use cravey_shared::{CraveyError, Result};

use crate::codec;
use crate::columns;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Pure transform
// ---------------------------------------------------------------------------

/// Append every missing enrichment column to `table`.
///
/// Row count and row order are unchanged. Applying this to its own output
/// is a no-op.
pub fn enrich(mut table: Table) -> Table {
    let mut added = Vec::new();
    for column in columns::enrichment_columns() {
        if table.ensure_column(column.name, &column.default.to_value()) {
            added.push(column.name);
        }
    }
    info!(rows = table.row_count(), ?added, "table enriched");
    table
}

/// Decode CSV text, enrich it, and encode it again.
///
/// Either the whole enriched CSV is returned or nothing is.
#[instrument(skip_all, fields(bytes = csv.len()))]
pub fn enrich_csv(csv: &str) -> Result<String> {
    let table = codec::decode(csv)?;
    codec::encode(&enrich(table))
}

// ---------------------------------------------------------------------------
// File-based processing
// ---------------------------------------------------------------------------

/// Read CSV from `input` and write the enriched CSV to `output`.
///
/// The output is staged next to its destination and renamed into place, so
/// `output` only ever appears complete. Every failure is reported as a
/// processing error prefixed with `processing failed: `.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn enrich_file(input: &Path, output: &Path) -> Result<()> {
    run_file(input, output).map_err(|e| CraveyError::processing(format!("processing failed: {e}")))
}

fn run_file(input: &Path, output: &Path) -> Result<()> {
    let bytes = std::fs::read(input).map_err(|e| CraveyError::io(input, e))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| CraveyError::processing(format!("input is not valid UTF-8: {e}")))?;

    let enriched = enrich_csv(&text)?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| CraveyError::io(dir, e))?;
    staged
        .write_all(enriched.as_bytes())
        .map_err(|e| CraveyError::io(staged.path(), e))?;
    staged
        .persist(output)
        .map_err(|e| CraveyError::io(output, e.error))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Processor seam
// ---------------------------------------------------------------------------

/// Turns an input CSV file into an enriched output CSV file.
///
/// The HTTP server depends on this trait rather than on [`SchemaEnricher`]
/// directly so tests can substitute their own implementation.
pub trait CsvProcessor: Send + Sync {
    fn process(&self, input: &Path, output: &Path) -> Result<()>;
}

/// The production [`CsvProcessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaEnricher;

impl CsvProcessor for SchemaEnricher {
    fn process(&self, input: &Path, output: &Path) -> Result<()> {
        enrich_file(input, output)
    }
}
