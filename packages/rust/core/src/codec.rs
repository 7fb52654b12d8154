//! CSV text <-> [`Table`].
//!
//! Decoding keeps every non-empty field as text so values written back out are
//! byte-for-byte what came in. Empty fields become [`Value::Null`]
//! and blank header cells are named `Unnamed: {idx}`.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, instrument};

use cravey_shared::{CraveyError, Result};

use crate::table::{Table, Value};

/// Byte-order mark some spreadsheet exports prepend.
const BOM: char = '\u{feff}';

/// Parse CSV text (header row first) into a table.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn decode(text: &str) -> Result<Table> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .enumerate()
        .map(|(idx, name)| header_name(idx, name))
        .collect();

    if headers.is_empty() {
        return Err(CraveyError::processing("no columns to parse from input"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        rows.push(record.iter().map(field_to_value).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "decoded CSV");
    Table::from_rows(headers, rows)
}

/// Render a table as CSV text: header line, then one `\n`-terminated line per row.
#[instrument(skip_all, fields(rows = table.row_count(), columns = table.column_count()))]
pub fn encode(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(table.column_names())
        .map_err(write_failed)?;

    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(write_failed)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CraveyError::processing(format!("failed to flush CSV: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| CraveyError::processing(format!("encoded CSV is not UTF-8: {e}")))
}

/// Blank header cells are named `Unnamed: {idx}` by position.
fn header_name(idx: usize, name: &str) -> String {
    if name.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        name.to_string()
    }
}

fn field_to_value(field: &str) -> Value {
    if field.is_empty() {
        Value::Null
    } else {
        Value::text(field)
    }
}

fn malformed(e: csv::Error) -> CraveyError {
    CraveyError::processing(format!("malformed CSV: {e}"))
}

fn write_failed(e: csv::Error) -> CraveyError {
    CraveyError::processing(format!("failed to write CSV: {e}"))
}
