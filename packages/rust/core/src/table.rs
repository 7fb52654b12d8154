//! In-memory table: ordered, named columns of row-aligned values.

use std::fmt;

use cravey_shared::{CraveyError, Result};

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
}

impl Value {
    /// Shorthand for a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    /// Render the cell as it appears in a CSV field.
    ///
    /// Whole numbers keep one decimal place so `0.0` stays `0.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named column. Its length always equals the owning table's row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Rectangular table with uniquely named columns.
///
/// The row count is tracked separately so a table keeps its shape even
/// before any column has been added.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// An empty table with a fixed number of rows and no columns.
    pub fn new(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Build a table from headers and row-major data.
    ///
    /// Fails if a header repeats or a row is not exactly as wide as the header.
    pub fn from_rows<H, R>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        let names: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(CraveyError::processing(format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    row.len(),
                    names.len()
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
            row_count += 1;
        }

        let mut table = Self::new(row_count);
        for (name, values) in names.into_iter().zip(columns) {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column after all existing ones.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(CraveyError::processing(format!("duplicate column '{name}'")));
        }
        if values.len() != self.row_count {
            return Err(CraveyError::processing(format!(
                "column '{name}' has {} values, table has {} rows",
                values.len(),
                self.row_count
            )));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Append a column holding `value` in every row.
    pub fn push_constant_column(&mut self, name: impl Into<String>, value: &Value) -> Result<()> {
        let values = vec![value.clone(); self.row_count];
        self.push_column(name, values)
    }

    /// Append a constant column named `name` unless one already exists.
    ///
    /// Returns `true` if the column was added. Existing columns are never
    /// touched.
    pub fn ensure_column(&mut self, name: &str, value: &Value) -> bool {
        !self.has_column(name) && self.push_constant_column(name, value).is_ok()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate rows in order, each as one borrowed value per column.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |row| self.columns.iter().map(|c| &c.values[row]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diner() -> Table {
        Table::from_rows(
            ["name", "address"],
            vec![
                vec![Value::text("Joe's Diner"), Value::text("1 Main St")],
                vec![Value::text("Bella"), Value::Null],
            ],
        )
        .expect("table")
    }

    #[test]
    fn from_rows_is_column_major() {
        let table = diner();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        let address = table.column("address").expect("address");
        assert_eq!(address.values(), &[Value::text("1 Main St"), Value::Null]);
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = Table::from_rows(
            ["name", "address"],
            vec![vec![Value::text("a"), Value::text("b")], vec![Value::text("c")]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("row 2 has 1 fields, expected 2"));
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let mut table = diner();
        let err = table
            .push_constant_column("name", &Value::Null)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate column 'name'"));
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn misaligned_column_is_rejected() {
        let mut table = diner();
        assert!(table.push_column("phone", vec![Value::Null]).is_err());
    }

    #[test]
    fn constant_column_fills_every_row() {
        let mut table = diner();
        table
            .push_constant_column("status", &Value::text("pending"))
            .expect("push");
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| *r[2] == Value::text("pending")));
    }

    #[test]
    fn ensure_column_leaves_existing_values() {
        let mut table = diner();
        assert!(!table.ensure_column("name", &Value::text("overwritten")));
        assert!(table.ensure_column("phone", &Value::Null));
        assert_eq!(
            table.column("name").expect("name").values()[0],
            Value::text("Joe's Diner")
        );
        assert_eq!(table.column("phone").expect("phone").values().len(), 2);
    }

    #[test]
    fn zero_row_table_keeps_headers() {
        let mut table = Table::from_rows(["name"], Vec::<Vec<Value>>::new()).expect("table");
        table.push_constant_column("phone", &Value::Null).expect("push");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["name", "phone"]);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Number(0.0).to_string(), "0.0");
        assert_eq!(Value::Number(12.5).to_string(), "12.5");
        assert_eq!(Value::text("x").to_string(), "x");
    }
}
