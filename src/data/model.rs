use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::style::Style;

// ---------------------------------------------------------------------------
// Column – one named numeric column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – ordered set of equal-length named columns
// ---------------------------------------------------------------------------

/// A parsed data file: ordered, uniquely named numeric columns of equal
/// length, a display name used as legend label and the style the table is
/// drawn with when the caller does not override it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    style: Style,
}

impl Table {
    /// Build a table, checking that column names are unique and that all
    /// columns have the same length.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, style: Style) -> Result<Self> {
        let name = name.into();

        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "table '{name}': duplicate column '{}'",
                    col.name
                )));
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.values.len() != first.values.len()) {
                return Err(Error::Configuration(format!(
                    "table '{name}': column '{}' has {} values but '{}' has {}",
                    bad.name,
                    bad.values.len(),
                    first.name,
                    first.values.len()
                )));
            }
        }

        Ok(Table {
            name,
            columns,
            style,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| Error::key_not_found(name, self.column_names()))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair up two columns into plot points.
    pub fn xy(&self, x_key: &str, y_key: &str) -> Result<Vec<(f64, f64)>> {
        let x = self.column(x_key)?;
        let y = self.column(y_key)?;
        Ok(x.iter().copied().zip(y.iter().copied()).collect())
    }

    /// Write the table back out in the case-data format: one `#` header
    /// line followed by whitespace-separated rows.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        let header: Vec<&str> = self.column_names().collect();
        writeln!(out, "# {}", header.join("\t"))?;
        for row in 0..self.len() {
            let fields: Vec<String> = self
                .columns
                .iter()
                .map(|c| format!("{:e}", c.values[row]))
                .collect();
            writeln!(out, "{}", fields.join("\t"))?;
        }
        Ok(())
    }

    /// Export the table as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        writer
            .write_record(self.column_names())
            .map_err(|e| csv_error(path, e))?;
        for row in 0..self.len() {
            writer
                .write_record(self.columns.iter().map(|c| c.values[row].to_string()))
                .map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| Error::io(path, e))
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    Error::io(path, std::io::Error::other(err))
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {} of size {}", self.name, self.len())
    }
}

// ---------------------------------------------------------------------------
// ReferenceTable – fixed (angle, pressure coefficient) baseline
// ---------------------------------------------------------------------------

pub const ANGLE_COLUMN: &str = "theta";
pub const PRESSURE_COEFFICIENT_COLUMN: &str = "Cp";

/// A two-column baseline dataset: angle and pressure coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    table: Table,
}

impl ReferenceTable {
    pub(crate) fn new(
        name: impl Into<String>,
        angles: Vec<f64>,
        coefficients: Vec<f64>,
        style: Style,
    ) -> Result<Self> {
        let table = Table::new(
            name,
            vec![
                Column::new(ANGLE_COLUMN, angles),
                Column::new(PRESSURE_COEFFICIENT_COLUMN, coefficients),
            ],
            style,
        )?;
        Ok(ReferenceTable { table })
    }

    /// Rename the two columns so they line up with the keys of the case
    /// data they are compared against.
    pub fn with_column_names(mut self, angle: &str, coefficient: &str) -> Result<Self> {
        if angle == coefficient {
            return Err(Error::Configuration(format!(
                "reference columns must differ, both are '{angle}'"
            )));
        }
        self.table.columns[0].name = angle.to_string();
        self.table.columns[1].name = coefficient.to_string();
        Ok(self)
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.table.style = style;
        self
    }

    pub fn angles(&self) -> &[f64] {
        &self.table.columns[0].values
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.table.columns[1].values
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}
