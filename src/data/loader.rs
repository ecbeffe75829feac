use std::path::Path;

use log::debug;

use super::model::{Column, ReferenceTable, Table};
use crate::error::{Error, Result};
use crate::style::Style;

/// Lines starting with this marker are comments; the last one is the header.
pub const COMMENT_MARKER: char = '#';

/// Rows skipped at the top of a reference file by default.
pub const DEFAULT_REFERENCE_SKIP_ROWS: usize = 2;

// ---------------------------------------------------------------------------
// Case data (OpenFOAM post-processing output)
// ---------------------------------------------------------------------------

/// Parse one post-processing output file into a [`Table`].
///
/// Layout:
/// ```text
/// # Time = 10
/// # x        p          U_0
/// 0.0        1.02e+05   3.1
/// 0.1        1.01e+05   3.2
/// ```
///
/// The *last* line starting with `#` names the columns; every other
/// non-blank line is a row of whitespace-separated numbers. A file with
/// data rows but no header line is rejected. `name` defaults to the file
/// name without extension.
pub fn parse_table(path: &Path, name: Option<&str>, style: Style) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let lines: Vec<&str> = text.lines().collect();

    let header = lines
        .iter()
        .enumerate()
        .rev()
        .find(|(_, line)| line.starts_with(COMMENT_MARKER))
        .map(|(idx, line)| {
            let names: Vec<String> = line
                .trim()
                .trim_start_matches(COMMENT_MARKER)
                .split_whitespace()
                .map(str::to_string)
                .collect();
            (idx + 1, names)
        });

    let mut values: Vec<Vec<f64>> = header
        .as_ref()
        .map(|(_, names)| vec![Vec::new(); names.len()])
        .unwrap_or_default();

    for (idx, line) in lines.iter().enumerate() {
        if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let Some((_, names)) = &header else {
            return Err(Error::parse(path, line_no, "data row before any '#' header line"));
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != names.len() {
            return Err(Error::parse(
                path,
                line_no,
                format!("expected {} fields, found {}", names.len(), fields.len()),
            ));
        }
        for ((field, column), col_name) in fields.iter().zip(values.iter_mut()).zip(names) {
            let value = field.parse::<f64>().map_err(|_| {
                Error::parse(
                    path,
                    line_no,
                    format!("'{field}' in column '{col_name}' is not a number"),
                )
            })?;
            column.push(value);
        }
    }

    let name = name.map(str::to_string).unwrap_or_else(|| file_stem(path));
    let (header_line, names) = header.unwrap_or_default();
    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    let table = Table::new(name, columns, style)
        .map_err(|e| Error::parse(path, header_line, e.to_string()))?;
    debug!(
        "parsed {}: {} columns, {} rows",
        path.display(),
        table.columns().len(),
        table.len()
    );
    Ok(table)
}

/// File name without its extension, the default display name of a table.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// Parse a two-column (angle, pressure coefficient) reference file.
///
/// The first `skip_rows` lines are skipped unconditionally; after that,
/// blank lines and `#` comments are ignored and every remaining line must
/// hold exactly two numbers.
pub fn parse_reference(
    path: &Path,
    skip_rows: usize,
    name: &str,
    style: Style,
) -> Result<ReferenceTable> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let mut angles = Vec::new();
    let mut coefficients = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(skip_rows) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        let line_no = idx + 1;
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [angle, coefficient] = fields.as_slice() else {
            return Err(Error::parse(
                path,
                line_no,
                format!("expected 2 fields, found {}", fields.len()),
            ));
        };
        angles.push(parse_number(path, line_no, angle)?);
        coefficients.push(parse_number(path, line_no, coefficient)?);
    }

    debug!(
        "parsed reference {}: {} rows",
        path.display(),
        angles.len()
    );
    ReferenceTable::new(name, angles, coefficients, style)
}

fn parse_number(path: &Path, line_no: usize, field: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| Error::parse(path, line_no, format!("'{field}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn parses_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "bottom.xy",
            "# x p U\n0.0 1.0 2.0\n0.5 1.5 2.5\n\n1.0 2.0 3.0\n",
        );

        let table = parse_table(&path, None, Style::table_default()).unwrap();
        assert_eq!(table.name(), "bottom");
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["x", "p", "U"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("p").unwrap(), &[1.0, 1.5, 2.0]);
    }

    #[test]
    fn last_comment_line_is_the_header() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "probes.dat",
            "# Probe 0 (0 0 0)\n# Time p\n1 0.1\n2 0.2\n",
        );

        let table = parse_table(&path, Some("probes"), Style::default()).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["Time", "p"]);
        assert_eq!(table.column("Time").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn header_after_data_still_applies() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "late.dat", "# a b\n1 2\n# c d\n3 4\n");

        let table = parse_table(&path, None, Style::default()).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["c", "d"]);
        assert_eq!(table.column("d").unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn header_without_rows_is_an_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.xy", "# x p\n");

        let table = parse_table(&path, None, Style::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[rstest]
    #[case::missing_header("0.0 1.0\n", 1)]
    #[case::non_numeric("# x p\n0.0 1.0\n0.5 abc\n", 3)]
    #[case::short_row("# x p\n0.0\n", 2)]
    #[case::long_row("# x p\n0.0 1.0 2.0\n", 2)]
    #[case::duplicate_column("# x x\n0.0 1.0\n", 1)]
    fn malformed_input_is_a_parse_error(#[case] contents: &str, #[case] expected_line: usize) {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.xy", contents);

        match parse_table(&path, None, Style::default()).unwrap_err() {
            Error::Parse { line, .. } => assert_eq!(line, expected_line),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_table(Path::new("does/not/exist.xy"), None, Style::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn round_trip_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "wall.xy",
            "# s Cp\n0.0 1.0\n0.123456789 -0.333333333\n3.5e-4 2.0e+3\n",
        );
        let table = parse_table(&path, None, Style::default()).unwrap();

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let copy_path = write_file(&dir, "wall_copy.xy", &String::from_utf8(out).unwrap());
        let copy = parse_table(&copy_path, Some("wall"), Style::default()).unwrap();

        assert_eq!(
            copy.column_names().collect::<Vec<_>>(),
            table.column_names().collect::<Vec<_>>()
        );
        for (a, b) in table.columns().iter().zip(copy.columns()) {
            for (va, vb) in a.values.iter().zip(&b.values) {
                assert!((va - vb).abs() <= 1e-12 * va.abs().max(1.0));
            }
        }
    }

    #[test]
    fn reference_skips_leading_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "Cp.dat",
            "Pressure coefficient around cylinder\ntheta Cp\n0 1.0\n90 -3.0\n180 1.0\n",
        );

        let reference =
            parse_reference(&path, DEFAULT_REFERENCE_SKIP_ROWS, "reference Cp", Style::default())
                .unwrap();
        assert_eq!(reference.table().name(), "reference Cp");
        assert_eq!(reference.angles(), &[0.0, 90.0, 180.0]);
        assert_eq!(reference.coefficients(), &[1.0, -3.0, 1.0]);
    }

    #[rstest]
    #[case::three_fields("h\nh\n0 1.0 2.0\n", 2)]
    #[case::one_field("h\nh\n0\n", 2)]
    #[case::not_a_number("h\nh\n0 abc\n", 2)]
    #[case::header_not_skipped("theta Cp\n0 1.0\n", 0)]
    fn malformed_reference_is_a_parse_error(#[case] contents: &str, #[case] skip_rows: usize) {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "Cp.dat", contents);

        let err = parse_reference(&path, skip_rows, "ref", Style::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
