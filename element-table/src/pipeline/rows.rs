use crate::pipeline::fetcher::RawTableSnapshot;
use crate::pipeline::planner::{ColumnDescriptor, ColumnKind, FormatPolicy};
use crate::schema::RawValue;
use serde::Serialize;
use std::fmt;

/// A typed output cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(number) => write!(f, "{number}"),
            CellValue::Text(text) => write!(f, "{text}"),
        }
    }
}

/// One output row, aligned to the planned columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputRow {
    cells: Vec<CellValue>,
}

impl OutputRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        OutputRow { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_cells(self) -> Vec<CellValue> {
        self.cells
    }
}

/// Turns column-major values into rows of exactly `column_count` cells.
///
/// The row count comes from the first column. Column `i` of the snapshot
/// feeds position `i` for `i < min(snapshot columns, column_count)`; every
/// other position, and any value a short column lacks, is `None`.
pub fn transpose(snapshot: &RawTableSnapshot, column_count: usize) -> Vec<Vec<Option<&RawValue>>> {
    let paired = snapshot.column_count().min(column_count);

    (0..snapshot.row_count())
        .map(|row| {
            (0..column_count)
                .map(|column| {
                    if column >= paired {
                        return None;
                    }
                    snapshot
                        .columns()
                        .get(column)
                        .and_then(|values| values.get(row))
                        .and_then(Option::as_ref)
                })
                .collect()
        })
        .collect()
}

/// Renders a number of hours for display.
///
/// `0` is `"00h"` and `-1` is the `"Missing"` sentinel. Other positive values
/// become `"{days}d {hours}h {minutes}m"`, with minutes taken from the
/// fractional part of the whole value. Any other negative value is printed
/// as-is.
pub fn format_duration_hours(hours: f64) -> String {
    if hours == 0.0 {
        return "00h".to_string();
    }
    if hours == -1.0 {
        return "Missing".to_string();
    }
    if hours > 0.0 {
        let days = (hours / 24.0).floor();
        let whole_hours = (hours % 24.0).floor();
        let minutes = (hours.fract() * 60.0).floor();
        return format!("{days}d {whole_hours}h {minutes}m");
    }

    hours.to_string()
}

/// Formats one raw value according to its column.
pub fn format_cell(value: Option<&RawValue>, column: &ColumnDescriptor) -> CellValue {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return CellValue::Empty;
    };

    match (column.kind(), column.format()) {
        (ColumnKind::Text, _) => CellValue::Text(value.to_string()),
        (ColumnKind::Numeric, format) => match value.as_f64() {
            Some(number) if format == FormatPolicy::DurationFromHours => {
                CellValue::Text(format_duration_hours(number))
            }
            Some(number) => CellValue::Number(number),
            None => {
                log::debug!(
                    "Column \"{}\" holds non-numeric value \"{value}\"",
                    column.name()
                );
                CellValue::Empty
            }
        },
    }
}

/// Builds output rows for `columns` from a snapshot already projected onto them.
pub fn build(snapshot: &RawTableSnapshot, columns: &[ColumnDescriptor]) -> Vec<OutputRow> {
    let rows: Vec<OutputRow> = transpose(snapshot, columns.len())
        .into_iter()
        .map(|values| {
            values
                .into_iter()
                .zip(columns)
                .map(|(value, column)| format_cell(value, column))
                .collect()
        })
        .map(OutputRow::new)
        .collect();

    log::debug!("Built {} rows of {} cells", rows.len(), columns.len());
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn text_column(name: &str) -> ColumnDescriptor {
        ColumnDescriptor::new(name, ColumnKind::Text, FormatPolicy::PlainText, 1)
    }

    fn number_column(name: &str) -> ColumnDescriptor {
        ColumnDescriptor::new(name, ColumnKind::Numeric, FormatPolicy::PlainNumeric, 2)
    }

    fn duration_column(name: &str) -> ColumnDescriptor {
        ColumnDescriptor::new(name, ColumnKind::Numeric, FormatPolicy::DurationFromHours, 3)
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration_hours(0.0), "00h");
        assert_eq!(format_duration_hours(-1.0), "Missing");
        assert_eq!(format_duration_hours(10.0), "0d 10h 0m");
        assert_eq!(format_duration_hours(25.5), "1d 1h 30m");
        assert_eq!(format_duration_hours(48.0), "2d 0h 0m");
        assert_eq!(format_duration_hours(0.25), "0d 0h 15m");
        assert_eq!(format_duration_hours(-5.0), "-5");
        assert_eq!(format_duration_hours(-2.5), "-2.5");
    }

    #[test]
    fn test_transpose_keeps_shape() {
        let snapshot = RawTableSnapshot::new(vec![
            vec![Some("a".into()), Some("b".into())],
            vec![Some(RawValue::Number(1.0))],
        ]);

        let rows = transpose(&snapshot, 3);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert_eq!(rows[0][1], Some(&RawValue::Number(1.0)));
        assert_eq!(rows[1][0], Some(&RawValue::from("b")));
        assert_eq!(rows[1][1], None);
        assert_eq!(rows[0][2], None);
    }

    #[test]
    fn test_transpose_pairs_only_leading_columns() {
        let snapshot = RawTableSnapshot::new(vec![
            vec![Some("a".into())],
            vec![Some("b".into())],
            vec![Some("c".into())],
        ]);

        let rows = transpose(&snapshot, 2);
        assert_eq!(rows, vec![vec![Some(&RawValue::from("a")), Some(&RawValue::from("b"))]]);
    }

    #[test]
    fn test_transpose_empty_snapshot() {
        assert!(transpose(&RawTableSnapshot::empty(), 4).is_empty());
    }

    #[test]
    fn test_format_cell() {
        let status = text_column("Status");
        let load = number_column("Load");
        let uptime = duration_column("Uptime");

        assert_eq!(format_cell(None, &status), CellValue::Empty);
        assert_eq!(format_cell(Some(&"".into()), &status), CellValue::Empty);
        assert_eq!(
            format_cell(Some(&RawValue::Number(3.0)), &status),
            CellValue::Text("3".to_string())
        );
        assert_eq!(
            format_cell(Some(&"12.5".into()), &load),
            CellValue::Number(12.5)
        );
        assert_eq!(format_cell(Some(&"n/a".into()), &load), CellValue::Empty);
        assert_eq!(
            format_cell(Some(&RawValue::Number(-1.0)), &uptime),
            CellValue::Text("Missing".to_string())
        );
    }

    #[test]
    fn test_build_rows() {
        let columns = vec![text_column("Status"), duration_column("Uptime")];
        let snapshot = RawTableSnapshot::new(vec![
            vec![Some("OK".into()), Some("FAIL".into())],
            vec![Some(RawValue::Number(10.0)), Some(RawValue::Number(-1.0))],
        ]);

        let rows = build(&snapshot, &columns);
        let rendered: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.cells().iter().map(ToString::to_string).collect())
            .collect();

        assert_eq!(
            rendered,
            vec![
                vec!["OK".to_string(), "0d 10h 0m".to_string()],
                vec!["FAIL".to_string(), "Missing".to_string()],
            ]
        );
    }

    #[test]
    fn test_build_empty_snapshot() {
        let rows = build(&RawTableSnapshot::empty(), &[text_column("Status")]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_row_serializes_as_array() {
        let row = OutputRow::new(vec![
            CellValue::Text("OK".to_string()),
            CellValue::Number(2.5),
            CellValue::Empty,
        ]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["OK",2.5,null]"#);
    }
}
