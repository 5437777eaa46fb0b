use crate::channel::ElementChannel;
use crate::error::{Result, TableError};
use crate::pipeline::planner::ColumnDescriptor;
use crate::schema::{ElementRef, RawColumns, RawValue};

/// Column-major values of one table read.
///
/// Columns may have different lengths; the first column decides the row
/// count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTableSnapshot {
    columns: RawColumns,
}

impl RawTableSnapshot {
    pub fn new(columns: RawColumns) -> Self {
        RawTableSnapshot { columns }
    }

    pub fn empty() -> Self {
        RawTableSnapshot::default()
    }

    pub fn columns(&self) -> &[Vec<Option<RawValue>>] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Reorders the snapshot so column `i` holds the values of `plan[i]`.
    ///
    /// Columns without a source position are filled with empty cells. Every
    /// selected column has exactly [`row_count`](Self::row_count) entries.
    pub fn select_columns(&self, plan: &[ColumnDescriptor]) -> RawTableSnapshot {
        if self.is_empty() {
            return RawTableSnapshot::empty();
        }

        let rows = self.row_count();
        let columns = plan
            .iter()
            .map(|descriptor| {
                let source = descriptor
                    .source_index()
                    .and_then(|index| self.columns.get(index));
                (0..rows)
                    .map(|row| source.and_then(|values| values.get(row)).cloned().flatten())
                    .collect()
            })
            .collect();

        RawTableSnapshot { columns }
    }
}

impl From<RawColumns> for RawTableSnapshot {
    fn from(columns: RawColumns) -> Self {
        RawTableSnapshot::new(columns)
    }
}

/// Reads the current values of table `table_id` on `element`.
///
/// A table that reports nothing yields an empty snapshot.
pub fn fetch<C: ElementChannel + ?Sized>(
    channel: &mut C,
    element: ElementRef,
    table_id: u32,
) -> Result<RawTableSnapshot> {
    let columns = channel
        .get_partial_table(element, table_id)
        .map_err(|e| TableError::from_channel(element, &format!("fetching table {table_id}"), e))?;

    let snapshot = columns.map(RawTableSnapshot::new).unwrap_or_default();
    log::debug!(
        "Fetched table {table_id} from {element}: {} columns, {} rows",
        snapshot.column_count(),
        snapshot.row_count()
    );

    Ok(snapshot)
}
