use crate::error::{Result, TableError};
use crate::schema::{InterpretationType, ParameterDefinition, ProtocolSchema};
use strum_macros::Display;

// ColumnDescriptor defines one output column of an element table query.
// The ordered list of descriptors is the column contract handed to the host;
// rows are always aligned to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    kind: ColumnKind,
    format: FormatPolicy,
    parameter_id: u32,
    source_index: Option<usize>,
}

#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ColumnKind {
    // NUMERIC: floating point values
    Numeric,
    // TEXT: containing strings
    Text,
}

#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, Hash)]
pub enum FormatPolicy {
    PlainNumeric,
    /// Hours rendered as `"{d}d {h}h {m}m"`.
    DurationFromHours,
    PlainText,
}

impl ColumnDescriptor {
    pub fn new(name: &str, kind: ColumnKind, format: FormatPolicy, parameter_id: u32) -> Self {
        ColumnDescriptor {
            name: name.to_owned(),
            kind,
            format,
            parameter_id,
            source_index: None,
        }
    }

    /// Describes the column defined by `parameter`.
    pub fn for_parameter(parameter: &ParameterDefinition) -> Self {
        let (kind, format) = column_type(parameter);
        ColumnDescriptor::new(&parameter.name, kind, format, parameter.id)
    }

    /// Stand-in for an explicitly requested id the schema does not define.
    pub fn unresolved(parameter_id: u32) -> Self {
        ColumnDescriptor::new(
            &format!("Parameter {parameter_id}"),
            ColumnKind::Text,
            FormatPolicy::PlainText,
            parameter_id,
        )
    }

    pub fn with_source_index(mut self, source_index: Option<usize>) -> Self {
        self.source_index = source_index;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn format(&self) -> FormatPolicy {
        self.format
    }

    pub fn parameter_id(&self) -> u32 {
        self.parameter_id
    }

    /// Position of the column's values in the table snapshot, if it has one.
    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }
}

/// The only place a parameter's declared type turns into display policy.
pub fn column_type(parameter: &ParameterDefinition) -> (ColumnKind, FormatPolicy) {
    match parameter.interpretation {
        InterpretationType::Numeric if parameter.options.is_duration() => {
            (ColumnKind::Numeric, FormatPolicy::DurationFromHours)
        }
        InterpretationType::Numeric => (ColumnKind::Numeric, FormatPolicy::PlainNumeric),
        InterpretationType::Text | InterpretationType::Other => {
            (ColumnKind::Text, FormatPolicy::PlainText)
        }
    }
}

/// Plans the output columns of table `table_id`.
///
/// Without explicit ids every declared column is used in schema order, and
/// columns pointing at parameters missing from the schema are dropped. With
/// explicit ids there is exactly one descriptor per id, in the given order,
/// duplicates included.
pub fn plan(
    schema: &ProtocolSchema,
    table_id: u32,
    explicit_column_ids: Option<&[u32]>,
) -> Result<Vec<ColumnDescriptor>> {
    let table = schema
        .parameter(table_id)
        .filter(|parameter| parameter.is_table)
        .ok_or(TableError::InvalidTableReference {
            parameter_id: table_id,
        })?;

    let columns: Vec<ColumnDescriptor> = match explicit_column_ids {
        Some(ids) if !ids.is_empty() => ids
            .iter()
            .map(|&id| {
                schema
                    .parameter(id)
                    .map(ColumnDescriptor::for_parameter)
                    .unwrap_or_else(|| ColumnDescriptor::unresolved(id))
                    .with_source_index(table.column_position(id))
            })
            .collect(),
        _ => table
            .columns
            .iter()
            .enumerate()
            .filter_map(|(position, column)| {
                let Some(parameter) = schema.parameter(column.parameter_id) else {
                    log::debug!(
                        "Table {table_id} column {position} references unknown parameter {}",
                        column.parameter_id
                    );
                    return None;
                };
                Some(ColumnDescriptor::for_parameter(parameter).with_source_index(Some(position)))
            })
            .collect(),
    };

    log::debug!("Planned {} columns for table {table_id}", columns.len());
    Ok(columns)
}
