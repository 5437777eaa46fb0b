//! Input arguments a host supplies before a query runs.
//!
//! Hosts pass argument values as strings keyed by the argument name, the
//! same way they show them to users (`"DMA ID"`, `"Columns IDs"`, ...).
//! Everything is validated here so the pipeline only sees typed values.

use crate::error::{Result, TableError};
use crate::schema::ElementRef;
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString, IntoStaticStr, VariantNames};

/// Raw argument values keyed by argument name.
pub type ArgumentValues = BTreeMap<String, String>;

/// Separator between ids in the `Columns IDs` argument.
pub const COLUMN_ID_SEPARATOR: char = ';';

#[derive(Clone, Copy, Debug, Display, EnumString, IntoStaticStr, VariantNames, PartialEq, Eq)]
pub enum Argument {
    #[strum(serialize = "DMA ID")]
    DmaId,
    #[strum(serialize = "Element ID")]
    ElementId,
    #[strum(serialize = "Table ID")]
    TableId,
    #[strum(serialize = "Columns IDs")]
    ColumnIds,
}

impl Argument {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// A well-formed value, quoted in error messages.
    pub fn example(self) -> &'static str {
        match self {
            Argument::DmaId => "477",
            Argument::ElementId => "178",
            Argument::TableId => "100",
            Argument::ColumnIds => "101;102",
        }
    }

    fn invalid(self, reason: String) -> TableError {
        TableError::InvalidArgument {
            argument: self.name(),
            reason,
            example: self.example(),
        }
    }
}

/// Declaration of one argument as shown by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputArgument {
    pub argument: Argument,
    pub required: bool,
}

impl InputArgument {
    pub fn required(argument: Argument) -> Self {
        InputArgument {
            argument,
            required: true,
        }
    }

    pub fn optional(argument: Argument) -> Self {
        InputArgument {
            argument,
            required: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.argument.name()
    }
}

/// Typed arguments of one query invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryArguments {
    pub element: ElementRef,
    pub table_id: u32,
    /// `None` selects every declared column of the table.
    pub column_ids: Option<Vec<u32>>,
}

impl QueryArguments {
    /// Parses raw values. `default_table` makes `Table ID` optional.
    pub fn parse(values: &ArgumentValues, default_table: Option<u32>) -> Result<Self> {
        let dma_id = parse_id(Argument::DmaId, required(values, Argument::DmaId)?)?;
        let element_id = parse_id(Argument::ElementId, required(values, Argument::ElementId)?)?;

        let table_id = match (lookup(values, Argument::TableId), default_table) {
            (Some(raw), _) => parse_id(Argument::TableId, raw)?,
            (None, Some(table_id)) => table_id,
            (None, None) => return Err(missing(Argument::TableId)),
        };

        let column_ids = parse_column_ids(lookup(values, Argument::ColumnIds))?;

        Ok(QueryArguments {
            element: ElementRef::new(dma_id, element_id),
            table_id,
            column_ids,
        })
    }
}

/// Parses one non-negative integer id.
pub fn parse_id(argument: Argument, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| argument.invalid(format!("\"{trimmed}\" is not a non-negative integer")))
}

/// Parses the `;`-separated column id list. Blank input means "all columns".
pub fn parse_column_ids(raw: Option<&str>) -> Result<Option<Vec<u32>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let ids = raw
        .split(COLUMN_ID_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.parse::<u32>().map_err(|_| {
                Argument::ColumnIds.invalid(format!(
                    "\"{segment}\" in \"{}\" is not a non-negative integer",
                    raw.trim()
                ))
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    if ids.is_empty() {
        Ok(None)
    } else {
        Ok(Some(ids))
    }
}

fn lookup(values: &ArgumentValues, argument: Argument) -> Option<&str> {
    values
        .get(argument.name())
        .map(|value| value.as_str())
        .filter(|value| !value.trim().is_empty())
}

fn required(values: &ArgumentValues, argument: Argument) -> Result<&str> {
    lookup(values, argument).ok_or_else(|| missing(argument))
}

fn missing(argument: Argument) -> TableError {
    argument.invalid("a value is required".to_string())
}
