//! The four stages of an element table query.
//!
//! [`resolver`] finds the element's protocol schema, [`planner`] decides the
//! output columns, [`fetcher`] reads the table values and [`rows`] turns them
//! into formatted rows. Each stage is a plain function over its inputs.

pub mod fetcher;
pub mod planner;
pub mod resolver;
pub mod rows;

pub use fetcher::{fetch, RawTableSnapshot};
pub use planner::{column_type, plan, ColumnDescriptor, ColumnKind, FormatPolicy};
pub use resolver::resolve;
pub use rows::{build, format_cell, format_duration_hours, transpose, CellValue, OutputRow};
