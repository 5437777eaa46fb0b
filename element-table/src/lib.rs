#![forbid(unsafe_code)]

pub mod args;
pub mod channel;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod source;
mod util;

pub use crate::channel::{AnyChannel, ElementChannel, FixtureChannel, ThriftChannel};
pub use crate::error::{Result, TableError};
pub use crate::source::{DataSource, ElementTableSource, Page, QueryContext};

///
/// Expose all structures required to run an element table query
///
/// ```
/// use element_table::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args::{Argument, ArgumentValues, InputArgument};
    pub use crate::channel::{AnyChannel, ElementChannel, FixtureChannel, ThriftChannel};
    pub use crate::error::{Result, TableError};
    pub use crate::pipeline::{CellValue, ColumnDescriptor, ColumnKind, FormatPolicy, OutputRow};
    pub use crate::schema::{ElementRef, ProtocolIdentity};
    pub use crate::source::{DataSource, ElementTableSource, Page, QueryContext};
}
