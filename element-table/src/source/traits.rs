/// Trait definition for data sources driven by a query host
use crate::args::{ArgumentValues, InputArgument};
use crate::error::Result;
use crate::pipeline::{ColumnDescriptor, OutputRow};
use serde::Serialize;

/// One page of rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub rows: Vec<OutputRow>,
    pub has_next_page: bool,
}

impl Page {
    /// A page holding the whole result set.
    pub fn complete(rows: Vec<OutputRow>) -> Self {
        Page {
            rows,
            has_next_page: false,
        }
    }
}

/// Lifecycle of a tabular data source as seen by the host.
///
/// The host lists the input arguments, hands over their raw values once,
/// reads the column contract and then asks for pages until
/// `has_next_page` is false. Everything decided from the arguments lives
/// in the returned context, which the host passes back on every later call.
pub trait DataSource {
    type Context;

    fn name(&self) -> String;
    fn input_arguments(&self) -> Vec<InputArgument>;
    fn on_arguments_processed(&mut self, values: &ArgumentValues) -> Result<Self::Context>;
    fn columns(&self, context: &Self::Context) -> Vec<ColumnDescriptor>;
    fn next_page(&mut self, context: &Self::Context) -> Result<Page>;
}
