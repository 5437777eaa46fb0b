use crate::args::{Argument, ArgumentValues, InputArgument, QueryArguments};
use crate::channel::ElementChannel;
use crate::error::Result;
use crate::pipeline::{self, ColumnDescriptor};
use crate::schema::{ElementRef, ProtocolIdentity};
use crate::source::traits::{DataSource, Page};

pub const SOURCE_NAME: &str = "Get Element Table";

/// Everything one invocation decided while processing its arguments.
///
/// Built once and never modified; each page request reads from it.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryContext {
    arguments: QueryArguments,
    protocol: ProtocolIdentity,
    columns: Vec<ColumnDescriptor>,
}

impl QueryContext {
    pub fn element(&self) -> ElementRef {
        self.arguments.element
    }

    pub fn table_id(&self) -> u32 {
        self.arguments.table_id
    }

    pub fn arguments(&self) -> &QueryArguments {
        &self.arguments
    }

    pub fn protocol(&self) -> &ProtocolIdentity {
        &self.protocol
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }
}

/// Reads one table parameter of one element through an [`ElementChannel`].
pub struct ElementTableSource<C: ElementChannel> {
    channel: C,
    default_table: Option<u32>,
}

impl<C: ElementChannel> ElementTableSource<C> {
    pub fn new(channel: C) -> Self {
        ElementTableSource {
            channel,
            default_table: None,
        }
    }

    /// Table read when the `Table ID` argument is left out.
    pub fn with_default_table(mut self, table_id: u32) -> Self {
        self.default_table = Some(table_id);
        self
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }
}

impl<C: ElementChannel> DataSource for ElementTableSource<C> {
    type Context = QueryContext;

    fn name(&self) -> String {
        SOURCE_NAME.to_string()
    }

    fn input_arguments(&self) -> Vec<InputArgument> {
        let table = match self.default_table {
            Some(_) => InputArgument::optional(Argument::TableId),
            None => InputArgument::required(Argument::TableId),
        };

        vec![
            InputArgument::required(Argument::DmaId),
            InputArgument::required(Argument::ElementId),
            table,
            InputArgument::optional(Argument::ColumnIds),
        ]
    }

    fn on_arguments_processed(&mut self, values: &ArgumentValues) -> Result<QueryContext> {
        let arguments = QueryArguments::parse(values, self.default_table)?;
        let (protocol, schema) = pipeline::resolve(&mut self.channel, arguments.element)?;
        let columns = pipeline::plan(&schema, arguments.table_id, arguments.column_ids.as_deref())?;

        log::info!(
            "Reading table {} of element {} ({protocol}) with {} columns",
            arguments.table_id,
            arguments.element,
            columns.len()
        );

        Ok(QueryContext {
            arguments,
            protocol,
            columns,
        })
    }

    fn columns(&self, context: &QueryContext) -> Vec<ColumnDescriptor> {
        context.columns().to_vec()
    }

    fn next_page(&mut self, context: &QueryContext) -> Result<Page> {
        let snapshot =
            pipeline::fetch(&mut self.channel, context.element(), context.table_id())?;
        let projected = snapshot.select_columns(context.columns());
        let rows = pipeline::build(&projected, context.columns());

        Ok(Page::complete(rows))
    }
}
