use element_table::args::{Argument, ArgumentValues};
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// A JSON document with columns and rows
    Json,
}

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = true)]
#[clap(group(
  clap::ArgGroup::new("mode")
    .required(true)
    .multiple(false)
    .args(&["standalone", "socket"]),
))]
pub struct Args {
    // Operating in standalone mode, answering from a fixture document
    #[clap(long, value_name = "PATH_TO_FIXTURE")]
    pub standalone: Option<PathBuf>,

    // Operating in socket mode, talking to an element registry
    #[clap(long, value_name = "PATH_TO_SOCKET")]
    pub socket: Option<String>,

    /// Time in seconds to wait for a registry reply, 0 waits forever.
    #[clap(long, default_value_t = 30, conflicts_with = "standalone")]
    pub timeout: u64,

    /// DMA id of the element.
    #[clap(long)]
    pub dma_id: String,

    /// Id of the element within its DMA.
    #[clap(long)]
    pub element_id: String,

    /// Id of the table parameter.
    #[clap(long)]
    pub table_id: Option<String>,

    /// Column parameter ids separated by ';'. All declared columns when left out.
    #[clap(long)]
    pub columns: Option<String>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable verbose informational messages.
    #[clap(long)]
    pub verbose: bool,
}

impl Args {
    pub fn standalone(&self) -> Option<&PathBuf> {
        self.standalone.as_ref()
    }

    pub fn socket(&self) -> Option<&str> {
        self.socket.as_deref()
    }

    /// Raw argument values keyed by their host-visible names.
    pub fn argument_values(&self) -> ArgumentValues {
        let mut values = ArgumentValues::new();
        values.insert(Argument::DmaId.name().to_string(), self.dma_id.clone());
        values.insert(Argument::ElementId.name().to_string(), self.element_id.clone());
        if let Some(table_id) = &self.table_id {
            values.insert(Argument::TableId.name().to_string(), table_id.clone());
        }
        if let Some(columns) = &self.columns {
            values.insert(Argument::ColumnIds.name().to_string(), columns.clone());
        }
        values
    }
}
