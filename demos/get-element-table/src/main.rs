mod cli;

use clap::Parser;
use element_table::prelude::*;
use std::io::{BufWriter, Error, ErrorKind, Write};
use std::time::Duration;

use crate::cli::{Args, OutputFormat};

fn open_channel(args: &Args) -> std::io::Result<AnyChannel> {
    if let Some(fixture) = args.standalone() {
        log::info!("Answering from fixture {}", fixture.display());
        return Ok(FixtureChannel::from_path(fixture)?.into());
    }

    let Some(socket) = args.socket() else {
        return Err(Error::new(ErrorKind::InvalidInput, "No socket provided"));
    };
    let timeout = Duration::from_secs(args.timeout);
    Ok(ThriftChannel::new(socket, timeout)?.into())
}

fn print_table(
    out: &mut impl Write,
    columns: &[ColumnDescriptor],
    page: &Page,
) -> std::io::Result<()> {
    let mut widths: Vec<usize> = columns.iter().map(|column| column.name().len()).collect();
    for row in &page.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.to_string().len());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{:<width$}", column.name()))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;

    for row in &page.rows {
        let line: Vec<String> = row
            .cells()
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell.to_string()))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }

    Ok(())
}

fn print_json(
    out: &mut impl Write,
    context: &QueryContext,
    columns: &[ColumnDescriptor],
    page: &Page,
) -> std::io::Result<()> {
    let columns: Vec<serde_json::Value> = columns
        .iter()
        .map(|column| {
            serde_json::json!({
                "name": column.name(),
                "kind": column.kind().to_string(),
                "parameterId": column.parameter_id(),
            })
        })
        .collect();

    let document = serde_json::json!({
        "element": context.element().to_string(),
        "protocol": context.protocol().to_string(),
        "tableId": context.table_id(),
        "columns": columns,
        "rows": page.rows,
    });

    serde_json::to_writer_pretty(&mut *out, &document).map_err(Error::other)?;
    writeln!(out)
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut source = ElementTableSource::new(open_channel(&args)?);

    let context = source
        .on_arguments_processed(&args.argument_values())
        .map_err(Error::other)?;
    let columns = source.columns(&context);
    let page = source.next_page(&context).map_err(Error::other)?;
    log::debug!("{} returned {} rows", source.name(), page.rows.len());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.format {
        OutputFormat::Table => print_table(&mut out, &columns, &page)?,
        OutputFormat::Json => print_json(&mut out, &context, &columns, &page)?,
    }
    out.flush()
}
