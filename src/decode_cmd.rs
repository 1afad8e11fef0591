use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{DecodeArgs, OutputFormat},
    data::display_cell,
    diagnostics::CollectingDiagnostics,
    io_utils,
    metadata::MetadataIndex,
    record::{DecodeOptions, RecordDecoder},
    rows::DecodedRow,
    table,
};

pub fn execute(args: &DecodeArgs) -> Result<()> {
    let index = MetadataIndex::load(&args.meta)
        .with_context(|| format!("Loading metadata from {:?}", args.meta))?;
    info!(
        "Loaded {} field descriptor(s) from {:?}",
        index.len(),
        args.meta
    );

    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter)?;
    let rows = io_utils::read_rows(&mut reader, encoding, args.limit)
        .with_context(|| format!("Reading rows from {:?}", args.input))?;

    let options = DecodeOptions {
        include_timezone: args.include_tz,
    };
    let diagnostics = Arc::new(CollectingDiagnostics::logging());
    let decoder = RecordDecoder::from_index(index, options, Arc::clone(&diagnostics));
    let decoded = decoder
        .decode(&rows)
        .with_context(|| format!("Decoding rows from {:?}", args.input))?;

    let missing = diagnostics.missing_fields();
    if !missing.is_empty() {
        info!(
            "{} field(s) missing from metadata: {}",
            missing.len(),
            missing.join(", ")
        );
    }

    let mut output = io_utils::open_output(args.output.as_deref())?;
    write_rows(&mut output, &decoded, args.format)?;
    output.flush().context("Flushing output")?;

    info!(
        "Decoded {} row(s) from {:?} (include_tz={})",
        decoded.len(),
        args.input,
        args.include_tz
    );
    Ok(())
}

pub fn write_rows<W: Write>(writer: &mut W, rows: &[DecodedRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut *writer, row).context("Serializing row as JSON")?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv_writer = io_utils::open_csv_writer(&mut *writer, io_utils::DEFAULT_CSV_DELIMITER);
            if let Some(first) = rows.first() {
                csv_writer.write_record(first.names())?;
                for row in rows {
                    csv_writer.write_record(row.values().map(|v| display_cell(v.as_ref())))?;
                }
            }
            csv_writer.flush()?;
        }
        OutputFormat::Table => {
            write!(writer, "{}", table::render_rows(rows))?;
        }
    }
    Ok(())
}
