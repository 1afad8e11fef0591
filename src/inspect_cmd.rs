use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::InspectArgs,
    decoder::Decoder,
    metadata::{FieldDescriptor, MetadataIndex},
    table,
};

pub fn execute(args: &InspectArgs) -> Result<()> {
    let index = MetadataIndex::load(&args.meta)
        .with_context(|| format!("Loading metadata from {:?}", args.meta))?;
    print!("{}", render(&index, args.include_tz)?);
    info!("Inspected {} field(s) from {:?}", index.len(), args.meta);
    Ok(())
}

/// One line per descriptor naming the decoder it resolves to. Fails on the
/// first descriptor whose data type is unknown.
pub fn render(index: &MetadataIndex, include_timezone: bool) -> Result<String> {
    let headers = ["field", "data_type", "interpretation", "decoder"]
        .map(str::to_string)
        .to_vec();
    let rows = index
        .iter()
        .map(|descriptor| describe(descriptor, include_timezone))
        .collect::<Result<Vec<_>>>()?;
    Ok(table::render_table(&headers, &rows))
}

fn describe(descriptor: &FieldDescriptor, include_timezone: bool) -> Result<Vec<String>> {
    let decoder = Decoder::for_descriptor(descriptor, include_timezone)
        .with_context(|| format!("Resolving decoder for field '{}'", descriptor.name))?;
    Ok(vec![
        descriptor.name.clone(),
        descriptor.data_type.clone(),
        descriptor.interpretation().unwrap_or("-").to_string(),
        decoder.describe().to_string(),
    ])
}
