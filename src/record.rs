//! Batch decoding of raw rows into typed rows.
//!
//! Every row in a batch is assumed to carry the field names of the first
//! row. Decoders are resolved once from that first row and reused for the
//! rest of the batch; a field that only appears in a later row is passed
//! through as text without diagnostics.

use std::collections::HashMap;

use log::debug;

use crate::{
    decoder::Decoder,
    diagnostics::{Diagnostics, LogDiagnostics},
    error::{DecodeError, DecodeResult},
    metadata::{FieldDescriptor, MetadataIndex},
    rows::{DecodedRow, RawRow},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Produce zone-aware temporal values instead of offset-normalized naive ones.
    pub include_timezone: bool,
}

pub struct RecordDecoder {
    index: MetadataIndex,
    options: DecodeOptions,
    diagnostics: Box<dyn Diagnostics>,
}

impl RecordDecoder {
    pub fn new<I>(table: I, include_timezone: bool) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        Self::with_diagnostics(table, include_timezone, LogDiagnostics)
    }

    pub fn with_diagnostics<I, D>(table: I, include_timezone: bool, diagnostics: D) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
        D: Diagnostics + 'static,
    {
        Self::from_index(
            MetadataIndex::new(table),
            DecodeOptions { include_timezone },
            diagnostics,
        )
    }

    pub fn from_index<D>(index: MetadataIndex, options: DecodeOptions, diagnostics: D) -> Self
    where
        D: Diagnostics + 'static,
    {
        Self {
            index,
            options,
            diagnostics: Box::new(diagnostics),
        }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Resolves one decoder per distinct name. Names without metadata are
    /// reported once each and decoded as `Character`.
    pub fn resolve_fields<'a, I>(&self, names: I) -> DecodeResult<HashMap<String, Decoder>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut decoders = HashMap::new();
        for name in names {
            if decoders.contains_key(name) {
                continue;
            }
            let fallback;
            let descriptor = match self.index.get(name) {
                Some(descriptor) => descriptor,
                None => {
                    self.diagnostics.missing_field_metadata(name);
                    fallback = FieldDescriptor::fallback(name);
                    &fallback
                }
            };
            let decoder = Decoder::for_descriptor(descriptor, self.options.include_timezone)
                .map_err(|err| DecodeError::UnknownDataType {
                    field: name.to_string(),
                    data_type: err.0,
                })?;
            decoders.insert(name.to_string(), decoder);
        }
        Ok(decoders)
    }

    pub fn decode(&self, rows: &[RawRow]) -> DecodeResult<Vec<DecodedRow>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };

        let decoders = self.resolve_fields(first.names())?;
        debug!(
            "Resolved {} decoder(s) for a batch of {} row(s)",
            decoders.len(),
            rows.len()
        );

        rows.iter()
            .enumerate()
            .map(|(row_idx, row)| decode_with(&decoders, row_idx, row))
            .collect()
    }

    pub fn decode_row(&self, row: &RawRow) -> DecodeResult<DecodedRow> {
        let decoders = self.resolve_fields(row.names())?;
        decode_with(&decoders, 0, row)
    }
}

fn decode_with(
    decoders: &HashMap<String, Decoder>,
    row_idx: usize,
    row: &RawRow,
) -> DecodeResult<DecodedRow> {
    let mut decoded = DecodedRow::with_capacity(row.len());
    for (field, raw) in row.iter() {
        if raw.is_empty() {
            decoded.push(field, None);
            continue;
        }
        let decoder = decoders.get(field).copied().unwrap_or(Decoder::Text);
        let value = decoder
            .decode(raw)
            .map_err(|source| DecodeError::FieldDecode {
                field: field.to_string(),
                value: raw.clone(),
                row: row_idx,
                source,
            })?;
        decoded.push(field, Some(value));
    }
    Ok(decoded)
}
