//! Error types raised while resolving decoders and converting raw values.
//!
//! Resolution failures ([`DecodeError::UnknownDataType`]) abort a batch before
//! any value is touched. Conversion failures are reported per value as a
//! [`ValueError`] and wrapped by the record decoder into
//! [`DecodeError::FieldDecode`] so the caller always learns which field, row
//! and raw value failed.

use std::num::ParseIntError;

use thiserror::Error;

pub type DecodeResult<T, E = DecodeError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unknown data type '{data_type}' for field '{field}'")]
    UnknownDataType { field: String, data_type: String },
    #[error("error decoding field {field} with value '{value}' (row {row})")]
    FieldDecode {
        field: String,
        value: String,
        row: usize,
        #[source]
        source: ValueError,
    },
}

impl DecodeError {
    pub fn field(&self) -> &str {
        match self {
            DecodeError::UnknownDataType { field, .. } => field,
            DecodeError::FieldDecode { field, .. } => field,
        }
    }
}

/// A declared data type with no known decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown data type {0}")]
pub struct UnknownDataType(pub String);

/// Failure converting a single raw value with an already resolved decoder.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("invalid integer")]
    Integer(#[from] ParseIntError),
    #[error("invalid decimal")]
    Decimal(#[from] rust_decimal::Error),
    #[error("invalid temporal value")]
    Temporal(#[from] TemporalError),
}

/// Grammar and range failures from the temporal literal parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("expected digit at position {position}")]
    ExpectedDigit { position: usize },
    #[error("expected '{expected}' at position {position}")]
    ExpectedChar { expected: char, position: usize },
    #[error("unexpected trailing input '{rest}' at position {position}")]
    TrailingInput { rest: String, position: usize },
    #[error("date {year:04}-{month:02}-{day:02} does not exist")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("time {hour:02}:{minute:02}:{second:02} is out of range")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
    #[error("offset {sign}{hours:02}:{minutes:02} is out of range")]
    InvalidOffset { sign: char, hours: u32, minutes: u32 },
    #[error("value falls outside the representable datetime range")]
    OutOfRange,
}
