//! Resolution of a field's declared data type and interpretation into a
//! single-value [`Decoder`].
//!
//! Interpretation wins over data type: `Lookup` keeps the raw code as text
//! and the multi-value lookup tags split on commas, whatever the declared
//! type. Only when neither applies is the data type consulted, and an
//! unrecognised data type fails here, before any value is decoded.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    data::Value,
    error::{UnknownDataType, ValueError},
    metadata::{DataType, FieldDescriptor, Interpretation},
    temporal,
};

const MULTI_VALUE_SEPARATOR: char = ',';
const DECIMAL_MAX_DIGITS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
}

/// A configured single-value conversion. Temporal decoders carry their own
/// timezone mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Lookup,
    LookupMulti,
    Boolean,
    Text,
    Integer,
    Decimal,
    Temporal {
        kind: TemporalKind,
        include_timezone: bool,
    },
}

impl Decoder {
    pub fn resolve(
        data_type: &str,
        interpretation: Option<&str>,
        include_timezone: bool,
    ) -> Result<Self, UnknownDataType> {
        match interpretation.and_then(Interpretation::from_tag) {
            Some(tag) if tag.is_multi() => return Ok(Decoder::LookupMulti),
            Some(_) => return Ok(Decoder::Lookup),
            None => {}
        }

        let decoder = match DataType::from_str(data_type)? {
            DataType::Boolean => Decoder::Boolean,
            DataType::Character | DataType::Point => Decoder::Text,
            DataType::Tiny
            | DataType::Small
            | DataType::Int
            | DataType::Long
            | DataType::Number => Decoder::Integer,
            DataType::Decimal => Decoder::Decimal,
            DataType::Date => Decoder::temporal(TemporalKind::Date, include_timezone),
            DataType::Time => Decoder::temporal(TemporalKind::Time, include_timezone),
            DataType::DateTime => Decoder::temporal(TemporalKind::DateTime, include_timezone),
        };
        Ok(decoder)
    }

    pub fn for_descriptor(
        descriptor: &FieldDescriptor,
        include_timezone: bool,
    ) -> Result<Self, UnknownDataType> {
        Self::resolve(
            &descriptor.data_type,
            descriptor.interpretation(),
            include_timezone,
        )
    }

    fn temporal(kind: TemporalKind, include_timezone: bool) -> Self {
        Decoder::Temporal {
            kind,
            include_timezone,
        }
    }

    /// Converts a non-empty raw value. Empty values never reach a decoder.
    pub fn decode(&self, raw: &str) -> Result<Value, ValueError> {
        let value = match self {
            Decoder::Lookup | Decoder::Text => Value::String(raw.to_string()),
            Decoder::LookupMulti => Value::List(
                raw.split(MULTI_VALUE_SEPARATOR)
                    .map(str::to_string)
                    .collect(),
            ),
            Decoder::Boolean => Value::Boolean(raw == "1"),
            Decoder::Integer => Value::Integer(raw.trim_ascii().parse::<i64>()?),
            Decoder::Decimal => Value::Decimal(parse_decimal(raw.trim_ascii())?),
            Decoder::Temporal {
                kind,
                include_timezone,
            } => {
                let include_timezone = *include_timezone;
                match kind {
                    TemporalKind::Date => temporal::decode_date(raw, include_timezone)?,
                    TemporalKind::Time => temporal::decode_time(raw, include_timezone)?,
                    TemporalKind::DateTime => temporal::decode_datetime(raw, include_timezone)?,
                }
            }
        };
        Ok(value)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Decoder::Lookup => "lookup",
            Decoder::LookupMulti => "lookup-multi",
            Decoder::Boolean => "boolean",
            Decoder::Text => "string",
            Decoder::Integer => "integer",
            Decoder::Decimal => "decimal",
            Decoder::Temporal {
                kind,
                include_timezone,
            } => match (kind, include_timezone) {
                (TemporalKind::Date, false) => "date",
                (TemporalKind::Date, true) => "date (tz)",
                (TemporalKind::Time, false) => "time",
                (TemporalKind::Time, true) => "time (tz)",
                (TemporalKind::DateTime, false) => "datetime",
                (TemporalKind::DateTime, true) => "datetime (tz)",
            },
        }
    }
}

/// Parses without rounding: a literal with more significant digits than
/// `Decimal` holds is an error, never a changed value.
fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str_exact(raw).or_else(|err| match raw.split_once(['e', 'E']) {
        Some((mantissa, _)) if significant_digits(mantissa) > DECIMAL_MAX_DIGITS => {
            Err(rust_decimal::Error::Underflow)
        }
        Some(_) => Decimal::from_scientific(raw),
        None => Err(err),
    })
}

fn significant_digits(mantissa: &str) -> usize {
    mantissa
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .count()
}
