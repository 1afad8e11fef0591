//! Parser for the protocol's date, time and datetime literals.
//!
//! ```text
//! YYYY-MM-DD [ ('T' | ' ') HH:MM:SS [ '.' F+ ] ] [ 'Z' | ('+' | '-') HH:MM ]
//! ```
//!
//! [`parse_literal`] produces a [`TemporalLiteral`] with each optional group
//! kept separate. The `decode_*` functions then apply the timezone policy:
//!
//! - with `include_timezone`, the wall clock is anchored to UTC (`Z`) or to
//!   the literal offset (zero when none was written);
//! - without it, the signed offset is subtracted from the wall clock and the
//!   result is returned zone-naive. No local timezone is ever consulted.
//!
//! Only the first fractional digit is significant (tenths of a second).

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc,
};

use crate::{
    data::{Value, ZonedTime},
    error::TemporalError,
};

const MICROS_PER_TENTH: u32 = 100_000;
const TIME_EPOCH_PREFIX: &str = "1970-01-01T";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSuffix {
    Unspecified,
    Utc,
    Offset(FixedOffset),
}

impl ZoneSuffix {
    /// Offset used for arithmetic; unspecified counts as zero.
    pub fn offset(&self) -> FixedOffset {
        match self {
            ZoneSuffix::Unspecified | ZoneSuffix::Utc => utc(),
            ZoneSuffix::Offset(offset) => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalLiteral {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub zone: ZoneSuffix,
}

impl TemporalLiteral {
    pub fn wall_clock(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    pub fn to_zoned(&self) -> Result<DateTime<FixedOffset>, TemporalError> {
        self.wall_clock()
            .and_local_timezone(self.zone.offset())
            .single()
            .ok_or(TemporalError::OutOfRange)
    }

    /// Wall clock minus the written offset.
    pub fn to_normalized(&self) -> Result<NaiveDateTime, TemporalError> {
        let shift = Duration::seconds(i64::from(self.zone.offset().local_minus_utc()));
        self.wall_clock()
            .checked_sub_signed(shift)
            .ok_or(TemporalError::OutOfRange)
    }
}

pub fn parse_literal(input: &str) -> Result<TemporalLiteral, TemporalError> {
    let mut cursor = Cursor::new(input);

    let year = cursor.digits(4)? as i32;
    cursor.expect(b'-')?;
    let month = cursor.digits(2)?;
    cursor.expect(b'-')?;
    let day = cursor.digits(2)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(TemporalError::InvalidDate { year, month, day })?;

    let time = if cursor.eat_any(b"T ") {
        Some(cursor.time_of_day()?)
    } else {
        None
    };

    let zone = cursor.zone_suffix()?;
    cursor.finish()?;

    Ok(TemporalLiteral { date, time, zone })
}

pub fn decode_datetime(value: &str, include_timezone: bool) -> Result<Value, TemporalError> {
    let literal = parse_literal(value)?;
    if include_timezone {
        literal.to_zoned().map(Value::ZonedDateTime)
    } else {
        literal.to_normalized().map(Value::DateTime)
    }
}

/// Bare calendar dates come back as [`Value::Date`]; anything longer goes
/// through the datetime grammar.
pub fn decode_date(value: &str, include_timezone: bool) -> Result<Value, TemporalError> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(Value::Date(date)),
        Err(_) => decode_datetime(value, include_timezone),
    }
}

pub fn decode_time(value: &str, include_timezone: bool) -> Result<Value, TemporalError> {
    let literal = parse_literal(&format!("{TIME_EPOCH_PREFIX}{value}"))?;
    if include_timezone {
        let zoned = literal.to_zoned()?;
        Ok(Value::ZonedTime(ZonedTime::new(zoned.time(), *zoned.offset())))
    } else {
        literal.to_normalized().map(|dt| Value::Time(dt.time()))
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn digit(&mut self) -> Result<u32, TemporalError> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                self.pos += 1;
                Ok(u32::from(b - b'0'))
            }
            _ => Err(TemporalError::ExpectedDigit { position: self.pos }),
        }
    }

    fn digits(&mut self, count: usize) -> Result<u32, TemporalError> {
        let mut value = 0;
        for _ in 0..count {
            value = value * 10 + self.digit()?;
        }
        Ok(value)
    }

    fn expect(&mut self, expected: u8) -> Result<(), TemporalError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(TemporalError::ExpectedChar {
                expected: char::from(expected),
                position: self.pos,
            })
        }
    }

    fn eat_any(&mut self, choices: &[u8]) -> bool {
        match self.peek() {
            Some(b) if choices.contains(&b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn time_of_day(&mut self) -> Result<NaiveTime, TemporalError> {
        let hour = self.digits(2)?;
        self.expect(b':')?;
        let minute = self.digits(2)?;
        self.expect(b':')?;
        let second = self.digits(2)?;

        let mut micros = 0;
        if self.eat_any(b".") {
            micros = self.digit()? * MICROS_PER_TENTH;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        NaiveTime::from_hms_micro_opt(hour, minute, second, micros).ok_or(
            TemporalError::InvalidTime {
                hour,
                minute,
                second,
            },
        )
    }

    fn zone_suffix(&mut self) -> Result<ZoneSuffix, TemporalError> {
        match self.peek() {
            Some(b'Z') => {
                self.pos += 1;
                Ok(ZoneSuffix::Utc)
            }
            Some(sign @ (b'+' | b'-')) => {
                self.pos += 1;
                let hours = self.digits(2)?;
                self.expect(b':')?;
                let minutes = self.digits(2)?;
                let magnitude = (hours * 3600 + minutes * 60) as i32;
                let seconds = if sign == b'-' { -magnitude } else { magnitude };
                FixedOffset::east_opt(seconds)
                    .map(ZoneSuffix::Offset)
                    .ok_or(TemporalError::InvalidOffset {
                        sign: char::from(sign),
                        hours,
                        minutes,
                    })
            }
            _ => Ok(ZoneSuffix::Unspecified),
        }
    }

    fn finish(&self) -> Result<(), TemporalError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(TemporalError::TrailingInput {
                rest: self.input[self.pos..].to_string(),
                position: self.pos,
            })
        }
    }
}
