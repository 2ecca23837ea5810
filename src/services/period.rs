//! Settlement-period parsing.
//!
//! Payslips print the pay period in one of three free-text shapes. Each is
//! recognized explicitly and reduced to the period's start date, together
//! with the granularity the text actually carried.

use chrono::{Datelike, NaiveDate};
use strum::EnumString;

/// Century added to two-digit years in the Spanish range format.
pub const DEFAULT_CENTURY: i32 = 2000;

/// Separator between start and end dates ("a" is Spanish for "to").
const RANGE_SEPARATOR: &str = " a ";

/// Recognized settlement-period formats, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFormat {
    /// `MM/YYYY`, e.g. `01/2024`.
    MonthYear,
    /// `YYYY-MM-DD a YYYY-MM-DD`.
    IsoRange,
    /// `DD MON YY a DD MON YY`, e.g. `01 AGO 25 a 31 AGO 25`.
    SpanishRange,
}

/// How precise the parsed start date is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl PeriodFormat {
    pub fn granularity(self) -> Granularity {
        match self {
            PeriodFormat::IsoRange => Granularity::Day,
            PeriodFormat::MonthYear | PeriodFormat::SpanishRange => Granularity::Month,
        }
    }
}

/// Three-letter Spanish month abbreviations as printed on payslips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
enum SpanishMonth {
    Ene,
    Feb,
    Mar,
    Abr,
    May,
    Jun,
    Jul,
    Ago,
    Sep,
    Oct,
    Nov,
    Dic,
}

impl SpanishMonth {
    fn number(self) -> u32 {
        self as u32 + 1
    }
}

/// A parsed settlement period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPeriod {
    pub format: PeriodFormat,
    /// First day of the period (the 1st of the month for month-granular formats).
    pub start: NaiveDate,
}

impl SettlementPeriod {
    pub fn granularity(&self) -> Granularity {
        self.format.granularity()
    }

    /// Whether the period begins before `date`.
    ///
    /// Month-granular periods are compared by (year, month), so a period
    /// printed as `08/2025` does not start before an employee hired on
    /// 2025-08-15.
    pub fn starts_before(&self, date: NaiveDate) -> bool {
        match self.granularity() {
            Granularity::Day => self.start < date,
            Granularity::Month => {
                (self.start.year(), self.start.month()) < (date.year(), date.month())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodParseError {
    #[error("unrecognized settlement period format: {0:?}")]
    UnrecognizedFormat(String),

    #[error("invalid month {month:?} in settlement period {text:?}")]
    InvalidMonth { text: String, month: String },

    #[error("invalid year {year:?} in settlement period {text:?}")]
    InvalidYear { text: String, year: String },

    #[error("invalid start date {date:?} in settlement period {text:?}")]
    InvalidDate { text: String, date: String },
}

/// Parse a settlement period using the default century for two-digit years.
pub fn parse(text: &str) -> Result<SettlementPeriod, PeriodParseError> {
    parse_with_century(text, DEFAULT_CENTURY)
}

/// Parse a settlement period, reading two-digit years as `century + YY`.
pub fn parse_with_century(text: &str, century: i32) -> Result<SettlementPeriod, PeriodParseError> {
    let text = text.trim();
    match detect_format(text) {
        Some(PeriodFormat::MonthYear) => parse_month_year(text),
        Some(PeriodFormat::IsoRange) => parse_iso_range(text),
        Some(PeriodFormat::SpanishRange) => parse_spanish_range(text, century),
        None => Err(PeriodParseError::UnrecognizedFormat(text.to_string())),
    }
}

/// Decide which format a text is written in, checking shapes in order.
pub fn detect_format(text: &str) -> Option<PeriodFormat> {
    if text.matches('/').count() == 1 && !text.contains('-') {
        return Some(PeriodFormat::MonthYear);
    }
    if text.contains('-') && text.contains(RANGE_SEPARATOR) {
        return Some(PeriodFormat::IsoRange);
    }
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() >= 3 && tokens[1].parse::<SpanishMonth>().is_ok() {
        return Some(PeriodFormat::SpanishRange);
    }
    None
}

fn parse_month_year(text: &str) -> Result<SettlementPeriod, PeriodParseError> {
    let (month, year) = text
        .split_once('/')
        .ok_or_else(|| PeriodParseError::UnrecognizedFormat(text.to_string()))?;
    let (month, year) = (month.trim(), year.trim());

    let month_number = month
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| PeriodParseError::InvalidMonth {
            text: text.to_string(),
            month: month.to_string(),
        })?;

    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PeriodParseError::InvalidYear {
            text: text.to_string(),
            year: year.to_string(),
        });
    }
    let year_number: i32 = year.parse().map_err(|_| PeriodParseError::InvalidYear {
        text: text.to_string(),
        year: year.to_string(),
    })?;

    month_start(text, year_number, month_number, PeriodFormat::MonthYear)
}

fn parse_iso_range(text: &str) -> Result<SettlementPeriod, PeriodParseError> {
    let parts: Vec<&str> = text.split(RANGE_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(PeriodParseError::UnrecognizedFormat(text.to_string()));
    }
    let start = parts[0].trim();
    let start_date =
        NaiveDate::parse_from_str(start, "%Y-%m-%d").map_err(|_| PeriodParseError::InvalidDate {
            text: text.to_string(),
            date: start.to_string(),
        })?;

    Ok(SettlementPeriod {
        format: PeriodFormat::IsoRange,
        start: start_date,
    })
}

fn parse_spanish_range(text: &str, century: i32) -> Result<SettlementPeriod, PeriodParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (month, year) = match tokens.as_slice() {
        [_, month, year, ..] => (*month, *year),
        _ => return Err(PeriodParseError::UnrecognizedFormat(text.to_string())),
    };

    let month_number = month
        .parse::<SpanishMonth>()
        .map(SpanishMonth::number)
        .map_err(|_| PeriodParseError::InvalidMonth {
            text: text.to_string(),
            month: month.to_string(),
        })?;

    if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PeriodParseError::InvalidYear {
            text: text.to_string(),
            year: year.to_string(),
        });
    }
    let two_digit: i32 = year.parse().map_err(|_| PeriodParseError::InvalidYear {
        text: text.to_string(),
        year: year.to_string(),
    })?;

    month_start(text, century + two_digit, month_number, PeriodFormat::SpanishRange)
}

fn month_start(
    text: &str,
    year: i32,
    month: u32,
    format: PeriodFormat,
) -> Result<SettlementPeriod, PeriodParseError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| PeriodParseError::InvalidDate {
        text: text.to_string(),
        date: format!("{year:04}-{month:02}-01"),
    })?;
    Ok(SettlementPeriod { format, start })
}
