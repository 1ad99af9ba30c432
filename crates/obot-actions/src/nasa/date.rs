//! APOD date parsing and range checks.

use std::fmt;

use obot_core::is_separator;
use rand::Rng;
use time::Date;
use time::macros::{date, format_description};

/// The first Astronomy Picture of the Day.
pub const FIRST_APOD: Date = date!(1995 - 06 - 18);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    Invalid(String),
    OutOfRange,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(input) => write!(f, "Invalid Date string \"{input}\""),
            Self::OutOfRange => f.write_str("Given date is out of range"),
        }
    }
}

/// Parses `2013-07-03`, `4 Sep 2002`, `Sep 4 2002` and their long-month
/// and comma variants. Month names are case-insensitive; runs of
/// separators count as one space.
pub fn parse_date(input: &str) -> Option<Date> {
    let normalized = input
        .split(is_separator)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let formats = [
        format_description!("[year]-[month]-[day]"),
        format_description!("[year]-[month padding:none]-[day padding:none]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
        format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
        format_description!("[month repr:short case_sensitive:false] [day padding:none] [year]"),
        format_description!("[month repr:long case_sensitive:false] [day padding:none] [year]"),
        format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]"),
        format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]"),
    ];

    formats
        .iter()
        .find_map(|format| Date::parse(&normalized, *format).ok())
}

/// Parses `input` and checks it lies in `[FIRST_APOD, today]`.
pub fn validate_date(input: &str, today: Date) -> Result<Date, DateError> {
    let date = parse_date(input).ok_or_else(|| DateError::Invalid(input.to_string()))?;
    if date < FIRST_APOD || date > today {
        return Err(DateError::OutOfRange);
    }
    Ok(date)
}

/// A uniformly chosen date in `[FIRST_APOD, today]`.
pub fn random_date<R: Rng + ?Sized>(today: Date, rng: &mut R) -> Date {
    if today <= FIRST_APOD {
        return FIRST_APOD;
    }
    let day = rng.gen_range(FIRST_APOD.to_julian_day()..=today.to_julian_day());
    Date::from_julian_day(day).unwrap_or(today)
}
