// Field validators — name, phone and birthday rules
//
// Each newtype can only be built through its validator, so a record never
// holds a value that failed its rule.

use crate::{BookError, Field, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Exact number of digits in a phone number
pub const PHONE_DIGITS: usize = 10;

/// Names may contain letters from any alphabet, ASCII digits and whitespace.
pub fn validate_name(value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace());

    if valid {
        Ok(())
    } else {
        Err(BookError::invalid(Field::Name, value))
    }
}

pub fn validate_phone(value: &str) -> Result<()> {
    if value.len() == PHONE_DIGITS && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BookError::invalid(Field::Phone, value))
    }
}

/// Range check on `dd-mm-yyyy`. Not calendar-aware: `31-02-2024` passes.
pub fn validate_birthday(value: &str) -> Result<()> {
    parse_birthday(value).map(|_| ())
}

fn parse_birthday(value: &str) -> Result<(u32, u32, i32)> {
    let invalid = || BookError::invalid(Field::Birthday, value);

    let mut tokens = value.split('-');
    let (Some(day), Some(month), Some(year), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(invalid());
    };

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
        return Err(invalid());
    }

    Ok((day, month, year))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    pub fn parse(value: &str) -> Result<Self> {
        validate_name(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used by lookups.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn parse(value: &str) -> Result<Self> {
        validate_phone(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Birthday as entered, plus the parsed day/month/year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Birthday {
    text: String,
    day: u32,
    month: u32,
    year: i32,
}

impl Birthday {
    pub fn parse(value: &str) -> Result<Self> {
        let (day, month, year) = parse_birthday(value)?;
        Ok(Self {
            text: value.to_string(),
            day,
            month,
            year,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The date this birthday falls on in `year`.
    ///
    /// Days past the end of the month (29-02 in a common year, 31-04, ...)
    /// fall back to the month's last day.
    pub fn occurrence_in(&self, year: i32) -> Option<NaiveDate> {
        (1..=self.day)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, self.month, day))
    }
}

macro_rules! text_field {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = BookError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

text_field!(Name);
text_field!(Phone);
text_field!(Birthday);
