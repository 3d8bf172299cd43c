// Contact record — one person's name, phone numbers and optional birthday

use crate::validate::{Birthday, Name, Phone};
use crate::{BookError, Field, Result, Target};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of [`Record::remove_phone`]. A missing phone is a normal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRemoval {
    /// Number of entries removed (duplicates go together)
    Removed(usize),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    name: Name,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
}

impl Record {
    /// Validates the name, and the birthday when one is given.
    pub fn new(name: &str, birthday: Option<&str>) -> Result<Self> {
        let name = Name::parse(name)?;
        let birthday = birthday.map(Birthday::parse).transpose()?;
        Ok(Self {
            name,
            phones: Vec::new(),
            birthday,
        })
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    /// Appends without checking for duplicates.
    pub fn add_phone(&mut self, phone: &str) -> Result<()> {
        let phone = Phone::parse(phone)?;
        self.phones.push(phone);
        Ok(())
    }

    /// Removes every entry equal to `phone`.
    pub fn remove_phone(&mut self, phone: &str) -> Result<PhoneRemoval> {
        let phone = Phone::parse(phone)?;
        let before = self.phones.len();
        self.phones.retain(|p| *p != phone);

        match before - self.phones.len() {
            0 => Ok(PhoneRemoval::NotFound),
            removed => Ok(PhoneRemoval::Removed(removed)),
        }
    }

    /// Replaces the first entry equal to `old`, keeping its position.
    ///
    /// Only `new` is format-checked; `old` is matched as typed.
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<()> {
        let new = Phone::parse(new)?;
        let slot = self
            .phones
            .iter_mut()
            .find(|p| p.as_str() == old)
            .ok_or_else(|| BookError::not_found(Target::Phone, old))?;
        *slot = new;
        Ok(())
    }

    /// Fails on a malformed query instead of reporting "no match".
    pub fn find_phone(&self, phone: &str) -> Result<Option<&Phone>> {
        let phone = Phone::parse(phone)?;
        Ok(self.phones.iter().find(|p| **p == phone))
    }

    pub fn update_birthday(&mut self, value: &str) -> Result<()> {
        self.birthday = Some(Birthday::parse(value)?);
        Ok(())
    }

    /// Days from today (local time) until the next birthday.
    pub fn days_to_birthday(&self) -> Result<i64> {
        self.days_to_birthday_from(Local::now().date_naive())
    }

    /// Days from `today` until the next birthday; 0 when it is today.
    pub fn days_to_birthday_from(&self, today: NaiveDate) -> Result<i64> {
        let birthday = self
            .birthday
            .as_ref()
            .ok_or_else(|| BookError::BirthdayNotSet(self.name.to_string()))?;
        let occurrence = |year: i32| {
            birthday
                .occurrence_in(year)
                .ok_or_else(|| BookError::invalid(Field::Birthday, birthday.as_str()))
        };

        let mut next = occurrence(today.year())?;
        if today > next {
            next = occurrence(today.year() + 1)?;
        }

        Ok((next - today).num_days())
    }

    /// Folds `other` into this record: new phones are appended, a birthday
    /// on `other` replaces ours. Returns the number of phones added.
    pub(crate) fn merge(&mut self, other: Record) -> usize {
        let mut added = 0;
        for phone in other.phones {
            if !self.phones.contains(&phone) {
                self.phones.push(phone);
                added += 1;
            }
        }
        if other.birthday.is_some() {
            self.birthday = other.birthday;
        }
        added
    }

    pub fn to_structural(&self) -> RecordData {
        RecordData {
            name: self.name.to_string(),
            phones: self.phones.iter().map(Phone::to_string).collect(),
            birthday: self.birthday.as_ref().map(Birthday::to_string),
        }
    }

    /// Rebuilds a record, running every validator again.
    pub fn from_structural(data: &RecordData) -> Result<Self> {
        let mut record = Self::new(&data.name, data.birthday.as_deref())?;
        for phone in &data.phones {
            record.add_phone(phone)?;
        }
        Ok(record)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phones: Vec<&str> = self.phones.iter().map(Phone::as_str).collect();
        write!(f, "Contact name: {}, phones: {}", self.name, phones.join("; "))
    }
}

/// Plain persisted shape of a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub name: String,
    pub phones: Vec<String>,
    pub birthday: Option<String>,
}

impl From<&Record> for RecordData {
    fn from(record: &Record) -> Self {
        record.to_structural()
    }
}

impl TryFrom<RecordData> for Record {
    type Error = BookError;

    fn try_from(data: RecordData) -> Result<Self> {
        Record::from_structural(&data)
    }
}
