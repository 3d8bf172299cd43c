// Address book commands shared by one-shot mode and the interactive shell

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use contactbook_core::{AddOutcome, AddressBook, BookError, PhoneRemoval, Record, Target};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BookCommand {
    /// Add a contact, or add a phone (and birthday) to an existing one
    Add {
        name: String,
        phone: String,
        /// Birthday as dd-mm-yyyy
        birthday: Option<String>,
    },
    /// Change one of a contact's phone numbers
    Change {
        name: String,
        old_phone: String,
        new_phone: String,
    },
    /// Show all phone numbers of a contact
    Phone { name: String },
    /// Days until a contact's birthday
    When { name: String },
    /// Set or update a contact's birthday
    Birthday { name: String, date: String },
    /// Remove a phone number from a contact
    Remove { name: String, phone: String },
    /// Delete a contact
    Delete { name: String },
    /// Search contacts by name or phone
    Search { query: String },
    /// Show all contacts
    Show,
    /// Delete all contacts
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Text produced by a command, and whether the book changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    pub changed: bool,
}

impl Reply {
    fn read(message: String) -> Self {
        Self {
            message,
            changed: false,
        }
    }

    fn changed(message: String) -> Self {
        Self {
            message,
            changed: true,
        }
    }
}

pub fn execute(book: &mut AddressBook, command: &BookCommand) -> Result<Reply> {
    match command {
        BookCommand::Add {
            name,
            phone,
            birthday,
        } => {
            let mut record = Record::new(name, birthday.as_deref())?;
            record.add_phone(phone)?;

            let message = match book.add_record(record) {
                AddOutcome::Inserted => match birthday {
                    Some(date) => format!(
                        "{} Contact {} with number {} and birthday {} saved.",
                        "✓".green(),
                        name.bright_cyan(),
                        phone,
                        date
                    ),
                    None => format!(
                        "{} Contact {} with number {} saved.",
                        "✓".green(),
                        name.bright_cyan(),
                        phone
                    ),
                },
                AddOutcome::Merged(_) => format!(
                    "{} Information added to existing contact: {}",
                    "✓".green(),
                    name.bright_cyan()
                ),
            };
            Ok(Reply::changed(message))
        }

        BookCommand::Change {
            name,
            old_phone,
            new_phone,
        } => {
            let record = find_mut(book, name)?;
            record.edit_phone(old_phone, new_phone)?;
            Ok(Reply::changed(format!(
                "{} Phone {} changed to {}",
                "✓".green(),
                old_phone,
                new_phone
            )))
        }

        BookCommand::Phone { name } => {
            let record = find(book, name)?;
            Ok(Reply::read(format!(
                "Phone numbers for {}: {}",
                name.bright_cyan(),
                phone_list(record)
            )))
        }

        BookCommand::When { name } => {
            let days = find(book, name)?.days_to_birthday()?;
            Ok(Reply::read(format!(
                "Days until birthday for {}: {} days.",
                name.bright_cyan(),
                days
            )))
        }

        BookCommand::Birthday { name, date } => {
            find_mut(book, name)?.update_birthday(date)?;
            Ok(Reply::changed(format!(
                "{} Birthday for {} updated to {}.",
                "✓".green(),
                name.bright_cyan(),
                date
            )))
        }

        BookCommand::Remove { name, phone } => {
            let record = find_mut(book, name)?;
            let contact = record.name().to_string();
            match record.remove_phone(phone)? {
                PhoneRemoval::Removed(_) => Ok(Reply::changed(format!(
                    "{} Phone {} removed from contact {}.",
                    "✓".green(),
                    phone,
                    contact.bright_cyan()
                ))),
                PhoneRemoval::NotFound => Ok(Reply::read(format!(
                    "Phone number {} not found in contact {}.",
                    phone,
                    contact.bright_cyan()
                ))),
            }
        }

        BookCommand::Delete { name } => {
            book.delete(name)?;
            Ok(Reply::changed(format!(
                "{} Contact {} deleted.",
                "✓".green(),
                name.bright_cyan()
            )))
        }

        BookCommand::Search { query } => {
            let results = book.search(query);
            if results.is_empty() {
                return Ok(Reply::read(format!(
                    "{}",
                    format!("No results found for '{}'.", query).dimmed()
                )));
            }

            let mut message = format!("{} for '{}':", "Search results".bold(), query);
            for record in results {
                message.push('\n');
                message.push_str(&format_record(record));
            }
            Ok(Reply::read(message))
        }

        BookCommand::Show => {
            if book.is_empty() {
                return Ok(Reply::read(empty_message()));
            }

            let mut message = format!("{} ({} total)", "All contacts".bold(), book.len());
            for record in book.iter() {
                message.push('\n');
                message.push_str(&format_record(record));
            }
            Ok(Reply::read(message))
        }

        BookCommand::Clear { yes } => {
            if !yes {
                return Ok(Reply::read("Removal canceled".to_string()));
            }
            let count = book.clear();
            Ok(Reply::changed(format!(
                "{} All contacts cleared ({} removed).",
                "✓".green(),
                count
            )))
        }
    }
}

fn find<'a>(book: &'a AddressBook, name: &str) -> Result<&'a Record, BookError> {
    book.find(name).ok_or_else(|| BookError::not_found(Target::Contact, name))
}

fn find_mut<'a>(book: &'a mut AddressBook, name: &str) -> Result<&'a mut Record, BookError> {
    book.find_mut(name).ok_or_else(|| BookError::not_found(Target::Contact, name))
}

fn phone_list(record: &Record) -> String {
    record
        .phones()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn empty_message() -> String {
    format!("{}", "Contact list is empty".dimmed())
}

/// Multi-line block used by `show` and `search`.
pub fn format_record(record: &Record) -> String {
    let birthday = record
        .birthday()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "None".to_string());

    format!(
        "{} {}:\n    Phone numbers: {}\n    Birthday: {}",
        "•".bright_green(),
        record.name().as_str().bright_cyan(),
        phone_list(record),
        birthday
    )
}

/// One page of the listing, with a `Page n/total` header.
pub fn format_page(page: &[Record], number: usize, total: usize) -> String {
    let mut out = format!("{}", format!("Page {}/{}:", number, total).bold());
    for record in page {
        out.push('\n');
        out.push_str(&format_record(record));
    }
    out
}
