// Contactbook Core — contact records, validation and the address book store
//
// Everything here is synchronous and owned by a single caller. Prompts,
// paging UI and output formatting live in the CLI crate.

pub mod book;
pub mod record;
pub mod validate;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use book::{AddOutcome, AddressBook, LoadOutcome};
pub use record::{PhoneRemoval, Record, RecordData};
pub use validate::{validate_birthday, validate_name, validate_phone, Birthday, Name, Phone};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Which contact field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Birthday,
}

impl Field {
    /// Human-readable rule for the field, used in error messages.
    pub fn rule(&self) -> &'static str {
        match self {
            Field::Name => "only letters, digits and spaces are allowed",
            Field::Phone => "phone number must be 10 digits",
            Field::Birthday => "date must be in dd-mm-yyyy format",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Birthday => "birthday",
        };
        f.write_str(name)
    }
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Contact,
    Phone,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Contact => f.write_str("Contact"),
            Target::Phone => f.write_str("Phone number"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Invalid {field} {value:?}: {}", .field.rule())]
    InvalidFormat { field: Field, value: String },
    #[error("{target} {key} not found")]
    NotFound { target: Target, key: String },
    #[error("Birthday is not set for {0}")]
    BirthdayNotSet(String),
    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse address book {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl BookError {
    pub(crate) fn invalid(field: Field, value: &str) -> Self {
        BookError::InvalidFormat {
            field,
            value: value.to_string(),
        }
    }

    pub fn not_found(target: Target, key: &str) -> Self {
        BookError::NotFound {
            target,
            key: key.to_string(),
        }
    }

    /// True for the recoverable "target absent" kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound { .. })
    }

    /// True when a name, phone or birthday failed its rule.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, BookError::InvalidFormat { .. })
    }
}

pub type Result<T, E = BookError> = std::result::Result<T, E>;
