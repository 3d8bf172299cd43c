// Address book — in-memory contact store with whole-file JSON persistence
//
// Records are kept in insertion order; the name string is the key.

use crate::record::{Record, RecordData};
use crate::{BookError, Result, Target};
use std::path::Path;
use std::slice::Chunks;
use tracing::{debug, info, warn};

/// Result of [`AddressBook::add_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// Merged into an existing contact; carries the number of new phones.
    Merged(usize),
}

/// Result of [`AddressBook::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// No file at the path yet; nothing was changed.
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    records: Vec<Record>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name().as_str() == key)
    }

    /// Inserts a new contact, or merges into the one with the same name.
    pub fn add_record(&mut self, record: Record) -> AddOutcome {
        match self.position(record.name().as_str()) {
            Some(idx) => {
                let existing = &mut self.records[idx];
                let added = existing.merge(record);
                debug!(name = %existing.name(), added, "Merged into existing contact");
                AddOutcome::Merged(added)
            }
            None => {
                debug!(name = %record.name(), "Added contact");
                self.records.push(record);
                AddOutcome::Inserted
            }
        }
    }

    /// Case-insensitive lookup by full name.
    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name().matches(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.name().matches(name))
    }

    /// Removes a contact by its exact name.
    pub fn delete(&mut self, name: &str) -> Result<Record> {
        let idx = self
            .position(name)
            .ok_or_else(|| BookError::not_found(Target::Contact, name))?;
        debug!(name, "Deleted contact");
        Ok(self.records.remove(idx))
    }

    /// Drops every contact, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    /// Contacts whose name contains `query` (ignoring case) or that have a
    /// phone containing it.
    pub fn search(&self, query: &str) -> Vec<&Record> {
        let query_lower = query.to_lowercase();

        self.records
            .iter()
            .filter(|record| {
                record.name().as_str().to_lowercase().contains(&query_lower)
                    || record
                        .phones()
                        .iter()
                        .any(|p| p.as_str().contains(&query_lower))
            })
            .collect()
    }

    /// Pages of at most `page_size` records in store order. A page size of
    /// zero is treated as one.
    pub fn pages(&self, page_size: usize) -> Chunks<'_, Record> {
        self.records.chunks(page_size.max(1))
    }

    pub fn to_structural(&self) -> Vec<RecordData> {
        self.records.iter().map(Record::to_structural).collect()
    }

    /// Writes every record to `path` as JSON, replacing the file.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let data = self.to_structural();
        let contents =
            serde_json::to_string_pretty(&data).map_err(|source| BookError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        std::fs::write(path, contents).map_err(|source| BookError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), count = data.len(), "Address book saved");
        Ok(data.len())
    }

    /// Replaces the whole book with the contents of `path`.
    ///
    /// The file is parsed and validated before anything is replaced, so a
    /// failed load leaves the current contacts in place. A missing file is
    /// reported as [`LoadOutcome::Missing`].
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Address book file not found, starting new");
                return Ok(LoadOutcome::Missing);
            }
            Err(source) => {
                return Err(BookError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let data: Vec<RecordData> =
            serde_json::from_str(&contents).map_err(|source| BookError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;

        let mut records: Vec<Record> = Vec::with_capacity(data.len());
        for item in &data {
            let record = Record::from_structural(item)?;
            // Later entries win on a repeated name
            match records.iter().position(|r| r.name() == record.name()) {
                Some(idx) => records[idx] = record,
                None => records.push(record),
            }
        }

        self.records = records;
        info!(path = %path.display(), count = self.records.len(), "Address book loaded");
        Ok(LoadOutcome::Loaded(self.records.len()))
    }
}

impl<'a> IntoIterator for &'a AddressBook {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
