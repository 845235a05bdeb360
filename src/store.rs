//! Append-only submission store
//!
//! Storage is the single owner of the submission list: every call reads
//! through, nothing is cached in memory. Records are kept as raw JSON values
//! so entries this build cannot decode are written back untouched.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::config::{CorruptPolicy, FormConfig};
use crate::consts::{EXPORT_MIME, EXPORT_PREFIX};
use crate::storage::{KeyValueStore, StorageError};
use crate::submission::Submission;

/// Submission store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Stored text is not a JSON array of submissions
    #[error("stored submissions under '{key}' are unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode submissions: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A downloadable export of all submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// `contact_submissions_<YYYY-MM-DD>.json`
    pub filename: String,
    pub mime: &'static str,
    /// Pretty-printed JSON array
    pub contents: String,
    /// Number of records in `contents`
    pub count: usize,
}

impl ExportFile {
    pub fn filename_for(date: NaiveDate) -> String {
        format!("{}{}.json", EXPORT_PREFIX, date.format("%Y-%m-%d"))
    }
}

/// Submission list persisted under one storage key
#[derive(Debug, Clone)]
pub struct SubmissionStore<K> {
    storage: K,
    key: String,
    on_corrupt: CorruptPolicy,
}

impl<K: KeyValueStore> SubmissionStore<K> {
    pub fn new(storage: K, config: &FormConfig) -> Self {
        Self {
            storage,
            key: config.storage_key.clone(),
            on_corrupt: config.on_corrupt,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Every stored record as raw JSON, oldest first.
    ///
    /// A missing key or a JSON `null` is an empty list. Text that is not a
    /// JSON array is handled per [`CorruptPolicy`].
    pub fn load_records(&self) -> Result<Vec<Value>, StoreError> {
        let Some(json) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<Value>>>(&json) {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(source) => match self.on_corrupt {
                CorruptPolicy::TreatAsEmpty => {
                    log::warn!(
                        "Stored submissions under '{}' are unreadable, treating as empty: {}",
                        self.key,
                        source
                    );
                    Ok(Vec::new())
                }
                CorruptPolicy::Report => Err(StoreError::Corrupt {
                    key: self.key.clone(),
                    source,
                }),
            },
        }
    }

    /// Stored submissions that decode, oldest first.
    ///
    /// Records in another shape are skipped with a warning. They stay in
    /// storage and are still counted, appended around and exported.
    pub fn load(&self) -> Result<Vec<Submission>, StoreError> {
        let records = self.load_records()?;
        let submissions = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(submission) => Some(submission),
                Err(e) => {
                    log::warn!("Skipping stored record {} under '{}': {}", i, self.key, e);
                    None
                }
            })
            .collect();
        Ok(submissions)
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load_records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Append one submission and write the whole list back.
    ///
    /// Returns the new number of stored submissions. The read-modify-write
    /// is not atomic across tabs.
    pub fn append(&self, submission: &Submission) -> Result<usize, StoreError> {
        let mut records = self.load_records()?;
        records.push(serde_json::to_value(submission).map_err(StoreError::Encode)?);
        let json = serde_json::to_string(&records).map_err(StoreError::Encode)?;
        self.storage.set_item(&self.key, &json)?;
        Ok(records.len())
    }

    /// Erase every stored submission
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)?;
        log::info!("Cleared stored submissions under '{}'", self.key);
        Ok(())
    }

    /// Pretty-printed export of everything stored, `None` when empty
    pub fn export(&self, date: NaiveDate) -> Result<Option<ExportFile>, StoreError> {
        let records = self.load_records()?;
        if records.is_empty() {
            return Ok(None);
        }

        let contents = serde_json::to_string_pretty(&records).map_err(StoreError::Encode)?;
        Ok(Some(ExportFile {
            filename: ExportFile::filename_for(date),
            mime: EXPORT_MIME,
            contents,
            count: records.len(),
        }))
    }
}
