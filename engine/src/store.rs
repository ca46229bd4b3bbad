//! Record store - a flat JSON file holding an ordered sequence of records.
//!
//! The store is the unit of persistence: a whole sequence is loaded or saved
//! at once. Saves go through a temporary file in the target directory that is
//! renamed over the target, so a reader sees either the old or the new content.

use crate::{error::Result, record, Error, Record};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension every store path must carry (matched case-insensitively).
pub const STORE_EXTENSION: &str = ".json";

/// Outcome of [`RecordStore::load_if_present`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and its records replaced the in-memory sequence.
    Loaded,
    /// No file exists yet; the store was reset to empty.
    Missing,
}

/// Maps one file path to an ordered sequence of records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    path: Option<PathBuf>,
    records: Vec<Record>,
}

impl RecordStore {
    /// Create a store with no path and no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store bound to `path`.
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.set_path(path)?;
        Ok(store)
    }

    /// Bind the store to a file path.
    ///
    /// The path must not name an existing directory and must end in
    /// [`STORE_EXTENSION`]. Once set, the path cannot be changed.
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(current) = &self.path {
            return Err(Error::invalid_path(
                path,
                format!("store is already bound to '{}'", current.display()),
            ));
        }
        if path.is_dir() {
            return Err(Error::invalid_path(path, "path should be a file"));
        }
        if !has_store_extension(path) {
            return Err(Error::invalid_path(
                path,
                format!("path must end with '{}'", STORE_EXTENSION),
            ));
        }

        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// The bound path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All records in store order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replace the in-memory records without touching the file.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Append one record in memory.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Append records in memory.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }

    /// Drop all in-memory records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load the file content, replacing the in-memory records.
    pub fn load(&mut self) -> Result<()> {
        let path = self.require_path()?;
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::UnexpectedResult(format!(
                "unable to read '{}': {}",
                path.display(),
                e
            )),
        })?;

        self.records = decode(&content)?;
        Ok(())
    }

    /// Like [`load`](Self::load), but a missing file resets the store to
    /// empty instead of failing. Every other error still propagates.
    pub fn load_if_present(&mut self) -> Result<LoadOutcome> {
        match self.load() {
            Ok(()) => Ok(LoadOutcome::Loaded),
            Err(e) if e.is_absence() => {
                self.records.clear();
                Ok(LoadOutcome::Missing)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the in-memory records.
    pub fn save(&self) -> Result<()> {
        self.write(&self.records)
    }

    /// Persist `records`, then adopt them in memory.
    ///
    /// When the write fails both the file and the in-memory records are
    /// left as they were.
    pub fn replace(&mut self, records: Vec<Record>) -> Result<()> {
        self.write(&records)?;
        self.records = records;
        Ok(())
    }

    /// First record, in store order, matching every entry of `fields`.
    ///
    /// See [`record::matches`] for the matching rule.
    pub fn find_item(&self, fields: &Record) -> Result<Option<&Record>> {
        if fields.is_empty() {
            return Err(Error::UnexpectedValue(
                "please inform something to search".into(),
            ));
        }
        Ok(self.records.iter().find(|r| record::matches(r, fields)))
    }

    /// Like [`find_item`](Self::find_item), but returns an empty record when
    /// nothing matches.
    ///
    /// An empty result cannot be told apart from a stored record that is
    /// itself empty; use `find_item` when that matters.
    pub fn search_item(&self, fields: &Record) -> Result<Record> {
        Ok(self.find_item(fields)?.cloned().unwrap_or_default())
    }

    /// Every record matching `fields`, in store order.
    ///
    /// Empty `fields` selects the whole store.
    pub fn search_all(&self, fields: &Record) -> Vec<&Record> {
        if fields.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| record::matches(r, fields))
            .collect()
    }

    fn require_path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| Error::WorthlessVariable("empty store path, nothing to load".into()))
    }

    fn write(&self, records: &[Record]) -> Result<()> {
        let path = self.require_path()?;
        let dir = parent_dir(path);
        check_writable(dir)?;

        let content = encode(records)?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => Error::UnwritablePath(dir.to_path_buf()),
            _ => Error::UnexpectedResult(format!("unable to stage write: {}", e)),
        })?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| Error::UnexpectedResult(format!("unable to write records: {}", e)))?;
        file.persist(path).map_err(|e| {
            Error::UnexpectedResult(format!(
                "unable to replace '{}': {}",
                path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}

fn has_store_extension(path: &Path) -> bool {
    path.to_string_lossy()
        .to_lowercase()
        .ends_with(STORE_EXTENSION)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn check_writable(dir: &Path) -> Result<()> {
    let writable = fs::metadata(dir)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false);
    if writable {
        Ok(())
    } else {
        Err(Error::UnwritablePath(dir.to_path_buf()))
    }
}

/// Decode file content into records.
///
/// Blank content, `[]` and `{}` all mean "no records". Any other
/// object-shaped document is rejected, as is an array holding non-objects.
fn decode(content: &str) -> Result<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_str(content)
        .map_err(|e| Error::UnexpectedResult(format!("unable to decode records: {}", e)))?;

    match document {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::UnexpectedResult(format!(
                    "item {} is {}, expected object",
                    index,
                    record::kind_of(&other)
                ))),
            })
            .collect(),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => Err(Error::UnexpectedResult(format!(
            "expected an array of records, got {}",
            record::kind_of(&other)
        ))),
    }
}

fn encode(records: &[Record]) -> Result<String> {
    serde_json::to_string(records)
        .map_err(|e| Error::UnexpectedResult(format!("unable to encode records: {}", e)))
}
