//! In-memory catalog assembled from all entry files

use std::collections::HashSet;
use std::fs;

use crate::config::CatalogConfig;
use crate::entry::walker::file_name;
use crate::entry::{Entry, EntryScanner, EntryWalker};
use crate::error::{CatalogError, Result};

/// All parsed entries of one maintenance run
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    /// Builds a catalog from already parsed entries; file names must be unique
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.file.as_str()) {
                return Err(CatalogError::malformed(
                    entry.file.clone(),
                    "duplicate entry file in catalog",
                ));
            }
        }
        Ok(Self { entries })
    }

    /// Parses every entry file of the configured entries directory.
    ///
    /// The first malformed entry aborts the whole aggregation.
    pub fn assemble(config: &CatalogConfig) -> Result<Self> {
        let walker = EntryWalker::new(config.listing_prefix.clone());
        let scanner = EntryScanner::new(config.valid_states.clone());
        let files = walker.walk(&config.entries_path())?;
        tracing::debug!("Found {} entry files", files.len());

        let mut entries = Vec::with_capacity(files.len());
        for path in &files {
            let name = file_name(path).ok_or_else(|| {
                CatalogError::malformed(path.display().to_string(), "file name is not UTF-8")
            })?;
            let content = fs::read_to_string(path)?;
            entries.push(scanner.parse(name, &content)?);
        }

        tracing::info!("Assembled catalog with {} entries", entries.len());
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entries carrying `keyword` anywhere in their keyword list
    pub fn with_keyword(&self, keyword: &str) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.has_keyword(keyword)).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
