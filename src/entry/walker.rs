use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

const ENTRY_EXTENSION: &str = "md";

/// Enumerates entry files and generated listing files in the entries directory.
///
/// Only the top level is scanned. Files starting with the listing prefix are
/// generated and never treated as entries.
pub struct EntryWalker {
    listing_prefix: String,
}

impl EntryWalker {
    pub fn new(listing_prefix: impl Into<String>) -> Self {
        Self {
            listing_prefix: listing_prefix.into(),
        }
    }

    /// Entry files sorted by file name
    pub fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.collect(dir, |path| self.is_entry(path))
    }

    /// Generated listing files sorted by file name
    pub fn listings(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.collect(dir, |path| self.is_listing(path))
    }

    fn collect(&self, dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && keep(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn is_entry(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .map(|e| e == ENTRY_EXTENSION)
            .unwrap_or(false);
        has_extension && !self.is_listing(path) && !is_hidden(path)
    }

    pub fn is_listing(&self, path: &Path) -> bool {
        file_name(path)
            .map(|n| n.starts_with(&self.listing_prefix))
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    file_name(path).map(|n| n.starts_with('.')).unwrap_or(false)
}

/// File name as UTF-8, if representable
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_walker() -> EntryWalker {
        EntryWalker::new("_")
    }

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_walk_finds_entries_sorted() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "zeta.md", "# Zeta");
        create_file(temp_dir.path(), "alpha.md", "# Alpha");

        let files = create_walker().walk(temp_dir.path()).unwrap();

        let names: Vec<_> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["alpha.md", "zeta.md"]);
    }

    #[test]
    fn test_walk_skips_listings_and_other_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "alpha.md", "# Alpha");
        create_file(temp_dir.path(), "_all.md", "listing");
        create_file(temp_dir.path(), "notes.txt", "text");
        create_file(temp_dir.path(), ".hidden.md", "# Hidden");

        let files = create_walker().walk(temp_dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(file_name(&files[0]), Some("alpha.md"));
    }

    #[test]
    fn test_walk_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "alpha.md", "# Alpha");
        create_file(temp_dir.path(), "sub/beta.md", "# Beta");

        let files = create_walker().walk(temp_dir.path()).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_listings() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "alpha.md", "# Alpha");
        create_file(temp_dir.path(), "_all.md", "listing");
        create_file(temp_dir.path(), "_action.md", "listing");

        let files = create_walker().listings(temp_dir.path()).unwrap();

        let names: Vec<_> = files.iter().filter_map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["_action.md", "_all.md"]);
    }

    #[test]
    fn test_walk_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(create_walker().walk(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_walk_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(create_walker().walk(temp_dir.path()).unwrap().is_empty());
    }
}
