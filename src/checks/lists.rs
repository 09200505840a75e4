use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::text::{sort_casefold, write_text};

/// Deduplicated, case-insensitively sorted non-blank lines
pub fn sorted_items(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut items: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| seen.insert(*line))
        .map(String::from)
        .collect();
    sort_casefold(&mut items);
    items
}

/// Sorts one flat list file in place, returning its item count
pub fn sort_list_file(path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path)?;
    let items = sorted_items(&text);

    let mut output = items.join("\n");
    if !items.is_empty() {
        output.push('\n');
    }
    if output != text {
        write_text(path, &output)?;
    }
    Ok(items.len())
}

/// Sorts every configured list file; missing files are skipped
pub fn sort_list_files(config: &CatalogConfig) -> Result<()> {
    for list in &config.list_files {
        let path = config.resolve(list);
        if !path.exists() {
            tracing::warn!("List file {} not found", path.display());
            continue;
        }
        let count = sort_list_file(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("{} contains {} items", name, count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sorted_items() {
        assert_eq!(
            sorted_items("zeta\nAlpha\n\nbeta\nzeta\r\nalpha\n"),
            vec!["Alpha", "alpha", "beta", "zeta"]
        );
    }

    #[test]
    fn test_sort_list_file_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("backlog.txt");
        fs::write(&path, "https://b.org\nhttps://A.org\nhttps://b.org\n\n").unwrap();

        let count = sort_list_file(&path).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "https://A.org\nhttps://b.org\n"
        );
        assert_eq!(sort_list_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_sort_list_files_skips_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = CatalogConfig::with_root(temp_dir.path());
        config.list_files = vec!["tools/missing.txt".into(), "tools/rejected.txt".into()];
        fs::create_dir_all(temp_dir.path().join("tools")).unwrap();
        fs::write(temp_dir.path().join("tools/rejected.txt"), "b\na\n").unwrap();

        sort_list_files(&config).unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("tools/rejected.txt")).unwrap(),
            "a\nb\n"
        );
    }
}
