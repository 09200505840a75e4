use std::fs;

use crate::config::CatalogConfig;
use crate::entry::walker::file_name;
use crate::entry::EntryWalker;
use crate::error::{CatalogError, Result};

/// Template lines that must not survive in a filled-in entry
pub fn leftover_candidates(template: &str) -> Vec<&str> {
    template
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with("##"))
        .collect()
}

/// First candidate line contained in `content`
pub fn find_leftover<'t>(content: &str, candidates: &[&'t str]) -> Option<&'t str> {
    candidates.iter().copied().find(|c| content.contains(c))
}

/// Fails on the first entry that still contains an unfilled template line.
///
/// A missing template file is skipped with a warning.
pub fn check_template_leftovers(config: &CatalogConfig) -> Result<()> {
    let template_path = config.resolve(&config.template_file);
    if !template_path.exists() {
        tracing::warn!(
            "Template {} not found, skipping leftover check",
            template_path.display()
        );
        return Ok(());
    }

    let template = fs::read_to_string(&template_path)?;
    let candidates = leftover_candidates(&template);
    let walker = EntryWalker::new(config.listing_prefix.clone());

    for path in walker.walk(&config.entries_path())? {
        let content = fs::read_to_string(&path)?;
        if let Some(leftover) = find_leftover(&content, &candidates) {
            return Err(CatalogError::TemplateLeftover {
                file: file_name(&path).unwrap_or_default().to_string(),
                leftover: leftover.to_string(),
            });
        }
    }

    tracing::debug!("No template leftovers found");
    Ok(())
}
