//! Category listings and the index block of the overview document

use std::fs;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::entry::{Entry, EntryWalker};
use crate::error::{CatalogError, Result};
use crate::text::{capitalize, casefold_cmp, write_text};

/// First line of every generated listing
pub const LISTING_HEADER: &str = "[comment]: # (autogenerated content, do not edit)";
/// Opens the generated block in the overview document
pub const INDEX_START: &str = "[comment]: # (start of autogenerated content, do not edit)";
/// Closes the generated block in the overview document
pub const INDEX_END: &str = "[comment]: # (end of autogenerated content)";

const ALL_TITLE: &str = "All";

/// One listing to generate
#[derive(Debug, Clone)]
pub struct Listing<'c> {
    pub title: String,
    pub file_name: String,
    /// Fragment used when linking from the overview
    pub anchor: String,
    pub entries: Vec<&'c Entry>,
}

/// Renders a listing document; bullets are ordered case-insensitively by name
pub fn render_listing(title: &str, entries: &[&Entry]) -> String {
    let mut sorted: Vec<&Entry> = entries.to_vec();
    sorted.sort_by(|a, b| casefold_cmp(&a.name, &b.name).then_with(|| a.file.cmp(&b.file)));

    let rows: Vec<String> = sorted.iter().map(|entry| render_row(entry)).collect();
    format!("{}\n# {}\n\n{}", LISTING_HEADER, title, rows.join("\n"))
}

fn render_row(entry: &Entry) -> String {
    let details: Vec<&str> = entry
        .code_language
        .iter()
        .chain(&entry.code_license)
        .chain(&entry.state)
        .map(String::as_str)
        .collect();
    format!(
        "- **[{}]({})** ({})",
        entry.name,
        entry.file,
        details.join(", ")
    )
}

/// Replaces the content between the index sentinels of `document`.
///
/// Text outside the sentinels is preserved byte for byte.
pub fn splice_index(document_name: &str, document: &str, block: &str) -> Result<String> {
    let starts = document.matches(INDEX_START).count();
    let ends = document.matches(INDEX_END).count();
    if starts != 1 || ends != 1 {
        return Err(CatalogError::structure(
            document_name,
            format!(
                "expected one autogenerated block, found {} start and {} end markers",
                starts, ends
            ),
        ));
    }

    let start = document.find(INDEX_START).unwrap_or_default();
    let end = document.find(INDEX_END).unwrap_or_default();
    if end < start {
        return Err(CatalogError::structure(
            document_name,
            "end marker precedes start marker",
        ));
    }

    let before = &document[..start];
    let after = &document[end + INDEX_END.len()..];
    Ok(format!(
        "{}{}\n{}\n{}{}",
        before, INDEX_START, block, INDEX_END, after
    ))
}

pub struct TocBuilder<'a> {
    config: &'a CatalogConfig,
    walker: EntryWalker,
}

impl<'a> TocBuilder<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self {
            config,
            walker: EntryWalker::new(config.listing_prefix.clone()),
        }
    }

    /// Deletes every generated listing file, returning how many were removed
    pub fn clear_listings(&self) -> Result<usize> {
        let listings = self.walker.listings(&self.config.entries_path())?;
        for path in &listings {
            fs::remove_file(path)?;
        }
        tracing::debug!("Removed {} listing files", listings.len());
        Ok(listings.len())
    }

    /// Renders `subset` and writes it as `output_name` in the entries directory
    pub fn build_listing(&self, title: &str, output_name: &str, subset: &[&Entry]) -> Result<()> {
        let path = self.config.entries_path().join(output_name);
        write_text(&path, &render_listing(title, subset))
    }

    /// The "All" listing followed by one listing per recommended keyword
    pub fn listings<'c>(&self, catalog: &'c Catalog) -> Vec<Listing<'c>> {
        let prefix = &self.config.listing_prefix;
        let mut listings = vec![Listing {
            title: ALL_TITLE.to_string(),
            file_name: format!("{}all.md", prefix),
            anchor: ALL_TITLE.to_string(),
            entries: catalog.iter().collect(),
        }];

        for keyword in &self.config.recommended_keywords {
            let name = keyword.replace(' ', "-");
            listings.push(Listing {
                title: capitalize(keyword),
                file_name: format!("{}{}.md", prefix, name),
                anchor: name,
                entries: catalog.with_keyword(keyword),
            });
        }

        listings
    }

    fn summary(&self, listing: &Listing<'_>) -> String {
        format!(
            "**[{}]({}/{}#{})** ({})",
            listing.title,
            self.config.entries_dir,
            listing.file_name,
            listing.anchor,
            listing.entries.len()
        )
    }

    /// Index block: "All" first, then category summaries sorted by title
    pub fn render_index_block(&self, listings: &[Listing<'_>]) -> String {
        let Some((all, categories)) = listings.split_first() else {
            return String::new();
        };
        let mut summaries: Vec<String> = categories.iter().map(|l| self.summary(l)).collect();
        summaries.sort();
        summaries.insert(0, self.summary(all));
        format!("{}\n", summaries.join(", "))
    }

    /// Regenerates all listing files and the overview index block
    pub fn update_master_index(&self, catalog: &Catalog) -> Result<()> {
        let overview_path = self.config.resolve(&self.config.overview_file);
        let overview = fs::read_to_string(&overview_path)?;
        let listings = self.listings(catalog);
        let updated = splice_index(
            &overview_path.display().to_string(),
            &overview,
            &self.render_index_block(&listings),
        )?;

        self.clear_listings()?;
        for listing in &listings {
            self.build_listing(&listing.title, &listing.file_name, &listing.entries)?;
        }

        if updated != overview {
            write_text(&overview_path, &updated)?;
        }
        tracing::info!(
            "Updated overview and {} listing files",
            listings.len()
        );
        Ok(())
    }
}
