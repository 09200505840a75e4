//! JSON exports of the catalog
//!
//! The table export feeds the dynamic table of the web site. The archive
//! export lists primary repositories by version control system for local
//! mirroring.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::entry::{strip_annotations, Entry};
use crate::error::Result;
use crate::text::{casefold_cmp, shorten, write_text};

pub const TABLE_HEADINGS: [&str; 6] = ["Game", "Description", "Download", "State", "Keywords", "Source"];

const DESCRIPTION_WIDTH: usize = 60;
const DESCRIPTION_PLACEHOLDER: &str = "..";

/// Table document for client-side display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableExport {
    pub headings: Vec<String>,
    pub data: Vec<Vec<String>>,
}

/// Version control system of a repository URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vcs {
    Git,
    Svn,
    Hg,
    Bzr,
}

const GIT_SERVICES: &[&str] = &[
    "https://git.tuxfamily.org/",
    "http://git.pond.sub.org/",
    "https://gitorious.org/",
    "https://git.code.sf.net/p/",
];

impl Vcs {
    /// Classifies `url` by fixed prefix and suffix rules, trying git, svn, hg
    /// and bzr in that order
    pub fn classify(url: &str) -> Option<Vcs> {
        let is_http = url.starts_with("https://") || url.starts_with("http://");

        if (is_http && url.ends_with(".git")) || GIT_SERVICES.iter().any(|s| url.starts_with(s)) {
            Some(Vcs::Git)
        } else if (url.starts_with("https://svn.code.sf.net/p/") && url.ends_with("/code/"))
            || url.starts_with("http://svn.uktrainsim.com/svn/")
            || url == "https://rpg.hamsterrepublic.com/source/wip"
        {
            Some(Vcs::Svn)
        } else if (url.starts_with("https://bitbucket.org/") && !url.ends_with(".git"))
            || url.starts_with("http://hg.")
        {
            Some(Vcs::Hg)
        } else if url.starts_with("https://code.launchpad.net/") {
            Some(Vcs::Bzr)
        } else {
            None
        }
    }
}

/// Primary repositories grouped by version control system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryArchive {
    pub git: BTreeSet<String>,
    pub svn: BTreeSet<String>,
    pub hg: BTreeSet<String>,
    pub bzr: BTreeSet<String>,
}

impl RepositoryArchive {
    fn insert(&mut self, vcs: Vcs, url: String) {
        match vcs {
            Vcs::Git => self.git.insert(url),
            Vcs::Svn => self.svn.insert(url),
            Vcs::Hg => self.hg.insert(url),
            Vcs::Bzr => self.bzr.insert(url),
        };
    }

    pub fn len(&self) -> usize {
        self.git.len() + self.svn.len() + self.hg.len() + self.bzr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entry whose repository field needs manual follow-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnclassifiedRepository {
    pub name: String,
    pub raw: String,
    /// Considered URLs that matched no rule
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryClassification {
    pub archive: RepositoryArchive,
    /// No considered URL could be classified
    pub unconsumed: Vec<UnclassifiedRepository>,
    /// Some URLs were classified, at least one secondary one was not
    pub partially_classified: Vec<UnclassifiedRepository>,
}

/// URLs considered for archiving: the first one plus all marked with `(+)`
fn considered_repositories(raw: &str) -> Vec<String> {
    raw.split(',')
        .enumerate()
        .filter(|(i, token)| *i == 0 || token.contains("(+)"))
        .map(|(_, token)| strip_annotations(token))
        .collect()
}

pub fn classify_repositories(catalog: &Catalog) -> RepositoryClassification {
    let mut result = RepositoryClassification::default();

    for entry in catalog {
        let Some(raw) = entry.code_repository_raw.as_deref() else {
            continue;
        };

        let mut consumed = false;
        let mut unmatched = Vec::new();
        if !raw.trim().is_empty() {
            for url in considered_repositories(raw) {
                match Vcs::classify(&url) {
                    Some(vcs) => {
                        result.archive.insert(vcs, url);
                        consumed = true;
                    }
                    None => unmatched.push(url),
                }
            }
        }

        let report = UnclassifiedRepository {
            name: entry.name.clone(),
            raw: raw.to_string(),
            urls: unmatched,
        };
        if !consumed {
            result.unconsumed.push(report);
        } else if !report.urls.is_empty() {
            result.partially_classified.push(report);
        }
    }

    result
}

/// First repository of each entry when it is a git repository, sorted
pub fn git_repositories(catalog: &Catalog) -> Vec<String> {
    let urls: BTreeSet<String> = catalog
        .iter()
        .filter_map(|e| e.code_repository.first())
        .filter(|url| Vcs::classify(url) == Some(Vcs::Git))
        .cloned()
        .collect();
    urls.into_iter().collect()
}

/// Serializes with one-space indentation
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    write_text(path, &to_json(value)?)
}

pub struct CatalogExporter<'a> {
    config: &'a CatalogConfig,
}

impl<'a> CatalogExporter<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    fn name_cell(&self, entry: &Entry) -> String {
        let entry_link = format!(
            "<a href=\"{}{}\">entry</a>",
            self.config.entry_base_url, entry.file
        );
        match entry.home.first() {
            Some(home) => format!(
                "{} (<a href=\"{}\">home</a>, {})",
                entry.name, home, entry_link
            ),
            None => format!("{} ({})", entry.name, entry_link),
        }
    }

    fn source_cell(entry: &Entry) -> String {
        let mut parts = Vec::new();
        if let Some(repo) = entry.code_repository.first() {
            parts.push(format!("<a href=\"{}\">Source</a>", repo));
        }
        if !entry.code_language.is_empty() {
            parts.push(entry.code_language.join(", "));
        }
        if let Some(license) = entry.code_license.first() {
            parts.push(license.clone());
        }
        parts.join(" - ")
    }

    fn row(&self, entry: &Entry) -> Vec<String> {
        let description = entry
            .description
            .as_deref()
            .map(|d| shorten(d, DESCRIPTION_WIDTH, DESCRIPTION_PLACEHOLDER))
            .unwrap_or_default();
        let download = entry
            .download
            .first()
            .map(|url| format!("<a href=\"{}\">Link</a>", url))
            .unwrap_or_default();
        let activity = match &entry.inactive {
            Some(since) => format!("inactive since {}", since),
            None => "active".to_string(),
        };
        let state = format!("{} / {}", entry.primary_state().unwrap_or_default(), activity);

        vec![
            self.name_cell(entry),
            description,
            download,
            state,
            entry.keywords.join(", "),
            Self::source_cell(entry),
        ]
    }

    /// One row per entry, sorted case-insensitively by the first cell
    pub fn to_table_rows(&self, catalog: &Catalog) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = catalog.iter().map(|e| self.row(e)).collect();
        rows.sort_by(|a, b| casefold_cmp(&a[0], &b[0]));
        rows
    }

    pub fn table(&self, catalog: &Catalog) -> TableExport {
        TableExport {
            headings: TABLE_HEADINGS.iter().map(|h| h.to_string()).collect(),
            data: self.to_table_rows(catalog),
        }
    }

    pub fn write_table(&self, catalog: &Catalog) -> Result<()> {
        let path = self.config.resolve(&self.config.json_export);
        write_json(&path, &self.table(catalog))?;
        tracing::info!("Exported {} rows to {}", catalog.len(), path.display());
        Ok(())
    }

    /// Writes the archive export and reports entries needing follow-up
    pub fn write_archives(&self, catalog: &Catalog) -> Result<RepositoryClassification> {
        let classification = classify_repositories(catalog);
        for entry in &classification.unconsumed {
            tracing::debug!("Entry \"{}\" unconsumed repository: {}", entry.name, entry.raw);
        }
        for entry in &classification.partially_classified {
            tracing::debug!(
                "Entry \"{}\" unclassified secondary repository: {}",
                entry.name,
                entry.urls.join(", ")
            );
        }

        let path = self.config.resolve(&self.config.archives_export);
        write_json(&path, &classification.archive)?;
        tracing::info!(
            "Exported {} repositories, {} entries unconsumed",
            classification.archive.len(),
            classification.unconsumed.len()
        );
        Ok(classification)
    }

    pub fn write_git_list(&self, catalog: &Catalog) -> Result<Vec<String>> {
        let urls = git_repositories(catalog);
        let path = self.config.resolve(&self.config.git_list_export);
        write_json(&path, &urls)?;
        tracing::info!("Exported {} git repositories", urls.len());
        Ok(urls)
    }
}
