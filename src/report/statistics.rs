//! Statistics report over the whole catalog
//!
//! State shares and the coverage lines are relative to the number of
//! entries. Frequency tables are relative to the number of value occurrences
//! of the field across the catalog.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::Local;

use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::entry::Entry;
use crate::error::Result;
use crate::report::toc::LISTING_HEADER;
use crate::text::{casefold_cmp, sort_casefold, write_text};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Occurrence count of one distinct field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    pub value: String,
    pub count: usize,
}

/// Distinct values of one field, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    pub rows: Vec<Frequency>,
    /// Sum of all counts, the denominator of every share
    pub occurrences: usize,
}

impl FrequencyTable {
    /// Counts values; ties are ordered by name, case-insensitively
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a String>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut occurrences = 0;
        for value in values {
            *counts.entry(value.as_str()).or_default() += 1;
            occurrences += 1;
        }

        let mut rows: Vec<Frequency> = counts
            .into_iter()
            .map(|(value, count)| Frequency {
                value: value.to_string(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| casefold_cmp(&a.value, &b.value))
        });

        Self { rows, occurrences }
    }

    pub fn share(&self, row: &Frequency) -> f64 {
        percent(row.count, self.occurrences)
    }

    fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("- {} ({:.1}%)", row.value, self.share(row)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn sorted_names<'a>(entries: impl Iterator<Item = &'a Entry>) -> Vec<String> {
    let mut names: Vec<String> = entries.map(|e| e.name.clone()).collect();
    sort_casefold(&mut names);
    names
}

fn is_c_family(entry: &Entry) -> bool {
    entry.has_language("C") || entry.has_language("C++")
}

/// Figures shown in the statistics document
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub total: usize,
    pub mature: usize,
    pub beta: usize,
    /// `(name, inactive since)`, most recently inactive first
    pub inactive: Vec<(String, String)>,
    pub languages: FrequencyTable,
    pub licenses: FrequencyTable,
    pub keywords: FrequencyTable,
    pub dependencies: FrequencyTable,
    pub with_dependencies: usize,
    pub build_systems: FrequencyTable,
    pub with_build_system: usize,
    pub platforms: FrequencyTable,
    pub with_platform: usize,
    pub without_download_or_play: Vec<String>,
    pub unpopular_repository: Vec<String>,
    pub c_without_build_system: Vec<String>,
    pub c_without_cmake: Vec<String>,
}

impl Statistics {
    pub fn compute(catalog: &Catalog, popular_hosts: &[String]) -> Self {
        let entries = catalog.entries();

        let mut inactive: Vec<(String, String)> = entries
            .iter()
            .filter_map(|e| e.inactive.clone().map(|since| (e.name.clone(), since)))
            .collect();
        inactive.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| casefold_cmp(&a.0, &b.0)));

        let is_popular = |repo: &String| popular_hosts.iter().any(|host| repo.contains(host.as_str()));

        Self {
            total: entries.len(),
            mature: entries.iter().filter(|e| e.has_state("mature")).count(),
            beta: entries.iter().filter(|e| e.has_state("beta")).count(),
            inactive,
            languages: FrequencyTable::from_values(entries.iter().flat_map(|e| &e.code_language)),
            licenses: FrequencyTable::from_values(entries.iter().flat_map(|e| &e.code_license)),
            keywords: FrequencyTable::from_values(entries.iter().flat_map(|e| &e.keywords)),
            dependencies: FrequencyTable::from_values(
                entries.iter().flat_map(|e| &e.code_dependencies),
            ),
            with_dependencies: entries
                .iter()
                .filter(|e| !e.code_dependencies.is_empty())
                .count(),
            build_systems: FrequencyTable::from_values(entries.iter().flat_map(|e| &e.build_system)),
            with_build_system: entries.iter().filter(|e| !e.build_system.is_empty()).count(),
            platforms: FrequencyTable::from_values(entries.iter().flat_map(|e| &e.platform)),
            with_platform: entries.iter().filter(|e| !e.platform.is_empty()).count(),
            without_download_or_play: sorted_names(
                entries
                    .iter()
                    .filter(|e| e.download.is_empty() && e.play.is_empty()),
            ),
            unpopular_repository: sorted_names(entries.iter().filter(|e| {
                !e.code_repository.is_empty() && !e.code_repository.iter().any(is_popular)
            })),
            c_without_build_system: sorted_names(
                entries
                    .iter()
                    .filter(|e| is_c_family(e) && e.build_system.is_empty()),
            ),
            c_without_cmake: sorted_names(entries.iter().filter(|e| {
                is_c_family(e)
                    && !e.build_system.is_empty()
                    && !e.build_system.iter().any(|b| b == "CMake")
            })),
        }
    }

    fn rel(&self, part: usize) -> f64 {
        percent(part, self.total)
    }

    /// Renders the statistics document
    pub fn render(&self, generated_at: &str) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}\n# Statistics\n\n", LISTING_HEADER);
        let _ = write!(
            out,
            "analyzed {} entries on {}\n\n",
            self.total, generated_at
        );

        out.push_str("## State\n\n");
        let _ = write!(
            out,
            "- mature: {} ({:.1}%)\n- beta: {} ({:.1}%)\n- inactive: {} ({:.1}%)\n\n",
            self.mature,
            self.rel(self.mature),
            self.beta,
            self.rel(self.beta),
            self.inactive.len(),
            self.rel(self.inactive.len())
        );
        if !self.inactive.is_empty() {
            let listed: Vec<String> = self
                .inactive
                .iter()
                .map(|(name, since)| format!("{} ({})", name, since))
                .collect();
            let _ = write!(out, "##### Inactive State\n\n{}\n\n", listed.join(", "));
        }

        out.push_str("## Code Languages\n\n");
        let _ = write!(out, "##### Language frequency\n\n{}\n\n", self.languages.render());

        out.push_str("## Code licenses\n\n");
        let _ = write!(out, "##### Licenses frequency\n\n{}\n\n", self.licenses.render());

        out.push_str("## Keywords\n\n");
        let _ = write!(out, "##### Keywords frequency\n\n{}\n\n", self.keywords.render());

        out.push_str("## Entries without download or play fields\n\n");
        write_name_list(&mut out, &self.without_download_or_play);

        out.push_str("## Entries with a code repository not on a popular site\n\n");
        write_name_list(&mut out, &self.unpopular_repository);

        out.push_str("## Code dependencies\n\n");
        let _ = write!(
            out,
            "With code dependency field {} ({:.1}%)\n\n",
            self.with_dependencies,
            self.rel(self.with_dependencies)
        );
        let _ = write!(
            out,
            "##### Code dependencies frequency\n\n{}\n\n",
            self.dependencies.render()
        );

        out.push_str("## Build systems\n\n");
        let _ = write!(
            out,
            "Build systems information available for {:.1}% of all projects.\n\n",
            self.rel(self.with_build_system)
        );
        let _ = write!(
            out,
            "##### Build systems frequency ({})\n\n{}\n\n",
            self.build_systems.occurrences,
            self.build_systems.render()
        );
        let _ = write!(
            out,
            "##### C and C++ projects without build system information ({})\n\n{}\n\n",
            self.c_without_build_system.len(),
            self.c_without_build_system.join(", ")
        );
        let _ = write!(
            out,
            "##### C and C++ projects with a build system different from CMake ({})\n\n{}\n\n",
            self.c_without_cmake.len(),
            self.c_without_cmake.join(", ")
        );

        out.push_str("## Platform\n\n");
        let _ = write!(
            out,
            "Platform information available for {:.1}% of all projects.\n\n",
            self.rel(self.with_platform)
        );
        let _ = write!(out, "##### Platforms frequency\n\n{}\n\n", self.platforms.render());

        out
    }
}

fn write_name_list(out: &mut String, names: &[String]) {
    let _ = write!(out, "{}: {}\n\n", names.len(), names.join(", "));
}

pub struct StatisticsBuilder<'a> {
    config: &'a CatalogConfig,
}

impl<'a> StatisticsBuilder<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, catalog: &Catalog) -> Statistics {
        Statistics::compute(catalog, &self.config.popular_hosts)
    }

    /// Regenerates the statistics document and returns what it was rendered from
    pub fn write(&self, catalog: &Catalog) -> Result<Statistics> {
        let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let stats = self.compute(catalog);
        let path = self.config.resolve(&self.config.statistics_file);
        write_text(&path, &stats.render(&generated_at))?;
        tracing::info!("Updated statistics for {} entries", catalog.len());
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn entry(name: &str, languages: &[&str], state: &[&str]) -> Entry {
        Entry {
            name: name.to_string(),
            file: format!("{}.md", name.to_lowercase()),
            keywords: strings(&["action"]),
            code_language: strings(languages),
            code_license: strings(&["MIT"]),
            state: strings(state),
            ..Default::default()
        }
    }

    fn hosts() -> Vec<String> {
        CatalogConfig::default().popular_hosts
    }

    #[test]
    fn test_inactive_percentage() {
        let mut entries = vec![
            entry("A", &["C"], &["beta"]),
            entry("B", &["C"], &["mature"]),
            entry("C", &["C"], &["mature"]),
            entry("D", &["C"], &["beta"]),
        ];
        entries[2].inactive = Some("2015".to_string());
        let catalog = Catalog::from_entries(entries).unwrap();

        let stats = Statistics::compute(&catalog, &hosts());
        let text = stats.render("2024-01-01 00:00:00");

        assert!(text.contains("- inactive: 1 (25.0%)"));
        assert!(text.contains("- mature: 2 (50.0%)"));
        assert!(text.contains("##### Inactive State\n\nC (2015)\n\n"));
    }

    #[test]
    fn test_inactive_sorted_by_year_then_name() {
        let mut entries = vec![
            entry("zed", &["C"], &["beta"]),
            entry("Alpha", &["C"], &["beta"]),
            entry("beta", &["C"], &["beta"]),
        ];
        entries[0].inactive = Some("2010".to_string());
        entries[1].inactive = Some("2010".to_string());
        entries[2].inactive = Some("2018".to_string());
        let catalog = Catalog::from_entries(entries).unwrap();

        let stats = Statistics::compute(&catalog, &hosts());
        let names: Vec<&str> = stats.inactive.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["beta", "Alpha", "zed"]);
    }

    #[test]
    fn test_frequency_relative_to_occurrences() {
        let catalog = Catalog::from_entries(vec![
            entry("A", &["C", "Lua"], &["beta"]),
            entry("B", &["C"], &["beta"]),
            entry("C", &["Python"], &["beta"]),
        ])
        .unwrap();

        let stats = Statistics::compute(&catalog, &hosts());
        assert_eq!(stats.languages.occurrences, 4);
        assert_eq!(stats.languages.rows[0].value, "C");
        // Lua and Python tie, ordered by name
        assert_eq!(stats.languages.rows[1].value, "Lua");
        assert_eq!(stats.languages.rows[2].value, "Python");

        let text = stats.render("now");
        assert!(text.contains("- C (50.0%)\n- Lua (25.0%)\n- Python (25.0%)"));
    }

    #[test]
    fn test_frequency_ties_case_insensitive() {
        let values = strings(&["zlib", "Boost", "alsa"]);
        let table = FrequencyTable::from_values(&values);
        let order: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(order, vec!["alsa", "Boost", "zlib"]);
    }

    #[test]
    fn test_cross_tabulations() {
        let mut entries = vec![
            entry("NoBuild", &["C"], &["beta"]),
            entry("Make", &["C++"], &["beta"]),
            entry("WithCMake", &["C", "C++"], &["beta"]),
            entry("Java", &["Java"], &["beta"]),
        ];
        entries[1].build_system = strings(&["make"]);
        entries[2].build_system = strings(&["CMake", "make"]);
        let catalog = Catalog::from_entries(entries).unwrap();

        let stats = Statistics::compute(&catalog, &hosts());
        assert_eq!(stats.c_without_build_system, vec!["NoBuild"]);
        assert_eq!(stats.c_without_cmake, vec!["Make"]);
        assert_eq!(stats.with_build_system, 2);
        assert!(stats
            .render("now")
            .contains("Build systems information available for 50.0% of all projects."));
    }

    #[test]
    fn test_download_and_repository_sections() {
        let mut entries = vec![
            entry("Hosted", &["C"], &["beta"]),
            entry("SelfHosted", &["C"], &["beta"]),
            entry("NoRepo", &["C"], &["beta"]),
        ];
        entries[0].code_repository = strings(&["https://github.com/a/b"]);
        entries[0].download = strings(&["https://a.org/dl"]);
        entries[1].code_repository = strings(&["https://git.example.org/x.git"]);
        entries[1].play = strings(&["https://play.example.org"]);
        let catalog = Catalog::from_entries(entries).unwrap();

        let stats = Statistics::compute(&catalog, &hosts());
        assert_eq!(stats.without_download_or_play, vec!["NoRepo"]);
        assert_eq!(stats.unpopular_repository, vec!["SelfHosted"]);

        let text = stats.render("now");
        assert!(text.contains(
            "## Entries with a code repository not on a popular site\n\n1: SelfHosted\n\n"
        ));
    }

    #[test]
    fn test_empty_catalog_renders_zero_percent() {
        let stats = Statistics::compute(&Catalog::default(), &hosts());
        let text = stats.render("now");
        assert!(text.starts_with("[comment]: # (autogenerated content, do not edit)\n# Statistics\n\nanalyzed 0 entries on now\n\n"));
        assert!(text.contains("- mature: 0 (0.0%)"));
        assert!(!text.contains("Inactive State"));
    }

    #[test]
    fn test_write_returns_rendered_statistics() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CatalogConfig::with_root(temp_dir.path());
        let catalog = Catalog::from_entries(vec![
            entry("Alpha", &["C"], &["mature"]),
            entry("Beta", &["Rust"], &["beta"]),
        ])
        .unwrap();

        let stats = StatisticsBuilder::new(&config).write(&catalog).unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.mature, 1);
        let document = std::fs::read_to_string(config.resolve(&config.statistics_file)).unwrap();
        assert!(document.contains("analyzed 2 entries on "));
        assert!(document.contains("- mature: 1 (50.0%)\n"));
    }
}
