use std::path::PathBuf;

use clap::{Parser, Subcommand};

use entry_catalog::checks::{check_template_leftovers, sort_list_files, LinkReport};
use entry_catalog::error::Result;
use entry_catalog::report::RepositoryClassification;
use entry_catalog::{Catalog, CatalogConfig, MaintenancePass, PassOptions};

#[derive(Parser)]
#[command(name = "entry-catalog")]
#[command(about = "Maintenance tool for a catalog of markdown project entries")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Run the full maintenance pass in the current repository
    entry-catalog run

    # Full pass including external link validation
    entry-catalog run --check-links

    # Only normalize keywords, dependencies and build systems
    entry-catalog --root ../catalog normalize

    # Regenerate listings and the overview index
    entry-catalog toc

    # Export the web table and repository lists
    entry-catalog export --git-list

    # Use an explicit configuration file
    entry-catalog --config ./catalog.toml stats
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the catalog repository
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to <root>/catalog.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full maintenance pass
    Run {
        /// Check external links at the end (slow)
        #[arg(long)]
        check_links: bool,

        /// Also export the git repository list
        #[arg(long)]
        git_list: bool,
    },

    /// Normalize entry fields in place
    Normalize,

    /// Regenerate category listings and the overview index block
    Toc,

    /// Regenerate the statistics document
    Stats,

    /// Write the JSON table export and repository archive lists
    Export {
        /// Also export the git repository list
        #[arg(long)]
        git_list: bool,
    },

    /// Check entries for unfilled template lines
    CheckTemplate,

    /// Check all external links for validity
    CheckLinks,

    /// Deduplicate and sort the flat list files
    SortLists,
}

pub async fn run_maintenance(config: &CatalogConfig, check_links: bool, git_list: bool) -> Result<()> {
    let options = PassOptions {
        check_links,
        export_git_list: git_list,
    };
    let summary = MaintenancePass::new(config).run(options).await?;

    println!("Maintenance pass finished:");
    println!("  Entries: {}", summary.entries);
    println!("  Rewritten entries: {}", summary.normalized.rewritten.len());
    print_repositories(&summary.repositories);
    if let Some(report) = &summary.links {
        print_link_report(report);
    }
    Ok(())
}

pub fn normalize_entries(config: &CatalogConfig) -> Result<()> {
    let summary = MaintenancePass::new(config).normalize()?;

    if summary.rewritten.is_empty() {
        println!("All {} entries already normalized", summary.scanned);
    } else {
        println!("Rewrote {} of {} entries:", summary.rewritten.len(), summary.scanned);
        for file in &summary.rewritten {
            println!("  {}", file);
        }
    }
    Ok(())
}

pub fn update_toc(config: &CatalogConfig) -> Result<()> {
    let catalog = MaintenancePass::new(config).update_index()?;
    println!(
        "Updated {} and listings for {} entries",
        config.overview_file.display(),
        catalog.len()
    );
    Ok(())
}

pub fn show_stats(config: &CatalogConfig) -> Result<()> {
    let stats = MaintenancePass::new(config).update_statistics()?;

    println!("Catalog Statistics:");
    println!("  Total entries: {}", stats.total);
    println!("  Mature: {}", stats.mature);
    println!("  Beta: {}", stats.beta);
    println!("  Inactive: {}", stats.inactive.len());

    if !stats.languages.rows.is_empty() {
        println!("\n  Top languages:");
        for row in stats.languages.rows.iter().take(10) {
            println!("    {}: {}", row.value, row.count);
        }
    }

    println!("\nWrote {}", config.statistics_file.display());
    Ok(())
}

pub fn export_catalog(config: &CatalogConfig, git_list: bool) -> Result<()> {
    let catalog = Catalog::assemble(config)?;
    let repositories = MaintenancePass::new(config).export(&catalog, git_list)?;

    println!("Exported {} entries to {}", catalog.len(), config.json_export.display());
    print_repositories(&repositories);
    Ok(())
}

pub fn check_template(config: &CatalogConfig) -> Result<()> {
    check_template_leftovers(config)?;
    println!("No template leftovers found");
    Ok(())
}

pub async fn check_links(config: &CatalogConfig) -> Result<()> {
    let report = MaintenancePass::new(config).check_links().await?;
    print_link_report(&report);
    Ok(())
}

pub fn sort_lists(config: &CatalogConfig) -> Result<()> {
    sort_list_files(config)?;
    println!("Sorted {} list files", config.list_files.len());
    Ok(())
}

fn print_repositories(repositories: &RepositoryClassification) {
    let archive = &repositories.archive;
    println!(
        "  Repositories: {} git, {} svn, {} hg, {} bzr",
        archive.git.len(),
        archive.svn.len(),
        archive.hg.len(),
        archive.bzr.len()
    );

    if !repositories.unconsumed.is_empty() {
        println!("\n  Unconsumed repositories ({}):", repositories.unconsumed.len());
        for entry in &repositories.unconsumed {
            println!("    {}: {}", entry.name, entry.raw);
        }
    }

    if !repositories.partially_classified.is_empty() {
        println!(
            "\n  Unclassified secondary repositories ({}):",
            repositories.partially_classified.len()
        );
        for entry in &repositories.partially_classified {
            println!("    {}: {}", entry.name, entry.urls.join(", "));
        }
    }
}

fn print_link_report(report: &LinkReport) {
    println!("Checked {} links", report.checked);
    if report.failures.is_empty() {
        return;
    }
    println!("\n  Failed links ({}):", report.failures.len());
    for failure in &report.failures {
        println!("    {}: {} - {}", failure.file, failure.url, failure.reason);
    }
}
