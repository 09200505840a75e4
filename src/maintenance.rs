//! Full maintenance pass over the catalog repository

use crate::catalog::Catalog;
use crate::checks::{check_template_leftovers, sort_list_files, LinkChecker, LinkReport};
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::normalize::{FieldNormalizer, NormalizeSummary};
use crate::report::{
    CatalogExporter, RepositoryClassification, Statistics, StatisticsBuilder, TocBuilder,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// Validate external links after all documents are written
    pub check_links: bool,
    /// Also write the git repository list
    pub export_git_list: bool,
}

#[derive(Debug, Default)]
pub struct PassSummary {
    pub normalized: NormalizeSummary,
    pub entries: usize,
    pub repositories: RepositoryClassification,
    pub links: Option<LinkReport>,
}

pub struct MaintenancePass<'a> {
    config: &'a CatalogConfig,
}

impl<'a> MaintenancePass<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    /// Runs every step in order; the first error aborts the pass
    pub async fn run(&self, options: PassOptions) -> Result<PassSummary> {
        let mut summary = PassSummary::default();

        check_template_leftovers(self.config)?;
        summary.normalized = self.normalize()?;

        let catalog = Catalog::assemble(self.config)?;
        summary.entries = catalog.len();

        TocBuilder::new(self.config).update_master_index(&catalog)?;
        StatisticsBuilder::new(self.config).write(&catalog)?;
        summary.repositories = self.export(&catalog, options.export_git_list)?;
        sort_list_files(self.config)?;

        if options.check_links {
            summary.links = Some(self.check_links().await?);
        }

        tracing::info!("Maintenance pass finished for {} entries", summary.entries);
        Ok(summary)
    }

    pub fn normalize(&self) -> Result<NormalizeSummary> {
        FieldNormalizer::new(self.config).normalize_directory()
    }

    pub fn update_index(&self) -> Result<Catalog> {
        let catalog = Catalog::assemble(self.config)?;
        TocBuilder::new(self.config).update_master_index(&catalog)?;
        Ok(catalog)
    }

    pub fn update_statistics(&self) -> Result<Statistics> {
        let catalog = Catalog::assemble(self.config)?;
        StatisticsBuilder::new(self.config).write(&catalog)
    }

    /// Writes the table export and the archive export
    pub fn export(&self, catalog: &Catalog, git_list: bool) -> Result<RepositoryClassification> {
        let exporter = CatalogExporter::new(self.config);
        exporter.write_table(catalog)?;
        let classification = exporter.write_archives(catalog)?;
        if git_list {
            exporter.write_git_list(catalog)?;
        }
        Ok(classification)
    }

    pub async fn check_links(&self) -> Result<LinkReport> {
        LinkChecker::new(self.config)?.check_catalog().await
    }
}
