//! Derived documents built from the catalog
//!
//! None of the builders mutate entry files.

pub mod export;
pub mod statistics;
pub mod toc;

pub use export::{
    classify_repositories, git_repositories, CatalogExporter, RepositoryArchive,
    RepositoryClassification, TableExport, UnclassifiedRepository, Vcs,
};
pub use statistics::{Frequency, FrequencyTable, Statistics, StatisticsBuilder};
pub use toc::{render_listing, splice_index, Listing, TocBuilder};
