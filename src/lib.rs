pub mod catalog;
pub mod checks;
pub mod config;
pub mod entry;
pub mod error;
pub mod maintenance;
pub mod normalize;
pub mod report;
pub mod text;

pub use catalog::Catalog;
pub use config::{AliasTable, Aliases, CatalogConfig, CONFIG_FILE_NAME};
pub use entry::{Entry, EntryScanner, EntryWalker, Field, FieldMatch};
pub use error::{CatalogError, Result};
pub use maintenance::{MaintenancePass, PassOptions, PassSummary};
pub use normalize::{FieldNormalizer, NormalizeSummary, NormalizedField};
pub use report::{CatalogExporter, StatisticsBuilder, TocBuilder};
