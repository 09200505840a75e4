use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Malformed record {file}: {reason}")]
    MalformedRecord { file: String, reason: String },

    #[error("Invalid structure in {path}: {reason}")]
    DocumentStructure { path: String, reason: String },

    #[error("{file}: found template leftover {leftover:?}")]
    TemplateLeftover { file: String, leftover: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl CatalogError {
    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::MalformedRecord {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::DocumentStructure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
