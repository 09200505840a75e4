//! Catalog entries
//!
//! An entry is one markdown file describing one project. Labeled field lines
//! (`- Keywords: a, b`) carry the structured data.

pub mod scanner;
pub mod walker;

use serde::Serialize;

pub use scanner::{find_field, split_values, EntryScanner, FieldLine, FieldMatch};
pub use walker::EntryWalker;

/// Labeled single-line fields of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Home,
    State,
    Play,
    Download,
    Platform,
    Keywords,
    CodeRepository,
    CodeLanguage,
    CodeLicense,
    CodeDependencies,
    BuildSystem,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Home,
        Field::State,
        Field::Play,
        Field::Download,
        Field::Platform,
        Field::Keywords,
        Field::CodeRepository,
        Field::CodeLanguage,
        Field::CodeLicense,
        Field::CodeDependencies,
        Field::BuildSystem,
    ];

    /// Label as written in entry files
    pub fn label(&self) -> &'static str {
        match self {
            Field::Home => "Home",
            Field::State => "State",
            Field::Play => "Play",
            Field::Download => "Download",
            Field::Platform => "Platform",
            Field::Keywords => "Keywords",
            Field::CodeRepository => "Code repository",
            Field::CodeLanguage => "Code language",
            Field::CodeLicense => "Code license",
            Field::CodeDependencies => "Code dependencies",
            Field::BuildSystem => "Build system",
        }
    }

    /// Line prefix that introduces the field, e.g. `- Keywords:`
    pub fn marker(&self) -> String {
        format!("- {}:", self.label())
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            Field::State | Field::Keywords | Field::CodeLanguage | Field::CodeLicense
        )
    }
}

/// One parsed entry file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    /// File name relative to the entries directory
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub keywords: Vec<String>,
    #[serde(rename = "code language")]
    pub code_language: Vec<String>,
    #[serde(rename = "code license")]
    pub code_license: Vec<String>,
    pub state: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(rename = "code dependencies", skip_serializing_if = "Vec::is_empty")]
    pub code_dependencies: Vec<String>,
    #[serde(rename = "build system", skip_serializing_if = "Vec::is_empty")]
    pub build_system: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platform: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub download: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub play: Vec<String>,
    #[serde(rename = "code repository", skip_serializing_if = "Vec::is_empty")]
    pub code_repository: Vec<String>,
    #[serde(rename = "code repository-raw", skip_serializing_if = "Option::is_none")]
    pub code_repository_raw: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub home: Vec<String>,
}

impl Entry {
    pub fn has_state(&self, state: &str) -> bool {
        self.state.iter().any(|s| s == state)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.code_language.iter().any(|l| l == language)
    }

    pub fn primary_state(&self) -> Option<&str> {
        self.state.first().map(String::as_str)
    }
}

/// Removes `(...)` annotations such as `(+)` and trims the rest
pub fn strip_annotations(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}
