//! Canonical form of list-valued entry fields
//!
//! Keywords, code dependencies and build systems are deduplicated, rewritten
//! through the alias tables and sorted case-insensitively. Keywords keep their
//! category keyword in front. An entry file is only rewritten when the field
//! line actually changes, and then only that line.

use std::collections::HashMap;
use std::fs;

use crate::config::{AliasTable, CatalogConfig};
use crate::entry::walker::file_name;
use crate::entry::{find_field, split_values, EntryWalker, Field, FieldMatch};
use crate::error::{CatalogError, Result};
use crate::text::{sort_casefold, write_text};

/// List fields rewritten by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedField {
    Keywords,
    CodeDependencies,
    BuildSystem,
}

impl NormalizedField {
    /// Processing order
    pub const ALL: [NormalizedField; 3] = [
        NormalizedField::Keywords,
        NormalizedField::CodeDependencies,
        NormalizedField::BuildSystem,
    ];

    pub fn field(&self) -> Field {
        match self {
            NormalizedField::Keywords => Field::Keywords,
            NormalizedField::CodeDependencies => Field::CodeDependencies,
            NormalizedField::BuildSystem => Field::BuildSystem,
        }
    }
}

/// Outcome of normalizing a whole entries directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub scanned: usize,
    /// File names of rewritten entries
    pub rewritten: Vec<String>,
}

pub struct FieldNormalizer<'a> {
    config: &'a CatalogConfig,
}

impl<'a> FieldNormalizer<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self { config }
    }

    fn aliases(&self, field: NormalizedField) -> &'a AliasTable {
        let aliases = &self.config.aliases;
        match field {
            NormalizedField::Keywords => &aliases.keywords,
            NormalizedField::CodeDependencies => &aliases.dependencies,
            NormalizedField::BuildSystem => &aliases.build_systems,
        }
    }

    /// Canonical values for the raw value list of `field`.
    ///
    /// Case variants of recommended keywords take the recommended spelling
    /// before the category is chosen, so the chosen category is stable.
    pub fn canonical_values(
        &self,
        file: &str,
        field: NormalizedField,
        raw: &str,
    ) -> Result<Vec<String>> {
        let is_keywords = field == NormalizedField::Keywords;
        let config = self.config;
        let mut values = dedupe_with_aliases(split_values(raw), self.aliases(field), |value| {
            if is_keywords {
                config.recommended_spelling(value)
            } else {
                None
            }
        });

        if !is_keywords {
            sort_casefold(&mut values);
            return Ok(values);
        }

        let category = self
            .config
            .recommended_keywords
            .iter()
            .find(|k| values.contains(k))
            .cloned()
            .ok_or_else(|| {
                CatalogError::malformed(
                    file,
                    format!(
                        "no category keyword, expected one of: {}",
                        self.config.recommended_keywords.join(", ")
                    ),
                )
            })?;

        values.retain(|v| *v != category && !self.config.noise_keywords.contains(v));
        sort_casefold(&mut values);
        values.insert(0, category);
        Ok(values)
    }

    /// Normalizes one field of an entry text.
    ///
    /// Returns the new text when the field line changed. A missing optional
    /// field is left alone; missing keywords are a malformed record.
    pub fn normalize_field(
        &self,
        file: &str,
        normalized: NormalizedField,
        text: &str,
    ) -> Result<Option<String>> {
        let field = normalized.field();
        let line = match find_field(text, field) {
            FieldMatch::Once(line) => line,
            FieldMatch::Absent if field.is_mandatory() => {
                return Err(CatalogError::malformed(
                    file,
                    format!("could not find field \"{}\"", field.label()),
                ));
            }
            FieldMatch::Absent => return Ok(None),
            FieldMatch::Multiple(n) => {
                return Err(CatalogError::malformed(
                    file,
                    format!("field \"{}\" appears {} times", field.label(), n),
                ));
            }
        };

        let values = self.canonical_values(file, normalized, line.value)?;
        let rendered = render_field_line(field, &values);

        let (preamble, original, postamble) =
            (&text[..line.start], &text[line.start..line.end], &text[line.end..]);
        if rendered == original {
            return Ok(None);
        }

        Ok(Some(format!("{}{}{}", preamble, rendered, postamble)))
    }

    /// Normalizes all fields of an entry text, returning the new text if any
    /// field changed
    pub fn normalize_text(&self, file: &str, text: &str) -> Result<Option<String>> {
        let mut current: Option<String> = None;
        for field in NormalizedField::ALL {
            let source = current.as_deref().unwrap_or(text);
            if let Some(updated) = self.normalize_field(file, field, source)? {
                current = Some(updated);
            }
        }
        Ok(current)
    }

    /// Normalizes every entry file in the entries directory in place
    pub fn normalize_directory(&self) -> Result<NormalizeSummary> {
        let walker = EntryWalker::new(self.config.listing_prefix.clone());
        let files = walker.walk(&self.config.entries_path())?;
        let mut summary = NormalizeSummary::default();

        for path in files {
            let name = file_name(&path).unwrap_or_default().to_string();
            let content = fs::read_to_string(&path)?;
            summary.scanned += 1;

            if let Some(updated) = self.normalize_text(&name, &content)? {
                write_text(&path, &updated)?;
                tracing::debug!("Normalized {}", name);
                summary.rewritten.push(name);
            }
        }

        tracing::info!(
            "Normalized entries: {} scanned, {} rewritten",
            summary.scanned,
            summary.rewritten.len()
        );
        Ok(summary)
    }
}

/// Applies aliases and canonical spellings, then removes case-insensitive
/// duplicates.
///
/// On collision an aliased or canonically spelled value replaces a plain one;
/// otherwise the first occurrence is kept.
fn dedupe_with_aliases<'c>(
    tokens: Vec<String>,
    aliases: &AliasTable,
    canonical_spelling: impl Fn(&str) -> Option<&'c str>,
) -> Vec<String> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<(String, bool)> = Vec::new();

    for token in tokens {
        let (value, aliased) = match aliases.resolve(&token) {
            Some(alias) => (alias.to_string(), true),
            None => (token, false),
        };
        let (value, canonical) = match canonical_spelling(&value) {
            Some(spelling) => (spelling.to_string(), true),
            None => (value, aliased),
        };

        let key = value.to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                if canonical && !kept[i].1 {
                    kept[i] = (value, true);
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push((value, canonical));
            }
        }
    }

    kept.into_iter().map(|(value, _)| value).collect()
}

fn render_field_line(field: Field, values: &[String]) -> String {
    if values.is_empty() {
        field.marker()
    } else {
        format!("{} {}", field.marker(), values.join(", "))
    }
}
