//! Line scanner for entry files
//!
//! Extracts the heading, description and labeled field lines from an entry.
//! Each labeled field must appear at most once; mandatory fields exactly once.

use super::{strip_annotations, Entry, Field};
use crate::error::{CatalogError, Result};

/// A located field line.
///
/// `start..end` is the byte range of the line without its terminator, so the
/// text splits into preamble, field line and postamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLine<'a> {
    pub start: usize,
    pub end: usize,
    /// Everything after the marker, untrimmed
    pub value: &'a str,
}

/// Result of looking up one field marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch<'a> {
    Absent,
    Once(FieldLine<'a>),
    Multiple(usize),
}

/// Iterates `(start, content)` for each line, content without `\n` or `\r\n`
fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let content = raw.strip_suffix('\n').unwrap_or(raw);
        let content = content.strip_suffix('\r').unwrap_or(content);
        (start, content)
    })
}

/// Finds the line starting with `field`'s marker
pub fn find_field(text: &str, field: Field) -> FieldMatch<'_> {
    let marker = field.marker();
    let mut found = None;
    let mut count = 0;

    for (start, content) in lines_with_offsets(text) {
        if let Some(value) = content.strip_prefix(marker.as_str()) {
            count += 1;
            if found.is_none() {
                found = Some(FieldLine {
                    start,
                    end: start + content.len(),
                    value,
                });
            }
        }
    }

    match (found, count) {
        (Some(line), 1) => FieldMatch::Once(line),
        (Some(_), n) => FieldMatch::Multiple(n),
        _ => FieldMatch::Absent,
    }
}

/// Splits a comma separated value list, trimming and dropping empty tokens
pub fn split_values(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses entry files into [`Entry`] records
pub struct EntryScanner {
    valid_states: Vec<String>,
}

impl EntryScanner {
    pub fn new(valid_states: Vec<String>) -> Self {
        Self { valid_states }
    }

    /// Parse the content of the entry `file`
    pub fn parse(&self, file: &str, content: &str) -> Result<Entry> {
        let name = Self::extract_name(file, content)?;
        let description = Self::extract_description(content);

        let keywords = Self::mandatory_list(file, content, Field::Keywords)?;
        let code_language = Self::mandatory_list(file, content, Field::CodeLanguage)?;
        let code_license = Self::mandatory_list(file, content, Field::CodeLicense)?;
        let (state, inactive) = self.extract_state(file, content)?;

        let code_repository_raw =
            Self::optional_value(file, content, Field::CodeRepository)?.map(|v| v.trim().to_string());
        let code_repository = code_repository_raw
            .as_deref()
            .map(|raw| {
                split_values(raw)
                    .iter()
                    .map(|v| strip_annotations(v))
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Entry {
            name,
            file: file.to_string(),
            description,
            keywords,
            code_language,
            code_license,
            state,
            inactive,
            code_dependencies: Self::optional_list(file, content, Field::CodeDependencies)?,
            build_system: Self::optional_list(file, content, Field::BuildSystem)?,
            platform: Self::optional_list(file, content, Field::Platform)?,
            download: Self::optional_list(file, content, Field::Download)?,
            play: Self::optional_list(file, content, Field::Play)?,
            code_repository,
            code_repository_raw,
            home: Self::optional_list(file, content, Field::Home)?,
        })
    }

    fn extract_name(file: &str, content: &str) -> Result<String> {
        let headings: Vec<&str> = lines_with_offsets(content)
            .filter_map(|(_, line)| line.strip_prefix("# "))
            .map(str::trim)
            .collect();

        match headings.as_slice() {
            [name] if !name.is_empty() => Ok(name.to_string()),
            [_] => Err(CatalogError::malformed(file, "empty name heading")),
            [] => Err(CatalogError::malformed(file, "missing name heading")),
            many => Err(CatalogError::malformed(
                file,
                format!("{} name headings, expected one", many.len()),
            )),
        }
    }

    fn extract_description(content: &str) -> Option<String> {
        lines_with_offsets(content)
            .map(|(_, line)| line.trim())
            .find(|line| line.len() >= 2 && line.starts_with('_') && line.ends_with('_'))
            .map(|line| line[1..line.len() - 1].trim().to_string())
            .filter(|d| !d.is_empty())
    }

    fn optional_value<'a>(file: &str, content: &'a str, field: Field) -> Result<Option<&'a str>> {
        match find_field(content, field) {
            FieldMatch::Absent => Ok(None),
            FieldMatch::Once(line) => Ok(Some(line.value)),
            FieldMatch::Multiple(n) => Err(CatalogError::malformed(
                file,
                format!("field \"{}\" appears {} times", field.label(), n),
            )),
        }
    }

    fn optional_list(file: &str, content: &str, field: Field) -> Result<Vec<String>> {
        Ok(Self::optional_value(file, content, field)?
            .map(split_values)
            .unwrap_or_default())
    }

    fn mandatory_list(file: &str, content: &str, field: Field) -> Result<Vec<String>> {
        let value = Self::optional_value(file, content, field)?.ok_or_else(|| {
            CatalogError::malformed(file, format!("missing field \"{}\"", field.label()))
        })?;
        let values = split_values(value);
        if values.is_empty() {
            return Err(CatalogError::malformed(
                file,
                format!("field \"{}\" has no values", field.label()),
            ));
        }
        Ok(values)
    }

    /// Splits the `State` values into states and the `inactive since` marker
    fn extract_state(&self, file: &str, content: &str) -> Result<(Vec<String>, Option<String>)> {
        let mut state = Vec::new();
        let mut inactive = None;

        for value in Self::mandatory_list(file, content, Field::State)? {
            if let Some(since) = value.strip_prefix("inactive since") {
                if inactive.is_some() {
                    return Err(CatalogError::malformed(file, "more than one inactive marker"));
                }
                inactive = Some(since.trim().to_string());
            } else if self.valid_states.contains(&value) {
                state.push(value);
            } else {
                return Err(CatalogError::malformed(
                    file,
                    format!("unknown state \"{}\"", value),
                ));
            }
        }

        if state.is_empty() {
            return Err(CatalogError::malformed(file, "no state besides inactive"));
        }
        Ok((state, inactive))
    }
}
