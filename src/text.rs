//! Small text helpers shared by the report builders

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Case-insensitive ordering with the raw string as tie breaker
pub fn casefold_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_casefold<S: AsRef<str>>(values: &mut [S]) {
    values.sort_by(|a, b| casefold_cmp(a.as_ref(), b.as_ref()));
}

/// Upper-cases the first character and lower-cases the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Collapses whitespace and truncates to `width` characters on a word
/// boundary, appending `placeholder` when text was cut.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut kept = String::new();
    for word in words {
        let extra = if kept.is_empty() { 0 } else { 1 };
        if kept.chars().count() + extra + word.chars().count() > budget {
            break;
        }
        if extra == 1 {
            kept.push(' ');
        }
        kept.push_str(word);
    }

    if kept.is_empty() {
        placeholder.trim_start().to_string()
    } else {
        kept + placeholder
    }
}

/// Writes `content`, creating parent directories as needed
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casefold_sort() {
        let mut values = vec!["beta", "Alpha", "alpha", "Gamma"];
        sort_casefold(&mut values);
        assert_eq!(values, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("role playing"), "Role playing");
        assert_eq!(capitalize("RPG"), "Rpg");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("a  short\ntext", 60, ".."), "a short text");
    }

    #[test]
    fn test_shorten_cuts_on_word_boundary() {
        let text = "The quick brown fox jumps over the lazy dog";
        let short = shorten(text, 20, "..");
        assert_eq!(short, "The quick brown..");
        assert!(short.chars().count() <= 20);
    }

    #[test]
    fn test_shorten_single_long_word() {
        assert_eq!(shorten("abcdefghijklmnop", 5, ".."), "..");
    }

    #[test]
    fn test_write_text_creates_parent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("docs/data.json");
        write_text(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }
}
