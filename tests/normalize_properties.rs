//! Invariants of the field normalizer over a range of keyword lines.

use std::collections::HashSet;
use std::fs;

use tempfile::TempDir;

use entry_catalog::entry::{find_field, split_values};
use entry_catalog::{CatalogConfig, Field, FieldMatch, FieldNormalizer};

const KEYWORD_LINES: &[&str] = &[
    "action",
    "2D, action",
    "zebra, Action, action-rpg, arcade",
    "RTS, strategy, TBS, turn based",
    "rpg, open content, misc",
    "engine, tools, game engine, 3D",
    "puzzle, Puzzle, puzzle",
    "  remake ,, clone, , action ",
    "browser, simulation, MMO, SP, MP",
    "zebra, Action, action-rpg, puzzle",
];

fn entry_text(keywords: &str) -> String {
    format!(
        "# Game\n\n_Description_\n\n- State: beta\n- Keywords: {}\n- Code language: C\n\
         - Code license: MIT\n- Code dependencies: SDL 2, libgdx, LibGDX\n\n## Building\n",
        keywords
    )
}

fn keywords_of(text: &str) -> Vec<String> {
    match find_field(text, Field::Keywords) {
        FieldMatch::Once(line) => split_values(line.value),
        other => panic!("unexpected keywords match: {:?}", other),
    }
}

fn normalized(normalizer: &FieldNormalizer<'_>, text: &str) -> String {
    normalizer
        .normalize_text("game.md", text)
        .expect("Normalization failed")
        .unwrap_or_else(|| text.to_string())
}

#[test]
fn test_normalization_is_idempotent() {
    let config = CatalogConfig::default();
    let normalizer = FieldNormalizer::new(&config);

    for line in KEYWORD_LINES {
        let once = normalized(&normalizer, &entry_text(line));
        assert_eq!(
            normalizer.normalize_text("game.md", &once).unwrap(),
            None,
            "second pass changed keywords {:?}",
            line
        );
    }
}

#[test]
fn test_first_keyword_is_recommended() {
    let config = CatalogConfig::default();
    let normalizer = FieldNormalizer::new(&config);

    for line in KEYWORD_LINES {
        let keywords = keywords_of(&normalized(&normalizer, &entry_text(line)));
        assert!(
            config.recommended_keywords.contains(&keywords[0]),
            "{:?} starts with {:?}",
            line,
            keywords[0]
        );
    }
}

#[test]
fn test_keywords_unique_and_sorted_after_category() {
    let config = CatalogConfig::default();
    let normalizer = FieldNormalizer::new(&config);

    for line in KEYWORD_LINES {
        let keywords = keywords_of(&normalized(&normalizer, &entry_text(line)));

        let folded: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        assert_eq!(folded.len(), keywords.len(), "duplicates in {:?}", keywords);

        let rest = &keywords[1..];
        let mut sorted = rest.to_vec();
        sorted.sort_by_key(|k| k.to_lowercase());
        assert_eq!(rest, sorted.as_slice(), "unsorted tags in {:?}", keywords);

        for noise in &config.noise_keywords {
            assert!(!keywords.contains(noise), "noise {:?} kept in {:?}", noise, keywords);
        }
    }
}

#[test]
fn test_only_field_lines_change() {
    let config = CatalogConfig::default();
    let normalizer = FieldNormalizer::new(&config);

    let original = entry_text("RTS, strategy, misc");
    let updated = normalized(&normalizer, &original);

    let changed: Vec<(&str, &str)> = original
        .lines()
        .zip(updated.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(
        changed,
        vec![
            ("- Keywords: RTS, strategy, misc", "- Keywords: strategy, real time"),
            (
                "- Code dependencies: SDL 2, libgdx, LibGDX",
                "- Code dependencies: libGDX, SDL2"
            ),
        ]
    );
    assert_eq!(original.lines().count(), updated.lines().count());
    assert!(updated.ends_with("\n\n## Building\n"));
}

#[test]
fn test_directory_rewrites_only_changed_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = CatalogConfig::with_root(temp_dir.path());
    let games = config.entries_path();
    fs::create_dir_all(&games).unwrap();

    let clean = "# Clean\n\n- State: mature\n- Keywords: puzzle, 2D\n- Code language: C\n- Code license: MIT\n";
    fs::write(games.join("clean.md"), clean).unwrap();
    fs::write(games.join("messy.md"), entry_text("2D, 2D, puzzle")).unwrap();
    fs::write(games.join("_all.md"), "- Keywords: not an entry").unwrap();

    let summary = FieldNormalizer::new(&config).normalize_directory().unwrap();

    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.rewritten, vec!["messy.md"]);
    assert_eq!(fs::read_to_string(games.join("clean.md")).unwrap(), clean);
    assert!(fs::read_to_string(games.join("messy.md"))
        .unwrap()
        .contains("- Keywords: puzzle, 2D\n"));
}
