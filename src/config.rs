//! Catalog configuration.
//!
//! Every component receives a [`CatalogConfig`] explicitly. Defaults describe
//! the standard repository layout; a `catalog.toml` at the repository root can
//! override any key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CatalogError, Result};

/// Name of the optional config file looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

const DEFAULT_RECOMMENDED_KEYWORDS: &[&str] = &[
    "action",
    "arcade",
    "adventure",
    "visual novel",
    "sports",
    "platform",
    "puzzle",
    "role playing",
    "simulation",
    "strategy",
    "cards",
    "board",
    "music",
    "educational",
    "tool",
    "game engine",
    "framework",
    "library",
    "remake",
];

const DEFAULT_NOISE_KEYWORDS: &[&str] = &["browser", "misc", "tools"];

const DEFAULT_VALID_STATES: &[&str] = &["beta", "mature"];

const DEFAULT_POPULAR_HOSTS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "code.sf.net",
    "code.launchpad.net",
];

const DEFAULT_IGNORED_LINKS: &[&str] = &["https://git.tukaani.org/xz.git"];

/// Mapping from known abbreviations and misspellings to canonical tokens.
///
/// Exact keys are matched verbatim. Case-insensitive keys are stored
/// lowercased and matched against the lowercased token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAliasTable")]
pub struct AliasTable {
    exact: BTreeMap<String, String>,
    case_insensitive: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAliasTable {
    exact: BTreeMap<String, String>,
    case_insensitive: BTreeMap<String, String>,
}

impl From<RawAliasTable> for AliasTable {
    fn from(raw: RawAliasTable) -> Self {
        let mut table = AliasTable::default();
        for (from, to) in raw.exact {
            table = table.with_exact(from, to);
        }
        for (from, to) in raw.case_insensitive {
            table = table.with_case_insensitive(from, to);
        }
        table
    }
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exact(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.exact.insert(from.into(), to.into());
        self
    }

    pub fn with_case_insensitive(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.case_insensitive
            .insert(from.into().to_lowercase(), to.into());
        self
    }

    /// Returns the canonical replacement for `token`, if any
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.exact
            .get(token)
            .or_else(|| self.case_insensitive.get(&token.to_lowercase()))
            .map(String::as_str)
    }

    pub fn keyword_defaults() -> Self {
        Self::new()
            .with_exact("TBS", "turn-based")
            .with_exact("TB", "turn-based")
            .with_exact("turn based", "turn-based")
            .with_exact("RTS", "real time")
            .with_exact("MMO", "massive multiplayer online")
            .with_exact("SP", "singleplayer")
            .with_exact("MP", "multiplayer")
            .with_exact("engine", "game engine")
            .with_exact("rpg", "role playing")
    }

    pub fn dependency_defaults() -> Self {
        Self::new()
            .with_exact("Blender", "Blender game engine")
            .with_case_insensitive("libgdx", "libGDX")
            .with_exact("SDL 2", "SDL2")
            .with_case_insensitive("ren'py", "Ren'Py")
    }
}

/// Alias tables per normalized field
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Aliases {
    pub keywords: AliasTable,
    pub dependencies: AliasTable,
    pub build_systems: AliasTable,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            keywords: AliasTable::keyword_defaults(),
            dependencies: AliasTable::dependency_defaults(),
            build_systems: AliasTable::new(),
        }
    }
}

/// Paths and vocabularies shared by all maintenance steps
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Repository root; every relative path below is resolved against it
    #[serde(skip)]
    pub root: PathBuf,
    /// Directory holding one text file per entry
    pub entries_dir: String,
    /// Document with the autogenerated index block
    pub overview_file: PathBuf,
    pub statistics_file: PathBuf,
    pub json_export: PathBuf,
    pub archives_export: PathBuf,
    pub git_list_export: PathBuf,
    /// Entry template used for leftover detection
    pub template_file: PathBuf,
    /// Flat list files sorted in place
    pub list_files: Vec<PathBuf>,
    /// File name prefix that marks generated listing files
    pub listing_prefix: String,
    /// Base URL of the entries directory in the public repository
    pub entry_base_url: String,
    /// Category keywords; the first one found in an entry wins
    pub recommended_keywords: Vec<String>,
    pub noise_keywords: Vec<String>,
    pub valid_states: Vec<String>,
    pub popular_hosts: Vec<String>,
    pub ignored_links: Vec<String>,
    pub aliases: Aliases,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            entries_dir: "games".to_string(),
            overview_file: PathBuf::from("README.md"),
            statistics_file: PathBuf::from("statistics.md"),
            json_export: PathBuf::from("docs/data.json"),
            archives_export: PathBuf::from("tools/archives.json"),
            git_list_export: PathBuf::from("tools/git_repositories.json"),
            template_file: PathBuf::from("template.md"),
            list_files: vec![
                PathBuf::from("tools/backlog.txt"),
                PathBuf::from("tools/rejected.txt"),
            ],
            listing_prefix: "_".to_string(),
            entry_base_url: "https://github.com/Trilarion/opensourcegames/blob/master/games/"
                .to_string(),
            recommended_keywords: owned(DEFAULT_RECOMMENDED_KEYWORDS),
            noise_keywords: owned(DEFAULT_NOISE_KEYWORDS),
            valid_states: owned(DEFAULT_VALID_STATES),
            popular_hosts: owned(DEFAULT_POPULAR_HOSTS),
            ignored_links: owned(DEFAULT_IGNORED_LINKS),
            aliases: Aliases::default(),
        }
    }
}

impl CatalogConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Loads the configuration for the repository at `root`.
    ///
    /// An explicit `config_path` must exist. Without one, `catalog.toml` in the
    /// root is used when present and defaults otherwise.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(path) if !path.is_file() => {
                return Err(CatalogError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(content)?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.recommended_keywords.is_empty() {
            return Err(CatalogError::Config(
                "recommended_keywords must not be empty".to_string(),
            ));
        }
        if self.listing_prefix.is_empty() {
            return Err(CatalogError::Config(
                "listing_prefix must not be empty".to_string(),
            ));
        }
        if self.valid_states.is_empty() {
            return Err(CatalogError::Config(
                "valid_states must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn entries_path(&self) -> PathBuf {
        self.root.join(&self.entries_dir)
    }

    /// Resolves a configured path against the repository root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Recommended keyword equal to `keyword` ignoring case
    pub fn recommended_spelling(&self, keyword: &str) -> Option<&str> {
        let folded = keyword.to_lowercase();
        self.recommended_keywords
            .iter()
            .find(|k| k.to_lowercase() == folded)
            .map(String::as_str)
    }
}
