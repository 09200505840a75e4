//! External link validation
//!
//! Only run occasionally; every URL costs one network round trip.

use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CatalogConfig;
use crate::entry::walker::file_name;
use crate::entry::EntryWalker;
use crate::error::{CatalogError, Result};

/// URL preceded by whitespace, `<` or `(`
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s<(](https?://[^\s>),]+)").expect("link pattern is valid")
});

/// Without a browser-like agent many hosts answer 403
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const PROGRESS_INTERVAL: usize = 50;
const SOURCEFORGE_GIT: &str = "https://git.code.sf.net/p/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFailure {
    pub file: String,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub checked: usize,
    pub failures: Vec<LinkFailure>,
}

/// Candidate URLs of one entry text in order of appearance
pub fn extract_links(content: &str) -> Vec<String> {
    LINK_PATTERN
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub struct LinkChecker<'a> {
    config: &'a CatalogConfig,
    http: reqwest::Client,
}

impl<'a> LinkChecker<'a> {
    pub fn new(config: &'a CatalogConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(config: &'a CatalogConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build http client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// SourceForge git URLs and configured false positives are not checked
    pub fn should_check(&self, url: &str) -> bool {
        !url.starts_with(SOURCEFORGE_GIT) && !self.config.ignored_links.iter().any(|i| i == url)
    }

    /// Requests `url`, returning a failure reason for non-success answers
    pub async fn check_url(&self, url: &str) -> std::result::Result<(), String> {
        match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => Err(response.status().to_string()),
            Err(e) if e.is_timeout() => Err("timed out".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Checks every link of every entry strictly one after another.
    ///
    /// Failures are logged and collected; they never abort the run.
    pub async fn check_catalog(&self) -> Result<LinkReport> {
        let walker = EntryWalker::new(self.config.listing_prefix.clone());
        let mut report = LinkReport::default();
        let mut seen = HashSet::new();

        for path in walker.walk(&self.config.entries_path())? {
            let file = file_name(&path).unwrap_or_default().to_string();
            let content = fs::read_to_string(&path)?;

            for url in extract_links(&content) {
                if !self.should_check(&url) || !seen.insert(url.clone()) {
                    continue;
                }
                if let Err(reason) = self.check_url(&url).await {
                    tracing::warn!("{}: {} - {}", file, url, reason);
                    report.failures.push(LinkFailure {
                        file: file.clone(),
                        url,
                        reason,
                    });
                }

                report.checked += 1;
                if report.checked % PROGRESS_INTERVAL == 0 {
                    tracing::info!("{} links checked", report.checked);
                }
            }
        }

        tracing::info!(
            "Checked {} links, {} failed",
            report.checked,
            report.failures.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links() {
        let content = "# Game\n\n- Home: https://game.org, http://mirror.org/x\n\
                       See [site](https://site.org/a) or <https://b.org/c>.\n\
                       inlinehttps://not-a-link.org\n";
        assert_eq!(
            extract_links(content),
            vec![
                "https://game.org",
                "http://mirror.org/x",
                "https://site.org/a",
                "https://b.org/c",
            ]
        );
    }

    #[test]
    fn test_should_check_skips_ignored() {
        let config = CatalogConfig::default();
        let checker = LinkChecker::new(&config).unwrap();
        assert!(!checker.should_check("https://git.code.sf.net/p/game/code"));
        assert!(!checker.should_check("https://git.tukaani.org/xz.git"));
        assert!(checker.should_check("https://github.com/x/y"));
    }

    #[tokio::test]
    async fn test_check_url_reports_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = CatalogConfig::default();
        let checker = LinkChecker::with_timeout(&config, Duration::from_secs(5)).unwrap();
        let result = checker.check_url(&format!("http://127.0.0.1:{}/", port)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_check_catalog_collects_every_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CatalogConfig::with_root(temp_dir.path());
        fs::create_dir_all(config.entries_path()).unwrap();
        fs::write(
            config.entries_path().join("a.md"),
            format!(
                "# A\n\n- Home: http://127.0.0.1:{0}/one, http://127.0.0.1:{0}/two\n",
                port
            ),
        )
        .unwrap();
        fs::write(
            config.entries_path().join("b.md"),
            format!("# B\n\n- Download: http://127.0.0.1:{}/three\n", port),
        )
        .unwrap();

        let report = LinkChecker::with_timeout(&config, Duration::from_secs(5))
            .unwrap()
            .check_catalog()
            .await
            .unwrap();

        assert_eq!(report.checked, 3);
        let failed: Vec<(&str, &str)> = report
            .failures
            .iter()
            .map(|f| (f.file.as_str(), f.url.rsplit('/').next().unwrap_or_default()))
            .collect();
        assert_eq!(failed, vec![("a.md", "one"), ("a.md", "two"), ("b.md", "three")]);
    }

    #[tokio::test]
    async fn test_check_catalog_without_links() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = CatalogConfig::with_root(temp_dir.path());
        fs::create_dir_all(config.entries_path()).unwrap();
        fs::write(config.entries_path().join("a.md"), "# A\n\nno links here\n").unwrap();

        let report = LinkChecker::new(&config).unwrap().check_catalog().await.unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.failures.is_empty());
    }
}
