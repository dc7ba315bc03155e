use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use crate::github::RepoRef;
use crate::models::{DEFAULT_PER_PAGE, PageParams};

const DEFAULT_OWNER: &str = "krpzzr";
const DEFAULT_REPO: &str = "git-commit-history-viewer";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Options shared by every subcommand. CLI values win over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Repository owner
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Branch whose history is shown
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

/// Keys accepted in the TOML file. The token is deliberately not one of them.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct FileConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub api_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub per_page: Option<u32>,
    pub theme_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse TOML configuration file")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub repo: RepoRef,
    pub api_url: String,
    pub token: Option<String>,
    pub cache_ttl: Duration,
    pub per_page: u32,
    pub theme_file: PathBuf,
}

impl AppConfig {
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::from_toml(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(args.clone(), file))
    }

    pub fn resolve(args: ConfigArgs, file: FileConfig) -> Self {
        let repo = RepoRef {
            owner: args
                .owner
                .or(file.owner)
                .unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            name: args
                .repo
                .or(file.repo)
                .unwrap_or_else(|| DEFAULT_REPO.to_string()),
            branch: args
                .branch
                .or(file.branch)
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        };

        let per_page = PageParams::first(file.per_page.unwrap_or(DEFAULT_PER_PAGE)).per_page;

        Self {
            repo,
            api_url: args
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: args.token.filter(|t| !t.trim().is_empty()),
            cache_ttl: Duration::from_secs(file.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS)),
            per_page,
            theme_file: file
                .theme_file
                .unwrap_or_else(|| std::env::temp_dir().join("commit-viewer-theme")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_fixed_repository() {
        let config = AppConfig::resolve(ConfigArgs::default(), FileConfig::default());

        assert_eq!(config.repo.slug(), "krpzzr/git-commit-history-viewer");
        assert_eq!(config.repo.branch, "main");
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.per_page, 20);
        assert!(config.token.is_none());
    }

    #[test]
    fn cli_wins_over_file() {
        let args = ConfigArgs {
            owner: Some("cli-owner".to_string()),
            token: Some("secret".to_string()),
            ..ConfigArgs::default()
        };
        let file = FileConfig {
            owner: Some("file-owner".to_string()),
            repo: Some("file-repo".to_string()),
            per_page: Some(500),
            ..FileConfig::default()
        };

        let config = AppConfig::resolve(args, file);
        assert_eq!(config.repo.owner, "cli-owner");
        assert_eq!(config.repo.name, "file-repo");
        assert_eq!(config.per_page, 100, "page size is clamped");
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn empty_token_is_absent() {
        let args = ConfigArgs {
            token: Some(String::new()),
            ..ConfigArgs::default()
        };
        assert!(AppConfig::resolve(args, FileConfig::default()).token.is_none());
    }

    #[test]
    fn parses_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        fs::write(
            &path,
            "owner = \"octo\"\nbranch = \"develop\"\ncache_ttl_secs = 60\n",
        )
        .unwrap();

        let file = FileConfig::from_toml(&path).unwrap();
        let config = AppConfig::resolve(ConfigArgs::default(), file);
        assert_eq!(config.repo.owner, "octo");
        assert_eq!(config.repo.branch, "develop");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let err = FileConfig::from_toml("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }
}
