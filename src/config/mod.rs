pub mod toml_config;

use crate::domain::model::{Candidate, RepositoryRef};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_OWNER: &str = "babel";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_PACKAGES_DIR: &str = "packages";
pub const DEFAULT_OUTPUT_PATH: &str = "./docs-v7";
pub const DEFAULT_SCOPE: &str = "babel";
pub const DEFAULT_STRIP_LINES: usize = 4;
pub const CONCURRENT_REQUESTS: usize = 20;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "readme-sync")]
#[command(about = "Download package READMEs from GitHub and prepend docs front matter")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory the Markdown files are written to")]
    pub output_path: Option<String>,

    #[arg(long, help = "Base URL of the GitHub contents API")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Base URL of the raw content host")]
    pub raw_base_url: Option<String>,

    #[arg(long, help = "Maximum number of README downloads in flight")]
    pub concurrent_requests: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// 合併預設值、TOML 檔與命令列參數後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub api_base_url: String,
    pub raw_base_url: String,
    pub packages_dir: String,
    pub output_path: String,
    pub sources: Vec<RepositoryRef>,
    pub special_cases: Vec<Candidate>,
    pub scope: String,
    pub allowed_kinds: Vec<String>,
    pub strip_lines: usize,
    pub concurrent_requests: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            sources: vec![
                RepositoryRef::new(DEFAULT_OWNER, "babel", "6.x"),
                RepositoryRef::new(DEFAULT_OWNER, "minify", DEFAULT_BRANCH),
            ],
            // 目錄結構不符合慣例的套件
            special_cases: vec![
                Candidate::new("babel-preset-env", "/babel/babel-preset-env/1.x/README.md"),
                Candidate::new("babylon", "/babel/babylon/master/README.md"),
            ],
            scope: DEFAULT_SCOPE.to_string(),
            allowed_kinds: vec![
                "preset".to_string(),
                "plugin".to_string(),
                "proposal".to_string(),
            ],
            strip_lines: DEFAULT_STRIP_LINES,
            concurrent_requests: CONCURRENT_REQUESTS,
        }
    }
}

impl SyncConfig {
    pub fn from_toml(toml: &TomlConfig) -> Self {
        let mut config = Self::default();
        toml.apply_to(&mut config);
        config
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_toml(&TomlConfig::from_file(path)?)
            }
            None => Self::default(),
        };

        // 命令列參數優先
        if let Some(output_path) = &cli.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(api_base_url) = &cli.api_base_url {
            config.api_base_url = api_base_url.clone();
        }
        if let Some(raw_base_url) = &cli.raw_base_url {
            config.raw_base_url = raw_base_url.clone();
        }
        if let Some(concurrent_requests) = cli.concurrent_requests {
            config.concurrent_requests = concurrent_requests;
        }

        Ok(config)
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_url("raw_base_url", &self.raw_base_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validate_non_empty_string("naming.scope", &self.scope)?;
        validate_non_empty_list("naming.allowed_kinds", &self.allowed_kinds)?;
        validate_non_empty_list("sources", &self.sources)?;

        for (index, source) in self.sources.iter().enumerate() {
            validate_non_empty_string(&format!("sources[{}].owner", index), &source.owner)?;
            validate_non_empty_string(&format!("sources[{}].repo", index), &source.repo)?;
            validate_non_empty_string(&format!("sources[{}].branch", index), &source.branch)?;
        }

        for (index, kind) in self.allowed_kinds.iter().enumerate() {
            validate_non_empty_string(&format!("naming.allowed_kinds[{}]", index), kind)?;
        }

        Ok(())
    }
}

impl ConfigProvider for SyncConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn raw_base_url(&self) -> &str {
        &self.raw_base_url
    }

    fn packages_dir(&self) -> &str {
        &self.packages_dir
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sources(&self) -> &[RepositoryRef] {
        &self.sources
    }

    fn special_cases(&self) -> &[Candidate] {
        &self.special_cases
    }

    fn scope(&self) -> &str {
        &self.scope
    }

    fn allowed_kinds(&self) -> &[String] {
        &self.allowed_kinds
    }

    fn strip_lines(&self) -> usize {
        self.strip_lines
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}
