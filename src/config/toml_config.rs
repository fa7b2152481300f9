use crate::config::{SyncConfig, DEFAULT_BRANCH, DEFAULT_OWNER};
use crate::domain::model::{Candidate, RepositoryRef};
use crate::utils::error::{Result, SyncError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML 設定檔，所有欄位皆為選填，未填寫時沿用預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub github: Option<GitHubConfig>,
    pub sources: Option<Vec<SourceConfig>>,
    pub special_cases: Option<Vec<SpecialCaseConfig>>,
    pub naming: Option<NamingConfig>,
    pub output: Option<OutputConfig>,
    pub performance: Option<PerformanceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub organization: Option<String>,
    pub api_base_url: Option<String>,
    pub raw_base_url: Option<String>,
    pub packages_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub repo: String,
    pub owner: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCaseConfig {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamingConfig {
    pub scope: Option<String>,
    pub allowed_kinds: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub strip_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub concurrent_requests: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOCS_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn apply_to(&self, config: &mut SyncConfig) {
        let organization = self
            .github
            .as_ref()
            .and_then(|github| github.organization.clone());

        if let Some(github) = &self.github {
            if let Some(api_base_url) = &github.api_base_url {
                config.api_base_url = api_base_url.clone();
            }
            if let Some(raw_base_url) = &github.raw_base_url {
                config.raw_base_url = raw_base_url.clone();
            }
            if let Some(packages_dir) = &github.packages_dir {
                config.packages_dir = packages_dir.clone();
            }
        }

        match &self.sources {
            Some(sources) => {
                let default_owner = organization.as_deref().unwrap_or(DEFAULT_OWNER);
                config.sources = sources
                    .iter()
                    .map(|source| RepositoryRef {
                        owner: source
                            .owner
                            .clone()
                            .unwrap_or_else(|| default_owner.to_string()),
                        repo: source.repo.clone(),
                        branch: source
                            .branch
                            .clone()
                            .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                    })
                    .collect();
            }
            None => {
                if let Some(organization) = &organization {
                    for source in &mut config.sources {
                        source.owner = organization.clone();
                    }
                }
            }
        }

        if let Some(special_cases) = &self.special_cases {
            config.special_cases = special_cases
                .iter()
                .map(|case| Candidate::new(case.name.clone(), case.uri.clone()))
                .collect();
        }

        if let Some(naming) = &self.naming {
            if let Some(scope) = &naming.scope {
                config.scope = scope.clone();
            }
            if let Some(allowed_kinds) = &naming.allowed_kinds {
                config.allowed_kinds = allowed_kinds.clone();
            }
        }

        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                config.output_path = path.clone();
            }
            if let Some(strip_lines) = output.strip_lines {
                config.strip_lines = strip_lines;
            }
        }

        if let Some(concurrent_requests) = self
            .performance
            .as_ref()
            .and_then(|performance| performance.concurrent_requests)
        {
            config.concurrent_requests = concurrent_requests;
        }
    }
}
