use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid naming pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Could not retrieve package listing for {repository}: {source}")]
    ListingError {
        repository: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl SyncError {
    pub fn listing(repository: impl Into<String>, source: SyncError) -> Self {
        SyncError::ListingError {
            repository: repository.into(),
            source: Box::new(source),
        }
    }

    /// 是否屬於設定錯誤（在任何網路請求之前就會失敗）
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::ConfigError { .. }
                | SyncError::InvalidConfigValueError { .. }
                | SyncError::MissingConfigError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::ListingError { .. } | SyncError::ApiError(_) => {
                "Check network access to the GitHub API; set GITHUB_CLIENT_ID and GITHUB_CLIENT_SECRET to raise the rate limit"
            }
            SyncError::IoError(_) => "Check that the output directory exists and is writable",
            SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::UrlError(_)
            | SyncError::PatternError(_) => "Review the command line flags and the TOML configuration file",
            SyncError::SerializationError(_) => {
                "The listing response was not a JSON array of directory entries"
            }
            SyncError::TaskError(_) | SyncError::ProcessingError { .. } => {
                "A download task failed unexpectedly; rerun with --verbose for details"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_error_names_repository() {
        let inner = SyncError::ConfigError {
            message: "boom".to_string(),
        };
        let err = SyncError::listing("babel/minify@master", inner);

        assert_eq!(
            err.to_string(),
            "Could not retrieve package listing for babel/minify@master: Configuration error: boom"
        );
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_errors_are_classified() {
        let err = SyncError::MissingConfigError {
            field: "sources".to_string(),
        };
        assert!(err.is_config_error());
        assert!(err.recovery_suggestion().contains("TOML"));
    }
}
