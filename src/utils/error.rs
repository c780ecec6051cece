use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ViewerError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ViewerError::ConfigError { .. }
                | ViewerError::InvalidConfigValueError { .. }
                | ViewerError::UrlError(_)
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ViewerError::ApiError(_) => {
                "Check that the API server is reachable and --api-base-url is correct"
            }
            ViewerError::HttpStatusError { .. } => {
                "Check the requested page number and the API server logs"
            }
            ViewerError::CsvError(_) | ViewerError::IoError(_) => {
                "Check that the export directory exists and is writable"
            }
            ViewerError::SerializationError(_) => {
                "The API response is not a {headers, table_data} JSON object"
            }
            ViewerError::UrlError(_) => "Use an absolute http(s) URL such as http://localhost:8000",
            ViewerError::ConfigError { .. } | ViewerError::InvalidConfigValueError { .. } => {
                "Fix the command line flags or the TOML configuration file"
            }
        }
    }

    /// Process exit code: 1 for configuration problems, 2 for I/O and remote failures.
    pub fn exit_code(&self) -> i32 {
        if self.is_config_error() {
            1
        } else {
            2
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_one() {
        let err = ViewerError::InvalidConfigValueError {
            field: "page".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert!(err.is_config_error());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_status_errors_exit_with_two() {
        let err = ViewerError::HttpStatusError {
            status: 502,
            url: "http://localhost/api/transcriptions?page=1".to_string(),
        };
        assert!(!err.is_config_error());
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("502"));
    }
}
