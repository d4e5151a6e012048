use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("GraphQL query failed: {}", messages.join("; "))]
    GraphqlError { messages: Vec<String> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 建置失敗時 CLI 的結束碼；任何錯誤都不會回傳 0
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(_) | SiteError::GraphqlError { .. } => ErrorCategory::Network,
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::SerializationError(_) | SiteError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            SiteError::IoError(_) | SiteError::ZipError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 遠端 API 暫時性失敗，重跑通常即可
            SiteError::ApiError(_) | SiteError::GraphqlError { .. } => ErrorSeverity::Medium,
            SiteError::SerializationError(_) | SiteError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorSeverity::High,
            SiteError::IoError(_) | SiteError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ApiError(e) if e.is_timeout() => {
                "The remote API did not answer in time".to_string()
            }
            SiteError::ApiError(e) => match e.status() {
                Some(status) => format!("The remote API answered with status {}", status),
                None => "Could not reach the remote API".to_string(),
            },
            SiteError::GraphqlError { messages } => {
                format!("The GraphQL API rejected the query: {}", messages.join("; "))
            }
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
            SiteError::SerializationError(_) | SiteError::ProcessingError { .. } => {
                format!("Unexpected data from the API: {}", self)
            }
            SiteError::IoError(_) | SiteError::ZipError(_) => {
                format!("Could not write the generated site: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the configured endpoints, then run the build again",
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::Data => "The API response format may have changed; run with --verbose to inspect it",
            ErrorCategory::Storage => "Make sure the output path exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SiteError::MissingConfigError {
            field: "beers.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("beers.endpoint"));
    }

    #[test]
    fn test_every_severity_exits_non_zero() {
        for severity in [
            ErrorSeverity::Low,
            ErrorSeverity::Medium,
            ErrorSeverity::High,
            ErrorSeverity::Critical,
        ] {
            assert_ne!(severity.exit_code(), 0, "{:?}", severity);
        }
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_graphql_error_joins_messages() {
        let err = SiteError::GraphqlError {
            messages: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "GraphQL query failed: first; second");
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: SiteError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.severity() > ErrorSeverity::High);
    }
}
