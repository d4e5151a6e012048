use crate::domain::ports::ConfigProvider;
use crate::pages::PageKind;
use crate::query::QueryConfig;
use crate::utils::error::{Result, SiteError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 站台設定。每個區段都可省略，省略時使用公開 API 與預設值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub beers: BeersSection,
    pub countries: CountriesSection,
    pub query: QuerySection,
    pub http: HttpSection,
    pub load: LoadConfig,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub title: String,
    pub pages: Vec<PageKind>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "punk-atlas".to_string(),
            title: "Punk Atlas".to_string(),
            pages: PageKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeersSection {
    pub endpoint: String,
    pub featured_id: String,
}

impl Default for BeersSection {
    fn default() -> Self {
        Self {
            endpoint: crate::api::punk::PUNK_API_BEERS.to_string(),
            featured_id: "1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountriesSection {
    pub endpoint: String,
    pub featured_code: String,
}

impl Default for CountriesSection {
    fn default() -> Self {
        Self {
            endpoint: crate::api::countries::COUNTRIES_API.to_string(),
            featured_code: "GE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySection {
    pub stale_time_seconds: u64,
    pub cache_time_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub featured_timeout_ms: u64,
}

impl Default for QuerySection {
    fn default() -> Self {
        Self {
            stale_time_seconds: 0,
            cache_time_seconds: 300,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            featured_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: crate::api::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub archive: ArchiveConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "./site".to_string(),
            archive: ArchiveConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub filename: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "site.zip".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub enabled: bool,
    pub level: Option<String>,
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BEERS_ENDPOINT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("site.name", &self.site.name)?;
        validation::validate_url("beers.endpoint", &self.beers.endpoint)?;
        validation::validate_url("countries.endpoint", &self.countries.endpoint)?;
        validation::validate_non_empty_string("beers.featured_id", &self.beers.featured_id)?;
        validation::validate_non_empty_string(
            "countries.featured_code",
            &self.countries.featured_code,
        )?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.load.archive.enabled {
            validation::validate_file_extension(
                "load.archive.filename",
                &self.load.archive.filename,
                "zip",
            )?;
        }

        validation::validate_range("query.retry_attempts", self.query.retry_attempts, 0, 10)?;
        validation::validate_range(
            "query.featured_timeout_ms",
            self.query.featured_timeout_ms,
            1,
            120_000,
        )?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 600)?;

        // 精選區塊的等待時間必須涵蓋所有重試，否則錯誤畫面永遠不會出現
        let retry_budget = self.query_config().total_retry_delay();
        if self.featured_timeout() <= retry_budget {
            return Err(SiteError::InvalidConfigValueError {
                field: "query.featured_timeout_ms".to_string(),
                value: self.query.featured_timeout_ms.to_string(),
                reason: format!(
                    "Must be longer than the retry schedule ({} ms for {} retries)",
                    retry_budget.as_millis(),
                    self.query.retry_attempts
                ),
            });
        }

        if self.log_format().is_none() {
            return Err(SiteError::InvalidConfigValueError {
                field: "logging.format".to_string(),
                value: self.logging.format.clone(),
                reason: "Unsupported format. Valid formats: compact, json".to_string(),
            });
        }

        if self.site.pages.is_empty() {
            return Err(SiteError::MissingConfigError {
                field: "site.pages".to_string(),
            });
        }

        Ok(())
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig::new(
            Duration::from_secs(self.query.stale_time_seconds),
            Duration::from_secs(self.query.cache_time_seconds),
        )
        .with_retry(
            self.query.retry_attempts,
            Duration::from_millis(self.query.retry_delay_ms),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn user_agent(&self) -> &str {
        &self.http.user_agent
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        LogFormat::parse(&self.logging.format)
    }
}

impl ConfigProvider for SiteConfig {
    fn site_name(&self) -> &str {
        &self.site.name
    }

    fn site_title(&self) -> &str {
        &self.site.title
    }

    fn beers_endpoint(&self) -> &str {
        &self.beers.endpoint
    }

    fn countries_endpoint(&self) -> &str {
        &self.countries.endpoint
    }

    fn featured_beer_id(&self) -> &str {
        &self.beers.featured_id
    }

    fn featured_country_code(&self) -> &str {
        &self.countries.featured_code
    }

    fn featured_timeout(&self) -> Duration {
        Duration::from_millis(self.query.featured_timeout_ms)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn archive_filename(&self) -> Option<&str> {
        self.load
            .archive
            .enabled
            .then_some(self.load.archive.filename.as_str())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_public_apis() {
        let config = SiteConfig::from_toml_str("").unwrap();

        assert_eq!(config.beers_endpoint(), "https://api.punkapi.com/v2/beers");
        assert_eq!(config.countries_endpoint(), "https://countries.trevorblades.com/");
        assert_eq!(config.featured_beer_id(), "1");
        assert_eq!(config.featured_country_code(), "GE");
        assert_eq!(config.site.pages, PageKind::ALL.to_vec());
        assert!(config.archive_filename().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[site]
name = "atlas"
title = "Atlas"
pages = ["countries"]

[beers]
endpoint = "http://localhost:9000/v2/beers"
featured_id = "7"

[countries]
endpoint = "http://localhost:9000/graphql"
featured_code = "AD"

[query]
stale_time_seconds = 30
retry_attempts = 0
featured_timeout_ms = 250

[load]
output_path = "./public"

[load.archive]
enabled = true
filename = "bundle.zip"

[logging]
level = "warn"
format = "json"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.site_name(), "atlas");
        assert_eq!(config.site.pages, vec![PageKind::Countries]);
        assert_eq!(config.featured_beer_id(), "7");
        assert_eq!(config.featured_timeout(), Duration::from_millis(250));
        assert_eq!(config.query_config().stale_time, Duration::from_secs(30));
        assert_eq!(config.query_config().retry_attempts, 0);
        assert_eq!(config.archive_filename(), Some("bundle.zip"));
        assert_eq!(config.log_format(), Some(LogFormat::Json));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PUNK_ATLAS_TEST_BEERS", "https://beers.test/v2/beers");

        let toml_content = r#"
[beers]
endpoint = "${PUNK_ATLAS_TEST_BEERS}"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.beers.endpoint, "https://beers.test/v2/beers");

        std::env::remove_var("PUNK_ATLAS_TEST_BEERS");
    }

    #[test]
    fn test_config_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
[countries]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str(
            r#"
[load.archive]
enabled = true
filename = "site.tar"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str(
            r#"
[logging]
format = "pretty"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_featured_timeout_must_cover_retries() {
        let config = SiteConfig::from_toml_str(
            r#"
[query]
retry_attempts = 3
retry_delay_ms = 1000
featured_timeout_ms = 5000
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(SiteError::InvalidConfigValueError { ref field, .. }) if field == "query.featured_timeout_ms"
        ));

        let config = SiteConfig::from_toml_str(
            r#"
[query]
retry_attempts = 3
retry_delay_ms = 1000
featured_timeout_ms = 7000
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let defaults = SiteConfig::default();
        assert!(defaults.featured_timeout() > defaults.query_config().total_retry_delay());
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = SiteConfig::from_toml_str("[beers\nendpoint = ");
        assert!(matches!(
            result,
            Err(SiteError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[site]\nname = \"file-test\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.site.name, "file-test");
    }
}
