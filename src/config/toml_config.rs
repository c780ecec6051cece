use crate::core::projector::{ColumnPolicy, MatchMode};
use crate::utils::error::{Result, ViewerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key may be omitted; command-line flags win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    pub page: Option<u32>,
    pub match_mode: Option<MatchMode>,
    pub columns: Option<ColumnPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    pub dir: Option<String>,
}

impl TomlConfig {
    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ViewerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ViewerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` references; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ViewerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "https://calls.example.com"
timeout_seconds = 10

[view]
page = 3
match_mode = "substring"
columns = "filtered"

[export]
dir = "./out"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url.as_deref(), Some("https://calls.example.com"));
        assert_eq!(config.api.timeout_seconds, Some(10));
        assert_eq!(config.view.page, Some(3));
        assert_eq!(config.view.match_mode, Some(MatchMode::Substring));
        assert_eq!(config.view.columns, Some(ColumnPolicy::Filtered));
        assert_eq!(config.export.dir.as_deref(), Some("./out"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.base_url.is_none());
        assert!(config.view.match_mode.is_none());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("CALL_ANALYZER_TEST_HOST", "http://10.0.0.5:9000");
        let config = TomlConfig::from_toml_str(
            "[api]\nbase_url = \"${CALL_ANALYZER_TEST_HOST}\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://10.0.0.5:9000"));

        let untouched = TomlConfig::from_toml_str(
            "[api]\nbase_url = \"${CALL_ANALYZER_UNSET_VARIABLE}\"\n",
        )
        .unwrap();
        assert_eq!(
            untouched.api.base_url.as_deref(),
            Some("${CALL_ANALYZER_UNSET_VARIABLE}")
        );
    }

    #[test]
    fn test_unknown_keys_and_values_are_rejected() {
        assert!(TomlConfig::from_toml_str("[view]\nmatch_mode = \"fuzzy\"\n").is_err());
        assert!(TomlConfig::from_toml_str("[api]\nbase = \"x\"\n").is_err());
    }
}
