use crate::core::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_secret, validate_socket_addr, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://fablab.ucontinental.edu.pe/wp-json/gf/v2/forms/9/entries";
pub const PASSWORD_ENV: &str = "APP_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub data: DataConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub cors_origins: Vec<String>,
    /// 編譯好的前端，作為 fallback 服務
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:8000".to_string(),
            ],
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub username: String,
    pub page_size: usize,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: crate::auth::DEFAULT_USERNAME.to_string(),
            page_size: 100,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: String,
    pub entries_file: String,
    pub dictionary_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            entries_file: "datos_formularios.csv".to_string(),
            dictionary_file: "diccionario.csv".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: std::env::var(PASSWORD_ENV).unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DashboardConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置；缺少的區塊使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${APP_PASSWORD})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn entries_path(&self) -> std::path::PathBuf {
        Path::new(&self.data.path).join(&self.data.entries_file)
    }
}

impl ConfigProvider for DashboardConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn source_username(&self) -> &str {
        &self.source.username
    }

    fn source_password(&self) -> &str {
        &self.auth.password
    }

    fn page_size(&self) -> usize {
        self.source.page_size
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn entries_file(&self) -> &str {
        &self.data.entries_file
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.server.bind)?;
        for origin in &self.server.cors_origins {
            validate_url("server.cors_origins", origin)?;
        }
        if let Some(dir) = &self.server.static_dir {
            validate_path("server.static_dir", dir)?;
        }

        validate_url("source.endpoint", &self.source.endpoint)?;
        validate_positive_number("source.page_size", self.source.page_size, 1)?;
        validate_positive_number("source.timeout_seconds", self.source.timeout_seconds as usize, 1)?;

        validate_path("data.path", &self.data.path)?;
        validate_path("data.entries_file", &self.data.entries_file)?;
        validate_path("data.dictionary_file", &self.data.dictionary_file)?;

        validate_secret("auth.password", &self.auth.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let toml_content = r#"
[server]
bind = "127.0.0.1:9000"

[auth]
password = "abcd efgh"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.source.username, "multimediafalab");
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.entries_file(), "datos_formularios.csv");
        assert_eq!(config.source_password(), "abcd efgh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TRL_TEST_DATA_DIR", "/srv/trl");

        let toml_content = r#"
[data]
path = "${TRL_TEST_DATA_DIR}"
dictionary_file = "${TRL_TEST_UNSET_VAR}"
"#;

        let config = DashboardConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data.path, "/srv/trl");
        assert_eq!(config.data.dictionary_file, "${TRL_TEST_UNSET_VAR}");
        assert_eq!(
            config.entries_path(),
            Path::new("/srv/trl").join("datos_formularios.csv")
        );

        std::env::remove_var("TRL_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = DashboardConfig::from_toml_str(
            "[source]\nendpoint = \"not-a-url\"\n[auth]\npassword = \"x\"\n",
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let unresolved = DashboardConfig::from_toml_str(
            "[auth]\npassword = \"${TRL_TEST_MISSING_PASSWORD}\"\n",
        )
        .unwrap();
        assert!(matches!(
            unresolved.validate(),
            Err(DashboardError::InvalidConfigValueError { .. })
        ));

        let bad_bind = DashboardConfig::from_toml_str(
            "[server]\nbind = \"localhost\"\n[auth]\npassword = \"x\"\n",
        )
        .unwrap();
        assert!(bad_bind.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_validation_error() {
        let err = DashboardConfig::from_toml_str("[server\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\npage_size = 25\ntimeout_seconds = 5\n")
            .unwrap();

        let config = DashboardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.request_timeout_seconds(), 5);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config =
            DashboardConfig::from_toml_str("[auth]\npassword = \"super-secret\"\n").unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
