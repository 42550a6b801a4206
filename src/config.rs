use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::error::NumberingError;

pub const DEFAULT_FIELD_NAME: &str = "PM.Prio";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub clickup: Option<ClickUpConfig>,
    pub numbering: Option<NumberingConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClickUpConfig {
    #[serde(default, deserialize_with = "secret")]
    pub api_token: Option<SecretString>,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct NumberingConfig {
    pub field_name: Option<String>,
}

impl AppConfig {
    /// Token from the command line (or CLICKUP_API_KEY) wins over the config file.
    pub fn resolve_token(&self, cli_token: Option<String>) -> Result<SecretString, NumberingError> {
        if let Some(token) = cli_token.filter(|t| !t.trim().is_empty()) {
            return Ok(SecretString::from(token));
        }
        self.clickup
            .as_ref()
            .and_then(|c| c.api_token.clone())
            .ok_or(NumberingError::MissingToken)
    }

    pub fn base_url(&self) -> Option<String> {
        self.clickup.as_ref().and_then(|c| c.base_url.clone())
    }

    pub fn field_name(&self, cli_field: Option<String>) -> String {
        cli_field
            .or_else(|| self.numbering.as_ref().and_then(|n| n.field_name.clone()))
            .unwrap_or_else(|| DEFAULT_FIELD_NAME.to_string())
    }
}

fn secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tasknum")
        .join("config.toml")
}

/// Load the config file. A missing file is not an error; defaults apply.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.toml")).unwrap();
        assert!(config.clickup.is_none());
        assert_eq!(config.field_name(None), DEFAULT_FIELD_NAME);
        assert!(matches!(
            config.resolve_token(None),
            Err(NumberingError::MissingToken)
        ));
    }

    #[test]
    fn reads_clickup_and_numbering_sections() {
        let (_dir, path) = write_config(
            r#"
[clickup]
api_token = "pk_from_file"
base_url = "http://localhost:9000/api/v2"

[numbering]
field_name = "Order"
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(
            config.resolve_token(None).unwrap().expose_secret(),
            "pk_from_file"
        );
        assert_eq!(config.base_url().as_deref(), Some("http://localhost:9000/api/v2"));
        assert_eq!(config.field_name(None), "Order");
    }

    #[test]
    fn command_line_overrides_file() {
        let (_dir, path) = write_config("[clickup]\napi_token = \"pk_file\"\n[numbering]\nfield_name = \"Order\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(
            config
                .resolve_token(Some("pk_cli".into()))
                .unwrap()
                .expose_secret(),
            "pk_cli"
        );
        assert_eq!(config.field_name(Some("Rank".into())), "Rank");
    }

    #[test]
    fn blank_cli_token_falls_back_to_file() {
        let (_dir, path) = write_config("[clickup]\napi_token = \"pk_file\"\n");
        let config = load_config(&path).unwrap();
        assert_eq!(
            config.resolve_token(Some("  ".into())).unwrap().expose_secret(),
            "pk_file"
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, path) = write_config("[clickup\napi_token = 3");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
