use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{BASE_URL_ENV, Config};

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default location of config.toml
pub fn config_path() -> PathBuf {
    super::config_dir().join("config.toml")
}

/// Read config from a specific path. A missing file yields the defaults.
pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read config from the default location
pub fn read_config() -> Result<Config, ConfigError> {
    read_config_from(&config_path())
}

/// Pick the API base URL: flag, then environment, then config.
/// Trailing slashes are dropped so paths can be appended as-is.
pub fn resolve_base_url(flag: Option<&str>, env: Option<&str>, config: &Config) -> String {
    let raw = flag
        .filter(|s| !s.trim().is_empty())
        .or(env.filter(|s| !s.trim().is_empty()))
        .unwrap_or(&config.api.base_url);
    raw.trim().trim_end_matches('/').to_string()
}

/// [`resolve_base_url`] reading the environment variable itself
pub fn base_url_from_env(flag: Option<&str>, config: &Config) -> String {
    let env = std::env::var(BASE_URL_ENV).ok();
    resolve_base_url(flag, env.as_deref(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::DEFAULT_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = read_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.day_width, 3);
        assert!(config.log.level.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nbase_url = \"https://tasks.example.com/\"\n\n[ui.colors]\nhighlight = \"#112233\"\n",
        )
        .unwrap();
        let config = read_config_from(&path).unwrap();
        assert_eq!(config.api.base_url, "https://tasks.example.com/");
        assert_eq!(config.ui.name_width, 28);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#112233");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        let err = read_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn base_url_precedence() {
        let mut config = Config::default();
        config.api.base_url = "http://config:1/".into();

        assert_eq!(
            resolve_base_url(Some("http://flag:3"), Some("http://env:2"), &config),
            "http://flag:3"
        );
        assert_eq!(
            resolve_base_url(None, Some("http://env:2/"), &config),
            "http://env:2"
        );
        assert_eq!(resolve_base_url(None, Some("  "), &config), "http://config:1");
        assert_eq!(resolve_base_url(None, None, &config), "http://config:1");
    }
}
