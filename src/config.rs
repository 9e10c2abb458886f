use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use log::{debug, info};
use serde::Deserialize;

use crate::summarize::{DEFAULT_PROMPT, Provider};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_LANGUAGES: [&str; 2] = ["en", "de"];

/// Credential bundle mounted into the container image
pub const CONTAINER_CREDENTIALS: &str = "/app/credentials.json";

/// Contents of the optional config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub languages: Option<Vec<String>>,
    pub bind: Option<String>,
    pub prompt: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content).wrap_err_with(|| format!("invalid config {}", path.display()))?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// Values given on the command line; these win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub bind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    /// Set when running inside the container image. Informational only:
    /// it is logged and shown with `--verbose`, requests authenticate with `api_key`.
    pub credentials_file: Option<PathBuf>,
}

/// Returns `path` when a credential bundle is present there.
pub fn detect_credentials_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        info!("Using credential bundle at {}", path.display());
        Some(path.to_path_buf())
    } else {
        debug!("No credential bundle at {}, not running in a container", path.display());
        None
    }
}

/// Process-wide settings, resolved once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub languages: Vec<String>,
    pub bind: SocketAddr,
    pub prompt: String,
    pub credentials: Credentials,
}

impl AppConfig {
    /// Merge CLI overrides, environment and config file, in that order of precedence.
    pub fn resolve<E>(file: Config, overrides: &Overrides, env: E, credentials_path: &Path) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let model = overrides
            .model
            .clone()
            .or_else(|| env("YTSUM_MODEL"))
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind = overrides
            .bind
            .clone()
            .or_else(|| env("YTSUM_BIND"))
            .or(file.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind.parse().wrap_err_with(|| format!("invalid bind address: {bind}"))?;

        let languages = file
            .languages
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect());

        let prompt = file.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        let provider = Provider::for_model(&model);
        let api_key = env(provider.api_key_var())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                eyre!(
                    "{} environment variable not set (required for {} model {model})",
                    provider.api_key_var(),
                    provider.name()
                )
            })?;

        Ok(Self {
            model,
            languages,
            bind,
            prompt,
            credentials: Credentials {
                api_key,
                credentials_file: detect_credentials_file(credentials_path),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    fn no_bundle() -> PathBuf {
        PathBuf::from("/nonexistent/ytsum/credentials.json")
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
model = "claude-sonnet-4-6"
languages = ["de", "en"]
bind = "0.0.0.0:9000"
prompt = "Summarize:"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.as_deref(), Some("claude-sonnet-4-6"));
        assert_eq!(config.languages, Some(vec!["de".to_string(), "en".to_string()]));
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.prompt.as_deref(), Some("Summarize:"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.model.is_none());
        assert!(config.languages.is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let config = Config::load_from(&no_bundle()).unwrap();
        assert!(config.model.is_none());
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(
            Config::default(),
            &Overrides::default(),
            env_from(&[("GOOGLE_API_KEY", "g-key")]),
            &no_bundle(),
        )
        .unwrap();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.languages, vec!["en".to_string(), "de".to_string()]);
        assert_eq!(config.bind, "127.0.0.1:8501".parse::<SocketAddr>().unwrap());
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert_eq!(config.credentials.api_key, "g-key");
        assert!(config.credentials.credentials_file.is_none());
    }

    #[test]
    fn test_resolve_precedence() {
        let file = Config {
            model: Some("gemini-pro".to_string()),
            bind: Some("127.0.0.1:1000".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            model: Some("gpt-4o".to_string()),
            bind: None,
        };
        let config = AppConfig::resolve(
            file,
            &overrides,
            env_from(&[
                ("YTSUM_MODEL", "claude-sonnet-4-6"),
                ("YTSUM_BIND", "127.0.0.1:2000"),
                ("OPENAI_API_KEY", "o-key"),
            ]),
            &no_bundle(),
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.bind.port(), 2000);
        assert_eq!(config.credentials.api_key, "o-key");
    }

    #[test]
    fn test_resolve_missing_api_key() {
        let err = AppConfig::resolve(Config::default(), &Overrides::default(), env_from(&[]), &no_bundle()).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_resolve_invalid_bind() {
        let overrides = Overrides {
            bind: Some("not-an-address".to_string()),
            ..Default::default()
        };
        let result = AppConfig::resolve(
            Config::default(),
            &overrides,
            env_from(&[("GOOGLE_API_KEY", "g-key")]),
            &no_bundle(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_languages_fall_back_to_default() {
        let file = Config {
            languages: Some(vec![]),
            ..Default::default()
        };
        let config =
            AppConfig::resolve(file, &Overrides::default(), env_from(&[("GOOGLE_API_KEY", "k")]), &no_bundle()).unwrap();
        assert_eq!(config.languages.len(), 2);
    }

    #[test]
    fn test_detect_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        assert!(detect_credentials_file(&path).is_none());

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(detect_credentials_file(&path), Some(path.clone()));

        let config = AppConfig::resolve(
            Config::default(),
            &Overrides::default(),
            env_from(&[("GOOGLE_API_KEY", "k")]),
            &path,
        )
        .unwrap();
        assert_eq!(config.credentials.credentials_file, Some(path));
    }
}
