use super::currency::{ApiCredential, CurrencyCode};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "CCONV_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_version() -> String {
    "v6".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl ExchangeRateProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        ExchangeRateProviderConfig {
            base_url: "https://v6.exchangerate-api.com".to_string(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchangerate: ExchangeRateProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "AUD".to_string(),
            to: "NPR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Loads the config at the default location, or built-in defaults if none exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "cconv", "cconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolves the API credential, preferring `env_override` over the file.
    pub fn api_credential(&self, env_override: Option<String>) -> Result<ApiCredential> {
        let key = env_override
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!("No API key configured. Set `api_key` in the config file or export {API_KEY_ENV}")
            })?;
        ApiCredential::new(key)
    }

    /// Initial currency pair, with optional overrides.
    pub fn initial_pair(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<(CurrencyCode, CurrencyCode)> {
        let from = from.unwrap_or(&self.defaults.from);
        let to = to.unwrap_or(&self.defaults.to);
        Ok((
            from.parse().context("Invalid source currency")?,
            to.parse().context("Invalid target currency")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
api_key: "abc123"
providers:
  exchangerate:
    base_url: "http://example.com/rates"
    timeout_secs: 3
defaults:
  from: "usd"
  to: "EUR"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(
            config.providers.exchangerate.base_url,
            "http://example.com/rates"
        );
        assert_eq!(config.providers.exchangerate.version, "v6");
        assert_eq!(
            config.providers.exchangerate.timeout(),
            Duration::from_secs(3)
        );

        let (from, to) = config.initial_pair(None, None).unwrap();
        assert_eq!(from.as_str(), "USD");
        assert_eq!(to.as_str(), "EUR");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert!(config.api_key.is_none());
        assert_eq!(
            config.providers.exchangerate.base_url,
            "https://v6.exchangerate-api.com"
        );

        let (from, to) = config.initial_pair(None, Some("gbp")).unwrap();
        assert_eq!(from.as_str(), "AUD");
        assert_eq!(to.as_str(), "GBP");
        assert!(config.initial_pair(Some("DOLLAR"), None).is_err());
    }

    #[test]
    fn test_api_credential_resolution() {
        let config = AppConfig {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.api_credential(None).unwrap().expose(),
            "from-file"
        );
        assert_eq!(
            config
                .api_credential(Some("from-env".to_string()))
                .unwrap()
                .expose(),
            "from-env"
        );
        assert_eq!(
            config
                .api_credential(Some("  ".to_string()))
                .unwrap()
                .expose(),
            "from-file"
        );

        let err = AppConfig::default().api_credential(None).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));

        let blank = AppConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.api_credential(None).is_err());
    }
}
