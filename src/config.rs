//! TOML configuration with environment-variable fallbacks for secrets.

use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub coaching: CoachingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Falls back to `TELEGRAM_BOT_TOKEN` when empty.
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API key for the chat-completions endpoint. Falls back to
    /// `PROVIDER_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachingConfig {
    #[serde(default = "default_rate_limit_minutes")]
    pub rate_limit_minutes: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            rate_limit_minutes: default_rate_limit_minutes(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_request_timeout_secs() -> u64 {
    8
}

fn default_db_path() -> String {
    "coachbot.db".to_string()
}

fn default_rate_limit_minutes() -> i64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl AppConfig {
    /// Load from a TOML file, then fill secrets from the environment where
    /// the file left them empty. Missing tokens are a startup error, not a
    /// runtime surprise.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path, e))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path, e))?;

        if config.telegram.bot_token.is_empty() {
            if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
                config.telegram.bot_token = token;
            }
        }
        if config.provider.api_key.is_empty() {
            if let Ok(key) = std::env::var("PROVIDER_API_KEY") {
                config.provider.api_key = key;
            }
        }

        if config.telegram.bot_token.is_empty() {
            anyhow::bail!(
                "No Telegram bot token: set telegram.bot_token in {} or TELEGRAM_BOT_TOKEN",
                path
            );
        }
        if config.provider.api_key.is_empty() {
            anyhow::bail!(
                "No provider API key: set provider.api_key in {} or PROVIDER_API_KEY",
                path
            );
        }

        info!(
            model = %config.provider.model,
            db_path = %config.store.db_path,
            rate_limit_minutes = config.coaching.rate_limit_minutes,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [telegram]
            bot_token = "123:abc"

            [provider]
            api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.provider.model, "deepseek-chat");
        assert_eq!(config.provider.request_timeout_secs, 8);
        assert_eq!(config.store.db_path, "coachbot.db");
        assert_eq!(config.coaching.rate_limit_minutes, 60);
        assert_eq!(config.coaching.temperature, 0.7);
        assert_eq!(config.coaching.max_tokens, 1000);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [telegram]
            bot_token = "123:abc"

            [provider]
            api_key = "sk-test"
            base_url = "http://localhost:8080/v1"
            model = "test-model"

            [store]
            db_path = "/tmp/test.db"

            [coaching]
            rate_limit_minutes = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.base_url, "http://localhost:8080/v1");
        assert_eq!(config.provider.model, "test-model");
        assert_eq!(config.store.db_path, "/tmp/test.db");
        assert_eq!(config.coaching.rate_limit_minutes, 5);
    }
}
