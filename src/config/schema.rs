use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ── Widget config ─────────────────────────────────────────────────

/// Injected configuration for the chat widget.
///
/// The API key is never embedded in source: the host passes one explicitly
/// or lets [`Config::resolve_api_key`] pick it up from the environment.
/// Hosts that keep their own config file can deserialize this straight from
/// their format; every field except the key has a usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key. Required by the time a provider is built.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier, e.g. "gemini-1.5-flash-latest".
    #[serde(default = "default_model")]
    pub model: String,
    /// Provider endpoint root. Overridable so tests can point at a mock
    /// server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard cap on a single generateContent call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Assistant greeting seeded as the first message of every
    /// conversation. Falls back to the built-in greeting when unset.
    #[serde(default)]
    pub greeting: Option<String>,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".into()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            greeting: None,
        }
    }
}

impl Config {
    /// Fill in the API key from the environment when none was set
    /// explicitly.
    ///
    /// Resolution order:
    /// 1. Explicitly set `api_key` (kept as-is)
    /// 2. `GEMINI_API_KEY` environment variable
    /// 3. `GOOGLE_API_KEY` environment variable
    pub fn resolve_api_key(mut self) -> Self {
        let explicit = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from);

        self.api_key = explicit.or_else(|| {
            ["GEMINI_API_KEY", "GOOGLE_API_KEY"].iter().find_map(|var| {
                std::env::var(var)
                    .ok()
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
        });
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .is_none()
        {
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.api_key.is_none());
        assert!(config.greeting.is_none());
    }

    #[test]
    fn validate_rejects_missing_key() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn validate_rejects_blank_key() {
        let config = Config::default().with_api_key("   ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default().with_api_key("key")
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_accepts_complete_config() {
        let config = Config::default().with_api_key("key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_key_wins_over_env() {
        let config = Config::default()
            .with_api_key("explicit")
            .resolve_api_key();
        assert_eq!(config.api_key.as_deref(), Some("explicit"));
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: Config = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.model, "gemini-1.5-flash-latest");
    }
}
