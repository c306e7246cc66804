//! Gateway configuration types.
//!
//! Defines the per-provider settings consumed read-only by the gateway.
//! File discovery and loading live in the CLI layer; environment overrides
//! are applied here so every entry point resolves them the same way.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::error::GatewayError;
use super::types::{Credential, InvocationConfig, Provider};
use crate::env;

/// Settings for the local model daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OllamaSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Daemon address, overridable via OLLAMA_BASE_URL
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Seconds allowed for the reachability probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Model used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Settings for the hosted inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HuggingFaceSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_huggingface_base_url")]
    pub base_url: String,

    /// Optional access token; improves rate limits when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Credential>,

    /// Model used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Settings for the keyed chat service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Required before the provider is considered usable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Credential>,

    /// Model used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Request defaults applied when the caller does not override them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationDefaults {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output")]
    pub max_output: u32,

    #[serde(default = "default_invoke_timeout_secs")]
    pub timeout_secs: u64,
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub ollama: OllamaSettings,

    #[serde(default)]
    pub huggingface: HuggingFaceSettings,

    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub defaults: InvocationDefaults,
}

fn default_true() -> bool {
    true
}

fn default_ollama_base_url() -> String {
    env::defaults::OLLAMA_BASE_URL.to_string()
}

fn default_huggingface_base_url() -> String {
    env::defaults::HUGGINGFACE_BASE_URL.to_string()
}

fn default_gemini_base_url() -> String {
    env::defaults::GEMINI_BASE_URL.to_string()
}

fn default_probe_timeout_secs() -> u64 {
    env::defaults::PROBE_TIMEOUT_SECS
}

fn default_invoke_timeout_secs() -> u64 {
    env::defaults::INVOKE_TIMEOUT_SECS
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output() -> u32 {
    200
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_ollama_base_url(),
            probe_timeout_secs: default_probe_timeout_secs(),
            default_model: None,
        }
    }
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_huggingface_base_url(),
            token: None,
            default_model: None,
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_gemini_base_url(),
            api_key: None,
            default_model: None,
        }
    }
}

impl Default for InvocationDefaults {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output: default_max_output(),
            timeout_secs: default_invoke_timeout_secs(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaSettings::default(),
            huggingface: HuggingFaceSettings::default(),
            gemini: GeminiSettings::default(),
            defaults: InvocationDefaults::default(),
        }
    }
}

impl GatewayConfig {
    /// Overlay recognized environment variables onto the loaded file values.
    /// Empty variables are treated as unset.
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = read_env(env::vars::OLLAMA_BASE_URL) {
            self.ollama.base_url = base_url;
        }
        if let Some(token) = read_env(env::vars::HUGGINGFACE_TOKEN) {
            self.huggingface.token = Some(Credential::new(token));
        }
        if let Some(key) = read_env(env::vars::GOOGLE_API_KEY) {
            self.gemini.api_key = Some(Credential::new(key));
        }
    }

    /// Check that every configured base URL parses and the timeouts and
    /// output bound are positive. Runs once at startup; nothing downstream
    /// has to revalidate.
    pub fn validate(&self) -> Result<(), GatewayError> {
        for provider in Provider::ALL {
            let base_url = self.base_url(provider);
            Url::parse(base_url).map_err(|e| GatewayError::InvalidBaseUrl {
                provider,
                message: format!("'{}': {}", base_url, e),
            })?;
        }
        if self.defaults.timeout_secs == 0 || self.ollama.probe_timeout_secs == 0 {
            return Err(GatewayError::NonPositiveTimeout);
        }
        if self.defaults.max_output == 0 {
            return Err(GatewayError::ZeroMaxOutput);
        }
        Ok(())
    }

    pub fn base_url(&self, provider: Provider) -> &str {
        match provider {
            Provider::LocalDaemon => &self.ollama.base_url,
            Provider::HostedEndpoint => &self.huggingface.base_url,
            Provider::KeyedChatService => &self.gemini.base_url,
        }
    }

    pub fn enabled(&self, provider: Provider) -> bool {
        match provider {
            Provider::LocalDaemon => self.ollama.enabled,
            Provider::HostedEndpoint => self.huggingface.enabled,
            Provider::KeyedChatService => self.gemini.enabled,
        }
    }

    pub fn credential(&self, provider: Provider) -> Option<&Credential> {
        match provider {
            Provider::LocalDaemon => None,
            Provider::HostedEndpoint => self.huggingface.token.as_ref(),
            Provider::KeyedChatService => self.gemini.api_key.as_ref(),
        }
    }

    /// Configured default model for a provider, when one is set
    pub fn default_model(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::LocalDaemon => self.ollama.default_model.as_deref(),
            Provider::HostedEndpoint => self.huggingface.default_model.as_deref(),
            Provider::KeyedChatService => self.gemini.default_model.as_deref(),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.ollama.probe_timeout_secs)
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.timeout_secs)
    }

    /// Assemble an invocation config for one provider/model pair from the
    /// configured defaults and credentials
    pub fn invocation_config(
        &self,
        provider: Provider,
        model: impl Into<String>,
    ) -> InvocationConfig {
        InvocationConfig {
            provider,
            model: model.into(),
            temperature: self.defaults.temperature,
            max_output: self.defaults.max_output,
            credential: self.credential(provider).cloned(),
            timeout: self.invoke_timeout(),
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.defaults.temperature, 0.7);
        assert_eq!(config.defaults.max_output, 200);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [ollama]
            base_url = "http://10.0.0.5:11434"
            "#,
        )
        .unwrap();

        assert_eq!(config.ollama.base_url, "http://10.0.0.5:11434");
        assert!(config.ollama.enabled);
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = GatewayConfig::default();
        config.ollama.base_url = "not a url".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidBaseUrl {
                provider: Provider::LocalDaemon,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = GatewayConfig::default();
        config.defaults.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(GatewayError::NonPositiveTimeout)
        ));
    }

    #[test]
    fn test_zero_probe_timeout_rejected() {
        let mut config = GatewayConfig::default();
        config.ollama.probe_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(GatewayError::NonPositiveTimeout)
        ));
    }

    #[test]
    fn test_default_model_per_provider() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [ollama]
            default_model = "llama3.2"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_model(Provider::LocalDaemon), Some("llama3.2"));
        assert!(config.default_model(Provider::HostedEndpoint).is_none());
        assert!(config.default_model(Provider::KeyedChatService).is_none());
    }

    #[test]
    fn test_credential_lookup_per_provider() {
        let mut config = GatewayConfig::default();
        config.gemini.api_key = Some(Credential::new("AIza-test"));

        assert!(config.credential(Provider::LocalDaemon).is_none());
        assert!(config.credential(Provider::HostedEndpoint).is_none());
        assert_eq!(
            config
                .credential(Provider::KeyedChatService)
                .map(|c| c.expose()),
            Some("AIza-test")
        );
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = GatewayConfig::default();
        config.huggingface.token = Some(Credential::new("hf_token"));
        let toml_string = toml::to_string_pretty(&config).unwrap();

        let loaded: GatewayConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(loaded, config);
    }
}
