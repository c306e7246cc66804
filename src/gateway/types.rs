use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::env;

/// The closed set of provider families the gateway can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Model daemon running on this machine (Ollama-style REST API)
    LocalDaemon,
    /// Hosted inference endpoint addressed by model id (token optional)
    HostedEndpoint,
    /// Keyed chat service with structured conversations (key required)
    KeyedChatService,
}

impl Provider {
    /// Registry iteration order; also the display order everywhere
    pub const ALL: [Provider; 3] = [
        Provider::LocalDaemon,
        Provider::HostedEndpoint,
        Provider::KeyedChatService,
    ];

    /// Stable machine-readable identifier used on the CLI and in config
    pub fn id(&self) -> &'static str {
        match self {
            Provider::LocalDaemon => "ollama",
            Provider::HostedEndpoint => "huggingface",
            Provider::KeyedChatService => "gemini",
        }
    }

    /// Human-readable label for status and list output
    pub fn label(&self) -> &'static str {
        match self {
            Provider::LocalDaemon => "Ollama (local daemon)",
            Provider::HostedEndpoint => "Hugging Face (hosted endpoint)",
            Provider::KeyedChatService => "Gemini (keyed chat service)",
        }
    }

    /// Whether a credential must be present before a client can be built
    pub fn requires_credential(&self) -> bool {
        matches!(self, Provider::KeyedChatService)
    }

    /// Upper bound of the accepted sampling temperature range (lower is 0.0)
    pub fn max_temperature(&self) -> f32 {
        match self {
            Provider::LocalDaemon | Provider::HostedEndpoint => 1.0,
            Provider::KeyedChatService => 2.0,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "local" | "local-daemon" => Ok(Provider::LocalDaemon),
            "huggingface" | "hf" | "hosted" | "hosted-endpoint" => Ok(Provider::HostedEndpoint),
            "gemini" | "keyed" | "keyed-chat-service" => Ok(Provider::KeyedChatService),
            other => Err(format!(
                "unknown provider '{}' (expected ollama, huggingface, or gemini)",
                other
            )),
        }
    }
}

/// A model offered by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    pub provider: Provider,
}

impl ModelDescriptor {
    pub fn new(provider: Provider, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            provider,
        }
    }

    /// Attach a display name distinct from the model id
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

/// Speaker tag on a request message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message in an invocation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// An access token or API key. Debug and Display never reveal the value;
/// callers that need it on the wire go through [`Credential::expose`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for request headers only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Everything needed to build a client for one provider/model pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationConfig {
    pub provider: Provider,
    pub model: String,
    pub temperature: f32,
    pub max_output: u32,
    pub credential: Option<Credential>,
    pub timeout: Duration,
}

impl InvocationConfig {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_output: 200,
            credential: None,
            timeout: Duration::from_secs(env::defaults::INVOKE_TIMEOUT_SECS),
        }
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The ordered messages for a single model invocation. The settings the
/// invocation runs under live in the validated client, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub id: Uuid,
    pub messages: Vec<Message>,
}

impl InvocationRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages,
        }
    }

    /// Convenience for the common single-question case
    pub fn prompt(question: impl Into<String>) -> Self {
        Self::new(vec![Message::user(question)])
    }

    /// Concatenated user-message text, used for fallbacks and logging lengths
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First system message, if any
    pub fn system_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// Why an invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The deadline elapsed before the backend answered
    Timeout,
    /// The backend could not be reached at all
    Connection,
    /// The backend rejected the credential (or its absence)
    Auth,
    /// The backend throttled the request
    RateLimited,
    /// The backend answered with a server-side error
    Backend,
    /// The backend answered 2xx but the body was not usable
    MalformedResponse,
    /// The caller cancelled before completion (timeout family)
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connection => "connection error",
            FailureKind::Auth => "authentication error",
            FailureKind::RateLimited => "rate limited",
            FailureKind::Backend => "backend error",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of exactly one invocation attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InvocationResult {
    Success {
        text: String,
        elapsed: Duration,
        /// Output token count when the backend reports one
        tokens: Option<u64>,
        /// Character count of the returned text, always available
        chars: u64,
    },
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl InvocationResult {
    pub fn success(text: String, elapsed: Duration, tokens: Option<u64>) -> Self {
        let chars = text.chars().count() as u64;
        InvocationResult::Success {
            text,
            elapsed,
            tokens,
            chars,
        }
    }

    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        InvocationResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InvocationResult::Success { .. } => None,
            InvocationResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Result of a reachability probe against one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeStatus {
    pub provider: Provider,
    pub reachable: bool,
    /// Models discovered during the probe; empty when unreachable or when
    /// the provider publishes a static catalog instead
    pub models: Vec<ModelDescriptor>,
    /// Human-readable diagnostic (never contains credential material)
    pub detail: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ProbeStatus {
    pub fn reachable(provider: Provider, models: Vec<ModelDescriptor>) -> Self {
        Self {
            provider,
            reachable: true,
            models,
            detail: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unreachable(provider: Provider, detail: impl Into<String>) -> Self {
        Self {
            provider,
            reachable: false,
            models: Vec::new(),
            detail: Some(detail.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
