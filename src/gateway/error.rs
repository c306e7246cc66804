use super::types::Provider;

/// Configuration and validation errors raised before any network call.
///
/// Outcomes of dispatched invocations (timeouts, refusals, throttling) are
/// reported through `InvocationResult::Failure`, never through this enum.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("provider '{provider}' is disabled: {reason}")]
    ProviderDisabled { provider: Provider, reason: String },
    #[error("provider '{0}' requires a credential and none was configured")]
    MissingCredential(Provider),
    #[error("temperature {given} out of range for '{provider}' (accepted 0.0..={max})")]
    TemperatureOutOfRange {
        provider: Provider,
        given: f32,
        max: f32,
    },
    #[error("model name must not be empty")]
    EmptyModelName,
    #[error("timeout must be positive")]
    NonPositiveTimeout,
    #[error("maximum output length must be positive")]
    ZeroMaxOutput,
    #[error("invalid base URL for '{provider}': {message}")]
    InvalidBaseUrl { provider: Provider, message: String },
    #[error("failed to construct HTTP client: {0}")]
    HttpClient(String),
}
