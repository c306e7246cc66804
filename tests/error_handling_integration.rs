//! Error surfaces reachable through the public gateway API
//!
//! Configuration mistakes must be rejected at startup with a typed error;
//! unusable providers must be rejected per call with the reason recorded
//! at registry resolution.

use modelgate::{GatewayConfig, GatewayError, Provider, ProviderGateway};

#[tokio::test]
async fn test_invalid_base_url_is_rejected_at_startup() {
    let mut config = GatewayConfig::default();
    config.ollama.base_url = "not a url".to_string();

    let err = ProviderGateway::new(config)
        .await
        .expect_err("invalid URL must be rejected");
    assert!(matches!(
        err,
        GatewayError::InvalidBaseUrl {
            provider: Provider::LocalDaemon,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_url_error_names_the_provider() {
    let mut config = GatewayConfig::default();
    config.ollama.enabled = false;
    config.gemini.base_url = "generativelanguage.googleapis.com".to_string();

    let err = ProviderGateway::new(config)
        .await
        .expect_err("scheme-less URL must be rejected");
    let message = err.to_string();
    assert!(
        message.contains("gemini"),
        "error should name the provider: {}",
        message
    );
}

#[tokio::test]
async fn test_zero_timeout_is_rejected_at_startup() {
    let mut config = GatewayConfig::default();
    config.ollama.enabled = false;
    config.defaults.timeout_secs = 0;

    let err = ProviderGateway::new(config)
        .await
        .expect_err("zero timeout must be rejected");
    assert!(matches!(err, GatewayError::NonPositiveTimeout));
}

#[tokio::test]
async fn test_zero_max_output_is_rejected_at_startup() {
    let mut config = GatewayConfig::default();
    config.ollama.enabled = false;
    config.defaults.max_output = 0;

    let err = ProviderGateway::new(config)
        .await
        .expect_err("zero max output must be rejected");
    assert!(matches!(err, GatewayError::ZeroMaxOutput));
}

#[tokio::test]
async fn test_disabled_reason_travels_into_the_error() {
    // Gemini stays switched on in configuration but has no key, so the
    // registry disables it and the recorded reason surfaces per call
    let mut config = GatewayConfig::default();
    config.ollama.enabled = false;

    let gateway = ProviderGateway::new(config).await.unwrap();

    let err = gateway
        .ask(Provider::KeyedChatService, "gemini-1.5-flash", "hi")
        .await
        .expect_err("keyless keyed service must be rejected");

    match err {
        GatewayError::ProviderDisabled { provider, reason } => {
            assert_eq!(provider, Provider::KeyedChatService);
            assert!(
                reason.contains("GOOGLE_API_KEY"),
                "reason should say how to fix it: {}",
                reason
            );
        }
        other => panic!("expected ProviderDisabled, got {:?}", other),
    }
}
