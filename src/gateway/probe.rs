//! Capability probing.
//!
//! Answers one question per provider: can an invocation be expected to work
//! right now? Probing never raises; every outcome, including timeouts and
//! refused connections, is folded into the returned [`ProbeStatus`].

use reqwest::Client;
use tracing::{debug, warn};

use super::backends::ollama;
use super::config::GatewayConfig;
use super::types::{ModelDescriptor, ProbeStatus, Provider};
use crate::env;

/// Startup-time reachability checks, one HTTP call at most per probe
#[derive(Debug)]
pub struct CapabilityProbe {
    http: Client,
    config: GatewayConfig,
}

impl CapabilityProbe {
    pub fn new(http: Client, config: GatewayConfig) -> Self {
        Self { http, config }
    }

    /// Probe one provider. Infallible: failures become an unreachable status
    /// with a human-readable diagnostic.
    pub async fn probe(&self, provider: Provider) -> ProbeStatus {
        debug!("probing provider '{}'", provider);
        match provider {
            Provider::LocalDaemon => self.probe_daemon().await,
            Provider::HostedEndpoint => self.probe_hosted(),
            Provider::KeyedChatService => self.probe_keyed(),
        }
    }

    /// The daemon advertises its pulled models on `/api/tags`; reaching that
    /// endpoint within the probe deadline counts as available
    async fn probe_daemon(&self) -> ProbeStatus {
        let base_url = self.config.base_url(Provider::LocalDaemon);
        let deadline = self.config.probe_timeout();

        match tokio::time::timeout(deadline, ollama::list_models(&self.http, base_url)).await {
            Ok(Ok(names)) => {
                debug!("daemon reachable with {} model(s)", names.len());
                let models = names
                    .into_iter()
                    .map(|name| ModelDescriptor::new(Provider::LocalDaemon, name))
                    .collect();
                ProbeStatus::reachable(Provider::LocalDaemon, models)
            }
            Ok(Err(e)) => {
                warn!("daemon probe failed: {}", e);
                ProbeStatus::unreachable(
                    Provider::LocalDaemon,
                    format!("daemon at {} not reachable: {}", base_url, e),
                )
            }
            Err(_) => {
                warn!("daemon probe timed out after {:?}", deadline);
                ProbeStatus::unreachable(
                    Provider::LocalDaemon,
                    format!(
                        "daemon at {} gave no answer within {}s",
                        base_url,
                        deadline.as_secs()
                    ),
                )
            }
        }
    }

    /// The hosted endpoint runs no preflight; it accepts anonymous requests,
    /// so it is always considered reachable. The diagnostic records whether
    /// a token is configured.
    fn probe_hosted(&self) -> ProbeStatus {
        let detail = if self.config.credential(Provider::HostedEndpoint).is_some() {
            "access token configured"
        } else {
            "anonymous access (no token configured, shared rate pool)"
        };
        ProbeStatus::reachable(Provider::HostedEndpoint, Vec::new()).with_detail(detail)
    }

    /// The keyed service is usable only when a non-empty key is configured
    fn probe_keyed(&self) -> ProbeStatus {
        match self.config.credential(Provider::KeyedChatService) {
            Some(key) if !key.is_empty() => {
                ProbeStatus::reachable(Provider::KeyedChatService, Vec::new())
                    .with_detail("API key configured")
            }
            _ => ProbeStatus::unreachable(
                Provider::KeyedChatService,
                format!("no API key configured (set {})", env::vars::GOOGLE_API_KEY),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::Credential;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe_with(config: GatewayConfig) -> CapabilityProbe {
        CapabilityProbe::new(Client::new(), config)
    }

    #[tokio::test]
    async fn test_daemon_probe_reports_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "llama3.1:latest"}, {"name": "phi3:mini"}]
            })))
            .mount(&server)
            .await;

        let mut config = GatewayConfig::default();
        config.ollama.base_url = server.uri();

        let status = probe_with(config).probe(Provider::LocalDaemon).await;
        assert!(status.reachable);
        assert_eq!(status.models.len(), 2);
        assert_eq!(status.models[0].id, "llama3.1:latest");
        assert_eq!(status.models[0].provider, Provider::LocalDaemon);
    }

    #[tokio::test]
    async fn test_daemon_probe_unreachable() {
        let server = MockServer::start().await;
        let dead_uri = server.uri();
        drop(server);

        let mut config = GatewayConfig::default();
        config.ollama.base_url = dead_uri;

        let status = probe_with(config).probe(Provider::LocalDaemon).await;
        assert!(!status.reachable);
        assert!(status.models.is_empty());

        // The diagnostic states the fact; install/run/pull guidance is the
        // CLI's to render
        let detail = status.detail.unwrap();
        assert!(detail.contains("not reachable"));
        assert!(!detail.contains("Install"));
        assert!(!detail.contains("ollama pull"));
    }

    #[tokio::test]
    async fn test_daemon_probe_bounded_by_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"models": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = GatewayConfig::default();
        config.ollama.base_url = server.uri();
        config.ollama.probe_timeout_secs = 1;

        let started = std::time::Instant::now();
        let status = probe_with(config).probe(Provider::LocalDaemon).await;
        assert!(!status.reachable);
        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(status.detail.unwrap().contains("no answer within"));
    }

    #[tokio::test]
    async fn test_hosted_probe_always_reachable() {
        let status = probe_with(GatewayConfig::default())
            .probe(Provider::HostedEndpoint)
            .await;
        assert!(status.reachable);
        assert!(status.models.is_empty());
        assert!(status.detail.unwrap().contains("anonymous"));
    }

    #[tokio::test]
    async fn test_keyed_probe_requires_key() {
        let status = probe_with(GatewayConfig::default())
            .probe(Provider::KeyedChatService)
            .await;
        assert!(!status.reachable);
        assert!(status.detail.unwrap().contains("GOOGLE_API_KEY"));

        let mut config = GatewayConfig::default();
        config.gemini.api_key = Some(Credential::new("AIza-test"));
        let status = probe_with(config).probe(Provider::KeyedChatService).await;
        assert!(status.reachable);
    }

    #[tokio::test]
    async fn test_keyed_probe_never_leaks_key_material() {
        let mut config = GatewayConfig::default();
        config.gemini.api_key = Some(Credential::new("AIza-hyper-secret"));

        let status = probe_with(config).probe(Provider::KeyedChatService).await;
        let rendered = format!("{:?}", status);
        assert!(!rendered.contains("hyper-secret"));
    }
}
