//! # Gateway Facade
//!
//! Single entry point tying the subsystems together. Call order inside is
//! fixed and none of the steps are skippable:
//!
//! ```text
//! startup:    probe ──> registry (resolved once)
//! invocation: registry gate ──> factory ──> executor
//! ```
//!
//! Configuration mistakes surface as [`GatewayError`] before any network
//! call; outcomes of dispatched invocations come back as
//! [`InvocationResult`]. The facade itself holds no selection state; which
//! provider and model to use arrives with every call.

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::GatewayConfig;
use super::error::GatewayError;
use super::executor::InvocationExecutor;
use super::factory::ClientFactory;
use super::probe::CapabilityProbe;
use super::registry::{ProviderRegistry, RegistryEntry};
use super::types::{
    InvocationConfig, InvocationRequest, InvocationResult, ModelDescriptor, ProbeStatus, Provider,
};

/// The assembled gateway
#[derive(Debug)]
pub struct ProviderGateway {
    config: GatewayConfig,
    probe: CapabilityProbe,
    registry: ProviderRegistry,
    factory: ClientFactory,
    executor: InvocationExecutor,
}

impl ProviderGateway {
    /// Validate the configuration, build the shared HTTP client, and resolve
    /// the provider registry. Capability flags are fixed after this returns.
    pub async fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let http = Client::builder()
            .build()
            .map_err(|e| GatewayError::HttpClient(e.to_string()))?;

        let probe = CapabilityProbe::new(http.clone(), config.clone());
        let registry = ProviderRegistry::resolve(&probe, &config).await;
        let enabled = registry.entries().iter().filter(|e| e.enabled).count();
        info!(
            "gateway ready: {}/{} provider(s) enabled",
            enabled,
            registry.entries().len()
        );

        Ok(Self {
            factory: ClientFactory::new(config.clone()),
            executor: InvocationExecutor::new(http),
            probe,
            registry,
            config,
        })
    }

    /// Every provider in fixed order with its resolved standing
    pub fn list_providers(&self) -> &[RegistryEntry] {
        self.registry.entries()
    }

    /// Fresh reachability check, independent of the startup snapshot
    pub async fn probe(&self, provider: Provider) -> ProbeStatus {
        self.probe.probe(provider).await
    }

    /// The models an enabled provider serves; stable across calls
    pub fn list_models(&self, provider: Provider) -> Result<&[ModelDescriptor], GatewayError> {
        self.registry.models(provider)
    }

    /// Run one invocation end to end. Disabled providers and invalid
    /// settings are rejected up front; everything past the registry gate
    /// comes back inside the `Ok` as a classified result.
    pub async fn invoke(
        &self,
        invocation: InvocationConfig,
        request: &InvocationRequest,
    ) -> Result<InvocationResult, GatewayError> {
        self.registry.ensure_enabled(invocation.provider)?;
        let client = self.factory.build(invocation)?;
        Ok(self.executor.invoke(&client, request).await)
    }

    /// [`invoke`](Self::invoke) with caller-driven cancellation
    pub async fn invoke_cancellable(
        &self,
        invocation: InvocationConfig,
        request: &InvocationRequest,
        cancel: &CancellationToken,
    ) -> Result<InvocationResult, GatewayError> {
        self.registry.ensure_enabled(invocation.provider)?;
        let client = self.factory.build(invocation)?;
        Ok(self
            .executor
            .invoke_cancellable(&client, request, cancel)
            .await)
    }

    /// One question, configured defaults, one answer
    pub async fn ask(
        &self,
        provider: Provider,
        model: &str,
        question: &str,
    ) -> Result<InvocationResult, GatewayError> {
        let invocation = self.config.invocation_config(provider, model);
        self.invoke(invocation, &InvocationRequest::prompt(question))
            .await
    }

    /// The settings the gateway was assembled from
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
