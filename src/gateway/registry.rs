//! Provider registry.
//!
//! Resolved once at startup from configuration plus probe results, then
//! immutable. Hosted and keyed providers publish fixed catalogs; the local
//! daemon's catalog is whatever the probe discovered. Listing order always
//! follows [`Provider::ALL`] so output is deterministic.

use tracing::info;

use super::config::GatewayConfig;
use super::error::GatewayError;
use super::probe::CapabilityProbe;
use super::types::{ModelDescriptor, Provider};

/// Models the hosted endpoint serves without any account setup
pub const HOSTED_CATALOG: [&str; 6] = [
    "google/flan-t5-small",
    "google/flan-t5-base",
    "google/flan-t5-large",
    "microsoft/DialoGPT-small",
    "microsoft/DialoGPT-medium",
    "distilgpt2",
];

/// Models the keyed chat service exposes on its free tier, as (id, display name)
pub const KEYED_CATALOG: [(&str, &str); 2] = [
    ("gemini-1.5-flash", "Gemini 1.5 Flash"),
    ("gemini-1.5-pro", "Gemini 1.5 Pro"),
];

/// One provider's resolved standing
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub provider: Provider,
    pub enabled: bool,
    /// Why the provider is unusable, when it is
    pub disabled_reason: Option<String>,
    pub models: Vec<ModelDescriptor>,
}

/// Immutable snapshot of which providers are usable and what they serve
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    entries: [RegistryEntry; 3],
}

fn slot(provider: Provider) -> usize {
    match provider {
        Provider::LocalDaemon => 0,
        Provider::HostedEndpoint => 1,
        Provider::KeyedChatService => 2,
    }
}

impl ProviderRegistry {
    /// Resolve every provider's standing. Config switches are checked first;
    /// the daemon is then probed and credential-gated providers checked for
    /// their credential. One pass, no re-resolution afterwards.
    pub async fn resolve(probe: &CapabilityProbe, config: &GatewayConfig) -> Self {
        let entries = [
            resolve_entry(probe, config, Provider::LocalDaemon).await,
            resolve_entry(probe, config, Provider::HostedEndpoint).await,
            resolve_entry(probe, config, Provider::KeyedChatService).await,
        ];
        Self { entries }
    }

    /// All providers in fixed order, enabled or not
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn entry(&self, provider: Provider) -> &RegistryEntry {
        &self.entries[slot(provider)]
    }

    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.entry(provider).enabled
    }

    /// Typed rejection for callers about to use a disabled provider
    pub fn ensure_enabled(&self, provider: Provider) -> Result<(), GatewayError> {
        let entry = self.entry(provider);
        if entry.enabled {
            Ok(())
        } else {
            Err(GatewayError::ProviderDisabled {
                provider,
                reason: entry
                    .disabled_reason
                    .clone()
                    .unwrap_or_else(|| "unavailable".to_string()),
            })
        }
    }

    /// The models a provider serves; disabled providers yield the typed error
    pub fn models(&self, provider: Provider) -> Result<&[ModelDescriptor], GatewayError> {
        self.ensure_enabled(provider)?;
        Ok(&self.entry(provider).models)
    }
}

async fn resolve_entry(
    probe: &CapabilityProbe,
    config: &GatewayConfig,
    provider: Provider,
) -> RegistryEntry {
    let entry = if !config.enabled(provider) {
        RegistryEntry::disabled(provider, "disabled in configuration")
    } else {
        match provider {
            Provider::LocalDaemon => {
                let status = probe.probe(provider).await;
                if status.reachable {
                    RegistryEntry::enabled(provider, status.models)
                } else {
                    let reason = status
                        .detail
                        .unwrap_or_else(|| "daemon unreachable".to_string());
                    RegistryEntry::disabled(provider, reason)
                }
            }
            Provider::HostedEndpoint => RegistryEntry::enabled(provider, static_catalog(provider)),
            Provider::KeyedChatService => {
                let status = probe.probe(provider).await;
                if status.reachable {
                    RegistryEntry::enabled(provider, static_catalog(provider))
                } else {
                    let reason = status
                        .detail
                        .unwrap_or_else(|| "credential missing".to_string());
                    RegistryEntry::disabled(provider, reason)
                }
            }
        }
    };

    if entry.enabled {
        info!(
            "registered provider '{}' with {} model(s)",
            entry.provider,
            entry.models.len()
        );
    } else {
        info!(
            "provider '{}' disabled: {}",
            entry.provider,
            entry.disabled_reason.as_deref().unwrap_or("unknown")
        );
    }
    entry
}

impl RegistryEntry {
    fn enabled(provider: Provider, models: Vec<ModelDescriptor>) -> Self {
        Self {
            provider,
            enabled: true,
            disabled_reason: None,
            models,
        }
    }

    fn disabled(provider: Provider, reason: impl Into<String>) -> Self {
        Self {
            provider,
            enabled: false,
            disabled_reason: Some(reason.into()),
            models: Vec::new(),
        }
    }
}

fn static_catalog(provider: Provider) -> Vec<ModelDescriptor> {
    match provider {
        Provider::LocalDaemon => Vec::new(),
        Provider::HostedEndpoint => HOSTED_CATALOG
            .iter()
            .map(|id| ModelDescriptor::new(provider, *id))
            .collect(),
        Provider::KeyedChatService => KEYED_CATALOG
            .iter()
            .map(|(id, name)| ModelDescriptor::new(provider, *id).with_display_name(*name))
            .collect(),
    }
}
