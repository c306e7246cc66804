//! Client construction and validation.
//!
//! The factory is the single place configuration mistakes are caught. It
//! performs no I/O: a returned [`ProviderClient`] proves the settings were
//! acceptable, not that the provider will answer.

use std::time::Duration;

use super::config::GatewayConfig;
use super::error::GatewayError;
use super::types::{Credential, InvocationConfig, Provider};

/// Which wire channel a client speaks, carrying the credential exactly where
/// one is required. A `Keyed` client cannot exist without its key.
#[derive(Debug, Clone)]
pub(crate) enum ClientChannel {
    Daemon,
    Hosted { token: Option<Credential> },
    Keyed { key: Credential },
}

/// A validated, ready-to-invoke handle for one provider/model pair.
///
/// Fields stay private so a client in hand is always one the factory
/// accepted. The credential lives in the channel; the retained settings
/// carry none.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    channel: ClientChannel,
    invocation: InvocationConfig,
    base_url: String,
}

impl ProviderClient {
    pub fn provider(&self) -> Provider {
        self.invocation.provider
    }

    pub fn model(&self) -> &str {
        &self.invocation.model
    }

    pub fn timeout(&self) -> Duration {
        self.invocation.timeout
    }

    pub(crate) fn channel(&self) -> &ClientChannel {
        &self.channel
    }

    pub(crate) fn invocation(&self) -> &InvocationConfig {
        &self.invocation
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds provider clients from invocation settings
#[derive(Debug)]
pub struct ClientFactory {
    config: GatewayConfig,
}

impl ClientFactory {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Validate the settings and produce a client. Synchronous by contract;
    /// reachability is the probe's concern, never checked here.
    pub fn build(&self, mut invocation: InvocationConfig) -> Result<ProviderClient, GatewayError> {
        let provider = invocation.provider;

        if invocation.model.trim().is_empty() {
            return Err(GatewayError::EmptyModelName);
        }

        // A blank credential counts as absent
        let credential = invocation.credential.take().filter(|c| !c.is_empty());
        let channel = match provider {
            Provider::LocalDaemon => ClientChannel::Daemon,
            Provider::HostedEndpoint => ClientChannel::Hosted { token: credential },
            Provider::KeyedChatService => match credential {
                Some(key) => ClientChannel::Keyed { key },
                None => return Err(GatewayError::MissingCredential(provider)),
            },
        };

        let max = provider.max_temperature();
        let given = invocation.temperature;
        if !given.is_finite() || given < 0.0 || given > max {
            return Err(GatewayError::TemperatureOutOfRange {
                provider,
                given,
                max,
            });
        }

        if invocation.timeout.is_zero() {
            return Err(GatewayError::NonPositiveTimeout);
        }

        if invocation.max_output == 0 {
            return Err(GatewayError::ZeroMaxOutput);
        }

        Ok(ProviderClient {
            channel,
            invocation,
            base_url: self.config.base_url(provider).to_string(),
        })
    }
}
