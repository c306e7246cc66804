pub mod backends;
pub mod config;
pub mod error;
pub mod executor;
pub mod facade;
pub mod factory;
pub mod probe;
pub mod registry;
pub mod types;


pub use config::GatewayConfig;
pub use error::GatewayError;
pub use executor::InvocationExecutor;
pub use facade::ProviderGateway;
pub use factory::{ClientFactory, ProviderClient};
pub use probe::CapabilityProbe;
pub use registry::{HOSTED_CATALOG, KEYED_CATALOG, ProviderRegistry, RegistryEntry};
pub use types::*;
