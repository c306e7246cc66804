//! # Modelgate
//!
//! A command-line gateway for free LLM providers. One configuration, one
//! facade, and three very different backends behind it:
//!
//! - a **local daemon** (Ollama) discovered by probing its REST API
//! - a **hosted endpoint** (Hugging Face Inference API) addressed per model id
//! - a **keyed chat service** (Google Gemini) unlocked by an API key
//!
//! ## Architecture Overview
//!
//! The system consists of several key components organized into modules:
//!
//! - **[`gateway::probe`]**: Reachability checks that report instead of fail
//! - **[`gateway::registry`]**: Startup snapshot of usable providers and their models
//! - **[`gateway::factory`]**: Turns raw invocation settings into validated clients
//! - **[`gateway::executor`]**: Drives one invocation under a deadline with cancellation
//! - **[`gateway::facade`]**: High-level entry point tying the pieces together
//!
//! ## Features
//!
//! ### 🔌 Provider Handling
//! - **Capability Probing**: Providers that are down get reported, not thrown
//! - **Startup Registry**: Which providers are usable is decided once, up front
//! - **Uniform Outcomes**: Every invocation ends in the same success/failure shape
//!
//! ### 🔑 Credential Hygiene
//! - **Typed Secrets**: Credentials live in a newtype that redacts its debug output
//! - **No Echoing**: Keys never appear in URLs, logs, or failure details
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modelgate::{GatewayConfig, InvocationResult, Provider, ProviderGateway};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Assemble the gateway from defaults (config files and environment
//!     // overrides are handled by the CLI layer)
//!     let gateway = ProviderGateway::new(GatewayConfig::default()).await?;
//!
//!     let outcome = gateway
//!         .ask(Provider::LocalDaemon, "llama3.2", "What is machine learning?")
//!         .await?;
//!
//!     match outcome {
//!         InvocationResult::Success { text, .. } => println!("{}", text),
//!         InvocationResult::Failure { kind, detail } => eprintln!("{}: {}", kind, detail),
//!     }
//!     Ok(())
//! }
//! ```

/// Provider gateway core.
///
/// Capability probing, the provider registry, client construction, and the
/// invocation executor, all behind a single facade.
pub mod gateway;

/// Environment constants and path utilities.
///
/// Centralizes all hardcoded paths and directory names used throughout
/// the application for easier maintenance and consistency.
pub mod env;

// Re-export the main gateway types
pub use gateway::{
    Credential, FailureKind, GatewayConfig, GatewayError, InvocationConfig, InvocationRequest,
    InvocationResult, Message, ModelDescriptor, ProbeStatus, Provider, ProviderGateway, Role,
};

// CLI module for command-line interface
pub mod cli;
