//! CLI-specific functionality for the model gateway
//!
//! This module contains all CLI-related code including argument parsing
//! and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, AskConfig, ChatConfig, Commands, ExecutionMode};
pub use config::ConfigDiscovery;
