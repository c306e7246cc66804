//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./modelgate.toml or ./.modelgate/config.toml
//! 2. User config: ~/.modelgate/config.toml
//! 3. System config: /etc/modelgate/config.toml
//! 4. Built-in defaults
//!
//! Environment overrides (OLLAMA_BASE_URL, HUGGINGFACEHUB_API_TOKEN,
//! GOOGLE_API_KEY) are applied after the file is loaded, whichever source
//! the settings came from.

use crate::env;
use crate::gateway::GatewayConfig;
use anyhow::{Context, Result, anyhow};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    ///
    /// An explicit override path skips discovery but still gets the
    /// environment overrides applied on top.
    pub fn discover_config(config_override: Option<&Path>) -> Result<GatewayConfig> {
        let mut config = if let Some(path) = config_override {
            info!("Loading configuration override from: {:?}", path);
            Self::from_toml_file(path)?
        } else if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            Self::from_toml_file(config_path)?
        } else {
            info!("No configuration file found, using defaults");
            GatewayConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load a gateway configuration from a TOML file
    ///
    /// Missing tables and keys fall back to their defaults, so a partial
    /// file is fine.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<GatewayConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: GatewayConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save a gateway configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(config: &GatewayConfig, path: P) -> Result<()> {
        let content = toml::to_string_pretty(config)
            .context("Failed to serialize configuration to TOML")?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = Self::get_config_candidates();

        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.exists() && candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // 1. Current directory: ./modelgate.toml
        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join("modelgate.toml"));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        // 2. User config: ~/.modelgate/config.toml
        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        // 3. System config: /etc/modelgate/config.toml (Unix-like systems)
        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/modelgate/config.toml"));

        // Windows system config: C:\ProgramData\modelgate\config.toml
        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("modelgate")
                    .join("config.toml"),
            );
        }

        candidates
    }

    /// Get home directory path
    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir =
            Self::get_home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;

        let config_dir = env::user_config_dir_path(&home_dir);
        let config_path = env::user_config_file_path(&home_dir);

        // Create directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        // Create default config if it doesn't exist
        if !config_path.exists() {
            let default_config = GatewayConfig::default();
            Self::to_toml_file(&default_config, &config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }

        // Secrets are reported by presence only, never by value.
        println!();
        println!("Environment overrides:");
        for name in [
            env::vars::OLLAMA_BASE_URL,
            env::vars::HUGGINGFACE_TOKEN,
            env::vars::GOOGLE_API_KEY,
        ] {
            let status = match std_env::var(name) {
                Ok(value) if !value.trim().is_empty() => "set",
                _ => "not set",
            };
            println!("  {} - {}", name, status);
        }
    }
}
