//! Environment constants and path utilities for the model gateway.
//!
//! This module centralizes directory names, environment variable names, and
//! default endpoint addresses used throughout the application, making them
//! easier to maintain and modify.

/// Main application directory name (hidden directory like .git, .vscode)
pub const MODELGATE_DIR_NAME: &str = ".modelgate";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable names recognized as configuration overrides
pub mod vars {
    /// Base URL of the local model daemon
    pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";

    /// Access token for the hosted inference endpoint (optional)
    pub const HUGGINGFACE_TOKEN: &str = "HUGGINGFACEHUB_API_TOKEN";

    /// API key for the keyed chat service (required to enable it)
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
}

/// Default endpoint addresses used when configuration does not override them
pub mod defaults {
    /// Local daemon address in its stock installation
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

    /// Hosted inference endpoint root (model id is appended per request)
    pub const HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

    /// Keyed chat service API root
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Seconds allowed for a reachability probe against the local daemon
    pub const PROBE_TIMEOUT_SECS: u64 = 5;

    /// Seconds allowed for a full model invocation
    pub const INVOKE_TIMEOUT_SECS: u64 = 120;
}

/// Common path utilities
use std::path::PathBuf;

/// Build the main .modelgate directory path from a workspace root
pub fn modelgate_dir_path(workspace_root: &std::path::Path) -> PathBuf {
    workspace_root.join(MODELGATE_DIR_NAME)
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &std::path::Path) -> PathBuf {
    home_dir.join(MODELGATE_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &std::path::Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &std::path::Path) -> PathBuf {
    current_dir.join(MODELGATE_DIR_NAME).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_path_construction() {
        let workspace = Path::new("/test/workspace");

        assert_eq!(
            modelgate_dir_path(workspace),
            Path::new("/test/workspace/.modelgate")
        );
    }

    #[test]
    fn test_config_paths() {
        let home_dir = Path::new("/home/user");
        let current_dir = Path::new("/current/project");

        assert_eq!(
            user_config_file_path(home_dir),
            Path::new("/home/user/.modelgate/config.toml")
        );

        assert_eq!(
            local_config_file_path(current_dir),
            Path::new("/current/project/.modelgate/config.toml")
        );
    }

    #[test]
    fn test_default_addresses() {
        assert!(defaults::OLLAMA_BASE_URL.starts_with("http://"));
        assert!(defaults::HUGGINGFACE_BASE_URL.starts_with("https://"));
        assert!(defaults::GEMINI_BASE_URL.starts_with("https://"));
    }
}
