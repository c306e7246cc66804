//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `providers`: List providers and their standing
//! - `models`: List the models served by enabled providers
//! - `probe`: Run a fresh reachability check
//! - `ask`: Ask one question and print the answer
//! - `chat`: Run an interactive question loop
//! - `examples`: Show example questions to try
//! - `init-config`: Create a default user configuration file
//! - `show-config`: Show configuration discovery information

use crate::gateway::Provider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    ListProviders {
        config_override: Option<PathBuf>,
    },
    ListModels {
        provider: Option<Provider>,
        config_override: Option<PathBuf>,
    },
    Probe {
        provider: Option<Provider>,
        config_override: Option<PathBuf>,
    },
    Ask(AskConfig),
    Chat(ChatConfig),
    ShowExamples,
    InitConfig,
    ShowConfig,
}

impl ExecutionMode {
    /// Whether the selected mode asked for verbose output
    pub fn verbose(&self) -> bool {
        match self {
            ExecutionMode::Ask(config) => config.verbose,
            ExecutionMode::Chat(config) => config.verbose,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct AskConfig {
    pub question: String,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub max_output: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub config_override: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct ChatConfig {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub config_override: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(name = "modelgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "A command-line gateway for free LLM providers: a local Ollama daemon, the Hugging Face Inference API, and Google Gemini"
)]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List providers and their standing
    Providers {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
    /// List the models served by enabled providers
    Models {
        /// Restrict to one provider (ollama, huggingface, or gemini)
        #[arg(short = 'p', long = "provider")]
        provider: Option<String>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
    /// Run a fresh reachability check
    Probe {
        /// Provider to probe (all providers when omitted)
        provider: Option<String>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
    /// Ask one question and print the answer
    Ask {
        /// The question to ask
        question: String,
        /// Provider to ask (defaults to the first enabled provider)
        #[arg(short = 'p', long = "provider")]
        provider: Option<String>,
        /// Model to ask (defaults to the configured or first model)
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
        /// System instruction prepended to the conversation
        #[arg(long = "system", value_name = "TEXT")]
        system: Option<String>,
        /// Sampling temperature override
        #[arg(short = 't', long = "temperature")]
        temperature: Option<f32>,
        /// Maximum answer length override, in tokens
        #[arg(long = "max-output", value_name = "TOKENS")]
        max_output: Option<u32>,
        /// Invocation deadline override
        #[arg(long = "timeout", value_name = "SECONDS")]
        timeout: Option<u64>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Run an interactive question loop
    Chat {
        /// Provider to start with (defaults to the first enabled provider)
        #[arg(short = 'p', long = "provider")]
        provider: Option<String>,
        /// Model to start with (defaults to the configured or first model)
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show example questions to try
    Examples,
    /// Create a default configuration file under the home directory
    InitConfig,
    /// Show configuration discovery information
    ShowConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Providers { config }) => Ok(ExecutionMode::ListProviders {
                config_override: config.clone(),
            }),
            Some(Commands::Models { provider, config }) => Ok(ExecutionMode::ListModels {
                provider: Self::parse_provider(provider.as_deref())?,
                config_override: config.clone(),
            }),
            Some(Commands::Probe { provider, config }) => Ok(ExecutionMode::Probe {
                provider: Self::parse_provider(provider.as_deref())?,
                config_override: config.clone(),
            }),
            Some(Commands::Ask {
                question,
                provider,
                model,
                system,
                temperature,
                max_output,
                timeout,
                config,
                verbose,
            }) => Ok(ExecutionMode::Ask(AskConfig {
                question: question.clone(),
                provider: Self::parse_provider(provider.as_deref())?,
                model: model.clone(),
                system: system.clone(),
                temperature: *temperature,
                max_output: *max_output,
                timeout_secs: *timeout,
                config_override: config.clone(),
                verbose: *verbose,
            })),
            Some(Commands::Chat {
                provider,
                model,
                config,
                verbose,
            }) => Ok(ExecutionMode::Chat(ChatConfig {
                provider: Self::parse_provider(provider.as_deref())?,
                model: model.clone(),
                config_override: config.clone(),
                verbose: *verbose,
            })),
            Some(Commands::Examples) => Ok(ExecutionMode::ShowExamples),
            Some(Commands::InitConfig) => Ok(ExecutionMode::InitConfig),
            Some(Commands::ShowConfig) => Ok(ExecutionMode::ShowConfig),
            None => Err(
                "No command specified. Use 'modelgate --help' to see available commands."
                    .to_string(),
            ),
        }
    }

    /// Parse an optional provider name as given on the command line
    ///
    /// Accepted spellings (case-insensitive):
    /// - `ollama`, `local`, `local-daemon` → the local daemon
    /// - `huggingface`, `hf`, `hosted`, `hosted-endpoint` → the hosted endpoint
    /// - `gemini`, `keyed`, `keyed-chat-service` → the keyed chat service
    fn parse_provider(name: Option<&str>) -> Result<Option<Provider>, String> {
        match name {
            Some(name) => name.parse::<Provider>().map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_command_with_all_flags() {
        let args = Args {
            command: Some(Commands::Ask {
                question: "What is machine learning?".to_string(),
                provider: Some("gemini".to_string()),
                model: Some("gemini-1.5-pro".to_string()),
                system: Some("Answer briefly.".to_string()),
                temperature: Some(0.2),
                max_output: Some(64),
                timeout: Some(30),
                config: Some(PathBuf::from("custom.toml")),
                verbose: true,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Ask(config) = mode {
            assert_eq!(config.question, "What is machine learning?");
            assert_eq!(config.provider, Some(Provider::KeyedChatService));
            assert_eq!(config.model.as_deref(), Some("gemini-1.5-pro"));
            assert_eq!(config.system.as_deref(), Some("Answer briefly."));
            assert_eq!(config.temperature, Some(0.2));
            assert_eq!(config.max_output, Some(64));
            assert_eq!(config.timeout_secs, Some(30));
            assert!(config.config_override.is_some());
            assert!(config.verbose);
        } else {
            panic!("Expected Ask mode");
        }
    }

    #[test]
    fn test_ask_command_defaults() {
        let args = Args {
            command: Some(Commands::Ask {
                question: "hello".to_string(),
                provider: None,
                model: None,
                system: None,
                temperature: None,
                max_output: None,
                timeout: None,
                config: None,
                verbose: false,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Ask(config) = mode {
            assert_eq!(config.provider, None);
            assert_eq!(config.model, None);
            assert!(!config.verbose);
        } else {
            panic!("Expected Ask mode");
        }
    }

    #[test]
    fn test_provider_name_spellings() {
        // Canonical names
        assert_eq!(
            Args::parse_provider(Some("ollama")).unwrap(),
            Some(Provider::LocalDaemon)
        );
        assert_eq!(
            Args::parse_provider(Some("huggingface")).unwrap(),
            Some(Provider::HostedEndpoint)
        );
        assert_eq!(
            Args::parse_provider(Some("gemini")).unwrap(),
            Some(Provider::KeyedChatService)
        );

        // Short and descriptive aliases
        assert_eq!(
            Args::parse_provider(Some("hf")).unwrap(),
            Some(Provider::HostedEndpoint)
        );
        assert_eq!(
            Args::parse_provider(Some("local-daemon")).unwrap(),
            Some(Provider::LocalDaemon)
        );

        // Case-insensitive
        assert_eq!(
            Args::parse_provider(Some("Gemini")).unwrap(),
            Some(Provider::KeyedChatService)
        );

        // Omitted means no filter
        assert_eq!(Args::parse_provider(None).unwrap(), None);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let args = Args {
            command: Some(Commands::Models {
                provider: Some("openai".to_string()),
                config: None,
            }),
        };
        let result = args.mode();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("openai"));
    }

    #[test]
    fn test_models_command_with_filter() {
        let args = Args {
            command: Some(Commands::Models {
                provider: Some("hf".to_string()),
                config: None,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::ListModels { provider, .. } = mode {
            assert_eq!(provider, Some(Provider::HostedEndpoint));
        } else {
            panic!("Expected ListModels mode");
        }
    }

    #[test]
    fn test_probe_all_providers() {
        let args = Args {
            command: Some(Commands::Probe {
                provider: None,
                config: None,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Probe { provider, .. } = mode {
            assert_eq!(provider, None);
        } else {
            panic!("Expected Probe mode");
        }
    }

    #[test]
    fn test_chat_command() {
        let args = Args {
            command: Some(Commands::Chat {
                provider: Some("ollama".to_string()),
                model: Some("llama3.2".to_string()),
                config: None,
                verbose: true,
            }),
        };
        let mode = args.mode().unwrap();

        if let ExecutionMode::Chat(config) = mode {
            assert_eq!(config.provider, Some(Provider::LocalDaemon));
            assert_eq!(config.model.as_deref(), Some("llama3.2"));
            assert!(config.verbose);
        } else {
            panic!("Expected Chat mode");
        }
    }

    #[test]
    fn test_verbose_flag_per_mode() {
        let chat = ExecutionMode::Chat(ChatConfig {
            provider: None,
            model: None,
            config_override: None,
            verbose: true,
        });
        assert!(chat.verbose());

        let providers = ExecutionMode::ListProviders {
            config_override: None,
        };
        assert!(!providers.verbose());
    }

    #[test]
    fn test_no_command_error() {
        let args = Args { command: None };
        let result = args.mode();
        assert!(result.is_err());
    }
}
