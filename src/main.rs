use anyhow::{Result, anyhow};
use modelgate::cli::{Args, AskConfig, ChatConfig, ConfigDiscovery, ExecutionMode};
use modelgate::gateway::{
    FailureKind, InvocationRequest, InvocationResult, Message, Provider, ProviderGateway,
};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Printed when an operation runs into an unreachable local daemon
const DAEMON_UNREACHABLE_HELP: &str = "\
Could not reach the local Ollama daemon. To use local models:
  1. Install Ollama:  curl -fsSL https://ollama.com/install.sh | sh
  2. Start it:        ollama serve
  3. Pull a model:    ollama pull llama3.1";

/// Questions offered by `modelgate examples` and the chat loop
const EXAMPLE_QUESTIONS: [&str; 5] = [
    "Hello, please introduce yourself",
    "Explain what artificial intelligence is",
    "Write a short Python function that computes the Fibonacci sequence",
    "Give me some advice on learning to program",
    "What is machine learning?",
];

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging
    let filter = if mode.verbose() {
        "modelgate=debug"
    } else {
        "modelgate=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Execute based on mode
    match mode {
        ExecutionMode::ListProviders { config_override } => {
            run_providers(config_override.as_deref()).await
        }
        ExecutionMode::ListModels {
            provider,
            config_override,
        } => run_models(provider, config_override.as_deref()).await,
        ExecutionMode::Probe {
            provider,
            config_override,
        } => run_probe(provider, config_override.as_deref()).await,
        ExecutionMode::Ask(config) => run_ask(config).await,
        ExecutionMode::Chat(config) => run_chat(config).await,
        ExecutionMode::ShowExamples => {
            show_examples();
            Ok(())
        }
        ExecutionMode::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {:?}", path);
            Ok(())
        }
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
    }
}

/// Discover configuration and assemble the gateway behind every subcommand
async fn build_gateway(config_override: Option<&Path>) -> Result<ProviderGateway> {
    let config = ConfigDiscovery::discover_config(config_override)?;
    let gateway = ProviderGateway::new(config).await?;
    Ok(gateway)
}

async fn run_providers(config_override: Option<&Path>) -> Result<()> {
    let gateway = build_gateway(config_override).await?;

    println!("Providers:");
    for entry in gateway.list_providers() {
        if entry.enabled {
            println!(
                "  ✅ {} - {} - {} models",
                entry.provider,
                entry.provider.label(),
                entry.models.len()
            );
        } else {
            let reason = entry.disabled_reason.as_deref().unwrap_or("disabled");
            println!(
                "  ❌ {} - {} - {}",
                entry.provider,
                entry.provider.label(),
                reason
            );
        }
    }

    Ok(())
}

async fn run_models(provider: Option<Provider>, config_override: Option<&Path>) -> Result<()> {
    let gateway = build_gateway(config_override).await?;

    // With an explicit provider, print a bare list that scripts can consume
    if let Some(target) = provider {
        let models = match gateway.list_models(target) {
            Ok(models) => models,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        };
        for descriptor in models {
            println!("{}", descriptor.id);
        }
        return Ok(());
    }

    for target in Provider::ALL {
        println!("\n{} ({}):", target, target.label());
        match gateway.list_models(target) {
            Ok(models) => {
                if models.is_empty() {
                    println!("  (no models installed)");
                }
                for descriptor in models {
                    if descriptor.display_name == descriptor.id {
                        println!("  {}", descriptor.id);
                    } else {
                        println!("  {} - {}", descriptor.id, descriptor.display_name);
                    }
                }
            }
            Err(e) => println!("  unavailable: {}", e),
        }
    }

    Ok(())
}

async fn run_probe(provider: Option<Provider>, config_override: Option<&Path>) -> Result<()> {
    let gateway = build_gateway(config_override).await?;

    let targets: Vec<Provider> = match provider {
        Some(provider) => vec![provider],
        None => Provider::ALL.to_vec(),
    };

    let mut all_reachable = true;
    for target in targets {
        let status = gateway.probe(target).await;
        if status.reachable {
            match &status.detail {
                Some(detail) => println!("✅ {} - reachable, {}", target, detail),
                None => println!("✅ {} - reachable, {} models", target, status.models.len()),
            }
        } else {
            all_reachable = false;
            let detail = status.detail.unwrap_or_else(|| "unreachable".to_string());
            println!("❌ {} - {}", target, detail);
            if target == Provider::LocalDaemon {
                println!("\n{}", DAEMON_UNREACHABLE_HELP);
            }
        }
    }

    if !all_reachable {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_ask(config: AskConfig) -> Result<()> {
    let gateway = build_gateway(config.config_override.as_deref()).await?;

    let (provider, model) = match resolve_target(&gateway, config.provider, config.model.clone()) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let mut invocation = gateway.config().invocation_config(provider, &model);
    if let Some(temperature) = config.temperature {
        invocation.temperature = temperature;
    }
    if let Some(max_output) = config.max_output {
        invocation.max_output = max_output;
    }
    if let Some(secs) = config.timeout_secs {
        invocation.timeout = Duration::from_secs(secs);
    }

    let request = match &config.system {
        Some(system) => InvocationRequest::new(vec![
            Message::system(system.clone()),
            Message::user(config.question.clone()),
        ]),
        None => InvocationRequest::prompt(config.question.clone()),
    };

    if config.verbose {
        println!("🤖 Asking {}/{} (request {})", provider, model, request.id);
    }
    info!("Asking {}/{}", provider, model);

    match gateway.invoke(invocation, &request).await {
        Ok(result) => {
            if !render_result(provider, &result) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Invocation rejected: {}", e);
            println!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_chat(config: ChatConfig) -> Result<()> {
    let gateway = build_gateway(config.config_override.as_deref()).await?;

    let (mut provider, mut model) =
        match resolve_target(&gateway, config.provider, config.model.clone()) {
            Ok(target) => target,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        };

    println!(
        "💬 Chat started with {}/{}. Type 'help' for commands.",
        provider, model
    );

    loop {
        print!("\n[{}/{}] > ", provider, model);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let input = input.trim();

        if input == "quit" || input == "exit" {
            break;
        }

        if input == "help" {
            show_chat_help();
            continue;
        }

        if input == "examples" {
            show_examples();
            continue;
        }

        if input == "providers" {
            for entry in gateway.list_providers() {
                let marker = if entry.enabled { "✅" } else { "❌" };
                println!(
                    "  {} {} - {}",
                    marker,
                    entry.provider,
                    entry.provider.label()
                );
            }
            continue;
        }

        if input == "models" {
            match gateway.list_models(provider) {
                Ok(models) => {
                    for descriptor in models {
                        println!("  {}", descriptor.id);
                    }
                }
                Err(e) => println!("❌ {}", e),
            }
            continue;
        }

        if input == "status" {
            let status = gateway.probe(provider).await;
            if status.reachable {
                println!("✅ {} is reachable", provider);
            } else {
                let detail = status.detail.unwrap_or_else(|| "unreachable".to_string());
                println!("❌ {} - {}", provider, detail);
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("use ") {
            match switch_target(&gateway, rest) {
                Ok(target) => {
                    (provider, model) = target;
                    println!("Now asking {}/{}", provider, model);
                }
                Err(e) => println!("❌ {}", e),
            }
            continue;
        }

        if let Some(name) = input.strip_prefix("model ") {
            model = name.trim().to_string();
            println!("Now asking {}/{}", provider, model);
            continue;
        }

        if input.is_empty() {
            continue;
        }

        // Anything else is a question for the current model
        info!("Asking {}/{}", provider, model);
        match gateway.ask(provider, &model, input).await {
            Ok(result) => {
                render_result(provider, &result);
            }
            Err(e) => {
                error!("Invocation rejected: {}", e);
                println!("❌ {}", e);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Fill in the provider and model when the user left either unspecified.
///
/// The provider defaults to the first enabled registry entry. The model falls
/// back to the configured per-provider default, then to the first model the
/// provider serves.
fn resolve_target(
    gateway: &ProviderGateway,
    provider: Option<Provider>,
    model: Option<String>,
) -> Result<(Provider, String)> {
    let provider = match provider {
        Some(provider) => provider,
        None => gateway
            .list_providers()
            .iter()
            .find(|entry| entry.enabled)
            .map(|entry| entry.provider)
            .ok_or_else(|| anyhow!("No providers are enabled. Run 'modelgate probe' to see why."))?,
    };

    let models = gateway.list_models(provider)?;
    let model = match model {
        Some(model) => model,
        None => match gateway.config().default_model(provider) {
            Some(model) => model.to_string(),
            None => models
                .first()
                .map(|descriptor| descriptor.id.clone())
                .ok_or_else(|| {
                    anyhow!(
                        "Provider '{}' serves no models (try 'ollama pull llama3.2' first)",
                        provider
                    )
                })?,
        },
    };

    Ok((provider, model))
}

/// Parse `use <provider> [model]` from the chat loop
fn switch_target(gateway: &ProviderGateway, spec: &str) -> Result<(Provider, String)> {
    let mut parts = spec.split_whitespace();
    let name = parts
        .next()
        .ok_or_else(|| anyhow!("Usage: use <provider> [model]"))?;
    let provider = name.parse::<Provider>().map_err(anyhow::Error::msg)?;
    let model = parts.next().map(str::to_string);
    resolve_target(gateway, Some(provider), model)
}

/// Print an invocation outcome. Returns whether it was a success.
fn render_result(provider: Provider, result: &InvocationResult) -> bool {
    match result {
        InvocationResult::Success {
            text,
            elapsed,
            tokens,
            chars,
        } => {
            println!("\n{}", text.trim_end());
            match tokens {
                Some(tokens) => println!(
                    "\n⏱️  {:.2}s, {} tokens, {} chars",
                    elapsed.as_secs_f64(),
                    tokens,
                    chars
                ),
                None => println!("\n⏱️  {:.2}s, {} chars", elapsed.as_secs_f64(), chars),
            }
            true
        }
        InvocationResult::Failure { kind, detail } => {
            error!("Invocation failed ({}): {}", kind, detail);
            println!("❌ {}: {}", kind, detail);
            if *kind == FailureKind::Connection && provider == Provider::LocalDaemon {
                println!("\n{}", DAEMON_UNREACHABLE_HELP);
            }
            false
        }
    }
}

fn show_examples() {
    println!("💡 Example questions:");
    for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
    println!("\nTry one with: modelgate ask \"What is machine learning?\"");
}

fn show_chat_help() {
    println!("📖 Chat Commands:");
    println!("  providers       - List providers and their standing");
    println!("  models          - List models of the current provider");
    println!("  status          - Probe the current provider");
    println!("  use <p> [model] - Switch provider (and optionally model)");
    println!("  model <name>    - Switch model");
    println!("  examples        - Show example questions");
    println!("  help            - Show this help message");
    println!("  quit            - Exit the chat");
    println!("\n💡 Enter any other text to ask the current model.");
}
