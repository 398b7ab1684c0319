//! CLI entrypoint for mcpbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context as _, Result};
use clap::Parser;
use mcpbridge_application::{ExecutionParams, Session};
use mcpbridge_domain::Context;
use mcpbridge_infrastructure::{
    ConfigLoader, JsonlConversationLogger, ProviderClientFactory, TemplatePromptBuilder,
    ToolExecutor,
};
use mcpbridge_presentation::{Cli, Command, ConsoleFormatter, OutputFormat};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if matches!(cli.command, Some(Command::Version)) {
        println!("mcpbridge version {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        match ConfigLoader::load_llm_config(cli.config.as_deref()) {
            Ok(config) => println!("{config}"),
            Err(e) => println!("LLM configuration is invalid: {e}"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let chain = cli.command_chain()?;
    let context = Context::from_chain(&chain).context("Invalid invocation")?;

    info!("Starting mcpbridge with {} tool server(s)", context.servers.len());

    // === Dependency Injection ===
    let tool_executor = Arc::new(ToolExecutor::from_configs(&context.servers));
    let llm_factory = Arc::new(ProviderClientFactory::new(cli.config.clone()));
    let prompt_builder = Arc::new(match &cli.template {
        Some(path) => TemplatePromptBuilder::from_file(path)?,
        None => TemplatePromptBuilder::builtin()?,
    });

    let mut execution = ExecutionParams::default();
    if let Some(max) = cli.max_tool_turns {
        execution = execution.with_max_tool_turns(max);
    }

    let mut session = Session::new(context, tool_executor, llm_factory, prompt_builder)
        .with_execution(execution);

    if let Some(path) = &cli.conversation_log {
        let logger = JsonlConversationLogger::create(path)
            .with_context(|| format!("Failed to open conversation log {}", path.display()))?
            .with_session_id(session.id());
        debug!("Conversation log: {}", logger.path().display());
        session = session.with_conversation_logger(Arc::new(logger));
    }

    let outcome = session.run().await?;

    let output = match cli.output {
        OutputFormat::Answer => ConsoleFormatter::format_answer(&outcome),
        OutputFormat::Transcript => ConsoleFormatter::format_transcript(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    print!("{output}");

    Ok(if outcome.is_done() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
